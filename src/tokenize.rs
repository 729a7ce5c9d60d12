//! RoBERTa-compatible tokenization.
//!
//! Port of the Hugging Face RoBERTa tokenizer, reduced to what comment
//! classification needs: text in, sub-word strings out. Mapping pieces to
//! integer ids is the caller's business, and added-token ("level 1")
//! splitting is not supported — the whole input is one level-1 token.
//!
//! Tokenization runs in three stages:
//! - level 2: regex split over [`LEVEL2_SUB_PATTERNS`]
//! - level 3: byte-level encoding of each level-2 token
//! - level 4: BPE encoding of each level-3 token

use fancy_regex::Regex;

use crate::RelictError;
use crate::encode::BpeEncode;

/// Sub-patterns of the level-2 split, tried in this order at every position.
///
/// The original lives in `RobertaTokenizer.__init__`:
/// `'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+`
///
/// The look-ahead in the second-to-last branch is why this needs
/// `fancy_regex` rather than `regex`.
const LEVEL2_SUB_PATTERNS: &[&str] = &[
    "'s",
    "'t",
    "'re",
    "'ve",
    "'m",
    "'ll",
    "'d",
    r" ?\p{L}+",
    r" ?\p{N}+",
    r" ?[^\s\p{L}\p{N}]+",
    r"\s+(?!\S)",
    r"\s+",
];

/// Build the 256-entry byte-to-unicode table: printable bytes map to
/// themselves, the 68 others to code points 256, 257, … in ascending byte
/// order. No output is whitespace or a control character, so downstream BPE
/// never sees either.
pub fn build_byte_unicode_table() -> [char; 256] {
    let mut table = ['\0'; 256];
    let mut overflow = 0u32;
    for byte in 0..=255u32 {
        let printable = (0x21..=0x7E).contains(&byte)
            || (0xA1..=0xAC).contains(&byte)
            || (0xAE..=0xFF).contains(&byte);
        let code = if printable {
            byte
        } else {
            overflow += 1;
            0x100 + (overflow - 1)
        };
        // stays within 0x100..=0x143, always a valid scalar
        table[byte as usize] = char::from_u32(code).unwrap();
    }
    table
}

/// Observer of the intermediate tokenization stages. Every method defaults to
/// a no-op; callbacks run synchronously before `tokenize` returns.
///
/// `level1_tokens` is always the whole input as a single token, and
/// `level1_index` is always 0 (added tokens are not supported).
pub trait TokenizeListener {
    fn level1_tokens(&mut self, _level1: &[String]) {}
    fn level2_tokens(&mut self, _level1: &[String], _level1_index: usize, _level2: &[String]) {}
    fn level3_tokens(&mut self, _level1: &[String], _level1_index: usize, _level3: &[String]) {}
    fn level4_tokens(
        &mut self,
        _level1: &[String],
        _level1_index: usize,
        _level3: &[String],
        _level3_index: usize,
        _level4: &[String],
    ) {
    }
}

/// Listener that observes nothing.
pub struct NoopListener;

impl TokenizeListener for NoopListener {}

/// Memoization hook around the level-2 and level-3 stages. The default
/// passes straight through to the supplied computation. Caching of level 4
/// belongs in the [`BpeEncode`] implementation itself.
pub trait TokenizeCache {
    fn level2(
        &mut self,
        level1_token: &str,
        split: &mut dyn FnMut(&str) -> Result<Vec<String>, RelictError>,
    ) -> Result<Vec<String>, RelictError> {
        split(level1_token)
    }

    fn level3(
        &mut self,
        level2_tokens: &[String],
        encode: &mut dyn FnMut(&[String]) -> Vec<String>,
    ) -> Vec<String> {
        encode(level2_tokens)
    }
}

/// Cache that never retains anything.
pub struct PassthroughCache;

impl TokenizeCache for PassthroughCache {}

pub struct RobertaTokenizer {
    pattern: Regex,
    table: [char; 256],
    encoder: Box<dyn BpeEncode>,
    listener: Box<dyn TokenizeListener>,
    cache: Box<dyn TokenizeCache>,
}

impl RobertaTokenizer {
    pub fn new(encoder: Box<dyn BpeEncode>) -> Self {
        // the pattern is a compile-time constant, so this cannot fail
        let pattern = Regex::new(&LEVEL2_SUB_PATTERNS.join("|")).unwrap();
        Self {
            pattern,
            table: build_byte_unicode_table(),
            encoder,
            listener: Box::new(NoopListener),
            cache: Box::new(PassthroughCache),
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn TokenizeListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_cache(mut self, cache: Box<dyn TokenizeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Tokenize `text` into RoBERTa sub-word pieces, preserving order.
    pub fn tokenize(&mut self, text: &str) -> Result<Vec<String>, RelictError> {
        let level1 = vec![text.to_string()];
        self.listener.level1_tokens(&level1);

        let pattern = &self.pattern;
        let level2 = self
            .cache
            .level2(&level1[0], &mut |token| level2_split(pattern, token))?;
        self.listener.level2_tokens(&level1, 0, &level2);

        let table = &self.table;
        let level3 = self
            .cache
            .level3(&level2, &mut |tokens| level3_encode_all(table, tokens));
        self.listener.level3_tokens(&level1, 0, &level3);

        let mut pieces = Vec::with_capacity(level3.len());
        for (index, level3_token) in level3.iter().enumerate() {
            let level4 = self.encoder.bpe_encode(level3_token);
            self.listener.level4_tokens(&level1, 0, &level3, index, &level4);
            pieces.extend(level4);
        }
        Ok(pieces)
    }
}

/// Split `text` at the level-2 pattern matches.
///
/// The cursor advances to each match's *start*, not its end: a slice is only
/// emitted once the next match (or the end of input) bounds it. Consecutive
/// matches therefore emit one slice each, a slice that runs to the start of
/// its successor, and every character of the input ends up in exactly one
/// token.
fn level2_split(pattern: &Regex, text: &str) -> Result<Vec<String>, RelictError> {
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        let found = found?;
        if found.start() > cursor {
            tokens.push(text[cursor..found.start()].to_string());
        }
        cursor = found.start();
    }
    if cursor < text.len() {
        tokens.push(text[cursor..].to_string());
    }
    Ok(tokens)
}

fn level3_encode_all(table: &[char; 256], tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|token| level3_encode(table, token)).collect()
}

/// Map each UTF-8 byte of `token` through the table. The output has exactly
/// one character per input byte.
fn level3_encode(table: &[char; 256], token: &str) -> String {
    token.bytes().map(|byte| table[byte as usize]).collect()
}
