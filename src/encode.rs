//! Byte-pair encoding of single tokens, plus a memoizing decorator.

use std::collections::HashMap;
use std::io::BufRead;

use crate::RelictError;
use crate::bpe::{BpePair, BpeRanks};

/// Splits a token into the sub-word pieces its merge table allows.
pub trait BpeEncode {
    fn bpe_encode(&mut self, token: &str) -> Vec<String>;
}

/// BPE encoder following the RoBERTa tokenizer from Hugging Face: repeatedly
/// merge the lowest-ranked adjacent pair until only unranked pairs remain.
pub struct RobertaBpeEncoder {
    ranks: BpeRanks,
}

impl RobertaBpeEncoder {
    pub fn new(ranks: BpeRanks) -> Self {
        Self { ranks }
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, RelictError> {
        Ok(Self::new(BpeRanks::from_reader(reader)?))
    }

    pub fn ranks(&self) -> &BpeRanks {
        &self.ranks
    }

    /// The lowest-ranked adjacent pair, or `None` when every pair is
    /// unranked. Ties keep the first occurrence: the scan only replaces the
    /// candidate on a strictly lower rank.
    fn lowest_ranked_pair(&self, words: &[String]) -> Option<BpePair> {
        let mut best: Option<(u32, usize)> = None;
        for i in 0..words.len() - 1 {
            let pair = BpePair::new(&words[i], &words[i + 1]);
            if let Some(rank) = self.ranks.rank(&pair)
                && best.is_none_or(|(best_rank, _)| rank < best_rank)
            {
                best = Some((rank, i));
            }
        }
        best.map(|(_, i)| BpePair::new(&words[i], &words[i + 1]))
    }
}

impl BpeEncode for RobertaBpeEncoder {
    fn bpe_encode(&mut self, token: &str) -> Vec<String> {
        // every word starts as a single character
        let mut words: Vec<String> = token.chars().map(String::from).collect();
        if words.len() < 2 {
            return words;
        }

        loop {
            let Some(target) = self.lowest_ranked_pair(&words) else {
                break;
            };
            words = apply_merge(&words, &target);
            if words.len() == 1 {
                break;
            }
        }
        words
    }
}

/// One left-to-right sweep: every adjacent `(left, right)` occurrence merges
/// into one word, and a merge consumes its right-hand side, so overlapping
/// occurrences resolve greedily.
fn apply_merge(words: &[String], target: &BpePair) -> Vec<String> {
    let mut merged = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        if i + 1 < words.len() && target.matches(&words[i], &words[i + 1]) {
            merged.push(target.merged().to_string());
            i += 2;
        } else {
            merged.push(words[i].clone());
            i += 1;
        }
    }
    merged
}

/// Unbounded memoizing wrapper around any [`BpeEncode`] implementation.
///
/// Entries live for the whole analysis run; `hits` counts every call (cached
/// or not) and `size` the number of distinct inputs seen.
pub struct CachingBpeEncoder<E> {
    delegate: E,
    cache: HashMap<String, Vec<String>>,
    hits: u64,
}

impl<E> CachingBpeEncoder<E> {
    pub fn new(delegate: E) -> Self {
        Self { delegate, cache: HashMap::new(), hits: 0 }
    }

    pub fn size(&self) -> usize {
        self.cache.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
    }
}

impl<E: BpeEncode> BpeEncode for CachingBpeEncoder<E> {
    fn bpe_encode(&mut self, token: &str) -> Vec<String> {
        self.hits += 1;
        if let Some(cached) = self.cache.get(token) {
            return cached.clone();
        }
        let encoded = self.delegate.bpe_encode(token);
        self.cache.insert(token.to_string(), encoded.clone());
        encoded
    }
}
