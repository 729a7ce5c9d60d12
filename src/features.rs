//! Feature extraction over tokenized comments.
//!
//! Features are the occurrence counts of each vocabulary word, in vocabulary
//! order, followed by the semicolon count and the semicolon frequency. Only
//! the first `max_tokens` tokens contribute.

use std::collections::HashMap;
use std::io::Read;

use crate::RelictError;

#[derive(Debug)]
pub struct FeatureExtractor {
    index_by_word: HashMap<String, usize>,
    max_tokens: usize,
}

impl FeatureExtractor {
    pub fn new(words: Vec<String>, max_tokens: usize) -> Self {
        let index_by_word = words
            .into_iter()
            .enumerate()
            .map(|(index, word)| (word, index))
            .collect();
        Self { index_by_word, max_tokens }
    }

    /// Read the vocabulary from its JSON form: a single top-level array of
    /// strings whose array position is the feature position.
    pub fn from_reader(vocab: impl Read, max_tokens: usize) -> Result<Self, RelictError> {
        let words: Vec<String> = serde_json::from_reader(vocab)
            .map_err(|e| RelictError::Resource(format!("vocabulary: {e}")))?;
        Ok(Self::new(words, max_tokens))
    }

    pub fn vocabulary_len(&self) -> usize {
        self.index_by_word.len()
    }

    /// The produced vector has `vocabulary_len() + 2` entries. With an empty
    /// token array the frequency entry divides zero by zero and comes out
    /// NaN; the scorer turns that into a negative decision, so empty
    /// comments never get reported.
    pub fn extract(&self, tokens: &[String]) -> Vec<f64> {
        let vocabulary_len = self.index_by_word.len();
        let mut features = vec![0.0; vocabulary_len + 2];
        let token_count = tokens.len().min(self.max_tokens);

        let mut semicolons = 0u64;
        for token in &tokens[..token_count] {
            if let Some(&index) = self.index_by_word.get(token) {
                features[index] += 1.0;
            }
            semicolons += token.chars().filter(|&c| c == ';').count() as u64;
        }

        features[vocabulary_len] = semicolons as f64;
        features[vocabulary_len + 1] = semicolons as f64 / token_count as f64;
        features
    }
}
