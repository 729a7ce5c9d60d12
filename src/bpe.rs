//! The ranked merge table driving BPE encoding.
//!
//! Parsed once from a RoBERTa merge file (e.g. the `merges.txt` shipped with
//! the roberta-base model) and immutable afterwards.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::BufRead;

use crate::RelictError;

/// An ordered pair of sub-word symbols, usable as a map key.
///
/// Equality and hashing cover `(left, right)` only; the concatenation is a
/// derived cache.
#[derive(Debug, Clone)]
pub struct BpePair {
    left: String,
    right: String,
    merged: String,
}

impl BpePair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
            merged: format!("{left}{right}"),
        }
    }

    /// The concatenation `left ++ right` emitted when this pair merges.
    pub fn merged(&self) -> &str {
        &self.merged
    }

    pub fn matches(&self, left: &str, right: &str) -> bool {
        self.left == left && self.right == right
    }
}

impl PartialEq for BpePair {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for BpePair {}

impl Hash for BpePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

/// Immutable `BpePair -> rank` mapping. Lower rank merges first.
#[derive(Debug, Default)]
pub struct BpeRanks {
    ranks: HashMap<BpePair, u32>,
}

impl BpeRanks {
    /// Parse a merge file: a `#`-prefixed version line, then one
    /// space-separated pair per line. Rank is the zero-based position among
    /// the non-header, non-empty lines.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, RelictError> {
        let mut lines = reader.lines();
        let header = lines
            .next()
            .ok_or_else(|| RelictError::Resource("merge file is empty".into()))??;
        if !header.starts_with('#') {
            return Err(RelictError::Resource(
                "expected merge file to start with a version line".into(),
            ));
        }

        let mut ranks = HashMap::new();
        let mut rank = 0u32;
        for line in lines {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut symbols = line.split(' ');
            let (Some(left), Some(right)) = (symbols.next(), symbols.next()) else {
                return Err(RelictError::Resource(format!(
                    "merge line {rank} is not a space-separated pair: {line:?}"
                )));
            };
            ranks.insert(BpePair::new(left, right), rank);
            rank += 1;
        }
        Ok(Self { ranks })
    }

    pub fn rank(&self, pair: &BpePair) -> Option<u32> {
        self.ranks.get(pair).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
