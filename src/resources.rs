//! Location of the model bundle on disk.
//!
//! The bundle is three files produced by the training side: the BPE merge
//! table, the tokenizer vocabulary and the regression weights. Parsing lives
//! with the components; this module only finds the files.

use std::path::{Path, PathBuf};

use crate::RelictError;

pub const MERGES_FILE: &str = "merges.txt";
pub const VOCAB_FILE: &str = "vocab.json";
pub const MODEL_FILE: &str = "model.json";

#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub merges: PathBuf,
    pub vocab: PathBuf,
    pub model: PathBuf,
}

impl ModelFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            merges: dir.join(MERGES_FILE),
            vocab: dir.join(VOCAB_FILE),
            model: dir.join(MODEL_FILE),
        }
    }

    pub fn all_present(&self) -> bool {
        self.merges.exists() && self.vocab.exists() && self.model.exists()
    }
}

/// Scan the candidate locations for a complete bundle.
pub fn locate() -> Result<ModelFiles, RelictError> {
    let candidates = [
        // Explicit override
        std::env::var("RELICT_MODEL_DIR").ok().map(PathBuf::from),
        // Project root (development)
        Some(PathBuf::from("models")),
        // ~/.relict/models/
        home_dir().map(|d| d.join("models")),
    ];

    for dir in candidates.into_iter().flatten() {
        let files = ModelFiles::in_dir(&dir);
        if files.all_present() {
            return Ok(files);
        }
    }

    Err(RelictError::Resource(format!(
        "no model bundle found; expected {MERGES_FILE}, {VOCAB_FILE} and {MODEL_FILE} \
         under $RELICT_MODEL_DIR, ./models or ~/.relict/models"
    )))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".relict"))
}
