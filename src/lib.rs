//! Detection of commented-out code in source files.
//!
//! A host analyzer hands each syntax token's comment trivia to [`Detector`],
//! which groups them into batches, strips the comment delimiters, runs the
//! text through a RoBERTa-compatible tokenizer, extracts a bag-of-vocabulary
//! feature vector, and scores it with a logistic-regression model. Batches
//! scored above the decision threshold are reported as issues.
//!
//! The model bundle (merge table, vocabulary, weights) is loaded once, on the
//! first classification.

pub mod bpe;
pub mod config;
pub mod detect;
pub mod encode;
pub mod features;
pub mod grouping;
pub mod model;
pub mod report;
pub mod resources;
pub mod strip;
pub mod tokenize;
pub mod trivia;

pub use config::DetectorConfig;
pub use detect::Detector;
pub use report::{Issue, Reporter, TextSpan};
pub use trivia::{Position, SyntaxToken, SyntaxTrivia, TextRange, TriviaKind};

#[derive(Debug)]
pub enum RelictError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Pattern(fancy_regex::Error),
    Config(String),
    /// A data file of the model bundle is unreadable or structurally invalid.
    Resource(String),
    /// A comment batch whose first characters match no known comment header.
    Comment(String),
    /// Coefficient vector and feature vector disagree on length.
    Shape { expected: usize, actual: usize },
}

impl std::fmt::Display for RelictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelictError::Io(e) => write!(f, "io: {e}"),
            RelictError::Json(e) => write!(f, "json: {e}"),
            RelictError::Pattern(e) => write!(f, "pattern: {e}"),
            RelictError::Config(msg) => write!(f, "config: {msg}"),
            RelictError::Resource(msg) => write!(f, "resource: {msg}"),
            RelictError::Comment(msg) => write!(f, "comment: {msg}"),
            RelictError::Shape { expected, actual } => {
                write!(f, "shape: expected {expected} features, got {actual}")
            }
        }
    }
}

impl std::error::Error for RelictError {}

impl From<std::io::Error> for RelictError {
    fn from(e: std::io::Error) -> Self {
        RelictError::Io(e)
    }
}

impl From<serde_json::Error> for RelictError {
    fn from(e: serde_json::Error) -> Self {
        RelictError::Json(e)
    }
}

impl From<fancy_regex::Error> for RelictError {
    fn from(e: fancy_regex::Error) -> Self {
        RelictError::Pattern(e)
    }
}
