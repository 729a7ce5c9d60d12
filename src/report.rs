use std::path::{Path, PathBuf};

use crate::grouping::CommentBatch;

/// A reported source span. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub rule_key: &'static str,
    pub file: PathBuf,
    pub span: TextSpan,
    pub message: String,
    pub cost: u32,
}

/// Sink the detector reports into. The host journals every classified
/// comment batch (whatever the decision) and receives at most one issue per
/// batch, in source order.
pub trait Reporter {
    fn capture_comment(&mut self, file: &Path, batch: &CommentBatch<'_>);
    fn report_issue(&mut self, issue: Issue);
}

/// Reporter that collects everything in memory. Used by hosts that
/// post-process results, and by tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    /// Joined raw text of every journaled batch, in source order.
    pub comments: Vec<String>,
    pub issues: Vec<Issue>,
}

impl Reporter for MemoryReporter {
    fn capture_comment(&mut self, _file: &Path, batch: &CommentBatch<'_>) {
        self.comments.push(batch.joined_text());
    }

    fn report_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }
}
