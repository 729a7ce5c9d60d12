//! Groups a token's comment trivia into batches sharing one classification
//! decision.
//!
//! Adjacent line comments (start lines consecutive) coalesce into one batch;
//! every block comment is its own batch; Javadoc (`/**`) trivia are dropped
//! before classification.

use crate::report::TextSpan;
use crate::trivia::SyntaxTrivia;

/// A non-empty run of trivia classified as a unit.
#[derive(Debug)]
pub struct CommentBatch<'a> {
    pub trivia: Vec<&'a SyntaxTrivia>,
}

impl CommentBatch<'_> {
    /// The raw text of all trivia joined with `\n`, with each trivium's own
    /// line endings (`\r\n`, `\r`) normalized to `\n` first.
    pub fn joined_text(&self) -> String {
        let normalized: Vec<String> = self
            .trivia
            .iter()
            .map(|t| normalize_newlines(&t.text))
            .collect();
        normalized.join("\n")
    }

    /// Span from the first trivium's start to the last trivium's end,
    /// columns shifted to 0-based.
    pub fn span(&self) -> TextSpan {
        let first = self.trivia[0];
        let last = self.trivia[self.trivia.len() - 1];
        TextSpan {
            start_line: first.range.start.line,
            start_character: first.range.start.column - 1,
            end_line: last.range.end.line,
            end_character: last.range.end.column - 1,
        }
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Walk the trivia in source order and build classification batches.
///
/// A line comment extends the current series when its start line is at most
/// one past the last seen line. A block comment flushes the series, forms its
/// own batch, and moves the line cursor to its end line. Javadoc trivia are
/// skipped without touching the series.
pub fn group_comments(trivias: &[SyntaxTrivia]) -> Vec<CommentBatch<'_>> {
    let mut batches = Vec::new();
    let mut series: Vec<&SyntaxTrivia> = Vec::new();
    let mut previous_line: Option<u32> = None;

    for trivia in trivias {
        if trivia.text.starts_with("/**") {
            continue;
        }

        if trivia.is_block() {
            if !series.is_empty() {
                batches.push(CommentBatch { trivia: std::mem::take(&mut series) });
            }
            previous_line = Some(trivia.end_line());
            batches.push(CommentBatch { trivia: vec![trivia] });
        } else if previous_line.is_none_or(|prev| trivia.start_line() <= prev + 1) {
            series.push(trivia);
            previous_line = Some(trivia.start_line());
        } else {
            if !series.is_empty() {
                batches.push(CommentBatch { trivia: std::mem::take(&mut series) });
            }
            previous_line = Some(trivia.start_line());
            series.push(trivia);
        }
    }

    if !series.is_empty() {
        batches.push(CommentBatch { trivia: series });
    }
    batches
}
