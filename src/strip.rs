//! Removal of comment delimiters before tokenization.
//!
//! The delimiters are common to every comment and carry no meaning, so
//! leaving them in would only bias the model.

use crate::RelictError;

/// Recognized Javadoc openers: `/**` followed by a separator. Matched against
/// the first four characters, so the `\r\n` variant only documents intent.
const JAVADOC_HEADERS: &[&str] = &["/** ", "/**\t", "/**\n", "/**\r\n"];
const JAVADOC_HEADER_LEN: usize = 4;
const LINE_HEADER: &str = "//";
const BLOCK_HEADER: &str = "/*";
const BLOCK_TRAILER: &str = "*/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Javadoc,
    LineGroup,
    Block,
}

/// Classify a comment batch by its leading characters.
pub fn comment_kind(text: &str) -> Result<CommentKind, RelictError> {
    let header: String = text.chars().take(JAVADOC_HEADER_LEN).collect();
    if JAVADOC_HEADERS.contains(&header.as_str()) {
        Ok(CommentKind::Javadoc)
    } else if header.starts_with(LINE_HEADER) {
        Ok(CommentKind::LineGroup)
    } else if header.starts_with(BLOCK_HEADER) {
        Ok(CommentKind::Block)
    } else {
        Err(RelictError::Comment(format!(
            "unrecognized comment starting with {header:?}"
        )))
    }
}

/// Strip the comment delimiters from a batch's joined text.
///
/// Line groups lose the leading `//` and every `//` following a newline.
/// Block comments lose `/*` and `*/`. Javadoc loses its 4-character header
/// and, when present, the trailing `*/` (a malformed block without a trailer
/// keeps its tail).
pub fn strip_comment_signs(text: &str) -> Result<String, RelictError> {
    match comment_kind(text)? {
        CommentKind::Javadoc => {
            let body = &text[JAVADOC_HEADER_LEN..];
            Ok(body.strip_suffix(BLOCK_TRAILER).unwrap_or(body).to_string())
        }
        CommentKind::LineGroup => Ok(text[LINE_HEADER.len()..].replace("\n//", "\n")),
        CommentKind::Block => {
            let end = text.len().saturating_sub(BLOCK_TRAILER.len());
            Ok(text.get(BLOCK_HEADER.len()..end).unwrap_or("").to_string())
        }
    }
}
