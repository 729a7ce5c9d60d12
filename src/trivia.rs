//! Host input model: the comment trivia attached to a syntax token.
//!
//! The syntactic analyzer producing these is external; this module only pins
//! down the surface the detector consumes. Lines and columns are 1-based, as
//! delivered by the host parser.

/// 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Start and end positions of a trivium, end inclusive of its last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    /// A `//` comment spanning one source line.
    Line,
    /// A `/* ... */` comment, possibly spanning several lines.
    Block,
}

/// One comment attached to a syntax token, delimiters included.
#[derive(Debug, Clone)]
pub struct SyntaxTrivia {
    pub kind: TriviaKind,
    pub text: String,
    pub range: TextRange,
}

impl SyntaxTrivia {
    pub fn new(kind: TriviaKind, text: impl Into<String>, range: TextRange) -> Self {
        Self { kind, text: text.into(), range }
    }

    pub fn is_block(&self) -> bool {
        self.kind == TriviaKind::Block
    }

    pub fn is_line(&self) -> bool {
        self.kind == TriviaKind::Line
    }

    pub fn start_line(&self) -> u32 {
        self.range.start.line
    }

    pub fn end_line(&self) -> u32 {
        self.range.end.line
    }
}

/// A syntax token with its ordered comment trivia.
#[derive(Debug, Clone, Default)]
pub struct SyntaxToken {
    pub trivias: Vec<SyntaxTrivia>,
}

impl SyntaxToken {
    pub fn new(trivias: Vec<SyntaxTrivia>) -> Self {
        Self { trivias }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_kind_accessors() {
        let range = TextRange::new(Position::new(3, 1), Position::new(3, 12));
        let line = SyntaxTrivia::new(TriviaKind::Line, "// comment", range);
        assert!(line.is_line());
        assert!(!line.is_block());
        assert_eq!(line.start_line(), 3);
        assert_eq!(line.end_line(), 3);

        let range = TextRange::new(Position::new(5, 1), Position::new(8, 3));
        let block = SyntaxTrivia::new(TriviaKind::Block, "/* c */", range);
        assert!(block.is_block());
        assert_eq!(block.end_line(), 8);
    }
}
