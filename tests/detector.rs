use std::path::Path;

use relict::report::MemoryReporter;
use relict::{
    Detector, DetectorConfig, Position, SyntaxToken, SyntaxTrivia, TextRange, TriviaKind,
};
use tempfile::TempDir;

/// A bundle small enough to reason about by hand. The merge table rebuilds a
/// few Java-ish keywords out of byte-level characters ('Ġ' is the encoded
/// space), the vocabulary indexes those keywords, and the weights lean on the
/// keyword counts plus the two semicolon features.
fn write_bundle(dir: &Path) {
    let merges = "\
#version: 0.2
i n
in t
r e
re t
ret u
retu r
retur n
Ġ int
Ġ return
";
    std::fs::write(dir.join("merges.txt"), merges).unwrap();
    std::fs::write(dir.join("vocab.json"), r#"["Ġint", "Ġreturn", "int"]"#).unwrap();
    // features: [count(Ġint), count(Ġreturn), count(int), semicolons, frequency]
    std::fs::write(
        dir.join("model.json"),
        r#"{"intercept": -3.0, "coefficients": [2.0, 2.0, 2.0, 1.5, 0.0]}"#,
    )
    .unwrap();
}

fn line_trivia(line: u32, text: &str) -> SyntaxTrivia {
    SyntaxTrivia::new(
        TriviaKind::Line,
        text,
        TextRange::new(Position::new(line, 5), Position::new(line, 5 + text.len() as u32)),
    )
}

fn block_trivia(start: u32, end: u32, end_column: u32, text: &str) -> SyntaxTrivia {
    SyntaxTrivia::new(
        TriviaKind::Block,
        text,
        TextRange::new(Position::new(start, 1), Position::new(end, end_column)),
    )
}

fn detector(dir: &TempDir) -> Detector {
    Detector::new(DetectorConfig {
        model_dir: Some(dir.path().to_path_buf()),
        ..DetectorConfig::default()
    })
}

#[test]
fn commented_out_statements_are_flagged() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![
        line_trivia(10, "// int x = f();"),
        line_trivia(11, "// return x;"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    // one batch: " int x = f();\n return x;"
    // "Ġint" and "Ġreturn" each merge back into one vocabulary token,
    // two semicolons on top: linear = -3 + 2 + 2 + 3 = 4
    assert_eq!(reporter.issues.len(), 1);
    let issue = &reporter.issues[0];
    assert_eq!(issue.rule_key, "S125");
    assert_eq!(issue.file, Path::new("Sample.java"));
    assert_eq!(
        issue.message,
        "This block of commented-out lines of code should be removed."
    );
    assert_eq!(issue.span.start_line, 10);
    assert_eq!(issue.span.start_character, 4);
    assert_eq!(issue.span.end_line, 11);
    assert_eq!(issue.span.end_character, 5 + "// return x;".len() as u32 - 1);
}

#[test]
fn prose_comments_are_left_alone() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![
        line_trivia(3, "// explains why the loop below"),
        line_trivia(4, "// walks the list backwards"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    assert_eq!(reporter.comments.len(), 1);
    assert!(reporter.issues.is_empty());
}

#[test]
fn separated_series_classify_independently() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![
        line_trivia(1, "// int a = 1;"),
        line_trivia(2, "// int b = 2;"),
        // gap: line 3 is blank
        line_trivia(4, "// just words here"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    assert_eq!(reporter.comments.len(), 2);
    assert_eq!(reporter.issues.len(), 1);
    assert_eq!(reporter.issues[0].span.end_line, 2);
}

#[test]
fn block_comments_are_their_own_batches() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![
        block_trivia(1, 3, 3, "/* int a = 1;\nint b = 2;\nint c = 3; */"),
        block_trivia(5, 5, 20, "/* harmless note */"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    assert_eq!(reporter.comments.len(), 2);
    assert_eq!(reporter.issues.len(), 1);
    assert_eq!(reporter.issues[0].span.start_line, 1);
    assert_eq!(reporter.issues[0].span.end_line, 3);
}

#[test]
fn javadoc_blocks_are_ignored_entirely() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![block_trivia(
        1,
        3,
        3,
        "/** int x = 1;;\n * int y = 2;;\n */",
    )]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    assert!(reporter.comments.is_empty());
    assert!(reporter.issues.is_empty());
}

#[test]
fn issues_preserve_source_order() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    let token = SyntaxToken::new(vec![
        line_trivia(1, "// int a = 1;;"),
        line_trivia(5, "// int b = 2;;"),
        line_trivia(9, "// int c = 3;;"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    assert_eq!(reporter.issues.len(), 3);
    let lines: Vec<u32> = reporter.issues.iter().map(|i| i.span.start_line).collect();
    assert_eq!(lines, vec![1, 5, 9]);
}

#[test]
fn crlf_line_comments_strip_cleanly() {
    let dir = TempDir::new().unwrap();
    write_bundle(dir.path());
    let mut det = detector(&dir);

    // a host that hands over trivia with carriage returns embedded
    let token = SyntaxToken::new(vec![
        line_trivia(1, "// int a = 1;\r"),
        line_trivia(2, "// int b = 2;\r"),
    ]);
    let mut reporter = MemoryReporter::default();
    det.visit_token(Path::new("Sample.java"), &token, &mut reporter).unwrap();

    // the trailing \r normalizes to \n, so the inner // marker still strips
    assert_eq!(reporter.issues.len(), 1);
}
