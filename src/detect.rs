//! Glue of the classification pipeline.
//!
//! For each syntax token the host visits, the detector groups the comment
//! trivia into batches and classifies every batch: journal, strip, tokenize,
//! extract features, score. A positive decision becomes one issue covering
//! the batch's span.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::RelictError;
use crate::config::DetectorConfig;
use crate::encode::{BpeEncode, CachingBpeEncoder, RobertaBpeEncoder};
use crate::features::FeatureExtractor;
use crate::grouping::{CommentBatch, group_comments};
use crate::model::Model;
use crate::report::{Issue, Reporter};
use crate::resources::{self, ModelFiles};
use crate::strip::strip_comment_signs;
use crate::tokenize::RobertaTokenizer;
use crate::trivia::SyntaxToken;

pub const RULE_KEY: &str = "S125";
const MESSAGE: &str = "This block of commented-out lines of code should be removed.";

struct Pipeline {
    tokenizer: RobertaTokenizer,
    extractor: FeatureExtractor,
    model: Model,
}

impl Pipeline {
    fn load(config: &DetectorConfig) -> Result<Self, RelictError> {
        let files = match &config.model_dir {
            Some(dir) => ModelFiles::in_dir(dir),
            None => resources::locate()?,
        };

        let ranks_reader = BufReader::new(open(&files.merges)?);
        let encoder = RobertaBpeEncoder::from_reader(ranks_reader)?;
        let merge_pairs = encoder.ranks().len();
        // the BPE cache lives as long as the analysis; entries are never
        // invalidated
        let cached: Box<dyn BpeEncode> = Box::new(CachingBpeEncoder::new(encoder));
        let tokenizer = RobertaTokenizer::new(cached);

        let extractor = FeatureExtractor::from_reader(
            BufReader::new(open(&files.vocab)?),
            config.max_tokens,
        )?;
        let model = Model::from_reader(BufReader::new(open(&files.model)?), config.threshold)?;

        eprintln!(
            "relict: loaded model bundle ({} merge pairs, {} vocabulary words)",
            merge_pairs,
            extractor.vocabulary_len()
        );
        Ok(Self { tokenizer, extractor, model })
    }
}

fn open(path: &Path) -> Result<File, RelictError> {
    File::open(path).map_err(|e| RelictError::Resource(format!("{}: {e}", path.display())))
}

pub struct Detector {
    config: DetectorConfig,
    pipeline: Option<Pipeline>,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config, pipeline: None }
    }

    /// Classify all comment batches attached to one syntax token of `file`,
    /// reporting into `reporter`. Issues come out in trivia order.
    pub fn visit_token(
        &mut self,
        file: &Path,
        token: &SyntaxToken,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RelictError> {
        for batch in group_comments(&token.trivias) {
            self.classify_batch(file, &batch, reporter)?;
        }
        Ok(())
    }

    fn classify_batch(
        &mut self,
        file: &Path,
        batch: &CommentBatch<'_>,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RelictError> {
        reporter.capture_comment(file, batch);

        let pipeline = self.pipeline()?;
        let raw = batch.joined_text();
        let comment = strip_comment_signs(&raw)?;
        let tokens = pipeline.tokenizer.tokenize(&comment)?;
        let features = pipeline.extractor.extract(&tokens);
        let prediction = pipeline.model.predict(&features)?;

        if prediction.decision == 1 {
            reporter.report_issue(Issue {
                rule_key: RULE_KEY,
                file: file.to_path_buf(),
                span: batch.span(),
                message: MESSAGE.to_string(),
                cost: 0,
            });
        }
        Ok(())
    }

    /// The pipeline is built on the first classification and reused for the
    /// rest of the run.
    fn pipeline(&mut self) -> Result<&mut Pipeline, RelictError> {
        let pipeline = match self.pipeline.take() {
            Some(pipeline) => pipeline,
            None => Pipeline::load(&self.config)?,
        };
        Ok(self.pipeline.insert(pipeline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;
    use crate::trivia::{Position, SyntaxTrivia, TextRange, TriviaKind};
    use tempfile::TempDir;

    /// Bundle whose only signal is the semicolon count: two semicolons push
    /// the sigmoid to ~1, none leave it at ~0.
    fn write_semicolon_bundle(dir: &Path) {
        std::fs::write(dir.join("merges.txt"), "#version: 0.2\n").unwrap();
        std::fs::write(dir.join("vocab.json"), r#"["Ġreturn"]"#).unwrap();
        std::fs::write(
            dir.join("model.json"),
            r#"{"intercept": -4.0, "coefficients": [0.0, 4.0, 0.0]}"#,
        )
        .unwrap();
    }

    fn line(line_no: u32, text: &str) -> SyntaxTrivia {
        SyntaxTrivia::new(
            TriviaKind::Line,
            text,
            TextRange::new(
                Position::new(line_no, 1),
                Position::new(line_no, 1 + text.len() as u32),
            ),
        )
    }

    fn detector_in(dir: &Path) -> Detector {
        Detector::new(DetectorConfig {
            model_dir: Some(dir.to_path_buf()),
            ..DetectorConfig::default()
        })
    }

    #[test]
    fn code_batches_are_reported_and_prose_is_not() {
        let dir = TempDir::new().unwrap();
        write_semicolon_bundle(dir.path());
        let mut detector = detector_in(dir.path());

        let token = SyntaxToken::new(vec![
            line(1, "// x = compute();"),
            line(2, "// return x;"),
            line(4, "// explains the algorithm below"),
        ]);
        let mut reporter = MemoryReporter::default();
        detector.visit_token(Path::new("A.java"), &token, &mut reporter).unwrap();

        // both batches journaled, only the code one reported
        assert_eq!(reporter.comments.len(), 2);
        assert_eq!(reporter.issues.len(), 1);

        let issue = &reporter.issues[0];
        assert_eq!(issue.rule_key, "S125");
        assert_eq!(issue.message, MESSAGE);
        assert_eq!(issue.cost, 0);
        assert_eq!(issue.span.start_line, 1);
        assert_eq!(issue.span.start_character, 0);
        assert_eq!(issue.span.end_line, 2);
    }

    #[test]
    fn javadoc_is_neither_journaled_nor_reported() {
        let dir = TempDir::new().unwrap();
        write_semicolon_bundle(dir.path());
        let mut detector = detector_in(dir.path());

        let token = SyntaxToken::new(vec![SyntaxTrivia::new(
            TriviaKind::Block,
            "/** x = 1;; */",
            TextRange::new(Position::new(1, 1), Position::new(1, 15)),
        )]);
        let mut reporter = MemoryReporter::default();
        detector.visit_token(Path::new("A.java"), &token, &mut reporter).unwrap();

        assert!(reporter.comments.is_empty());
        assert!(reporter.issues.is_empty());
    }

    #[test]
    fn empty_comment_is_journaled_but_never_reported() {
        let dir = TempDir::new().unwrap();
        write_semicolon_bundle(dir.path());
        let mut detector = detector_in(dir.path());

        let token = SyntaxToken::new(vec![line(1, "//")]);
        let mut reporter = MemoryReporter::default();
        detector.visit_token(Path::new("A.java"), &token, &mut reporter).unwrap();

        assert_eq!(reporter.comments, vec!["//"]);
        assert!(reporter.issues.is_empty());
    }

    #[test]
    fn missing_bundle_surfaces_a_resource_error() {
        let dir = TempDir::new().unwrap();
        let mut detector = detector_in(dir.path());

        let token = SyntaxToken::new(vec![line(1, "// x;;")]);
        let mut reporter = MemoryReporter::default();
        let err = detector.visit_token(Path::new("A.java"), &token, &mut reporter).unwrap_err();
        assert!(matches!(err, RelictError::Resource(_)));
        // the batch was journaled before the load attempt
        assert_eq!(reporter.comments.len(), 1);
    }

    #[test]
    fn mismatched_bundle_surfaces_a_shape_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("merges.txt"), "#v\n").unwrap();
        std::fs::write(dir.path().join("vocab.json"), r#"["a", "b"]"#).unwrap();
        // two coefficients for a 4-entry feature vector
        std::fs::write(
            dir.path().join("model.json"),
            r#"{"intercept": 0.0, "coefficients": [1.0, 1.0]}"#,
        )
        .unwrap();
        let mut detector = detector_in(dir.path());

        let token = SyntaxToken::new(vec![line(1, "// x;;")]);
        let mut reporter = MemoryReporter::default();
        let err = detector.visit_token(Path::new("A.java"), &token, &mut reporter).unwrap_err();
        assert!(matches!(err, RelictError::Shape { expected: 2, actual: 4 }));
    }
}
