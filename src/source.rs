use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::question::RawQuestionRecord;

static QUESTIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/questions");

pub const BUNDLED_SET: &str = "sample";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read questions: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question set not found: {0}")]
    NotFound(String),
}

/// Either a bare list of records or an Open Trivia DB style `{"results": [...]}` response
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionDocument {
    List(Vec<RawQuestionRecord>),
    Wrapped { results: Vec<RawQuestionRecord> },
}

pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawQuestionRecord>, LoadError> {
    let doc: QuestionDocument = serde_json::from_slice(bytes)?;
    Ok(match doc {
        QuestionDocument::List(records) => records,
        QuestionDocument::Wrapped { results } => results,
    })
}

/// One-shot provider of raw question records
pub trait QuestionSource {
    fn load(&self) -> Result<Vec<RawQuestionRecord>, LoadError>;
}

#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for FileQuestionSource {
    fn load(&self) -> Result<Vec<RawQuestionRecord>, LoadError> {
        let bytes = fs::read(&self.path)?;
        parse_records(&bytes)
    }
}

/// Question sets compiled into the binary
#[derive(Debug, Clone)]
pub struct BundledQuestionSource {
    name: String,
}

impl BundledQuestionSource {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn names() -> Vec<String> {
        QUESTIONS_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }
}

impl Default for BundledQuestionSource {
    fn default() -> Self {
        Self::new(BUNDLED_SET)
    }
}

impl QuestionSource for BundledQuestionSource {
    fn load(&self) -> Result<Vec<RawQuestionRecord>, LoadError> {
        let file = QUESTIONS_DIR
            .get_file(format!("{}.json", self.name))
            .ok_or_else(|| LoadError::NotFound(self.name.clone()))?;
        parse_records(file.contents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_parse_bare_list() {
        let records = parse_records(br#"[{"question": "a"}, {"question": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].question.as_deref(), Some("b"));
    }

    #[test]
    fn test_parse_wrapped_results() {
        let records =
            parse_records(br#"{"response_code": 0, "results": [{"question": "a"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_records(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert_matches!(parse_records(br#"{"questions": []}"#), Err(LoadError::Parse(_)));
        assert_matches!(parse_records(b"not json"), Err(LoadError::Parse(_)));
    }

    #[test]
    fn test_file_source_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, r#"[{"question": "q", "answer": "a", "options": ["a", "b"]}]"#).unwrap();

        let source = FileQuestionSource::with_path(&path);
        let records = source.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = FileQuestionSource::with_path(dir.path().join("nope.json"));
        let err = source.load().unwrap_err();
        assert_matches!(err, LoadError::Io(_));
        assert!(err.to_string().starts_with("could not read questions"));
    }

    #[test]
    fn test_bundled_sample_loads() {
        let records = BundledQuestionSource::default().load().unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().any(|r| r.kind.as_deref() == Some("boolean")));
        assert!(BundledQuestionSource::names().contains(&BUNDLED_SET.to_string()));
    }

    #[test]
    fn test_load_error_messages_and_sources() {
        use std::error::Error;

        let err = parse_records(b"not json").unwrap_err();
        assert!(err.to_string().starts_with("could not parse questions"));
        assert!(err.source().is_some());

        let err = LoadError::NotFound("trivia".into());
        assert_eq!(err.to_string(), "question set not found: trivia");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_bundled_missing_set() {
        assert_matches!(
            BundledQuestionSource::new("klingon").load(),
            Err(LoadError::NotFound(name)) if name == "klingon"
        );
    }
}
