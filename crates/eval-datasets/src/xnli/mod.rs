//! XNLI cross-lingual natural language inference dataset.
//!
//! Each split is a tab-separated file with a header row. Only four columns
//! are used, in any order:
//! - `language`
//! - `gold_label`
//! - `sentence1`
//! - `sentence2`
//!
//! The validation file is returned under [`Split::Train`] and the test file
//! under [`Split::Test`].

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetReader, Example, SentencePair, Split, Splits};
use crate::error::{Error, Result};

/// Default validation file name.
pub const DEFAULT_VALID_FILE: &str = "xnli.dev.tsv";
/// Default test file name.
pub const DEFAULT_TEST_FILE: &str = "xnli.test.tsv";

const LANGUAGE: &str = "language";
const GOLD_LABEL: &str = "gold_label";
const SENTENCE1: &str = "sentence1";
const SENTENCE2: &str = "sentence2";

/// File names and language filter used by [`CrossLingualInferenceReader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// Validation file, relative to the data directory.
    #[serde(default = "default_valid_file")]
    pub valid_file: String,
    /// Test file, relative to the data directory.
    #[serde(default = "default_test_file")]
    pub test_file: String,
    /// Keep only rows with this exact `language` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

fn default_valid_file() -> String {
    DEFAULT_VALID_FILE.to_string()
}

fn default_test_file() -> String {
    DEFAULT_TEST_FILE.to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            valid_file: default_valid_file(),
            test_file: default_test_file(),
            lang: None,
        }
    }
}

/// Reader for XNLI-format TSV files.
#[derive(Debug, Clone, Default)]
pub struct CrossLingualInferenceReader {
    config: InferenceConfig,
}

impl CrossLingualInferenceReader {
    /// Create a reader with default file names and no language filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit config.
    pub fn from_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Set the validation file name.
    pub fn with_valid_file(mut self, name: impl Into<String>) -> Self {
        self.config.valid_file = name.into();
        self
    }

    /// Set the test file name.
    pub fn with_test_file(mut self, name: impl Into<String>) -> Self {
        self.config.test_file = name.into();
        self
    }

    /// Keep only rows in this language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = Some(lang.into());
        self
    }

    /// The active config.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Read both splits under `data_path`.
    pub fn read(&self, data_path: impl AsRef<Path>) -> Result<Splits<String>> {
        self.read_splits(data_path.as_ref())
    }

    /// Read a single TSV file into labeled pairs.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<Example<String>>> {
        read_tsv(path.as_ref(), self.config.lang.as_deref())
    }
}

impl DatasetReader for CrossLingualInferenceReader {
    type Label = String;

    fn name(&self) -> &str {
        "xnli"
    }

    fn read_splits(&self, data_path: &Path) -> Result<Splits<String>> {
        let lang = self.config.lang.as_deref();
        let valid = read_tsv(&data_path.join(&self.config.valid_file), lang)?;
        let test = read_tsv(&data_path.join(&self.config.test_file), lang)?;

        tracing::info!(
            path = %data_path.display(),
            lang = lang.unwrap_or("all"),
            valid = valid.len(),
            test = test.len(),
            "Loaded XNLI dataset"
        );

        Ok(Splits::new()
            .with_split(Split::Train, valid)
            .with_split(Split::Test, test))
    }
}

/// Column positions of the fields we project.
struct Columns {
    language: usize,
    gold_label: usize,
    sentence1: usize,
    sentence2: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn {
                    path: PathBuf::from(path),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            language: find(LANGUAGE)?,
            gold_label: find(GOLD_LABEL)?,
            sentence1: find(SENTENCE1)?,
            sentence2: find(SENTENCE2)?,
        })
    }
}

fn read_tsv(path: &Path, lang: Option<&str>) -> Result<Vec<Example<String>>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?;
    let width = headers.len();
    let columns = Columns::locate(headers, path)?;

    let mut examples = Vec::new();
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record?;
        rows += 1;

        // Short rows are padded with empty fields; long rows are rejected.
        if record.len() > width {
            return Err(Error::ExtraFields {
                path: PathBuf::from(path),
                line: record.position().map_or(0, |p| p.line()),
                found: record.len(),
                expected: width,
            });
        }
        let field = |idx: usize| record.get(idx).unwrap_or("");

        if let Some(lang) = lang
            && field(columns.language) != lang
        {
            continue;
        }

        let pair = SentencePair::new(field(columns.sentence1), field(columns.sentence2));
        examples.push(Example::new(pair, field(columns.gold_label).to_string()));
    }

    tracing::debug!(
        path = %path.display(),
        rows,
        kept = examples.len(),
        "Read XNLI file"
    );
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "language\tgold_label\tsentence1\tsentence2\n";

    fn write_dataset(valid: &str, test: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_VALID_FILE), valid).unwrap();
        fs::write(dir.path().join(DEFAULT_TEST_FILE), test).unwrap();
        dir
    }

    fn example(a: &str, b: &str, label: &str) -> Example<String> {
        Example::new(SentencePair::new(a, b), label.to_string())
    }

    #[test]
    fn test_all_rows_without_lang() {
        let valid = format!("{HEADER}en\tentailment\tA\tB\nfr\tcontradiction\tC\tD\n");
        let test = format!("{HEADER}ru\tneutral\tE\tF\n");
        let dir = write_dataset(&valid, &test);

        let splits = CrossLingualInferenceReader::new().read(dir.path()).unwrap();

        assert_eq!(
            splits.names().collect::<Vec<_>>(),
            vec![Split::Train, Split::Test]
        );
        assert_eq!(
            splits.get(Split::Train),
            &[
                example("A", "B", "entailment"),
                example("C", "D", "contradiction")
            ]
        );
        assert_eq!(splits.get(Split::Test), &[example("E", "F", "neutral")]);
        assert!(!splits.contains(Split::Valid));
    }

    #[test]
    fn test_lang_filter() {
        let valid = format!("{HEADER}en\tentailment\tA\tB\nfr\tcontradiction\tC\tD\n");
        let test = format!("{HEADER}EN\tneutral\tE\tF\nen\tneutral\tG\tH\n");
        let dir = write_dataset(&valid, &test);

        let splits = CrossLingualInferenceReader::new()
            .with_lang("en")
            .read(dir.path())
            .unwrap();

        assert_eq!(splits.get(Split::Train), &[example("A", "B", "entailment")]);
        // Matching is case-sensitive.
        assert_eq!(splits.get(Split::Test), &[example("G", "H", "neutral")]);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let content = "pairID\tsentence2\tgold_label\tlanguage\tsentence1\n\
                       1\tsecond\tneutral\tde\tfirst\n";
        let dir = write_dataset(content, content);

        let splits = CrossLingualInferenceReader::new().read(dir.path()).unwrap();
        assert_eq!(
            splits.get(Split::Train),
            &[example("first", "second", "neutral")]
        );
    }

    #[test]
    fn test_label_verbatim() {
        let valid = format!("{HEADER}en\tnot-a-real-label\tA\tB\n");
        let dir = write_dataset(&valid, HEADER);

        let splits = CrossLingualInferenceReader::new().read(dir.path()).unwrap();
        assert_eq!(splits.get(Split::Train)[0].label, "not-a-real-label");
        assert_eq!(splits.len_of(Split::Test), 0);
    }

    #[test]
    fn test_missing_column() {
        let bad = "language\tgold_label\tsentence1\nen\tneutral\tA\n";
        let dir = write_dataset(bad, HEADER);

        let err = CrossLingualInferenceReader::new().read(dir.path()).unwrap_err();
        match err {
            Error::MissingColumn { column, .. } => assert_eq!(column, "sentence2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_filtered_by_lang() {
        let valid = format!("{HEADER}ru\tneutral\tA\tB\nen\tneutral\tC\n");
        let dir = write_dataset(&valid, HEADER);

        let splits = CrossLingualInferenceReader::new()
            .with_lang("ru")
            .read(dir.path())
            .unwrap();
        assert_eq!(splits.get(Split::Train), &[example("A", "B", "neutral")]);
    }

    #[test]
    fn test_short_row_kept_with_empty_fields() {
        let valid = format!("{HEADER}en\tneutral\tC\n");
        let dir = write_dataset(&valid, HEADER);

        let splits = CrossLingualInferenceReader::new().read(dir.path()).unwrap();
        assert_eq!(splits.get(Split::Train), &[example("C", "", "neutral")]);
    }

    #[test]
    fn test_long_row_fails() {
        let valid = format!("{HEADER}en\tneutral\tA\tB\textra\n");
        let dir = write_dataset(&valid, HEADER);

        let err = CrossLingualInferenceReader::new().read(dir.path()).unwrap_err();
        match err {
            Error::ExtraFields {
                line,
                found,
                expected,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(found, 5);
                assert_eq!(expected, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_test_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_VALID_FILE), HEADER).unwrap();

        let err = CrossLingualInferenceReader::new().read(dir.path()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_quoted_field() {
        let valid = format!("{HEADER}en\tneutral\t\"Quoted\tsentence\"\tB\n");
        let dir = write_dataset(&valid, HEADER);

        let splits = CrossLingualInferenceReader::new().read(dir.path()).unwrap();
        assert_eq!(splits.get(Split::Train)[0].pair.first, "Quoted\tsentence");
    }

    #[test]
    fn test_read_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.tsv");
        fs::write(&path, format!("{HEADER}ru\tneutral\tA\tB\nen\tneutral\tC\tD\n")).unwrap();

        let reader = CrossLingualInferenceReader::new().with_lang("ru");
        assert_eq!(reader.config().lang.as_deref(), Some("ru"));
        assert_eq!(reader.config().valid_file, DEFAULT_VALID_FILE);

        let examples = reader.read_file(&path).unwrap();
        assert_eq!(examples, vec![example("A", "B", "neutral")]);
    }
}
