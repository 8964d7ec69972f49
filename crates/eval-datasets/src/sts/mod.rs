//! STS sentence similarity dataset.
//!
//! The data directory holds two line-aligned files:
//! - an input file with a tab-separated sentence pair on each line
//! - a labels file with one float similarity score on each line
//!
//! ```text
//! input.txt:
//! A woman and man are dancing in the rain.<TAB>A man and woman are dancing in rain.
//! Someone is drawing.<TAB>Someone is dancing.
//!
//! labels.txt:
//! 5.000
//! 0.300
//! ```
//!
//! Lines are paired by position. When one file is longer, its extra lines
//! are dropped.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{DatasetReader, Example, SentencePair, Split, Splits};
use crate::error::{Error, Result};

/// Default sentence pair file name.
pub const DEFAULT_INPUT_FILE: &str = "input.txt";
/// Default similarity score file name.
pub const DEFAULT_LABELS_FILE: &str = "labels.txt";

/// File names used by [`SimilarityPairReader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityConfig {
    /// Sentence pair file, relative to the data directory.
    #[serde(default = "default_input_file")]
    pub input_file: String,
    /// Score file, relative to the data directory.
    #[serde(default = "default_labels_file")]
    pub labels_file: String,
}

fn default_input_file() -> String {
    DEFAULT_INPUT_FILE.to_string()
}

fn default_labels_file() -> String {
    DEFAULT_LABELS_FILE.to_string()
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            labels_file: default_labels_file(),
        }
    }
}

/// Reader for STS-style sentence pair similarity data.
///
/// Produces a single [`Split::Test`] split labeled with `f64` scores.
#[derive(Debug, Clone, Default)]
pub struct SimilarityPairReader {
    config: SimilarityConfig,
}

impl SimilarityPairReader {
    /// Create a reader with the default file names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit config.
    pub fn from_config(config: SimilarityConfig) -> Self {
        Self { config }
    }

    /// Set the sentence pair file name.
    pub fn with_input_file(mut self, name: impl Into<String>) -> Self {
        self.config.input_file = name.into();
        self
    }

    /// Set the score file name.
    pub fn with_labels_file(mut self, name: impl Into<String>) -> Self {
        self.config.labels_file = name.into();
        self
    }

    /// The active config.
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Read the dataset under `data_path`.
    pub fn read(&self, data_path: impl AsRef<Path>) -> Result<Splits<f64>> {
        self.read_splits(data_path.as_ref())
    }
}

impl DatasetReader for SimilarityPairReader {
    type Label = f64;

    fn name(&self) -> &str {
        "sts"
    }

    fn read_splits(&self, data_path: &Path) -> Result<Splits<f64>> {
        let input_path = data_path.join(&self.config.input_file);
        let labels_path = data_path.join(&self.config.labels_file);

        let inputs = read_pair_lines(&input_path)?;
        let labels = read_labels(&labels_path)?;

        if inputs.len() != labels.len() {
            tracing::warn!(
                inputs = inputs.len(),
                labels = labels.len(),
                "STS input and label counts differ, extra lines ignored"
            );
        }

        let examples = inputs
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(idx, (fields, label))| {
                let pair = into_pair(fields).ok_or_else(|| Error::MalformedPair {
                    path: input_path.clone(),
                    line: idx + 1,
                })?;
                Ok(Example::new(pair, label))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            path = %data_path.display(),
            examples = examples.len(),
            "Loaded STS dataset"
        );

        Ok(Splits::new().with_split(Split::Test, examples))
    }
}

/// Split each line of the input file on tabs.
fn read_pair_lines(path: &Path) -> Result<Vec<Vec<String>>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<Vec<String>> = universal_lines(&content)
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();

    tracing::debug!(path = %path.display(), lines = lines.len(), "Read STS inputs");
    Ok(lines)
}

/// Parse every line of the labels file as a float.
fn read_labels(path: &Path) -> Result<Vec<f64>> {
    let content = fs::read_to_string(path)?;
    let labels = universal_lines(&content)
        .enumerate()
        .map(|(idx, line)| parse_label(path, idx + 1, line))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(path = %path.display(), labels = labels.len(), "Read STS labels");
    Ok(labels)
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`, terminators removed.
fn universal_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let line = match rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &rest[..end];
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + width..];
                line
            }
            None => std::mem::take(&mut rest),
        };
        Some(line)
    })
}

fn parse_label(path: &Path, line: usize, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|source| Error::InvalidLabel {
            path: PathBuf::from(path),
            line,
            value: value.to_string(),
            source,
        })
}

/// First two tab-separated fields. Anything after the second tab is dropped.
fn into_pair(fields: Vec<String>) -> Option<SentencePair> {
    let mut fields = fields.into_iter();
    let first = fields.next()?;
    let second = fields.next()?;
    Some(SentencePair::new(first, second))
}
