//! Error types for eval-datasets.

use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for eval-datasets operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading evaluation datasets.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error, including a missing dataset file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A similarity label line is not a float.
    #[error("invalid label {value:?} at {}:{line}: {source}", .path.display())]
    InvalidLabel {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// An input line has no tab separating the two sentences.
    #[error("no sentence pair at {}:{line}", .path.display())]
    MalformedPair { path: PathBuf, line: usize },

    /// A TSV file lacks a required column.
    #[error("missing column {column:?} in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A TSV row has more fields than the header.
    #[error("{}:{line}: found {found} fields, header has {expected}", .path.display())]
    ExtraFields {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },

    /// Delimited text could not be parsed.
    #[error("TSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    /// Split name not recognized.
    #[error("unknown split: {0}")]
    UnknownSplit(String),

    /// Task name not handled by this crate.
    #[error("unsupported task: {0}")]
    UnsupportedTask(String),

    /// Dataset files are absent under the datasets root.
    #[error("datasets not found under {}, download datasets first", .root.display())]
    DatasetsMissing {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was caused by a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io(e) => e.kind() == io::ErrorKind::NotFound,
            Error::DatasetsMissing { .. } => true,
            _ => false,
        }
    }

    /// Take the underlying not-found IO error, if that is what this is.
    pub(crate) fn into_not_found(self) -> std::result::Result<io::Error, Error> {
        match self {
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => Ok(e),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.is_not_found());

        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(!err.is_not_found());

        assert!(!Error::UnsupportedTask("sberfaq".into()).is_not_found());
    }

    #[test]
    fn test_csv_error_display_has_single_prefix() {
        let data: &[u8] = b"a\tb\n\xff\tc\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(data);
        let err = reader
            .records()
            .find_map(|r| r.err())
            .map(Error::from)
            .expect("invalid UTF-8 should fail");
        let message = err.to_string();
        assert!(message.starts_with("TSV parse failed: "));
        assert!(!message.contains("TSV parse failed: TSV"));
        assert!(!message.contains("CSV error: CSV error"));
    }

    #[test]
    fn test_invalid_label_display() {
        let source = "abc".parse::<f64>().unwrap_err();
        let err = Error::InvalidLabel {
            path: PathBuf::from("labels.txt"),
            line: 3,
            value: "abc".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid label \"abc\" at labels.txt:3"));
    }
}
