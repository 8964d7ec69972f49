//! Shared record types and the reader trait.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered pair of raw sentences.
///
/// Text is kept exactly as read, minus the line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct SentencePair {
    /// Sentence A.
    pub first: String,
    /// Sentence B.
    pub second: String,
}

impl SentencePair {
    /// Create a new sentence pair.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl From<(String, String)> for SentencePair {
    fn from((first, second): (String, String)) -> Self {
        Self { first, second }
    }
}

impl From<SentencePair> for (String, String) {
    fn from(pair: SentencePair) -> Self {
        (pair.first, pair.second)
    }
}

/// A sentence pair with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example<L> {
    /// The two sentences.
    pub pair: SentencePair,
    /// Similarity score or gold label.
    pub label: L,
}

impl<L> Example<L> {
    /// Create a new labeled example.
    pub fn new(pair: SentencePair, label: L) -> Self {
        Self { pair, label }
    }

    /// Convert into the `((sentence_a, sentence_b), label)` tuple shape.
    pub fn into_tuple(self) -> ((String, String), L) {
        (self.pair.into(), self.label)
    }
}

/// Name of a dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    /// The lowercase split name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            "test" => Ok(Split::Test),
            other => Err(Error::UnknownSplit(other.to_string())),
        }
    }
}

/// Labeled examples grouped by split, each in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Splits<L> {
    splits: BTreeMap<Split, Vec<Example<L>>>,
}

impl<L> Default for Splits<L> {
    fn default() -> Self {
        Self {
            splits: BTreeMap::new(),
        }
    }
}

impl<L> Splits<L> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split, returning the collection.
    pub fn with_split(mut self, split: Split, examples: Vec<Example<L>>) -> Self {
        self.splits.insert(split, examples);
        self
    }

    /// Examples for a split, empty if the split is absent.
    pub fn get(&self, split: Split) -> &[Example<L>] {
        self.splits.get(&split).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the split is present.
    pub fn contains(&self, split: Split) -> bool {
        self.splits.contains_key(&split)
    }

    /// Number of examples in a split.
    pub fn len_of(&self, split: Split) -> usize {
        self.get(split).len()
    }

    /// Present split names.
    pub fn names(&self) -> impl Iterator<Item = Split> + '_ {
        self.splits.keys().copied()
    }

    /// Iterate over `(split, examples)`.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &[Example<L>])> {
        self.splits.iter().map(|(s, e)| (*s, e.as_slice()))
    }

    /// Remove a split and take its examples.
    pub fn take(&mut self, split: Split) -> Option<Vec<Example<L>>> {
        self.splits.remove(&split)
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<Split, Vec<Example<L>>> {
        self.splits
    }
}

/// A reader that loads a dataset directory into named splits.
///
/// Implementations are stateless: every call reopens its files and builds
/// fresh values.
pub trait DatasetReader: Send + Sync {
    /// Label type attached to each sentence pair.
    type Label;

    /// Short dataset name.
    fn name(&self) -> &str;

    /// Read all splits from `data_path`.
    fn read_splits(&self, data_path: &Path) -> Result<Splits<Self::Label>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_names_round_trip_through_str() {
        for split in [Split::Train, Split::Valid, Split::Test] {
            assert_eq!(split.as_str().parse::<Split>().unwrap(), split);
        }
        assert!(matches!(
            "dev".parse::<Split>(),
            Err(Error::UnknownSplit(name)) if name == "dev"
        ));
    }

    #[test]
    fn test_splits_access() {
        let splits = Splits::new().with_split(
            Split::Test,
            vec![Example::new(SentencePair::new("a", "b"), 1.0)],
        );

        assert!(splits.contains(Split::Test));
        assert!(!splits.contains(Split::Train));
        assert_eq!(splits.len_of(Split::Test), 1);
        assert!(splits.get(Split::Train).is_empty());
        assert_eq!(splits.names().collect::<Vec<_>>(), vec![Split::Test]);
    }

    #[test]
    fn test_splits_iter_take_and_into_inner() {
        let mut splits = Splits::new()
            .with_split(
                Split::Test,
                vec![Example::new(SentencePair::new("c", "d"), "neutral".to_string())],
            )
            .with_split(
                Split::Train,
                vec![Example::new(SentencePair::new("a", "b"), "entailment".to_string())],
            );

        let sizes: Vec<_> = splits.iter().map(|(s, e)| (s, e.len())).collect();
        assert_eq!(sizes, vec![(Split::Train, 1), (Split::Test, 1)]);

        let train = splits.take(Split::Train).unwrap();
        assert_eq!(train[0].label, "entailment");
        assert!(splits.take(Split::Train).is_none());
        assert!(!splits.contains(Split::Train));

        let inner = splits.into_inner();
        assert_eq!(inner.keys().copied().collect::<Vec<_>>(), vec![Split::Test]);
        assert_eq!(inner[&Split::Test][0].pair, SentencePair::new("c", "d"));
    }

    #[test]
    fn test_example_tuple_shape() {
        let example = Example::new(SentencePair::new("cat sat", "dog ran"), 3.5);
        assert_eq!(
            example.into_tuple(),
            (("cat sat".to_string(), "dog ran".to_string()), 3.5)
        );
    }

    #[test]
    fn test_splits_serialize_by_name() {
        let splits = Splits::new().with_split(
            Split::Train,
            vec![Example::new(
                SentencePair::new("A", "B"),
                "entailment".to_string(),
            )],
        );
        let json = serde_json::to_value(&splits).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "train": [{ "pair": ["A", "B"], "label": "entailment" }]
            })
        );

        let back: Splits<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, splits);
    }
}
