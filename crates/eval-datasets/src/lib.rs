//! Dataset readers for sentence embedding evaluation.
//!
//! This crate loads the flat-file corpora used to evaluate sentence
//! embedders:
//! - STS-style similarity data (sentence pairs with a float score)
//! - XNLI cross-lingual inference data (sentence pairs with a gold label)
//!
//! Each reader returns [`Splits`], a mapping from split name to the
//! labeled sentence pairs in file order.
//!
//! # Example
//!
//! ```rust,no_run
//! use eval_datasets::{CrossLingualInferenceReader, SimilarityPairReader, Split};
//!
//! let sts = SimilarityPairReader::new()
//!     .with_input_file("STS.input.MSRvid.txt")
//!     .with_labels_file("STS.gs.MSRvid.txt")
//!     .read("./data/STS2012_MSRvid_translated")?;
//! println!("{} test pairs", sts.len_of(Split::Test));
//!
//! let xnli = CrossLingualInferenceReader::new()
//!     .with_lang("ru")
//!     .read("./data/XNLI-1.0")?;
//! for example in xnli.get(Split::Train) {
//!     println!("{} => {}", example.pair.first, example.label);
//! }
//! # Ok::<(), eval_datasets::Error>(())
//! ```

mod dataset;
mod error;
pub mod sts;
pub mod suite;
pub mod xnli;

pub use dataset::{DatasetReader, Example, SentencePair, Split, Splits};
pub use error::{Error, Result};
pub use sts::{SimilarityConfig, SimilarityPairReader};
pub use suite::{load_suite, EvalTask, SuiteConfig, TaskData};
pub use xnli::{CrossLingualInferenceReader, InferenceConfig};
