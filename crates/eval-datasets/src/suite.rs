//! Loading a set of evaluation tasks from a datasets root.
//!
//! Each task lives in a fixed directory under the root:
//!
//! | task     | directory                    | files                                         |
//! |----------|------------------------------|-----------------------------------------------|
//! | `msrvid` | `STS2012_MSRvid_translated/` | `STS.input.MSRvid.txt`, `STS.gs.MSRvid.txt`   |
//! | `xnli`   | `XNLI-1.0/`                  | `xnli.dev.tsv`, `xnli.test.tsv`               |

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::{Split, Splits};
use crate::error::{Error, Result};
use crate::sts::SimilarityPairReader;
use crate::xnli::CrossLingualInferenceReader;

const MSRVID_DIR: &str = "STS2012_MSRvid_translated";
const MSRVID_INPUT_FILE: &str = "STS.input.MSRvid.txt";
const MSRVID_LABELS_FILE: &str = "STS.gs.MSRvid.txt";
const XNLI_DIR: &str = "XNLI-1.0";

/// Tasks known to the evaluation harness whose readers live elsewhere.
const EXTERNAL_TASKS: &[&str] = &["paraphraser", "rusentiment", "sberfaq"];

/// An evaluation task this crate can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalTask {
    /// MSRvid STS 2012 similarity, translated.
    Msrvid,
    /// XNLI 1.0 inference.
    Xnli,
}

impl EvalTask {
    /// All supported tasks in load order.
    pub const ALL: [EvalTask; 2] = [EvalTask::Msrvid, EvalTask::Xnli];

    /// The task name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvalTask::Msrvid => "msrvid",
            EvalTask::Xnli => "xnli",
        }
    }

    /// Directory of this task under the datasets root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            EvalTask::Msrvid => MSRVID_DIR,
            EvalTask::Xnli => XNLI_DIR,
        }
    }
}

impl fmt::Display for EvalTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvalTask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "msrvid" => Ok(EvalTask::Msrvid),
            "xnli" => Ok(EvalTask::Xnli),
            other => {
                if EXTERNAL_TASKS.contains(&other) {
                    tracing::debug!(task = other, "Task reader not provided by eval-datasets");
                }
                Err(Error::UnsupportedTask(other.to_string()))
            }
        }
    }
}

/// Which tasks to load and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    /// Directory holding one subdirectory per task.
    #[serde(default = "default_datasets_root")]
    pub datasets_root: PathBuf,
    /// Tasks to load.
    #[serde(default = "default_tasks")]
    pub tasks: Vec<EvalTask>,
    /// Language kept from XNLI.
    #[serde(default = "default_xnli_lang")]
    pub xnli_lang: String,
}

fn default_datasets_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_tasks() -> Vec<EvalTask> {
    EvalTask::ALL.to_vec()
}

fn default_xnli_lang() -> String {
    "ru".to_string()
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            datasets_root: default_datasets_root(),
            tasks: default_tasks(),
            xnli_lang: default_xnli_lang(),
        }
    }
}

impl SuiteConfig {
    /// Create a config rooted at `datasets_root` with all tasks.
    pub fn new(datasets_root: impl Into<PathBuf>) -> Self {
        Self {
            datasets_root: datasets_root.into(),
            ..Self::default()
        }
    }

    /// Restrict to the given tasks.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = EvalTask>) -> Self {
        self.tasks = tasks.into_iter().collect();
        self
    }

    /// Set the XNLI language filter.
    pub fn with_xnli_lang(mut self, lang: impl Into<String>) -> Self {
        self.xnli_lang = lang.into();
        self
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Loaded data for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "splits", rename_all = "lowercase")]
pub enum TaskData {
    /// Sentence pairs with similarity scores.
    Similarity(Splits<f64>),
    /// Sentence pairs with gold inference labels.
    Inference(Splits<String>),
}

impl TaskData {
    /// Number of examples in a split.
    pub fn len_of(&self, split: Split) -> usize {
        match self {
            TaskData::Similarity(s) => s.len_of(split),
            TaskData::Inference(s) => s.len_of(split),
        }
    }

    /// The similarity splits, if this is a similarity task.
    pub fn as_similarity(&self) -> Option<&Splits<f64>> {
        match self {
            TaskData::Similarity(s) => Some(s),
            TaskData::Inference(_) => None,
        }
    }

    /// The inference splits, if this is an inference task.
    pub fn as_inference(&self) -> Option<&Splits<String>> {
        match self {
            TaskData::Inference(s) => Some(s),
            TaskData::Similarity(_) => None,
        }
    }
}

/// Load every configured task, once each, in [`EvalTask::ALL`] order.
///
/// A missing dataset file anywhere is reported as
/// [`Error::DatasetsMissing`]; other errors pass through.
pub fn load_suite(config: &SuiteConfig) -> Result<BTreeMap<EvalTask, TaskData>> {
    let root = &config.datasets_root;
    let mut loaded = BTreeMap::new();

    for task in EvalTask::ALL
        .into_iter()
        .filter(|task| config.tasks.contains(task))
    {
        let data = load_task(task, root, config).map_err(|e| match e.into_not_found() {
            Ok(source) => Error::DatasetsMissing {
                root: root.clone(),
                source,
            },
            Err(other) => other,
        })?;
        loaded.insert(task, data);
    }

    tracing::info!(
        root = %root.display(),
        tasks = loaded.len(),
        "Loaded evaluation suite"
    );
    Ok(loaded)
}

fn load_task(task: EvalTask, root: &Path, config: &SuiteConfig) -> Result<TaskData> {
    let dir = root.join(task.dir_name());
    tracing::debug!(%task, dir = %dir.display(), "Loading task");

    match task {
        EvalTask::Msrvid => SimilarityPairReader::new()
            .with_input_file(MSRVID_INPUT_FILE)
            .with_labels_file(MSRVID_LABELS_FILE)
            .read(&dir)
            .map(TaskData::Similarity),
        EvalTask::Xnli => CrossLingualInferenceReader::new()
            .with_lang(config.xnli_lang.clone())
            .read(&dir)
            .map(TaskData::Inference),
    }
}
