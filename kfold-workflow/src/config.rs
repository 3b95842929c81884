//! Job configuration and step events
//!
//! Events are JSON documents passed from step to step by the workflow engine.
//! Each step reads the fields it needs, adds its own, and hands every other
//! field through untouched.

use kfold_core::{FoldDescriptor, KFold, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result, ValidationIssue};

/// A key/value tag attached to experiments, trials and training jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key
    #[serde(rename = "Key")]
    pub key: String,
    /// Tag value
    #[serde(rename = "Value")]
    pub value: String,
}

impl Tag {
    /// Create a tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The `job_config` section of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Short name of the cross-validation job
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Location of the newline-delimited input dataset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub input_path: String,

    /// Prefix under which job outputs are written
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output_prefix: String,

    /// Tags copied onto the experiment, trial and training jobs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Experiment name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<String>,

    /// Set by the bootstrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,

    /// Set by the bootstrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    /// Set by the bootstrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,

    /// Set by the bootstrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_name: Option<String>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `crossvalidation` section of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationConfig {
    /// Number of folds; accepts an integer or a numeric string
    #[serde(deserialize_with = "lenient_int::deserialize")]
    pub n_splits: i64,

    /// Seed for the fold shuffle
    #[serde(default = "default_random_state")]
    pub random_state: u64,

    /// Whether to shuffle before cutting folds
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_random_state() -> u64 {
    DEFAULT_SEED
}

fn default_shuffle() -> bool {
    true
}

impl CrossValidationConfig {
    /// Config with `n_splits` folds and default seed and shuffle
    pub fn new(n_splits: i64) -> Self {
        Self {
            n_splits,
            random_state: DEFAULT_SEED,
            shuffle: true,
            extra: Map::new(),
        }
    }

    /// Splitter for this configuration
    pub fn kfold(&self) -> Result<KFold> {
        let n_splits = usize::try_from(self.n_splits)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                Error::InputValidation(vec![ValidationIssue::new(
                    "crossvalidation.n_splits",
                    format!("must be at least 1, got {}", self.n_splits),
                )])
            })?;
        Ok(KFold {
            n_splits,
            shuffle: self.shuffle,
            seed: self.random_state,
        })
    }
}

/// The `training` section of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Hyperparameters with `${...}` placeholders
    #[serde(
        rename = "HyperParameters_template",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hyper_parameters_template: Option<Value>,

    /// Training job name with a `${fold_name}` placeholder
    #[serde(
        rename = "TrainingJobName_template",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub training_job_name_template: Option<String>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Event passed to the bootstrap and split steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Job configuration
    pub job_config: JobConfig,

    /// Cross-validation settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossvalidation: Option<CrossValidationConfig>,

    /// Training job settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingConfig>,

    /// Fold descriptors, set by the split step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<Vec<FoldDescriptor>>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Parse an event from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the event to JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

mod lenient_int {
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct IntVisitor;

        impl Visitor<'_> for IntVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer, a whole-number float or an integer string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(E::custom)
            }

            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_precision_loss,
                clippy::float_cmp
            )]
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
                let whole = v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64;
                if whole {
                    Ok(v as i64)
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
                v.trim().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IntVisitor)
    }
}
