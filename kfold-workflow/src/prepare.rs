//! Split preparer step
//!
//! Customizes the training job of one fold: fills the hyperparameter template
//! with the fold's sample and class counts, names the job after the fold, and
//! tags it.

use kfold_core::FoldDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::bootstrap::FOLD_NAME_PLACEHOLDER;
use crate::config::{JobConfig, Tag, TrainingConfig};
use crate::error::{Error, Result};

/// Value of the `created_by` tag on every training job
pub const CREATED_BY: &str = "kfold-crossvalidator";

/// One fold as seen by the preparer, descriptor plus job customization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSplit {
    /// Descriptor produced by the split step
    #[serde(flatten)]
    pub descriptor: FoldDescriptor,

    /// Hyperparameters with placeholders filled in
    #[serde(
        rename = "HyperParameters",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hyper_parameters: Option<Value>,

    /// Training job name for this fold
    #[serde(
        rename = "TrainingJobName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub training_job_name: Option<String>,

    /// Tags for the training job
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<FoldDescriptor> for PreparedSplit {
    fn from(descriptor: FoldDescriptor) -> Self {
        Self {
            descriptor,
            hyper_parameters: None,
            training_job_name: None,
            tags: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Event passed to the preparer, one per fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareEvent {
    /// Training settings carrying the templates
    pub training: TrainingConfig,

    /// Job configuration, after bootstrap
    pub job_config: JobConfig,

    /// The fold being prepared
    pub split: PreparedSplit,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Replace every placeholder in every string and object key of `template`
pub fn substitute_all(template: &Value, substitutions: &[(&str, &str)]) -> Value {
    let replace = |text: &str| {
        substitutions
            .iter()
            .fold(text.to_owned(), |acc, (key, value)| acc.replace(key, value))
    };
    match template {
        Value::String(text) => Value::String(replace(text)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_all(item, substitutions))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| (replace(key), substitute_all(value, substitutions)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Fill in the fold's hyperparameters, job name and tags.
///
/// Both templates are consumed from `training`.
pub fn prepare_split(mut event: PrepareEvent) -> Result<PrepareEvent> {
    let hyper_template = event
        .training
        .hyper_parameters_template
        .take()
        .ok_or(Error::MissingField("training.HyperParameters_template"))?;
    let name_template = event
        .training
        .training_job_name_template
        .take()
        .ok_or(Error::MissingField("training.TrainingJobName_template"))?;
    let job_name = event
        .job_config
        .job_name
        .clone()
        .ok_or(Error::MissingField("job_config.job_name"))?;

    let split = &mut event.split;
    let descriptor = &split.descriptor;
    let num_training = descriptor.num_training_samples.to_string();
    let num_validation = descriptor.num_validation_samples.to_string();
    let num_classes = descriptor.num_classes.to_string();

    split.hyper_parameters = Some(substitute_all(
        &hyper_template,
        &[
            ("${num_training_samples}", num_training.as_str()),
            ("${num_validation_samples}", num_validation.as_str()),
            ("${num_classes}", num_classes.as_str()),
        ],
    ));
    let training_job_name = name_template.replace(FOLD_NAME_PLACEHOLDER, &descriptor.fold_name);

    let mut tags = event.job_config.tags.clone();
    tags.extend([
        Tag::new("fold_name", descriptor.fold_name.clone()),
        Tag::new("crossvalidator_job_name", job_name),
        Tag::new("created_by", CREATED_BY),
    ]);
    info!(fold = %descriptor.fold_name, %training_job_name, "prepared training job");

    split.training_job_name = Some(training_job_name);
    split.tags = tags;
    Ok(event)
}
