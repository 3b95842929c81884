//! Training info step
//!
//! After a fold's training job finishes, the workflow replaces the job
//! reference in `training_info` with the full job description.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{Error, Result};

/// Read access to training job descriptions
#[cfg_attr(test, mockall::automock)]
pub trait TrainingJobs {
    /// Full description of the named training job
    fn describe(&self, name: &str) -> Result<Value>;
}

/// Event passed to the training info step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingInfoEvent {
    /// Job reference on input, job description on output
    pub training_info: Value,

    /// Fields this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Replace `training_info` with the description of the job it names
pub fn fetch_training_info<T>(mut event: TrainingInfoEvent, jobs: &T) -> Result<TrainingInfoEvent>
where
    T: TrainingJobs + ?Sized,
{
    let name = event
        .training_info
        .get("TrainingJobName")
        .and_then(Value::as_str)
        .ok_or(Error::MissingField("training_info.TrainingJobName"))?;
    info!(training_job = name, "describing training job");

    event.training_info = jobs.describe(name)?;
    Ok(event)
}
