//! Error types for workflow steps

use std::fmt;

use thiserror::Error;

/// One problem found while validating a step input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field
    pub path: String,
    /// What is wrong with it
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue for `path`
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at path {}: {}", self.path, self.message)
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    let mut msg = String::from("Error validating input:");
    for issue in issues {
        msg.push_str("\n    ");
        msg.push_str(&issue.to_string());
    }
    msg
}

/// Error type for workflow steps
#[derive(Error, Debug)]
pub enum Error {
    /// Splitting error
    #[error("Core error: {0}")]
    Core(#[from] kfold_core::Error),

    /// Event could not be parsed or serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Step input failed validation
    #[error("{}", format_issues(.0))]
    InputValidation(Vec<ValidationIssue>),

    /// A field the step needs is absent from the event
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Experiment tracking service failure
    #[error("Experiment tracker error: {0}")]
    Tracker(String),

    /// Training job service failure
    #[error("Training job error: {0}")]
    TrainingJobs(String),
}

/// Result type for workflow steps
pub type Result<T> = std::result::Result<T, Error>;
