//! Input validation for the bootstrap step

use crate::config::Event;
use crate::error::{Error, Result, ValidationIssue};

/// Check that `event` carries everything the later steps need.
///
/// Every problem is collected and reported together.
pub fn validate_input(event: &Event) -> Result<()> {
    let mut issues = Vec::new();
    let job = &event.job_config;

    for (path, value) in [
        ("job_config.name", &job.name),
        ("job_config.input_path", &job.input_path),
        ("job_config.output_prefix", &job.output_prefix),
    ] {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::new(path, "must not be empty"));
        }
    }

    if let Some(name) = job.experiment.as_deref() {
        if name.trim().is_empty() {
            issues.push(ValidationIssue::new("job_config.experiment", "must not be empty"));
        }
    }

    for (i, tag) in job.tags.iter().enumerate() {
        if tag.key.is_empty() {
            issues.push(ValidationIssue::new(
                format!("job_config.tags.{i}.Key"),
                "must not be empty",
            ));
        }
    }

    match &event.crossvalidation {
        None => issues.push(ValidationIssue::new("crossvalidation", "is required")),
        Some(cv) if cv.n_splits < 1 => issues.push(ValidationIssue::new(
            "crossvalidation.n_splits",
            format!("must be at least 1, got {}", cv.n_splits),
        )),
        Some(_) => {}
    }

    match &event.training {
        None => issues.push(ValidationIssue::new("training", "is required")),
        Some(training) => match &training.hyper_parameters_template {
            None => issues.push(ValidationIssue::new(
                "training.HyperParameters_template",
                "is required",
            )),
            Some(template) if !template.is_object() => issues.push(ValidationIssue::new(
                "training.HyperParameters_template",
                "must be an object",
            )),
            Some(_) => {}
        },
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::InputValidation(issues))
    }
}
