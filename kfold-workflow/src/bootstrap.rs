//! Bootstrap step: run identity, naming, and experiment bookkeeping
//!
//! Generates the run id, derives the job, trial and training job names, and
//! makes sure the experiment and trial exist in the tracking service before
//! any fold is trained.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{Event, Tag};
use crate::error::Result;
use crate::validate::validate_input;

/// Prefix shared by every generated name
pub const NAME_PREFIX: &str = "crossvalidator";

/// Format of generated run ids
pub const RUN_ID_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Placeholder in the training job name template
pub const FOLD_NAME_PLACEHOLDER: &str = "${fold_name}";

/// Whether a tracked entity already existed or was just created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Loaded an existing entity
    Existing,
    /// Created a new entity
    Created,
}

/// Experiment and trial bookkeeping in an external metadata service
#[cfg_attr(test, mockall::automock)]
pub trait ExperimentTracker {
    /// Load the experiment, creating it when it does not exist
    fn ensure_experiment(&mut self, name: &str, tags: &[Tag]) -> Result<Presence>;

    /// Load the trial, creating it inside `experiment` when it does not exist
    fn ensure_trial(&mut self, experiment: &str, trial: &str, tags: &[Tag]) -> Result<Presence>;
}

/// Tracker that keeps experiments and trials in memory
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    experiments: HashSet<String>,
    trials: HashSet<(String, String)>,
}

impl InMemoryTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` has been created
    pub fn has_experiment(&self, name: &str) -> bool {
        self.experiments.contains(name)
    }

    /// Whether `trial` exists inside `experiment`
    pub fn has_trial(&self, experiment: &str, trial: &str) -> bool {
        self.trials.contains(&(experiment.to_owned(), trial.to_owned()))
    }
}

impl ExperimentTracker for InMemoryTracker {
    fn ensure_experiment(&mut self, name: &str, _tags: &[Tag]) -> Result<Presence> {
        if self.experiments.insert(name.to_owned()) {
            Ok(Presence::Created)
        } else {
            Ok(Presence::Existing)
        }
    }

    fn ensure_trial(&mut self, experiment: &str, trial: &str, _tags: &[Tag]) -> Result<Presence> {
        if self.trials.insert((experiment.to_owned(), trial.to_owned())) {
            Ok(Presence::Created)
        } else {
            Ok(Presence::Existing)
        }
    }
}

/// Run id for a point in time
pub fn run_id_at(time: DateTime<Utc>) -> String {
    time.format(RUN_ID_FORMAT).to_string()
}

/// Job name for a named job and run
pub fn job_name(name: &str, run_id: &str) -> String {
    format!("{NAME_PREFIX}-{name}-{run_id}")
}

/// Default experiment name for a named job
pub fn default_experiment_name(name: &str) -> String {
    format!("{NAME_PREFIX}-{name}")
}

/// Training job name template for a job
pub fn training_name_template(job_name: &str) -> String {
    format!("{job_name}-{FOLD_NAME_PLACEHOLDER}")
}

/// Bootstrap step
#[derive(Debug, Clone, Default)]
pub struct Bootstrapper {
    run_id: Option<String>,
}

impl Bootstrapper {
    /// Bootstrapper deriving run ids from the current UTC time
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrapper using a fixed run id
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Validate the event, register the run, and record the derived names
    pub fn run<T>(&self, mut event: Event, tracker: &mut T) -> Result<Event>
    where
        T: ExperimentTracker + ?Sized,
    {
        validate_input(&event)?;

        let job = &mut event.job_config;
        let run_id = self
            .run_id
            .clone()
            .unwrap_or_else(|| run_id_at(Utc::now()));
        let experiment_name = job
            .experiment
            .clone()
            .unwrap_or_else(|| default_experiment_name(&job.name));
        info!(%run_id, %experiment_name, "bootstrapping cross-validation run");

        match tracker.ensure_experiment(&experiment_name, &job.tags)? {
            Presence::Existing => info!(%experiment_name, "using existing experiment"),
            Presence::Created => info!(%experiment_name, "created new experiment"),
        }

        let job_name = job_name(&job.name, &run_id);
        let trial_name = job_name.clone();
        match tracker.ensure_trial(&experiment_name, &trial_name, &job.tags)? {
            Presence::Existing => info!(%trial_name, "using existing trial"),
            Presence::Created => info!(%trial_name, "created new trial"),
        }

        let template = training_name_template(&job_name);
        info!(%job_name, %template, "derived job names");

        job.job_name = Some(job_name);
        job.run_id = Some(run_id);
        job.experiment_name = Some(experiment_name);
        job.trial_name = Some(trial_name);
        if let Some(training) = event.training.as_mut() {
            training.training_job_name_template = Some(template);
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use serde_json::json;

    fn event() -> Event {
        serde_json::from_value(json!({
            "job_config": {
                "name": "cats",
                "input_path": "s3://b/cats.jsonl",
                "output_prefix": "s3://b/jobs",
                "tags": [{ "Key": "team", "Value": "vision" }]
            },
            "crossvalidation": { "n_splits": 5 },
            "training": { "HyperParameters_template": { "epochs": "10" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_run_id_format() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(run_id_at(time), "20240309-070501");
    }

    #[test]
    fn test_derived_names() {
        let mut tracker = InMemoryTracker::new();
        let out = Bootstrapper::new()
            .with_run_id("20240309-070501")
            .run(event(), &mut tracker)
            .unwrap();

        let job = &out.job_config;
        assert_eq!(job.job_name.as_deref(), Some("crossvalidator-cats-20240309-070501"));
        assert_eq!(job.run_id.as_deref(), Some("20240309-070501"));
        assert_eq!(job.experiment_name.as_deref(), Some("crossvalidator-cats"));
        assert_eq!(job.trial_name, job.job_name);
        assert_eq!(
            out.training.unwrap().training_job_name_template.as_deref(),
            Some("crossvalidator-cats-20240309-070501-${fold_name}")
        );
        assert!(tracker.has_experiment("crossvalidator-cats"));
        assert!(tracker.has_trial("crossvalidator-cats", "crossvalidator-cats-20240309-070501"));
    }

    #[test]
    fn test_experiment_override_and_reuse() {
        let mut input = event();
        input.job_config.experiment = Some("shared".into());
        let mut tracker = InMemoryTracker::new();
        tracker.ensure_experiment("shared", &[]).unwrap();

        let out = Bootstrapper::new()
            .with_run_id("r1")
            .run(input, &mut tracker)
            .unwrap();

        assert_eq!(out.job_config.experiment_name.as_deref(), Some("shared"));
        assert!(tracker.has_trial("shared", "crossvalidator-cats-r1"));
    }

    #[test]
    fn test_tracker_receives_tags() {
        let mut tracker = MockExperimentTracker::new();
        let tags = vec![Tag::new("team", "vision")];
        tracker
            .expect_ensure_experiment()
            .with(eq("crossvalidator-cats"), eq(tags.clone()))
            .times(1)
            .returning(|_, _| Ok(Presence::Existing));
        tracker
            .expect_ensure_trial()
            .with(eq("crossvalidator-cats"), eq("crossvalidator-cats-r2"), eq(tags))
            .times(1)
            .returning(|_, _, _| Ok(Presence::Created));

        Bootstrapper::new()
            .with_run_id("r2")
            .run(event(), &mut tracker)
            .unwrap();
    }

    #[test]
    fn test_tracker_failure_aborts() {
        let mut tracker = MockExperimentTracker::new();
        tracker
            .expect_ensure_experiment()
            .returning(|_, _| Err(Error::Tracker("throttled".into())));
        tracker.expect_ensure_trial().never();

        let err = Bootstrapper::new().run(event(), &mut tracker).unwrap_err();
        assert!(matches!(err, Error::Tracker(_)));
    }

    #[test]
    fn test_invalid_input_touches_nothing() {
        let mut input = event();
        input.job_config.name.clear();
        let mut tracker = MockExperimentTracker::new();
        tracker.expect_ensure_experiment().never();

        let err = Bootstrapper::new().run(input, &mut tracker).unwrap_err();
        assert!(matches!(err, Error::InputValidation(_)));
    }
}
