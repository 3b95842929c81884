//! Workflow steps for a k-fold cross-validation run
//!
//! Each step takes a JSON event, does its part of the run, and returns the
//! event with its results attached:
//!
//! 1. [`Bootstrapper`] validates the input, derives run and job names, and
//!    registers the experiment and trial.
//! 2. [`split_dataset`] partitions the input dataset and writes the folds.
//! 3. [`prepare_split`] customizes one fold's training job.
//! 4. [`fetch_training_info`] swaps a finished job reference for its description.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod config;
mod error;
pub mod prepare;
pub mod splitter;
pub mod training_info;
pub mod validate;

pub use bootstrap::{Bootstrapper, ExperimentTracker, InMemoryTracker, Presence};
pub use config::{CrossValidationConfig, Event, JobConfig, Tag, TrainingConfig};
pub use error::{Error, Result, ValidationIssue};
pub use prepare::{prepare_split, substitute_all, PrepareEvent, PreparedSplit};
pub use splitter::split_dataset;
pub use training_info::{fetch_training_info, TrainingInfoEvent, TrainingJobs};
pub use validate::validate_input;
