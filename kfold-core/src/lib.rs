//! Deterministic k-fold splitting for cross-validation datasets
//!
//! This crate partitions a newline-delimited, labeled dataset into
//! reproducible train/validation folds, writes each fold through a
//! [`RecordStore`], and describes the result with [`FoldDescriptor`]s for
//! downstream job templating. It performs no logging; callers get structured
//! values and errors back.

#![warn(missing_docs)]

pub mod cardinality;
pub mod descriptor;
pub mod error;
pub mod location;
pub mod materialize;
pub mod partition;
pub mod record;
pub mod rng;
pub mod store;

// Re-export key types for convenience
pub use cardinality::estimate_cardinality;
pub use descriptor::{FoldDescriptor, Variant};
pub use error::{Error, Result};
pub use location::{build_output_location, OutputLocator, SplitLayout};
pub use materialize::{materialize, materialize_fold, split_location, split_records};
pub use partition::{partition, FoldAssignment, Folds, KFold};
pub use record::{Record, RecordSet};
pub use rng::{ShuffleRng, DEFAULT_SEED};
pub use store::{MemoryRecordStore, RecordStore};
