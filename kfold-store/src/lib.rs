//! Record store implementations for k-fold splitting
//!
//! This crate provides a filesystem-backed [`kfold_core::RecordStore`] that
//! understands object URLs, so fold outputs destined for a bucket can be
//! produced against a local directory.

#![warn(missing_docs)]

mod error;
pub mod local;
pub mod url;

pub use error::{Error, Result};
pub use local::{LocalRecordStore, LocalStoreOptions};
pub use url::ObjectUrl;

// Re-export core types
pub use kfold_core::{Record, RecordSet, RecordStore};
