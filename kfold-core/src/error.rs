//! Error types for fold splitting

use thiserror::Error;

/// Result type for fold splitting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fold splitting operations
#[derive(Error, Debug)]
pub enum Error {
    /// Caller contract violation, rejected before any I/O
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An assignment referenced a record that does not exist
    #[error("Index out of bounds: index {index} but record set has {len} records")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Number of records available
        len: usize,
    },

    /// A read or write through a record store failed
    #[error("Storage failure at {location}: {source}")]
    Storage {
        /// Location that was being read or written
        location: String,
        /// Underlying cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Materializing a single fold failed; earlier folds are left in place
    #[error("Fold {ordinal} failed: {source}")]
    Fold {
        /// Ordinal of the fold that failed
        ordinal: usize,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap any error raised while reading or writing `location`
    pub fn storage<E>(location: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage {
            location: location.into(),
            source: source.into(),
        }
    }

    /// Whether this error (or the fold failure wrapping it) came from storage
    pub fn is_storage(&self) -> bool {
        match self {
            Self::Storage { .. } => true,
            Self::Fold { source, .. } => source.is_storage(),
            _ => false,
        }
    }
}
