//! Error types for record stores

use thiserror::Error;

/// Error type for record stores
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while accessing a location
    #[error("I/O error at {location}: {source}")]
    Io {
        /// Location being read or written
        location: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Location cannot be mapped into the store
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
}

impl Error {
    pub(crate) fn io(location: &str, source: std::io::Error) -> Self {
        Self::Io {
            location: location.to_owned(),
            source,
        }
    }
}

/// Result type for record stores
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for kfold_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io { location, source } => kfold_core::Error::storage(location, source),
            Error::InvalidLocation(location) => {
                kfold_core::Error::storage(location.clone(), Error::InvalidLocation(location))
            }
        }
    }
}
