//! Error types for semerr-core.

use thiserror::Error;

/// Result type for semerr-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for semerr-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
