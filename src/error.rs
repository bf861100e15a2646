//! Error types for semerr.

use thiserror::Error;

/// Result type for semerr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for semerr operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The pattern catalog is unusable (bad regex, malformed TOML, duplicate slot).
    ///
    /// Raised only while building a catalog; treat it as fatal.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A gold MR names a slot or value the catalog cannot canonicalize.
    #[error("Unknown value for slot '{slot}': '{value}'")]
    UnknownValue {
        /// Slot name as written in the MR
        slot: String,
        /// Value as written in the MR
        value: String,
    },

    /// Malformed MR string.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Dataset loading/writing error (missing columns, bad rows).
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from semerr-core.
    #[error(transparent)]
    Core(#[from] semerr_core::Error),
}

impl Error {
    /// Create a catalog error.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Error::Catalog(msg.into())
    }

    /// Create an unknown-value error.
    pub fn unknown_value(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Error::UnknownValue {
            slot: slot.into(),
            value: value.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Error::Dataset(msg.into())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Catalog(format!("{}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Catalog(format!("{}", err))
    }
}
