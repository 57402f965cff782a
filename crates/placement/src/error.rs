//! Error types for the placement crate

use crate::object::ObjectId;
use thiserror::Error;

/// Result type alias for placement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the numerical placement path
#[derive(Debug, Error)]
pub enum Error {
    /// Model kind is not present in the catalog
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Model kind registered twice
    #[error("Duplicate model: {0}")]
    DuplicateModel(String),

    /// No object with this id is managed by the engine
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Failed to read a configuration file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected schema
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
