//! Error types for sf-core

use thiserror::Error;

/// Core error type for Swapflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Relation address could not be built
    #[error("[E004] Invalid relation '{input}': {reason}")]
    InvalidRelation { input: String, reason: String },

    /// E005: Job selected on the command line does not exist
    #[error("[E005] Job not found: {name}. Available jobs: {available}")]
    JobNotFound { name: String, available: String },

    /// E006: Two jobs would manage the same relation
    #[error("[E006] Relation {relation} is claimed by job '{first}' and job '{second}'")]
    RelationCollision {
        relation: String,
        first: String,
        second: String,
    },

    /// E007: IO error with file path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
