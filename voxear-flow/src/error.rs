//! Error types for voxear-flow

use thiserror::Error;

/// Workflow-level error type
///
/// Covers everything that is not a normalized analysis failure: file
/// selection problems, configuration, storage and unexpected faults.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Selected file could not be used
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Configuration missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// voxear-common error
    #[error("Common error: {0}")]
    Common(#[from] voxear_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for workflow operations
pub type FlowResult<T> = Result<T, FlowError>;
