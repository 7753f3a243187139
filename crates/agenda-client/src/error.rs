//! Client error types.

use agenda_pipeline::PipelineError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Render failure.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Output could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
