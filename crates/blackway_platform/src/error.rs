//! Platform error types

use thiserror::Error;

/// Host bridge errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A transport refused or failed to deliver a message
    #[error("Message delivery failed: {0}")]
    MessageFailed(String),

    /// A message could not be encoded or decoded
    #[error("Message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The transport's host hook is not present
    #[error("Transport not available: {0}")]
    Unavailable(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
