//! Core error types

use thiserror::Error;

/// Errors raised by the filmstrip math and value ranges
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Range bounds are not finite or `max <= min`
    #[error("invalid range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },

    /// A filmstrip must contain at least one frame
    #[error("filmstrip must contain at least one frame")]
    EmptyFilmstrip,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
