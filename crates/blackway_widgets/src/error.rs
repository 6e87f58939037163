//! Widget construction errors

use blackway_core::CoreError;
use thiserror::Error;

/// Errors raised while creating widgets
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// No connected element carries the requested container id
    #[error("container `{0}` not found")]
    ContainerNotFound(String),

    /// Another widget already uses this id
    #[error("widget id `{0}` is already registered")]
    DuplicateId(String),

    /// Sizes and drag travel must be finite and positive
    #[error("invalid {what}: {value}")]
    InvalidSize { what: &'static str, value: f32 },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Reject non-positive or non-finite dimensions
pub(crate) fn positive(what: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WidgetError::InvalidSize { what, value })
    }
}
