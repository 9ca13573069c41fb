//! Error types for the transform engine.

use thiserror::Error;

/// Result type alias for transform engine operations.
pub type FafResult<T> = Result<T, FafError>;

/// Errors that can occur while decoding a request or running a transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FafError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
}

impl FafError {
    /// Stable snake_case identifier, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FafError::InvalidInput(_) => "invalid_input",
            FafError::InvalidParameter(_) => "invalid_parameter",
            FafError::ShapeMismatch { .. } => "shape_mismatch",
        }
    }

    /// Whether the caller is at fault (as opposed to an engine bug).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FafError::ShapeMismatch { .. })
    }
}
