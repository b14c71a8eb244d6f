//! Error types for contour generation.

use thiserror::Error;

/// Errors reported during grid construction and generator configuration.
///
/// All validation happens before any tracing begins; queries on a
/// successfully constructed generator never fail for numeric reasons.
#[derive(Error, Debug)]
pub enum ContourError {
    /// Coordinate, field or mask arrays disagree in shape or length.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Unsupported capability, invalid chunk specification or bad query
    /// bounds.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The grid is smaller than the minimum 2x2 points (one cell).
    #[error("degenerate grid: need at least 2x2 points, got {ny}x{nx}")]
    DegenerateInput { ny: usize, nx: usize },
}

impl ContourError {
    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
