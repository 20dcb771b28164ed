//! Error types for facealign-transform

use thiserror::Error;

/// Errors that can occur during transform estimation and warping
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] facealign_core::Error),

    /// Point correspondence does not determine a well-posed transform
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Non-invertible or non-finite matrix
    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    /// Requested output size is empty
    #[error("invalid output dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
