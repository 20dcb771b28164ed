//! Error types for facealign-core
//!
//! Provides a unified error type for the data structures in the core crate.
//! Each variant carries enough context for diagnostics without exposing
//! buffer internals.

use thiserror::Error;

/// facealign-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Image dimension mismatch
    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Pixel data length does not match the declared geometry
    #[error("data length mismatch: expected {expected} bytes, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Landmark count does not match the template
    #[error("landmark count mismatch: template has {expected} points, got {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// A landmark or template coordinate is NaN or infinite
    #[error("non-finite coordinate at point {index}")]
    NonFiniteCoordinate { index: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Pixel layout not recognized
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for facealign-core operations
pub type Result<T> = std::result::Result<T, Error>;
