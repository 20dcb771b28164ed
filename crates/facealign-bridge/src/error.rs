//! Error types for facealign-bridge

use crate::format::PixelFormat;
use thiserror::Error;

/// Errors that can occur while converting platform bitmaps
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] facealign_core::Error),

    /// Pixel format recognized but not convertible, or not recognized
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(PixelFormat),

    /// Row stride negative or shorter than one row of pixels
    #[error("invalid stride: {stride} bytes, need at least {min}")]
    InvalidStride { stride: i64, min: u64 },

    /// Pixel memory shorter than the declared geometry
    #[error("pixel buffer too small: need {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Native width or height is zero or negative, or a row does not fit
    /// in a 32-bit stride
    #[error("invalid native bitmap size: {width}x{height}")]
    InvalidNativeSize { width: i64, height: i64 },

    /// Platform refused to lock the pixels
    #[error("failed to lock pixels: {0}")]
    LockFailed(String),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
