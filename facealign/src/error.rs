//! Error types for the facealign pipeline

use thiserror::Error;

/// facealign error type
///
/// Wraps the per-crate errors so a pipeline caller handles one type.
#[derive(Debug, Error)]
pub enum Error {
    /// Core data structure error
    #[error("core error: {0}")]
    Core(#[from] facealign_core::Error),

    /// Estimation or warping error
    #[error("transform error: {0}")]
    Transform(#[from] facealign_transform::TransformError),

    /// Native bitmap conversion error
    #[error("bridge error: {0}")]
    Bridge(#[from] facealign_bridge::BridgeError),

    /// Malformed JSON configuration
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parsed but inconsistent
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for facealign operations
pub type Result<T> = std::result::Result<T, Error>;
