//! facealign-test - Regression test framework for facealign
//!
//! Provides [`RegParams`], a small accumulator for value and image
//! comparisons, plus deterministic fixtures so the regression tests need no
//! image files on disk.
//!
//! # Usage
//!
//! ```ignore
//! use facealign_test::RegParams;
//!
//! let mut rp = RegParams::new("estimate");
//! rp.compare_values(1.25, params.scale, 1e-6);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "display" to write intermediate images to
//!   `tests/regout`

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // facealign-test is at crates/facealign-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
