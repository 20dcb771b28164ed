//! facealign-transform - Landmark-driven geometric normalization
//!
//! This crate provides the two stages of face alignment:
//!
//! - Transform estimation from landmark correspondences
//!   (similarity via Umeyama, least-squares affine and projective)
//! - Backward-mapped image warping with bilinear or nearest sampling
//!
//! All computation is in `f64` and deterministic: identical inputs give
//! bit-identical transforms and images.

pub mod estimate;
mod error;
pub mod lsq;
pub mod matrix;
pub mod similarity;
pub mod warp;

pub use estimate::{TransformModel, estimate, estimate_with};
pub use error::{TransformError, TransformResult};
pub use lsq::{fit_affine, fit_projective};
pub use matrix::{SimilarityParams, Transform};
pub use similarity::fit_similarity;
pub use warp::{BorderFill, Interpolation, WarpOptions, warp, warp_with};
