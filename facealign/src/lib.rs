//! facealign - Landmark-based face alignment
//!
//! Normalizes a detected face to a canonical pose so that recognition
//! embeddings see the eyes, nose and mouth in fixed positions. Alignment is
//! two steps:
//!
//! - Estimate the similarity (or affine / projective) transform that maps
//!   the five observed landmarks onto a canonical template
//! - Warp the source image through that transform into the template's
//!   output size
//!
//! Platform bitmaps are converted at the boundary by [`bridge`].
//!
//! # Example
//!
//! ```
//! use facealign::{Aligner, AlignerConfig, ChannelLayout, LandmarkSet, PixelBuffer, Point2D};
//!
//! let aligner = Aligner::new(&AlignerConfig::default()).unwrap();
//!
//! // A face 20 px right and 10 px down of the canonical position
//! let landmarks = LandmarkSet::new(
//!     aligner
//!         .template()
//!         .points()
//!         .iter()
//!         .map(|p| Point2D::new(p.x + 20.0, p.y + 10.0))
//!         .collect(),
//! )
//! .unwrap();
//! let image = PixelBuffer::new(200, 200, ChannelLayout::Rgb).unwrap();
//!
//! let face = aligner.align(&image, &landmarks).unwrap();
//! assert_eq!(face.image.dimensions(), (112, 112));
//! ```

pub mod aligner;
pub mod config;
mod error;

// Re-export core types (primary data structures used everywhere)
pub use facealign_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use facealign_bridge as bridge;
pub use facealign_transform as transform;

pub use aligner::{AlignedFace, Aligner};
pub use config::{AlignerConfig, BorderConfig, InterpolationConfig, ModelConfig, TemplateConfig};
pub use error::{Error, Result};
