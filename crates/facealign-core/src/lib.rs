//! Facealign Core - Basic data structures for face normalization
//!
//! This crate provides the types shared by every stage of the aligner:
//!
//! - [`PixelBuffer`] / [`ChannelLayout`] - Interleaved 8-bit image container
//! - [`Point2D`] / [`LandmarkSet`] - Detected facial keypoints
//! - [`Template`] - Canonical landmark layout and output size
//!
//! No geometry or platform code lives here; see `facealign-transform` and
//! `facealign-bridge`.

pub mod buffer;
pub mod error;
pub mod landmark;
pub mod template;

pub use buffer::{ChannelLayout, PixelBuffer};
pub use error::{Error, Result};
pub use landmark::{FIVE_POINT_COUNT, LandmarkSet, Point2D};
pub use template::{ARCFACE_112_POINTS, ARCFACE_112_SIZE, Template};
