//! Template - Canonical landmark layout for the aligned output
//!
//! A template fixes where each landmark must land in the normalized image
//! and the size of that image. Changing the template changes the crop and
//! pose of the output, never the algorithm.

use crate::error::{Error, Result};
use crate::landmark::{FIVE_POINT_COUNT, Point2D};

/// ArcFace reference points for a 112x112 output.
///
/// The recognition reference layout was defined on a 96x112 crop; the x
/// coordinates here already carry the +8 px shift that centres it in a
/// square 112x112 frame.
pub static ARCFACE_112_POINTS: [Point2D; FIVE_POINT_COUNT] = [
    Point2D::new(38.2946, 51.6963),
    Point2D::new(73.5318, 51.5014),
    Point2D::new(56.0252, 71.7366),
    Point2D::new(41.5493, 92.3655),
    Point2D::new(70.7299, 92.2041),
];

/// Output side length of [`ARCFACE_112_POINTS`].
pub const ARCFACE_112_SIZE: u32 = 112;

/// Canonical target layout plus output resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    points: Vec<Point2D>,
    width: u32,
    height: u32,
}

impl Template {
    /// Create a template.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if fewer than two points are given
    /// - [`Error::NonFiniteCoordinate`] if a coordinate is NaN or infinite
    /// - [`Error::InvalidDimension`] if width or height is 0
    pub fn new(points: Vec<Point2D>, width: u32, height: u32) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidParameter(format!(
                "template needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::NonFiniteCoordinate { index });
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        Ok(Self {
            points,
            width,
            height,
        })
    }

    /// The ArcFace five-point template at 112x112.
    pub fn arcface_112() -> Self {
        Self {
            points: ARCFACE_112_POINTS.to_vec(),
            width: ARCFACE_112_SIZE,
            height: ARCFACE_112_SIZE,
        }
    }

    /// The ArcFace template for a square output of side `size`.
    ///
    /// Sizes that are multiples of 112 scale the 112 layout. Sizes that are
    /// multiples of 128 scale it by `size / 128` and shift x by
    /// `8 * size / 128`, which is the layout 128-px recognition models were
    /// trained on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `size` is zero or a multiple of
    /// neither 112 nor 128.
    pub fn arcface(size: u32) -> Result<Self> {
        let (ratio, diff_x) = if size > 0 && size % 112 == 0 {
            (size as f64 / 112.0, 0.0)
        } else if size > 0 && size % 128 == 0 {
            let ratio = size as f64 / 128.0;
            (ratio, 8.0 * ratio)
        } else {
            return Err(Error::InvalidParameter(format!(
                "arcface template size must be a multiple of 112 or 128, got {size}"
            )));
        };
        let points = ARCFACE_112_POINTS
            .iter()
            .map(|p| Point2D::new(p.x * ratio + diff_x, p.y * ratio))
            .collect();
        Self::new(points, size, size)
    }

    /// Return a copy with points and output size multiplied by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `factor` is not a positive
    /// finite number, or [`Error::InvalidDimension`] if the scaled size
    /// rounds to zero.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "template scale factor must be positive, got {factor}"
            )));
        }
        let width = (self.width as f64 * factor).round() as u32;
        let height = (self.height as f64 * factor).round() as u32;
        let points = self
            .points
            .iter()
            .map(|p| Point2D::new(p.x * factor, p.y * factor))
            .collect();
        Self::new(points, width, height)
    }

    /// Resample the layout onto a square output of side `size`.
    ///
    /// Each axis is scaled independently, so a non-square template becomes
    /// square.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if `size` is 0.
    pub fn scaled_to(&self, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidDimension {
                width: size,
                height: size,
            });
        }
        let sx = size as f64 / self.width as f64;
        let sy = size as f64 / self.height as f64;
        let points = self
            .points
            .iter()
            .map(|p| Point2D::new(p.x * sx, p.y * sy))
            .collect();
        Self::new(points, size, size)
    }

    /// Get the canonical points.
    #[inline]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Get the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed template.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Output width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Output `(width, height)`.
    #[inline]
    pub fn output_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::arcface_112()
    }
}
