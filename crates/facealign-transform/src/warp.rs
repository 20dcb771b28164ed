//! Image warping by backward mapping
//!
//! Each destination pixel `(x, y)` is mapped through the inverse transform
//! into the source image and sampled there, so the output has no holes.
//! Source locations outside `[0, w-1] x [0, h-1]` receive the border value;
//! sampling never reads outside the source.
//!
//! Matrices with bottom row `(0, 0, 1)` take an affine path without the
//! per-pixel division. Everything else goes through the projective path.

use crate::matrix::{Transform, W_EPS};
use crate::{TransformError, TransformResult};
use facealign_core::PixelBuffer;

// ============================================================================
// Options
// ============================================================================

/// Value written where the source has no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderFill {
    /// All channels 0
    #[default]
    Black,
    /// All channels 255
    White,
    /// Per-channel value; only the first `channels` entries are used
    Value([u8; 4]),
}

impl BorderFill {
    /// Get the fill samples
    pub fn to_value(self) -> [u8; 4] {
        match self {
            BorderFill::Black => [0; 4],
            BorderFill::White => [255; 4],
            BorderFill::Value(v) => v,
        }
    }
}

/// Sampling method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Weighted blend of the four neighbours
    #[default]
    Bilinear,
    /// Closest source pixel
    Nearest,
}

/// Warp options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarpOptions {
    /// Fill for destination pixels with no source
    pub border: BorderFill,
    /// Sampling method
    pub interpolation: Interpolation,
}

impl WarpOptions {
    /// Set the border fill
    pub fn with_border(mut self, border: BorderFill) -> Self {
        self.border = border;
        self
    }

    /// Set the interpolation
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Warp `source` through `transform` into an image of `output_size`.
///
/// `transform` maps source coordinates to destination coordinates. Uses
/// bilinear interpolation and a black border.
///
/// # Errors
///
/// - [`TransformError::InvalidDimensions`] if the output width or height is 0
/// - [`TransformError::InvalidTransform`] if `transform` is not invertible
pub fn warp(
    source: &PixelBuffer,
    transform: &Transform,
    output_size: (u32, u32),
) -> TransformResult<PixelBuffer> {
    warp_with(source, transform, output_size, &WarpOptions::default())
}

/// Warp with explicit options.
///
/// See [`warp`].
pub fn warp_with(
    source: &PixelBuffer,
    transform: &Transform,
    output_size: (u32, u32),
    options: &WarpOptions,
) -> TransformResult<PixelBuffer> {
    let (width, height) = output_size;
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    let inv = transform.inverse()?;
    let affine = inv.is_affine();
    let m = inv.matrix();

    let mut out = PixelBuffer::new(width, height, source.layout())?;
    let channels = source.channels();
    let border = options.border.to_value();
    let sampler = Sampler::new(source, options.interpolation);

    tracing::debug!(
        src_w = source.width(),
        src_h = source.height(),
        width,
        height,
        affine,
        ?options,
        "warp"
    );

    for y in 0..height {
        let fy = y as f64;
        let row = out.row_mut(y);
        for (x, px) in row.chunks_exact_mut(channels).enumerate() {
            let fx = x as f64;
            let sx = m[(0, 0)] * fx + m[(0, 1)] * fy + m[(0, 2)];
            let sy = m[(1, 0)] * fx + m[(1, 1)] * fy + m[(1, 2)];
            let loc = if affine {
                Some((sx, sy))
            } else {
                let w = m[(2, 0)] * fx + m[(2, 1)] * fy + m[(2, 2)];
                (w.abs() > W_EPS).then(|| (sx / w, sy / w))
            };
            match loc {
                Some((sx, sy)) if sampler.contains(sx, sy) => sampler.sample(sx, sy, px),
                _ => px.copy_from_slice(&border[..channels]),
            }
        }
    }

    Ok(out)
}

// ============================================================================
// Sampling
// ============================================================================

struct Sampler<'a> {
    src: &'a PixelBuffer,
    max_x: f64,
    max_y: f64,
    interpolation: Interpolation,
}

impl<'a> Sampler<'a> {
    fn new(src: &'a PixelBuffer, interpolation: Interpolation) -> Self {
        Self {
            src,
            max_x: (src.width() - 1) as f64,
            max_y: (src.height() - 1) as f64,
            interpolation,
        }
    }

    /// Inside the sampled area; false for NaN.
    #[inline]
    fn contains(&self, sx: f64, sy: f64) -> bool {
        (0.0..=self.max_x).contains(&sx) && (0.0..=self.max_y).contains(&sy)
    }

    /// Write the sample at an in-bounds location into `out`.
    fn sample(&self, sx: f64, sy: f64, out: &mut [u8]) {
        match self.interpolation {
            Interpolation::Nearest => {
                let x = ((sx + 0.5) as u32).min(self.src.width() - 1);
                let y = ((sy + 0.5) as u32).min(self.src.height() - 1);
                out.copy_from_slice(self.src.pixel_unchecked(x, y));
            }
            Interpolation::Bilinear => {
                let x0 = sx as u32;
                let y0 = sy as u32;
                let x1 = (x0 + 1).min(self.src.width() - 1);
                let y1 = (y0 + 1).min(self.src.height() - 1);
                let dx = sx - x0 as f64;
                let dy = sy - y0 as f64;

                let p00 = self.src.pixel_unchecked(x0, y0);
                let p10 = self.src.pixel_unchecked(x1, y0);
                let p01 = self.src.pixel_unchecked(x0, y1);
                let p11 = self.src.pixel_unchecked(x1, y1);

                for (c, o) in out.iter_mut().enumerate() {
                    let top = p00[c] as f64 * (1.0 - dx) + p10[c] as f64 * dx;
                    let bottom = p01[c] as f64 * (1.0 - dx) + p11[c] as f64 * dx;
                    let v = top * (1.0 - dy) + bottom * dy;
                    *o = (v + 0.5).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}
