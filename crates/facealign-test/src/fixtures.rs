//! Deterministic inputs for regression tests
//!
//! Images are generated from smooth analytic patterns so that bilinear
//! resampling error stays small and predictable.

use facealign_core::{ChannelLayout, LandmarkSet, PixelBuffer, Point2D, Template};

/// Smooth gray level at (x, y), roughly in 68..=188.
pub fn pattern_value(x: f64, y: f64, phase: f64) -> f64 {
    128.0 + 60.0 * (x / 9.0 + phase).sin() * (y / 11.0 + phase).cos()
}

/// Build a buffer from the smooth pattern.
///
/// Colour channels use shifted phases so they are distinguishable; alpha is
/// opaque.
pub fn smooth_pattern(width: u32, height: u32, layout: ChannelLayout) -> PixelBuffer {
    let channels = layout.channels();
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let v = if layout.has_alpha() && c == 3 {
                    255.0
                } else {
                    pattern_value(x as f64, y as f64, c as f64 * 0.7)
                };
                data.push((v + 0.5).clamp(0.0, 255.0) as u8);
            }
        }
    }
    PixelBuffer::from_vec(width, height, layout, data)
        .unwrap_or_else(|e| panic!("smooth_pattern {width}x{height}: {e}"))
}

/// Apply `x' = s R(angle) x + t` to a point.
pub fn similarity_point(p: Point2D, scale: f64, angle_deg: f64, tx: f64, ty: f64) -> Point2D {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point2D::new(
        scale * (cos * p.x - sin * p.y) + tx,
        scale * (sin * p.x + cos * p.y) + ty,
    )
}

/// The ArcFace template points moved by a similarity, as a landmark set.
pub fn moved_template_landmarks(scale: f64, angle_deg: f64, tx: f64, ty: f64) -> LandmarkSet {
    let points = Template::arcface_112()
        .points()
        .iter()
        .map(|&p| similarity_point(p, scale, angle_deg, tx, ty))
        .collect();
    LandmarkSet::new(points).unwrap_or_else(|e| panic!("moved landmarks: {e}"))
}

/// Crop a rectangle out of a buffer.
pub fn crop(buf: &PixelBuffer, x0: u32, y0: u32, width: u32, height: u32) -> PixelBuffer {
    let channels = buf.channels();
    let mut data = Vec::with_capacity(width as usize * height as usize * channels);
    for y in y0..y0 + height {
        let row = buf.row(y);
        let start = x0 as usize * channels;
        data.extend_from_slice(&row[start..start + width as usize * channels]);
    }
    PixelBuffer::from_vec(width, height, buf.layout(), data)
        .unwrap_or_else(|e| panic!("crop {width}x{height}: {e}"))
}
