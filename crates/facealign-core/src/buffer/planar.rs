//! Planar float export
//!
//! Recognition networks take `1 x 3 x H x W` input. The aligned buffer is
//! interleaved, so this reorders the colour samples into one plane per
//! channel. Values stay in the 0..=255 range; any mean/std normalization
//! belongs to the network wrapper.

use super::{ChannelLayout, PixelBuffer};

impl PixelBuffer {
    /// Export colour channels as a planar (CHW) `f32` vector.
    ///
    /// Gray buffers produce one plane. RGB and RGBA buffers produce three
    /// planes in R, G, B order; alpha is dropped.
    pub fn to_planar_f32(&self) -> Vec<f32> {
        let planes = match self.layout() {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb | ChannelLayout::Rgba => 3,
        };
        let plane_len = self.width() as usize * self.height() as usize;
        let mut out = vec![0f32; planes * plane_len];
        for (i, px) in self.pixels().enumerate() {
            for c in 0..planes {
                out[c * plane_len + i] = px[c] as f32;
            }
        }
        out
    }
}
