//! PixelBuffer - The plain image container consumed by the aligner
//!
//! `PixelBuffer` is the only image type the estimator and resampler see.
//! Platform bitmaps are converted into it by the bridge crate before any
//! geometry runs.
//!
//! # Pixel layout
//!
//! - Samples are 8-bit and interleaved (`RGBRGB...`, `RGBARGBA...`)
//! - Rows are tightly packed: the row stride is `width * channels`
//! - The origin is the top-left pixel; `y` grows downward
//!
//! # Ownership model
//!
//! A `PixelBuffer` owns its samples exclusively. Operations that produce an
//! image always allocate a new buffer, so an input is never aliased by an
//! output.

mod access;
mod planar;

use crate::error::{Error, Result};

/// Channel layout of a [`PixelBuffer`]
///
/// The resampler is layout-agnostic; the layout only tells it how many
/// interleaved samples make up one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Single gray channel
    Gray,
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, straight (non-premultiplied) alpha
    Rgba,
}

impl ChannelLayout {
    /// Create a layout from a channel count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] unless `channels` is 1, 3 or 4.
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(ChannelLayout::Gray),
            3 => Ok(ChannelLayout::Rgb),
            4 => Ok(ChannelLayout::Rgba),
            n => Err(Error::UnsupportedFormat(format!(
                "{n} channels per pixel"
            ))),
        }
    }

    /// Number of interleaved samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub fn has_alpha(self) -> bool {
        self == ChannelLayout::Rgba
    }
}

/// Rectangular grid of interleaved 8-bit samples
///
/// # Examples
///
/// ```
/// use facealign_core::{ChannelLayout, PixelBuffer};
///
/// let buf = PixelBuffer::new(112, 112, ChannelLayout::Rgb).unwrap();
/// assert_eq!(buf.width(), 112);
/// assert_eq!(buf.data().len(), 112 * 112 * 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Result<Self> {
        Self::filled(width, height, layout, &[0; 4])
    }

    /// Create a buffer with every pixel set to `value`.
    ///
    /// Only the first `layout.channels()` entries of `value` are used.
    pub fn filled(width: u32, height: u32, layout: ChannelLayout, value: &[u8; 4]) -> Result<Self> {
        let len = Self::checked_len(width, height, layout)?;
        let pixel = &value[..layout.channels()];
        let data = pixel.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Wrap existing interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero-sized image and
    /// [`Error::DataLengthMismatch`] if `data.len()` is not
    /// `width * height * channels`.
    pub fn from_vec(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = Self::checked_len(width, height, layout)?;
        if data.len() != expected {
            return Err(Error::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Byte length for the given geometry, validating the dimensions.
    fn checked_len(width: u32, height: u32, layout: ChannelLayout) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or(Error::InvalidDimension { width, height })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the channel layout.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Number of interleaved samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.layout.channels()
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get the mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Check if two buffers have the same width, height and layout.
    pub fn sizes_equal(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.layout == other.layout
    }
}
