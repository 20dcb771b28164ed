//! Pixel access functions
//!
//! Bounds-checked and unchecked accessors for single pixels. Pixels are
//! returned as slices of `channels()` samples.

use super::PixelBuffer;
use crate::error::{Error, Result};

impl PixelBuffer {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// Get the samples of the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel_unchecked(x, y))
    }

    /// Get the samples of the pixel at (x, y) without the bounds check.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the buffer.
    #[inline]
    pub fn pixel_unchecked(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels()]
    }

    /// Get one sample of the pixel at (x, y).
    pub fn get_sample(&self, x: u32, y: u32, channel: usize) -> Option<u8> {
        if channel >= self.channels() {
            return None;
        }
        self.get_pixel(x, y).map(|p| p[channel])
    }

    /// Set the pixel at (x, y).
    ///
    /// `value` must hold exactly `channels()` samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds
    /// and [`Error::InvalidParameter`] if `value` has the wrong length.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: &[u8]) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        if value.len() != self.channels() {
            return Err(Error::InvalidParameter(format!(
                "pixel has {} channels, got {} samples",
                self.channels(),
                value.len()
            )));
        }
        let start = self.offset(x, y);
        let channels = self.channels();
        self.data[start..start + channels].copy_from_slice(value);
        Ok(())
    }

    /// Iterate over pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.channels())
    }
}
