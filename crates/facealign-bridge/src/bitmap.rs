//! Native bitmap description and scoped pixel locking
//!
//! Platform bitmaps expose their pixels only while locked. The
//! [`LockPixels`] / [`LockPixelsMut`] traits model that as a closure: the
//! slice handed to the closure is valid only inside it, so converted data
//! must be copied out before the lock is released.

use crate::format::PixelFormat;
use crate::{BridgeError, BridgeResult};

/// Geometry and format of a native bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row, including any padding
    pub stride: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// Colour channels are premultiplied by alpha
    pub premultiplied: bool,
}

impl BitmapInfo {
    /// Describe a tightly packed bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedFormat`] for formats other than
    /// RGBA-8888 and RGB-565, and [`BridgeError::InvalidNativeSize`] for a
    /// zero-sized bitmap or one too wide for a 32-bit stride.
    pub fn tight(
        width: u32,
        height: u32,
        format: PixelFormat,
        premultiplied: bool,
    ) -> BridgeResult<Self> {
        let bpp = format.ensure_supported()?;
        if width == 0 || height == 0 {
            return Err(BridgeError::InvalidNativeSize {
                width: width as i64,
                height: height as i64,
            });
        }
        let stride = width.checked_mul(bpp as u32).ok_or(BridgeError::InvalidNativeSize {
            width: width as i64,
            height: height as i64,
        })?;
        Ok(Self {
            width,
            height,
            stride,
            format,
            premultiplied,
        })
    }

    /// Build from the signed values a native API reports.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidNativeSize`] if width or height is not positive
    /// - [`BridgeError::UnsupportedFormat`] if the stride is negative and the
    ///   format has no known row size
    /// - [`BridgeError::InvalidStride`] if the stride is negative
    pub fn from_native(
        width: i32,
        height: i32,
        stride: i32,
        format_code: i32,
        premultiplied: bool,
    ) -> BridgeResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(BridgeError::InvalidNativeSize {
                width: width as i64,
                height: height as i64,
            });
        }
        let format = PixelFormat::from_code(format_code);
        let Ok(stride) = u32::try_from(stride) else {
            let bpp = format.ensure_supported()?;
            return Err(BridgeError::InvalidStride {
                stride: stride as i64,
                min: width as u64 * bpp as u64,
            });
        };
        Ok(Self {
            width: width as u32,
            height: height as u32,
            stride,
            format,
            premultiplied,
        })
    }

    /// Bytes of pixel data in one row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel().unwrap_or(0)
    }

    /// Check the description against the locked memory length.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::UnsupportedFormat`] for unsupported formats
    /// - [`BridgeError::InvalidNativeSize`] for a zero-sized bitmap
    /// - [`BridgeError::InvalidStride`] if a row does not fit in the stride
    /// - [`BridgeError::BufferTooSmall`] if `len < stride * height`
    pub fn validate(&self, len: usize) -> BridgeResult<()> {
        let bpp = self.format.ensure_supported()?;
        if self.width == 0 || self.height == 0 {
            return Err(BridgeError::InvalidNativeSize {
                width: self.width as i64,
                height: self.height as i64,
            });
        }
        let min = self.width as u64 * bpp as u64;
        if (self.stride as u64) < min {
            return Err(BridgeError::InvalidStride {
                stride: self.stride as i64,
                min,
            });
        }
        let expected = self.stride as usize * self.height as usize;
        if len < expected {
            return Err(BridgeError::BufferTooSmall {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

/// Read access to pixels that are only valid while locked.
pub trait LockPixels {
    /// Describe the bitmap.
    fn info(&self) -> BitmapInfo;

    /// Lock the pixels, run `f` on them and unlock.
    ///
    /// The lock is released before this returns, whether or not `f`
    /// succeeded.
    fn with_locked_pixels<R, F>(&self, f: F) -> BridgeResult<R>
    where
        F: FnOnce(&[u8]) -> R;
}

/// Write access to pixels that are only valid while locked.
pub trait LockPixelsMut: LockPixels {
    /// Lock the pixels for writing, run `f` on them and unlock.
    fn with_locked_pixels_mut<R, F>(&mut self, f: F) -> BridgeResult<R>
    where
        F: FnOnce(&mut [u8]) -> R;
}

/// In-memory bitmap with native layout
///
/// Stands in for a platform bitmap in tests and is the return type of
/// [`crate::buffer_to_bitmap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBitmap {
    info: BitmapInfo,
    pixels: Vec<u8>,
}

impl NativeBitmap {
    /// Create a zero-filled, tightly packed bitmap.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        premultiplied: bool,
    ) -> BridgeResult<Self> {
        let info = BitmapInfo::tight(width, height, format, premultiplied)?;
        let pixels = vec![0u8; info.stride as usize * height as usize];
        Ok(Self { info, pixels })
    }

    /// Wrap existing pixel memory.
    ///
    /// # Errors
    ///
    /// Returns any error from [`BitmapInfo::validate`].
    pub fn from_raw(info: BitmapInfo, pixels: Vec<u8>) -> BridgeResult<Self> {
        info.validate(pixels.len())?;
        Ok(Self { info, pixels })
    }

    /// Get the bitmap description
    pub fn info(&self) -> BitmapInfo {
        self.info
    }

    /// Get the raw pixel memory, including row padding
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume and return the pixel memory
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

impl LockPixels for NativeBitmap {
    fn info(&self) -> BitmapInfo {
        self.info
    }

    fn with_locked_pixels<R, F>(&self, f: F) -> BridgeResult<R>
    where
        F: FnOnce(&[u8]) -> R,
    {
        Ok(f(&self.pixels))
    }
}

impl LockPixelsMut for NativeBitmap {
    fn with_locked_pixels_mut<R, F>(&mut self, f: F) -> BridgeResult<R>
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        Ok(f(&mut self.pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_info() {
        let info = BitmapInfo::tight(10, 4, PixelFormat::Rgb565, false).unwrap();
        assert_eq!(info.stride, 20);
        assert_eq!(info.row_bytes(), 20);
        assert!(BitmapInfo::tight(10, 4, PixelFormat::Alpha8, false).is_err());
        assert!(BitmapInfo::tight(0, 4, PixelFormat::Rgba8888, false).is_err());
        assert!(matches!(
            BitmapInfo::tight(u32::MAX, 1, PixelFormat::Rgba8888, false),
            Err(BridgeError::InvalidNativeSize { .. })
        ));
    }

    #[test]
    fn test_from_native() {
        let info = BitmapInfo::from_native(3, 2, 16, 1, true).unwrap();
        assert_eq!(info.format, PixelFormat::Rgba8888);
        assert!(info.premultiplied);
        assert!(matches!(
            BitmapInfo::from_native(-3, 2, 16, 1, true),
            Err(BridgeError::InvalidNativeSize { width: -3, height: 2 })
        ));
        assert!(matches!(
            BitmapInfo::from_native(3, 2, -16, 1, true),
            Err(BridgeError::InvalidStride { stride: -16, min: 12 })
        ));
        assert!(matches!(
            BitmapInfo::from_native(3, 2, -16, 0, true),
            Err(BridgeError::UnsupportedFormat(PixelFormat::Unknown(0)))
        ));
    }

    #[test]
    fn test_validate() {
        let mut info = BitmapInfo::from_native(3, 2, 16, 1, false).unwrap();
        assert!(info.validate(32).is_ok());
        assert!(matches!(
            info.validate(31),
            Err(BridgeError::BufferTooSmall { expected: 32, actual: 31 })
        ));
        info.stride = 11;
        assert!(matches!(
            info.validate(100),
            Err(BridgeError::InvalidStride { stride: 11, min: 12 })
        ));
        info.format = PixelFormat::RgbaF16;
        assert!(matches!(info.validate(100), Err(BridgeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_native_bitmap_lock() {
        let mut bmp = NativeBitmap::new(2, 2, PixelFormat::Rgba8888, false).unwrap();
        bmp.with_locked_pixels_mut(|px| px[0] = 9).unwrap();
        let first = bmp.with_locked_pixels(|px| px[0]).unwrap();
        assert_eq!(first, 9);
        assert_eq!(bmp.pixels().len(), 16);
        assert!(NativeBitmap::from_raw(bmp.info(), vec![0; 15]).is_err());
    }
}
