//! Native pixel formats
//!
//! Codes follow the platform bitmap format enumeration. Only RGBA-8888 and
//! RGB-565 are converted; other formats are reported instead of being
//! reinterpreted.

use crate::{BridgeError, BridgeResult};
use std::fmt;

/// Platform bitmap pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit R, G, B, A in memory order
    Rgba8888,
    /// 16-bit little-endian word, red in bits 11..16
    Rgb565,
    /// 16-bit, 4 bits per channel (deprecated on the platform)
    Rgba4444,
    /// 8-bit alpha mask
    Alpha8,
    /// Half-float per channel
    RgbaF16,
    /// 10 bits per colour, 2 bits alpha
    Rgba1010102,
    /// Any other code
    Unknown(i32),
}

impl PixelFormat {
    /// Map a native format code.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => PixelFormat::Rgba8888,
            4 => PixelFormat::Rgb565,
            7 => PixelFormat::Rgba4444,
            8 => PixelFormat::Alpha8,
            9 => PixelFormat::RgbaF16,
            10 => PixelFormat::Rgba1010102,
            other => PixelFormat::Unknown(other),
        }
    }

    /// Native format code.
    pub fn code(self) -> i32 {
        match self {
            PixelFormat::Rgba8888 => 1,
            PixelFormat::Rgb565 => 4,
            PixelFormat::Rgba4444 => 7,
            PixelFormat::Alpha8 => 8,
            PixelFormat::RgbaF16 => 9,
            PixelFormat::Rgba1010102 => 10,
            PixelFormat::Unknown(code) => code,
        }
    }

    /// Bytes per pixel, if the layout is known.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Rgba1010102 => Some(4),
            PixelFormat::Rgb565 | PixelFormat::Rgba4444 => Some(2),
            PixelFormat::Alpha8 => Some(1),
            PixelFormat::RgbaF16 => Some(8),
            PixelFormat::Unknown(_) => None,
        }
    }

    /// Whether conversion to and from [`facealign_core::PixelBuffer`] is supported.
    pub fn is_supported(self) -> bool {
        matches!(self, PixelFormat::Rgba8888 | PixelFormat::Rgb565)
    }

    /// Check support, returning the supported bytes per pixel.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedFormat`] for any format other than
    /// RGBA-8888 and RGB-565.
    pub fn ensure_supported(self) -> BridgeResult<usize> {
        match self {
            PixelFormat::Rgba8888 => Ok(4),
            PixelFormat::Rgb565 => Ok(2),
            other => Err(BridgeError::UnsupportedFormat(other)),
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgba8888 => write!(f, "RGBA_8888"),
            PixelFormat::Rgb565 => write!(f, "RGB_565"),
            PixelFormat::Rgba4444 => write!(f, "RGBA_4444"),
            PixelFormat::Alpha8 => write!(f, "A_8"),
            PixelFormat::RgbaF16 => write!(f, "RGBA_F16"),
            PixelFormat::Rgba1010102 => write!(f, "RGBA_1010102"),
            PixelFormat::Unknown(code) => write!(f, "unknown format {code}"),
        }
    }
}
