//! Conversion between native bitmaps and [`PixelBuffer`]
//!
//! Native RGBA-8888 memory is read row by row using the declared stride and
//! copied into a tightly packed `Rgba` buffer. RGB-565 words are expanded to
//! 8 bits per channel by left shift, with opaque alpha.
//!
//! # Premultiplied alpha
//!
//! ```text
//! premultiply:    c' = (c * a + 127) / 255
//! unpremultiply:  c' = (c * 255 + a / 2) / a     (0 when a == 0)
//! ```
//!
//! Alpha itself is never changed by either direction.

use crate::bitmap::{BitmapInfo, LockPixels, LockPixelsMut, NativeBitmap};
use crate::format::PixelFormat;
use crate::{BridgeError, BridgeResult};
use facealign_core::{ChannelLayout, Error as CoreError, PixelBuffer};

// ============================================================================
// Pixel helpers
// ============================================================================

/// Scale colour channels by alpha.
#[inline]
pub fn premultiply_pixel(px: [u8; 4]) -> [u8; 4] {
    let a = px[3] as u32;
    let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
    [mul(px[0]), mul(px[1]), mul(px[2]), px[3]]
}

/// Undo [`premultiply_pixel`], saturating at 255.
#[inline]
pub fn unpremultiply_pixel(px: [u8; 4]) -> [u8; 4] {
    let a = px[3] as u32;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let div = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
    [div(px[0]), div(px[1]), div(px[2]), px[3]]
}

/// Expand an RGB-565 word to opaque RGBA.
#[inline]
pub fn unpack_rgb565(word: u16) -> [u8; 4] {
    let r = ((word >> 11) & 0x1f) as u8;
    let g = ((word >> 5) & 0x3f) as u8;
    let b = (word & 0x1f) as u8;
    [r << 3, g << 2, b << 3, 255]
}

/// Pack the colour channels of an RGBA pixel into an RGB-565 word.
#[inline]
pub fn pack_rgb565(px: [u8; 4]) -> u16 {
    ((px[0] as u16 >> 3) << 11) | ((px[1] as u16 >> 2) << 5) | (px[2] as u16 >> 3)
}

/// Widen a buffer pixel of any layout to RGBA.
#[inline]
fn to_rgba(layout: ChannelLayout, px: &[u8]) -> [u8; 4] {
    match layout {
        ChannelLayout::Gray => [px[0], px[0], px[0], 255],
        ChannelLayout::Rgb => [px[0], px[1], px[2], 255],
        ChannelLayout::Rgba => [px[0], px[1], px[2], px[3]],
    }
}

// ============================================================================
// Native -> buffer
// ============================================================================

/// Copy a locked native bitmap into a new `Rgba` [`PixelBuffer`].
///
/// # Arguments
///
/// * `bitmap` - Source bitmap; locked only for the duration of the copy
/// * `unpremultiply` - Convert premultiplied RGBA-8888 colour to straight
///   alpha. Ignored for RGB-565, which has no alpha.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedFormat`] for formats other than
/// RGBA-8888 and RGB-565, or a geometry error from [`BitmapInfo::validate`].
pub fn bitmap_to_buffer<B: LockPixels>(
    bitmap: &B,
    unpremultiply: bool,
) -> BridgeResult<PixelBuffer> {
    let info = bitmap.info();
    info.format.ensure_supported()?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        format = %info.format,
        unpremultiply,
        "bitmap to buffer"
    );
    let data = bitmap.with_locked_pixels(|bytes| decode(&info, bytes, unpremultiply))??;
    Ok(PixelBuffer::from_vec(
        info.width,
        info.height,
        ChannelLayout::Rgba,
        data,
    )?)
}

fn decode(info: &BitmapInfo, bytes: &[u8], unpremultiply: bool) -> BridgeResult<Vec<u8>> {
    info.validate(bytes.len())?;
    let stride = info.stride as usize;
    let row_bytes = info.row_bytes();
    let mut out = Vec::with_capacity(info.width as usize * info.height as usize * 4);

    for y in 0..info.height as usize {
        let row = &bytes[y * stride..y * stride + row_bytes];
        match info.format {
            PixelFormat::Rgba8888 if unpremultiply => {
                for px in row.chunks_exact(4) {
                    out.extend_from_slice(&unpremultiply_pixel([px[0], px[1], px[2], px[3]]));
                }
            }
            PixelFormat::Rgba8888 => out.extend_from_slice(row),
            PixelFormat::Rgb565 => {
                for word in row.chunks_exact(2) {
                    out.extend_from_slice(&unpack_rgb565(u16::from_le_bytes([word[0], word[1]])));
                }
            }
            other => return Err(BridgeError::UnsupportedFormat(other)),
        }
    }
    Ok(out)
}

// ============================================================================
// Buffer -> native
// ============================================================================

/// Convert a buffer into a new tightly packed native bitmap.
///
/// Gray and RGB buffers get opaque alpha. For RGBA-8888 output with
/// `premultiply` set, colour is scaled by alpha and the bitmap is flagged
/// premultiplied. RGB-565 output drops alpha.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedFormat`] for formats other than
/// RGBA-8888 and RGB-565.
pub fn buffer_to_bitmap(
    buffer: &PixelBuffer,
    format: PixelFormat,
    premultiply: bool,
) -> BridgeResult<NativeBitmap> {
    let premultiplied = premultiply && format == PixelFormat::Rgba8888;
    let mut bitmap = NativeBitmap::new(buffer.width(), buffer.height(), format, premultiplied)?;
    write_buffer_into(buffer, &mut bitmap, premultiply)?;
    Ok(bitmap)
}

/// Write a buffer into an existing native bitmap of the same size.
///
/// Row padding in the destination is left untouched.
///
/// # Errors
///
/// - [`BridgeError::Core`] with a dimension mismatch if sizes differ
/// - [`BridgeError::UnsupportedFormat`] for unsupported destination formats
/// - geometry errors from [`BitmapInfo::validate`]
pub fn write_buffer_into<B: LockPixelsMut>(
    buffer: &PixelBuffer,
    bitmap: &mut B,
    premultiply: bool,
) -> BridgeResult<()> {
    let info = bitmap.info();
    info.format.ensure_supported()?;
    if (info.width, info.height) != buffer.dimensions() {
        return Err(CoreError::DimensionMismatch {
            expected: (info.width, info.height),
            actual: buffer.dimensions(),
        }
        .into());
    }
    tracing::debug!(
        width = info.width,
        height = info.height,
        format = %info.format,
        premultiply,
        "buffer to bitmap"
    );
    bitmap.with_locked_pixels_mut(|bytes| encode(buffer, &info, bytes, premultiply))?
}

fn encode(
    buffer: &PixelBuffer,
    info: &BitmapInfo,
    bytes: &mut [u8],
    premultiply: bool,
) -> BridgeResult<()> {
    info.validate(bytes.len())?;
    let stride = info.stride as usize;
    let row_bytes = info.row_bytes();
    let layout = buffer.layout();
    let premultiply = premultiply && layout.has_alpha();

    for y in 0..info.height {
        let start = y as usize * stride;
        let dst = &mut bytes[start..start + row_bytes];
        let src = buffer.row(y).chunks_exact(buffer.channels());
        match info.format {
            PixelFormat::Rgba8888 => {
                for (out, px) in dst.chunks_exact_mut(4).zip(src) {
                    let rgba = to_rgba(layout, px);
                    let rgba = if premultiply { premultiply_pixel(rgba) } else { rgba };
                    out.copy_from_slice(&rgba);
                }
            }
            PixelFormat::Rgb565 => {
                for (out, px) in dst.chunks_exact_mut(2).zip(src) {
                    out.copy_from_slice(&pack_rgb565(to_rgba(layout, px)).to_le_bytes());
                }
            }
            other => return Err(BridgeError::UnsupportedFormat(other)),
        }
    }
    Ok(())
}
