//! Interop with the `image` crate
//!
//! Desktop callers and tests load images through `image`; these helpers move
//! pixels between [`DynamicImage`] and [`PixelBuffer`] without any colour
//! conversion beyond widening unusual layouts to RGBA8.

use crate::{BridgeError, BridgeResult};
use facealign_core::{ChannelLayout, PixelBuffer};
use image::DynamicImage;

/// Copy a [`DynamicImage`] into a [`PixelBuffer`].
///
/// `Luma8`, `Rgb8` and `Rgba8` keep their layout. Every other variant
/// (gray-alpha, 16-bit, float) is converted to RGBA8 first.
pub fn buffer_from_image(img: &DynamicImage) -> BridgeResult<PixelBuffer> {
    let (width, height) = (img.width(), img.height());
    let (layout, data) = match img {
        DynamicImage::ImageLuma8(gray) => (ChannelLayout::Gray, gray.as_raw().clone()),
        DynamicImage::ImageRgb8(rgb) => (ChannelLayout::Rgb, rgb.as_raw().clone()),
        DynamicImage::ImageRgba8(rgba) => (ChannelLayout::Rgba, rgba.as_raw().clone()),
        other => (ChannelLayout::Rgba, other.to_rgba8().into_raw()),
    };
    Ok(PixelBuffer::from_vec(width, height, layout, data)?)
}

/// Copy a [`PixelBuffer`] into a [`DynamicImage`] of the matching variant.
pub fn buffer_to_image(buffer: &PixelBuffer) -> BridgeResult<DynamicImage> {
    let (width, height) = buffer.dimensions();
    let data = buffer.data().to_vec();
    let too_small = || BridgeError::BufferTooSmall {
        expected: buffer.stride() * height as usize,
        actual: buffer.data().len(),
    };
    let img = match buffer.layout() {
        ChannelLayout::Gray => DynamicImage::ImageLuma8(
            image::GrayImage::from_raw(width, height, data).ok_or_else(too_small)?,
        ),
        ChannelLayout::Rgb => DynamicImage::ImageRgb8(
            image::RgbImage::from_raw(width, height, data).ok_or_else(too_small)?,
        ),
        ChannelLayout::Rgba => DynamicImage::ImageRgba8(
            image::RgbaImage::from_raw(width, height, data).ok_or_else(too_small)?,
        ),
    };
    Ok(img)
}
