//! facealign-bridge - Pixel-format bridge for facealign
//!
//! Converts between platform-native bitmaps and the plain
//! [`PixelBuffer`](facealign_core::PixelBuffer) the aligner works on:
//!
//! - [`PixelFormat`] - Native format codes; RGBA-8888 and RGB-565 supported
//! - [`BitmapInfo`] / [`NativeBitmap`] - Native geometry and an in-memory bitmap
//! - [`LockPixels`] / [`LockPixelsMut`] - Closure-scoped pixel locking
//! - [`bitmap_to_buffer`] / [`buffer_to_bitmap`] / [`write_buffer_into`] -
//!   Conversions with premultiplied-alpha handling
//! - [`buffer_from_image`] / [`buffer_to_image`] - `image` crate interop

pub mod bitmap;
pub mod convert;
mod error;
pub mod format;
pub mod image_bridge;

pub use bitmap::{BitmapInfo, LockPixels, LockPixelsMut, NativeBitmap};
pub use convert::{
    bitmap_to_buffer, buffer_to_bitmap, pack_rgb565, premultiply_pixel, unpack_rgb565,
    unpremultiply_pixel, write_buffer_into,
};
pub use error::{BridgeError, BridgeResult};
pub use format::PixelFormat;
pub use image_bridge::{buffer_from_image, buffer_to_image};
