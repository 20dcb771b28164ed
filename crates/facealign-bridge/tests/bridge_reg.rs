//! Pixel-format bridge regression test
//!
//! native -> buffer -> native round trips for RGBA-8888 with and without
//! premultiplied alpha, RGB-565 quantization, stride handling and format
//! rejection.

use facealign_bridge::{
    BitmapInfo, BridgeError, LockPixels, NativeBitmap, PixelFormat, bitmap_to_buffer,
    buffer_to_bitmap, premultiply_pixel,
};
use facealign_core::{ChannelLayout, PixelBuffer};
use facealign_test::RegParams;
use quickcheck_macros::quickcheck;
use std::cell::Cell;

/// 8x4 RGBA bitmap whose alpha runs through 0..=255 in steps of 8.
fn alpha_pattern() -> NativeBitmap {
    let mut raw = Vec::with_capacity(8 * 4 * 4);
    for i in 0..32u32 {
        let a = (i * 8).min(255) as u8;
        raw.extend_from_slice(&[(i * 7) as u8, (255 - i * 5) as u8, (i * 3) as u8, a]);
    }
    let info = BitmapInfo::tight(8, 4, PixelFormat::Rgba8888, false).expect("info");
    NativeBitmap::from_raw(info, raw).expect("bitmap")
}

#[test]
fn bridge_reg_rgba_round_trip_exact() {
    let mut rp = RegParams::new("bridge_rgba_exact");

    let native = alpha_pattern();
    let buf = bitmap_to_buffer(&native, false).expect("to buffer");
    rp.compare_values(4.0, buf.channels() as f64, 0.0);

    let back = buffer_to_bitmap(&buf, PixelFormat::Rgba8888, false).expect("to bitmap");
    rp.compare_values(0.0, if back == native { 0.0 } else { 1.0 }, 0.0);

    let alpha_in: Vec<u8> = native.pixels().chunks_exact(4).map(|p| p[3]).collect();
    let alpha_out: Vec<u8> = back.pixels().chunks_exact(4).map(|p| p[3]).collect();
    rp.compare_values(0.0, if alpha_in == alpha_out { 0.0 } else { 1.0 }, 0.0);

    assert!(rp.cleanup(), "bridge_rgba_exact regression test failed");
}

#[test]
fn bridge_reg_premultiplied_round_trip() {
    let mut rp = RegParams::new("bridge_premultiplied");

    // Straight-alpha buffer -> premultiplied bitmap -> straight buffer
    let straight = bitmap_to_buffer(&alpha_pattern(), false).expect("to buffer");
    let premul = buffer_to_bitmap(&straight, PixelFormat::Rgba8888, true).expect("premultiply");
    rp.compare_values(1.0, premul.info().premultiplied as u8 as f64, 0.0);

    let recovered = bitmap_to_buffer(&premul, true).expect("unpremultiply");
    for (s, r) in straight.pixels().zip(recovered.pixels()) {
        // alpha is exact
        rp.compare_values(s[3] as f64, r[3] as f64, 0.0);
        if s[3] == 0 {
            continue;
        }
        // colour loses at most half a premultiplied step
        let tolerance = (255.0 / s[3] as f64).ceil();
        for c in 0..3 {
            rp.compare_values(s[c] as f64, r[c] as f64, tolerance);
        }
    }

    assert!(rp.cleanup(), "bridge_premultiplied regression test failed");
}

#[test]
fn bridge_reg_rgb565_output() {
    let mut rp = RegParams::new("bridge_rgb565");

    let buf = PixelBuffer::filled(3, 2, ChannelLayout::Rgb, &[200, 100, 50, 0]).expect("buffer");
    let native = buffer_to_bitmap(&buf, PixelFormat::Rgb565, true).expect("to 565");
    rp.compare_values(6.0, native.info().stride as f64, 0.0);
    rp.compare_values(0.0, native.info().premultiplied as u8 as f64, 0.0);

    let back = bitmap_to_buffer(&native, false).expect("from 565");
    for px in back.pixels() {
        rp.compare_values(200.0, px[0] as f64, 7.0);
        rp.compare_values(100.0, px[1] as f64, 3.0);
        rp.compare_values(50.0, px[2] as f64, 7.0);
        rp.compare_values(255.0, px[3] as f64, 0.0);
    }

    assert!(rp.cleanup(), "bridge_rgb565 regression test failed");
}

#[test]
fn bridge_reg_stride_and_rejection() {
    // 2x2 RGBA with 4 bytes of padding per row
    let mut raw = Vec::new();
    raw.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 0xEE, 0xEE, 0xEE, 0xEE]);
    raw.extend_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16, 0xEE, 0xEE, 0xEE, 0xEE]);
    let info = BitmapInfo::from_native(2, 2, 12, 1, false).expect("info");
    let padded = NativeBitmap::from_raw(info, raw).expect("bitmap");
    let buf = bitmap_to_buffer(&padded, false).expect("to buffer");
    assert_eq!(buf.data(), (1..=16).collect::<Vec<u8>>().as_slice());

    for code in [7, 8, 9, 10, 0, 99] {
        let info = BitmapInfo {
            width: 2,
            height: 2,
            stride: 16,
            format: PixelFormat::from_code(code),
            premultiplied: false,
        };
        let bmp = OpaqueBitmap::new(info, vec![0; 32]);
        assert!(
            matches!(bitmap_to_buffer(&bmp, false), Err(BridgeError::UnsupportedFormat(_))),
            "format code {code} accepted"
        );
        assert!(bmp.lock_count() == 0, "pixels locked for an unsupported format");
    }

    let bad_stride = BitmapInfo { stride: 7, ..info };
    let bmp = OpaqueBitmap::new(bad_stride, vec![0; 64]);
    assert!(matches!(
        bitmap_to_buffer(&bmp, false),
        Err(BridgeError::InvalidStride { stride: 7, min: 8 })
    ));

    assert!(matches!(
        buffer_to_bitmap(&buf, PixelFormat::Alpha8, false),
        Err(BridgeError::UnsupportedFormat(PixelFormat::Alpha8))
    ));
}

#[test]
fn bridge_reg_lock_refused() {
    let info = BitmapInfo::tight(2, 2, PixelFormat::Rgba8888, false).expect("info");
    let mut bmp = OpaqueBitmap::new(info, vec![7; 16]);
    bmp.busy = true;
    assert!(matches!(bitmap_to_buffer(&bmp, false), Err(BridgeError::LockFailed(_))));
    assert_eq!(bmp.lock_count(), 0);

    bmp.busy = false;
    let buf = bitmap_to_buffer(&bmp, false).expect("to buffer");
    assert_eq!(buf.data(), &[7; 16]);
    assert_eq!(bmp.lock_count(), 1);
}

/// Foreign bitmap that counts how often its pixels were locked.
///
/// A busy bitmap refuses the lock, like a recycled platform bitmap.
struct OpaqueBitmap {
    info: BitmapInfo,
    bytes: Vec<u8>,
    busy: bool,
    locks: Cell<usize>,
}

impl OpaqueBitmap {
    fn new(info: BitmapInfo, bytes: Vec<u8>) -> Self {
        Self {
            info,
            bytes,
            busy: false,
            locks: Cell::new(0),
        }
    }

    fn lock_count(&self) -> usize {
        self.locks.get()
    }
}

impl LockPixels for OpaqueBitmap {
    fn info(&self) -> BitmapInfo {
        self.info
    }

    fn with_locked_pixels<R, F>(&self, f: F) -> Result<R, BridgeError>
    where
        F: FnOnce(&[u8]) -> R,
    {
        if self.busy {
            return Err(BridgeError::LockFailed("bitmap is busy".to_string()));
        }
        self.locks.set(self.locks.get() + 1);
        Ok(f(&self.bytes))
    }
}

/// Straight RGBA survives the bridge byte for byte.
#[quickcheck]
fn rgba_round_trip_preserves_bytes(pixels: Vec<(u8, u8, u8, u8)>) -> bool {
    if pixels.is_empty() {
        return true;
    }
    let raw: Vec<u8> = pixels.iter().flat_map(|&(r, g, b, a)| [r, g, b, a]).collect();
    let info = match BitmapInfo::tight(pixels.len() as u32, 1, PixelFormat::Rgba8888, false) {
        Ok(info) => info,
        Err(_) => return false,
    };
    let native = match NativeBitmap::from_raw(info, raw) {
        Ok(n) => n,
        Err(_) => return false,
    };
    bitmap_to_buffer(&native, false)
        .and_then(|buf| buffer_to_bitmap(&buf, PixelFormat::Rgba8888, false))
        .is_ok_and(|back| back == native)
}

/// Premultiplying never touches alpha.
#[quickcheck]
fn premultiply_keeps_alpha(r: u8, g: u8, b: u8, a: u8) -> bool {
    let p = premultiply_pixel([r, g, b, a]);
    p[3] == a && p[0] <= a && p[1] <= a && p[2] <= a
}
