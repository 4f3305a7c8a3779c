//! Photo enhancement applied before embedding.
//!
//! Every adjustment except auto-contrast is a linear blend between the image
//! and a "degenerate" version of it:
//!
//! ```text
//! out = degenerate + factor * (image - degenerate)
//! ```
//!
//! | Adjustment | Degenerate image |
//! |---|---|
//! | saturation | grayscale of the image |
//! | contrast | solid gray at the mean luminance |
//! | brightness | black |
//! | sharpness | 3x3 smoothed image |
//!
//! A factor of 1.0 returns the image unchanged, 0.0 returns the degenerate
//! image, and values above 1.0 push away from it. Adjustments run in the
//! order listed, after auto-contrast. Only RGB is touched; callers keep the
//! alpha plane separately.

use crate::config::EnhanceConfig;
use image::{Rgb, RgbImage, imageops};

/// Apply the configured enhancement chain in place.
pub fn enhance(img: &mut RgbImage, config: &EnhanceConfig) {
    if !config.enabled {
        return;
    }
    if config.auto_contrast {
        auto_contrast(img);
    }
    if config.saturation != 1.0 {
        adjust_saturation(img, config.saturation);
    }
    if config.contrast != 1.0 {
        adjust_contrast(img, config.contrast);
    }
    if config.brightness != 1.0 {
        adjust_brightness(img, config.brightness);
    }
    if config.sharpness != 1.0 {
        adjust_sharpness(img, config.sharpness);
    }
}

/// Stretch each channel so its darkest value maps to 0 and its brightest to
/// 255. Flat channels are left alone.
pub fn auto_contrast(img: &mut RgbImage) {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for px in img.pixels() {
        for c in 0..3 {
            lo[c] = lo[c].min(px[c]);
            hi[c] = hi[c].max(px[c]);
        }
    }

    let luts: [[u8; 256]; 3] = std::array::from_fn(|c| {
        let mut lut: [u8; 256] = std::array::from_fn(|i| i as u8);
        if hi[c] > lo[c] {
            let scale = 255.0 / (hi[c] - lo[c]) as f32;
            let offset = -(lo[c] as f32) * scale;
            for (i, v) in lut.iter_mut().enumerate() {
                *v = clamp_channel(i as f32 * scale + offset);
            }
        }
        lut
    });

    for px in img.pixels_mut() {
        for c in 0..3 {
            px[c] = luts[c][px[c] as usize];
        }
    }
}

pub fn adjust_saturation(img: &mut RgbImage, factor: f32) {
    for px in img.pixels_mut() {
        let gray = luma(px) as f32;
        *px = blend_px(Rgb([gray; 3]), *px, factor);
    }
}

pub fn adjust_contrast(img: &mut RgbImage, factor: f32) {
    let count = (img.width() as u64 * img.height() as u64).max(1);
    let total: u64 = img.pixels().map(|px| luma(px) as u64).sum();
    let mean = (total as f32 / count as f32 + 0.5).floor();
    for px in img.pixels_mut() {
        *px = blend_px(Rgb([mean; 3]), *px, factor);
    }
}

pub fn adjust_brightness(img: &mut RgbImage, factor: f32) {
    for px in img.pixels_mut() {
        *px = blend_px(Rgb([0.0; 3]), *px, factor);
    }
}

/// Blend against a smoothed copy. Edge pixels have no full neighborhood and
/// keep their values in the smoothed copy.
pub fn adjust_sharpness(img: &mut RgbImage, factor: f32) {
    let smoothed = smooth(img);
    for (px, soft) in img.pixels_mut().zip(smoothed.pixels()) {
        let soft = Rgb([soft[0] as f32, soft[1] as f32, soft[2] as f32]);
        *px = blend_px(soft, *px, factor);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 3x3 smoothing kernel, center weighted. `filter3x3` divides by its sum (13).
const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

fn smooth(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    if w < 3 || h < 3 {
        return img.clone();
    }
    let mut out = imageops::filter3x3(img, &SMOOTH_KERNEL);
    // The one-pixel border keeps the source pixels.
    for (x, y, px) in img.enumerate_pixels() {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            out.put_pixel(x, y, *px);
        }
    }
    out
}

/// ITU-R 601-2 luma.
fn luma(px: &Rgb<u8>) -> u8 {
    let l = px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114;
    (l / 1000) as u8
}

fn blend_px(degenerate: Rgb<f32>, px: Rgb<u8>, factor: f32) -> Rgb<u8> {
    Rgb(std::array::from_fn(|c| {
        let d = degenerate[c];
        clamp_channel(d + factor * (px[c] as f32 - d))
    }))
}

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
