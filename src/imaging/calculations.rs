//! Pure calculation functions for fitting images into card areas.
//!
//! All functions here are pure and testable without any I/O or images. They
//! return the rectangle the image is drawn into; the caller clips drawing to
//! the target rectangle, so overflow is cropped away.

use crate::layout::Rect;

/// How a decoded image is scaled into its target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Cover both dimensions, centered, overflow cropped.
    Cover,
    /// Match the target height exactly, centered horizontally.
    Height,
}

/// Dimensions that completely cover `target` while keeping the source aspect
/// ratio. One dimension matches exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions in pixels (width, height)
/// * `target` - Target area dimensions (width, height)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (f32, f32)) -> (f32, f32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f32 / src_h as f32;
    let tgt_aspect = tgt_w / tgt_h;

    if src_aspect > tgt_aspect {
        // Source is wider: height matches, width overflows
        (tgt_h * src_aspect, tgt_h)
    } else {
        // Source is taller: width matches, height overflows
        (tgt_w, tgt_w / src_aspect)
    }
}

/// Scale to cover `target` and center on it.
pub fn cover_fill(source: (u32, u32), target: Rect) -> Rect {
    let (w, h) = calculate_fill_dimensions(source, (target.width, target.height));
    centered(target, w, h)
}

/// Scale so the height equals `target.height` and center horizontally.
pub fn height_fill(source: (u32, u32), target: Rect) -> Rect {
    let (src_w, src_h) = source;
    let h = target.height;
    let w = h * src_w as f32 / src_h as f32;
    Rect::new(target.x + (target.width - w) / 2.0, target.y, w, h)
}

/// Draw rectangle for `fit`.
pub fn fit_image(fit: Fit, source: (u32, u32), target: Rect) -> Rect {
    match fit {
        Fit::Cover => cover_fill(source, target),
        Fit::Height => height_fill(source, target),
    }
}

fn centered(target: Rect, w: f32, h: f32) -> Rect {
    Rect::new(
        target.x + (target.width - w) / 2.0,
        target.y + (target.height - h) / 2.0,
        w,
        h,
    )
}
