//! Pure Rust image loading backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, BMP, GIF, TIFF, WebP) | `image::ImageReader` |
//! | Enhancement | [`super::enhance`] on `image::RgbImage` |
//! | Plane split | RGB bytes plus optional alpha bytes |
//!
//! Format detection looks at the file contents, so a PNG saved as `.jpg`
//! still decodes.

use super::backend::{BackendError, ImageBackend, PreparedImage};
use super::enhance::enhance;
use crate::config::EnhanceConfig;
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_err = |reason: String| BackendError::Decode {
        path: path.display().to_string(),
        reason,
    };
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}

/// Split a decoded image into an RGB plane and, if any pixel is translucent,
/// an alpha plane.
fn split_planes(img: DynamicImage) -> (RgbImage, Option<Vec<u8>>) {
    if !img.color().has_alpha() {
        return (img.to_rgb8(), None);
    }
    let rgba = img.to_rgba8();
    let alpha: Vec<u8> = rgba.pixels().map(|p| p[3]).collect();
    let rgb = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        image::Rgb([p[0], p[1], p[2]])
    });
    let alpha = alpha.iter().any(|&a| a != u8::MAX).then_some(alpha);
    (rgb, alpha)
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path, config: &EnhanceConfig) -> Result<PreparedImage, BackendError> {
        let img = load_image(path)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BackendError::Empty(path.display().to_string()));
        }
        let (mut rgb, alpha) = split_planes(img);
        enhance(&mut rgb, config);
        Ok(PreparedImage {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
            alpha,
        })
    }
}
