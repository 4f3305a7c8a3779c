//! Shared test utilities for the card-sheet test suite.
//!
//! Provides fixture writers (real encoded images, empty and corrupt files)
//! and small config builders so each module's tests can set up a scratch
//! image directory in a couple of lines.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_png(tmp.path(), "anna.png", 40, 60);
//! write_corrupt(tmp.path(), "broken.jpg");
//! ```

use crate::config::CardConfig;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture files
// =========================================================================

/// Create an empty file (enough for scan tests that never decode).
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"").unwrap();
    path
}

/// Write a small opaque gradient PNG.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    });
    img.save(&path).unwrap();
    path
}

/// Write a PNG whose left half is fully transparent.
pub fn write_transparent_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([200, 40, 40, alpha])
    });
    img.save(&path).unwrap();
    path
}

/// Write a file with an image extension but garbage contents.
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").unwrap();
    path
}

// =========================================================================
// Config builders
// =========================================================================

pub fn default_extensions() -> Vec<String> {
    CardConfig::default().normalized_extensions()
}

/// Defaults with the card cap removed and a single set.
pub fn single_set_config() -> CardConfig {
    let mut config = CardConfig::default();
    config.game.max_cards = 0;
    config.game.sets = 1;
    config
}
