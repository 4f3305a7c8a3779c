//! Image loading and fitting, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with content sniffing |
//! | **Enhance** | auto-contrast plus saturation/contrast/brightness/sharpness blends |
//! | **Fit** | cover (full-bleed) or height (label band) placement math |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Enhance**: Pixel adjustments on `RgbImage`
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod calculations;
pub mod enhance;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, PreparedImage};
pub use calculations::{Fit, cover_fill, fit_image, height_fill};
pub use rust_backend::RustBackend;
