//! PDF output.

pub mod canvas;

pub use canvas::{Canvas, FontId, ImageId, TextPaint};
