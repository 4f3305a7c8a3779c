//! Drawing cards onto a [`Canvas`](crate::pdf::Canvas).
//!
//! - [`card`]: fronts (image, label, border)
//! - [`back`]: decorative backs
//! - [`marks`]: crop marks shared by both faces

pub mod back;
pub mod card;
pub mod marks;

pub use back::{GLYPH_SCATTER, draw_back};
pub use card::{CardFonts, draw_front, truncate_to_width};
pub use marks::draw_crop_marks;
