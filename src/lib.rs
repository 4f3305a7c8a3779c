//! # Card Sheet
//!
//! Turns a folder of character images into a print-ready PDF of cards for
//! "guess who" style games. Every image becomes one card: the picture on the
//! front with a name label underneath, a decorative back on the following
//! page, mirrored so duplex printing lines each back up behind its front.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      images/   →  Vec<CardItem>   (files → sorted, named cards)
//! 2. Layout    config    →  GridGeometry    (pure page/cell arithmetic)
//! 3. Render    cards     →  cards.pdf       (fronts, backs, crop marks)
//! ```
//!
//! Scanning and layout are pure functions over their inputs, so most of the
//! interesting logic is unit tested without touching a PDF. Rendering goes
//! through two seams: [`imaging::ImageBackend`] for decoding pictures and
//! [`fonts::FontResolver`] for label fonts, both of which have in-memory
//! implementations for tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading over stock defaults, validation, unit conversion |
//! | [`scan`] | Collects image files, applies the card cap |
//! | [`naming`] | Filename → display name (`anna_smith.png` → "Anna Smith") |
//! | [`layout`] | Grid geometry, mirrored back cells, duplex offset, pagination |
//! | [`imaging`] | Decode, optional enhancement, fit-to-box placement |
//! | [`fonts`] | Standard PDF fonts plus cached or downloaded TrueType fonts |
//! | [`pdf`] | Thin drawing canvas over `pdf-writer` |
//! | [`render`] | Card fronts, card backs, crop marks |
//! | [`document`] | Sets × sheets × faces, progress events, writing the file |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Backs Are Mirrored, Not Rotated
//!
//! With long-edge duplex the back of column `c` lands behind column
//! `cols - 1 - c`. Rows stay in place. Printers rarely register both sides
//! perfectly, so `duplex.offset_x` / `duplex.offset_y` shift every back cell
//! by a measured correction.
//!
//! ## Broken Images Never Abort
//!
//! An image that fails to decode is drawn as a gray placeholder card and
//! reported; the rest of the deck still prints. Fonts are different: a label
//! font that cannot be resolved is a hard error, because every card would
//! come out wrong.
//!
//! ## One File Per Run
//!
//! The document is rendered fully in memory and written once at the end. A
//! failed run leaves no half-written PDF behind.

pub mod config;
pub mod document;
pub mod fonts;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod output;
pub mod pdf;
pub mod render;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
