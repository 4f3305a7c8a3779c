//! TrueType fonts loaded from disk.
//!
//! The whole font file is embedded as a CID-keyed Type 0 font with
//! Identity-H encoding, so shown strings are big-endian glyph ids. Metrics
//! and the Unicode cmap are read once with `ttf-parser` when the font loads.

use super::FontError;
use std::collections::HashMap;
use std::path::Path;
use ttf_parser::{Face, GlyphId};

/// A parsed TrueType font plus the raw bytes to embed.
#[derive(Debug)]
pub struct TrueTypeFont {
    pub name: String,
    pub data: Vec<u8>,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    /// `[x_min, y_min, x_max, y_max]` in font units.
    pub bbox: [i16; 4],
    pub italic_angle: f32,
    /// Horizontal advance per glyph id, in font units.
    pub advances: Vec<u16>,
    cmap: HashMap<char, u16>,
}

impl TrueTypeFont {
    pub fn from_file(name: &str, path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(name, data)
    }

    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self, FontError> {
        let face = Face::parse(&data, 0).map_err(|e| FontError::Parse {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let advances = (0..face.number_of_glyphs())
            .map(|id| face.glyph_hor_advance(GlyphId(id)).unwrap_or(0))
            .collect();

        let mut cmap = HashMap::new();
        if let Some(table) = face.tables().cmap {
            for subtable in table.subtables.into_iter().filter(|s| s.is_unicode()) {
                subtable.codepoints(|cp| {
                    if let (Some(c), Some(gid)) = (char::from_u32(cp), subtable.glyph_index(cp)) {
                        cmap.entry(c).or_insert(gid.0);
                    }
                });
            }
        }

        let bb = face.global_bounding_box();
        let ascender = face.ascender();
        Ok(Self {
            name: name.to_string(),
            units_per_em: face.units_per_em(),
            ascender,
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or(ascender),
            bbox: [bb.x_min, bb.y_min, bb.x_max, bb.y_max],
            italic_angle: face.italic_angle(),
            advances,
            cmap,
            data,
        })
    }

    /// Glyph for `c`; `.notdef` (0) when the font lacks it.
    pub fn glyph_id(&self, c: char) -> u16 {
        self.cmap.get(&c).copied().unwrap_or(0)
    }

    /// Convert font units into 1/1000 em, the unit PDF glyph metrics use.
    pub fn to_pdf_units(&self, value: f32) -> f32 {
        value * 1000.0 / self.units_per_em as f32
    }

    pub fn advance(&self, gid: u16) -> u16 {
        self.advances.get(gid as usize).copied().unwrap_or(0)
    }

    /// Rendered width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| self.advance(self.glyph_id(c)) as u32)
            .sum();
        units as f32 * size / self.units_per_em as f32
    }

    /// Identity-H string bytes: two bytes per glyph id, big-endian.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|c| self.glyph_id(c).to_be_bytes())
            .collect()
    }

    /// Advance widths for every glyph, in 1/1000 em.
    pub fn pdf_widths(&self) -> Vec<f32> {
        self.advances
            .iter()
            .map(|&a| self.to_pdf_units(a as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let result = TrueTypeFont::from_bytes("Broken", b"not a font at all".to_vec());
        match result {
            Err(FontError::Parse { name, .. }) => assert_eq!(name, "Broken"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = TrueTypeFont::from_file("Nope", &tmp.path().join("Nope.ttf"));
        assert!(matches!(result, Err(FontError::Io(_))));
    }
}
