//! Card backs.
//!
//! A back is a solid set color with a fixed scatter of rotated glyphs,
//! clipped to the card, an inset frame and the same crop marks as the front.
//! The scatter never changes, so every back in every run is identical apart
//! from the set color.

use super::marks::draw_crop_marks;
use crate::config::{CardConfig, points};
use crate::layout::Rect;
use crate::pdf::{Canvas, FontId};

/// One scattered glyph, positioned relative to the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// Fraction of the card width from its left edge.
    pub x_frac: f32,
    /// Fraction of the card height from its bottom edge.
    pub y_frac: f32,
    /// Counter-clockwise rotation in degrees.
    pub angle: f32,
    /// Points.
    pub size: f32,
}

const fn glyph(x_frac: f32, y_frac: f32, angle: f32, size: f32) -> GlyphPlacement {
    GlyphPlacement {
        x_frac,
        y_frac,
        angle,
        size,
    }
}

pub const GLYPH_SCATTER: [GlyphPlacement; 15] = [
    glyph(0.10, 0.90, 20.0, 16.0),
    glyph(0.42, 0.93, -8.0, 11.0),
    glyph(0.75, 0.85, 38.0, 14.0),
    glyph(0.05, 0.65, -30.0, 20.0),
    glyph(0.58, 0.70, 12.0, 13.0),
    glyph(0.88, 0.60, -22.0, 17.0),
    glyph(0.25, 0.50, 0.0, 22.0),
    glyph(0.72, 0.45, -40.0, 12.0),
    glyph(0.48, 0.50, 55.0, 10.0),
    glyph(0.15, 0.30, 28.0, 15.0),
    glyph(0.80, 0.28, -15.0, 19.0),
    glyph(0.38, 0.18, -50.0, 13.0),
    glyph(0.65, 0.10, 18.0, 16.0),
    glyph(0.90, 0.08, -28.0, 11.0),
    glyph(0.20, 0.08, 42.0, 14.0),
];

/// Draw the back of one card of zero-based `set`.
pub fn draw_back(canvas: &mut Canvas, font: FontId, config: &CardConfig, card: Rect, set: usize) {
    let back = &config.card_back;

    canvas.fill_rect(card, back.color_for_set(set));

    if !back.glyph.is_empty() {
        canvas.clipped(card, |canvas| {
            for g in GLYPH_SCATTER {
                let center = (
                    card.x + g.x_frac * card.width,
                    card.y + g.y_frac * card.height,
                );
                canvas.rotated_text(
                    font,
                    g.size,
                    center,
                    g.angle,
                    &back.glyph,
                    back.glyph_color,
                    back.glyph_alpha,
                );
            }
        });
    }

    if back.frame_width > 0.0 {
        let frame = card.inset(points(back.frame_margin));
        canvas.stroke_rect(frame, back.frame_color, back.frame_width);
    }

    draw_crop_marks(canvas, card, &config.crop_marks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{Font, StandardFont};

    #[test]
    fn scatter_stays_on_the_card() {
        for g in GLYPH_SCATTER {
            assert!((0.0..=1.0).contains(&g.x_frac));
            assert!((0.0..=1.0).contains(&g.y_frac));
            assert!(g.size > 0.0);
        }
    }

    #[test]
    fn scatter_is_fixed() {
        assert_eq!(GLYPH_SCATTER.len(), 15);
        assert_eq!(GLYPH_SCATTER[0], glyph(0.10, 0.90, 20.0, 16.0));
        assert_eq!(GLYPH_SCATTER[6], glyph(0.25, 0.50, 0.0, 22.0));
        assert_eq!(GLYPH_SCATTER[14], glyph(0.20, 0.08, 42.0, 14.0));
    }

    fn render_back(config: &CardConfig, set: usize) -> Vec<u8> {
        let mut canvas = Canvas::new(612.0, 792.0);
        let font = canvas.add_font(&Font::Standard(StandardFont::HelveticaBold));
        canvas.begin_page();
        draw_back(&mut canvas, font, config, Rect::new(50.0, 50.0, 90.0, 99.0), set);
        canvas.end_page();
        canvas.raw_page(0).to_vec()
    }

    fn count(haystack: &[u8], needle: &str) -> usize {
        haystack
            .windows(needle.len())
            .filter(|w| *w == needle.as_bytes())
            .count()
    }

    #[test]
    fn back_draws_every_glyph_once() {
        let ops = render_back(&CardConfig::default(), 0);
        assert_eq!(count(&ops, "(?) Tj"), 15);
    }

    #[test]
    fn backs_are_deterministic() {
        let config = CardConfig::default();
        assert_eq!(render_back(&config, 1), render_back(&config, 1));
    }

    #[test]
    fn set_color_differs_between_sets() {
        let config = CardConfig::default();
        assert_ne!(render_back(&config, 0), render_back(&config, 1));
        // Colors wrap around.
        assert_eq!(render_back(&config, 0), render_back(&config, 2));
    }

    #[test]
    fn empty_glyph_skips_scatter() {
        let mut config = CardConfig::default();
        config.card_back.glyph = String::new();
        let ops = render_back(&config, 0);
        assert_eq!(count(&ops, "Tj"), 0);
    }
}
