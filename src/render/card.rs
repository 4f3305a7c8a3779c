//! Card fronts.
//!
//! Drawing order: background, image (or the error placeholder), name label,
//! border, crop marks. Where the image goes and how the label is painted
//! depends on [`CardLayout`]:
//!
//! | Layout | Image area | Fit | Label |
//! |---|---|---|---|
//! | `full-bleed` | whole card | cover | outlined, on top of the image |
//! | `label-band` | inset by `image.padding`, above a `name_label.height` strip | height | plain |

use super::marks::draw_crop_marks;
use crate::config::{CardConfig, CardLayout, Rgb, points};
use crate::imaging::{Fit, fit_image};
use crate::layout::Rect;
use crate::pdf::{Canvas, FontId, ImageId, TextPaint};

const PLACEHOLDER_FILL: Rgb = Rgb([0.3, 0.3, 0.3]);
const PLACEHOLDER_TEXT: &str = "Image Error";
const PLACEHOLDER_FONT_SIZE: f32 = 6.0;

/// Fonts a card front needs, registered on the canvas up front.
#[derive(Debug, Clone, Copy)]
pub struct CardFonts {
    pub label: FontId,
    /// Standard Helvetica, for the image error placeholder.
    pub placeholder: FontId,
}

/// The rectangle the image is drawn in and how it is fitted there.
pub fn image_area(card: Rect, config: &CardConfig) -> (Rect, Fit) {
    match config.card.layout {
        CardLayout::FullBleed => (card, Fit::Cover),
        CardLayout::LabelBand => {
            let pad = points(config.image.padding);
            let band = points(config.name_label.height);
            let area = Rect::new(
                card.x + pad,
                card.y + band,
                card.width - 2.0 * pad,
                card.height - pad - band,
            );
            (area, Fit::Height)
        }
    }
}

/// Drop characters from the end of `text` until `measure` says it fits in
/// `max_width` or only one character is left.
pub fn truncate_to_width(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> &str {
    let mut current = text;
    while measure(current) > max_width && current.chars().count() > 1 {
        let last = current.char_indices().last().map_or(0, |(i, _)| i);
        current = &current[..last];
    }
    current
}

/// Draw one card front. `image` is `None` when the image failed to load.
pub fn draw_front(
    canvas: &mut Canvas,
    fonts: CardFonts,
    config: &CardConfig,
    card: Rect,
    image: Option<ImageId>,
    name: &str,
) {
    canvas.fill_rect(card, config.card.background_color);

    let (area, fit) = image_area(card, config);
    if area.width > 0.0 && area.height > 0.0 {
        match image {
            Some(image) => {
                let target = fit_image(fit, image.dimensions(), area);
                canvas.clipped(area, |canvas| canvas.draw_image(image, target));
            }
            None => draw_placeholder(canvas, fonts.placeholder, area),
        }
    }

    draw_label(canvas, fonts.label, config, card, name);

    if config.border.width > 0.0 {
        canvas.stroke_rect(card, config.border.color, config.border.width);
    }

    draw_crop_marks(canvas, card, &config.crop_marks);
}

fn draw_placeholder(canvas: &mut Canvas, font: FontId, area: Rect) {
    canvas.fill_rect(area, PLACEHOLDER_FILL);
    let width = canvas.font(font).text_width(PLACEHOLDER_TEXT, PLACEHOLDER_FONT_SIZE);
    canvas.text(
        font,
        PLACEHOLDER_FONT_SIZE,
        area.center_x() - width / 2.0,
        area.center_y(),
        PLACEHOLDER_TEXT,
        TextPaint::Fill(Rgb::WHITE),
    );
}

fn draw_label(canvas: &mut Canvas, font: FontId, config: &CardConfig, card: Rect, name: &str) {
    let label = &config.name_label;
    let size = label.font_size;
    let max_width = card.width - 2.0 * points(config.image.padding);

    let resolved = canvas.font(font);
    let text = truncate_to_width(name, max_width, |s| resolved.text_width(s, size));
    let width = resolved.text_width(text, size);
    let x = card.center_x() - width / 2.0;
    let y = card.y + points(label.bottom_padding) + size / 3.0;

    let outlined = config.card.layout == CardLayout::FullBleed && label.outline_width > 0.0;
    if outlined {
        let paint = TextPaint::Stroke {
            color: label.outline_color,
            width: label.outline_width,
        };
        canvas.text(font, size, x, y, text, paint);
    }
    canvas.text(font, size, x, y, text, TextPaint::Fill(label.color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{Font, StandardFont};
    use crate::imaging::PreparedImage;

    /// Every character is 10 units wide.
    fn fixed(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    // =========================================================================
    // truncate_to_width tests
    // =========================================================================

    #[test]
    fn fitting_text_is_untouched() {
        assert_eq!(truncate_to_width("Anna", 40.0, fixed), "Anna");
    }

    #[test]
    fn long_text_is_cut_until_it_fits() {
        assert_eq!(truncate_to_width("Alexandra", 45.0, fixed), "Alex");
    }

    #[test]
    fn truncation_stops_at_one_character() {
        assert_eq!(truncate_to_width("Bartholomew", 1.0, fixed), "B");
        assert_eq!(truncate_to_width("Q", 1.0, fixed), "Q");
    }

    #[test]
    fn truncation_never_widens() {
        for max in [0.0, 5.0, 33.0, 80.0, 500.0] {
            let text = "Maximilian Fortescue";
            let cut = truncate_to_width(text, max, fixed);
            assert!(fixed(cut) <= fixed(text));
            assert!(fixed(cut) <= max || cut.chars().count() == 1);
            assert!(text.starts_with(cut));
        }
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_to_width("Zoë Åberg", 30.0, fixed), "Zoë");
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(truncate_to_width("", 0.0, fixed), "");
    }

    // =========================================================================
    // image_area tests
    // =========================================================================

    fn card() -> Rect {
        Rect::new(100.0, 200.0, 90.0, 99.0)
    }

    #[test]
    fn full_bleed_uses_whole_card() {
        let config = CardConfig::default();
        assert_eq!(image_area(card(), &config), (card(), Fit::Cover));
    }

    #[test]
    fn label_band_reserves_strip_and_padding() {
        let mut config = CardConfig::default();
        config.card.layout = CardLayout::LabelBand;
        config.image.padding = 0.05;
        config.name_label.height = 0.25;

        let (area, fit) = image_area(card(), &config);
        assert_eq!(fit, Fit::Height);
        assert!((area.x - 103.6).abs() < 1e-4);
        assert!((area.y - 218.0).abs() < 1e-4);
        assert!((area.width - 82.8).abs() < 1e-4);
        assert!((area.top() - (card().top() - 3.6)).abs() < 1e-4);
    }

    // =========================================================================
    // draw_front tests
    // =========================================================================

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    fn render(config: &CardConfig, with_image: bool, name: &str) -> Vec<u8> {
        let mut canvas = Canvas::new(612.0, 792.0);
        let fonts = CardFonts {
            label: canvas.add_font(&Font::Standard(StandardFont::HelveticaBold)),
            placeholder: canvas.add_font(&Font::Standard(StandardFont::Helvetica)),
        };
        let image = with_image.then(|| {
            canvas.add_image(&PreparedImage {
                width: 4,
                height: 2,
                rgb: vec![0; 24],
                alpha: None,
            })
        });
        canvas.begin_page();
        draw_front(&mut canvas, fonts, config, card(), image, name);
        canvas.end_page();
        canvas.raw_page(0).to_vec()
    }

    #[test]
    fn full_bleed_label_is_outlined() {
        let ops = render(&CardConfig::default(), true, "Anna");
        assert!(contains(&ops, "/Im1 Do"));
        assert!(contains(&ops, "1 Tr"));
        assert!(contains(&ops, "(Anna) Tj"));
    }

    #[test]
    fn zero_outline_width_skips_outline() {
        let mut config = CardConfig::default();
        config.name_label.outline_width = 0.0;
        let ops = render(&config, true, "Anna");
        assert!(!contains(&ops, "1 Tr"));
    }

    #[test]
    fn label_band_label_is_plain() {
        let mut config = CardConfig::default();
        config.card.layout = CardLayout::LabelBand;
        let ops = render(&config, true, "Anna");
        assert!(!contains(&ops, "1 Tr"));
        assert!(contains(&ops, "(Anna) Tj"));
    }

    #[test]
    fn missing_image_draws_placeholder() {
        let ops = render(&CardConfig::default(), false, "Anna");
        assert!(!contains(&ops, "Do"));
        assert!(contains(&ops, "(Image Error) Tj"));
        assert!(contains(&ops, "(Anna) Tj"));
    }

    #[test]
    fn long_names_are_truncated_on_the_card() {
        let name = "Bartholomew Maximilian Fortescue-Smythe";
        let ops = render(&CardConfig::default(), true, name);
        assert!(!contains(&ops, name));
        assert!(contains(&ops, "(Bartholomew"));
    }

    #[test]
    fn border_only_when_width_positive() {
        let mut config = CardConfig::default();
        config.crop_marks.enabled = false;
        let plain = render(&config, true, "A");
        config.border.width = 1.0;
        let bordered = render(&config, true, "A");
        assert!(bordered.len() > plain.len());
    }
}
