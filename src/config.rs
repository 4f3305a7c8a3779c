//! Card sheet configuration.
//!
//! Handles loading, validating, and merging `config.toml` files. Stock
//! defaults are an immutable [`CardConfig::default()`]; a user file is merged
//! on top of them key by key, so a config file only needs the values it wants
//! to change.
//!
//! ## Units
//!
//! All dimensions are in inches and are converted to PDF points with
//! [`points`] right before drawing. Font sizes and stroke widths are already
//! in points. Colors are `[r, g, b]` triples in the `0.0..=1.0` range.
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only switch to the reserved label band and a single set
//! [card]
//! layout = "label-band"
//!
//! [game]
//! sets = 1
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert a configured length in inches into PDF points.
pub fn points(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Normalized RGB color, each component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);

    pub fn r(self) -> f32 {
        self.0[0]
    }

    pub fn g(self) -> f32 {
        self.0[1]
    }

    pub fn b(self) -> f32 {
        self.0[2]
    }

    fn is_normalized(self) -> bool {
        self.0.iter().all(|c| (0.0..=1.0).contains(c))
    }
}

/// Full configuration for one card sheet run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    pub page: PageConfig,
    pub card: CardGridConfig,
    pub image: ImageConfig,
    pub name_label: LabelConfig,
    pub border: BorderConfig,
    pub crop_marks: CropMarksConfig,
    pub game: GameConfig,
    pub duplex: DuplexConfig,
    pub card_back: CardBackConfig,
    pub image_enhance: EnhanceConfig,
    pub fonts: FontsConfig,
    pub document: DocumentConfig,
    /// File extensions picked up by the directory scan (case-insensitive,
    /// leading dot optional).
    pub image_extensions: Vec<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            card: CardGridConfig::default(),
            image: ImageConfig::default(),
            name_label: LabelConfig::default(),
            border: BorderConfig::default(),
            crop_marks: CropMarksConfig::default(),
            game: GameConfig::default(),
            duplex: DuplexConfig::default(),
            card_back: CardBackConfig::default(),
            image_enhance: EnhanceConfig::default(),
            fonts: FontsConfig::default(),
            document: DocumentConfig::default(),
            image_extensions: ["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// A card grid larger than the area inside the page margins (inches).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOverflow {
    pub grid: (f32, f32),
    pub available: (f32, f32),
}

/// Paper size and printable margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 8.5,
            height: 11.0,
            margin_x: 0.5,
            margin_y: 0.5,
        }
    }
}

/// How the image and the name label share the card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardLayout {
    /// Image covers the whole card; the label is outlined on top of it.
    #[default]
    FullBleed,
    /// Image fills a band above a reserved label strip; plain label.
    LabelBand,
}

/// Card size and grid arrangement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardGridConfig {
    pub width: f32,
    pub height: f32,
    pub columns: u32,
    pub rows: u32,
    /// Spacing around each card inside its grid cell.
    pub padding: f32,
    pub background_color: Rgb,
    pub layout: CardLayout,
}

impl Default for CardGridConfig {
    fn default() -> Self {
        Self {
            width: 1.25,
            height: 1.375,
            columns: 5,
            rows: 5,
            padding: 0.125,
            background_color: Rgb::WHITE,
            layout: CardLayout::FullBleed,
        }
    }
}

impl CardGridConfig {
    pub fn cards_per_page(&self) -> usize {
        (self.columns * self.rows) as usize
    }
}

/// Image area settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Inset of the image area from the card edges (label-band layout) and of
    /// the label from the card sides (both layouts).
    pub padding: f32,
}

/// Name label settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelConfig {
    /// Height of the reserved label strip in the label-band layout.
    pub height: f32,
    pub font: String,
    /// Points.
    pub font_size: f32,
    pub color: Rgb,
    pub outline_color: Rgb,
    /// Points; 0 disables the outline pass.
    pub outline_width: f32,
    /// Gap between the card bottom and the text baseline.
    pub bottom_padding: f32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            height: 0.28,
            font: "Helvetica-Bold".to_string(),
            font_size: 12.0,
            color: Rgb::BLACK,
            outline_color: Rgb::WHITE,
            outline_width: 2.0,
            bottom_padding: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderConfig {
    pub color: Rgb,
    /// Points; 0 disables the border.
    pub width: f32,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            width: 0.0,
        }
    }
}

/// Cutting guides drawn outside each card corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropMarksConfig {
    pub enabled: bool,
    pub length: f32,
    /// Gap between the card edge and the start of the mark.
    pub offset: f32,
    pub color: Rgb,
    /// Points.
    pub width: f32,
}

impl Default for CropMarksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            length: 0.15,
            offset: 0.04,
            color: Rgb([0.4, 0.4, 0.4]),
            width: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of characters per set; extra images are dropped. 0 = no cap.
    pub max_cards: usize,
    /// Number of identical sets, each with its own back color.
    pub sets: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_cards: 24,
            sets: 2,
        }
    }
}

/// Back-page shift compensating printer front/back misregistration.
///
/// Positive x moves backs to the right, positive y moves them up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DuplexConfig {
    pub back_offset_x: f32,
    pub back_offset_y: f32,
}

/// Stock back colors: blue for the first set, red for the second.
const DEFAULT_SET_COLORS: [Rgb; 2] = [Rgb([0.18, 0.38, 0.72]), Rgb([0.72, 0.18, 0.18])];

/// Decorative card backs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardBackConfig {
    pub enabled: bool,
    /// One color per set; sets beyond the list wrap around.
    pub set_colors: Vec<Rgb>,
    pub frame_color: Rgb,
    /// Points.
    pub frame_width: f32,
    /// Inset of the frame from the card edge.
    pub frame_margin: f32,
    /// Text scattered over the back; drawn with the label font.
    pub glyph: String,
    pub glyph_color: Rgb,
    pub glyph_alpha: f32,
}

impl Default for CardBackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            set_colors: DEFAULT_SET_COLORS.to_vec(),
            frame_color: Rgb::WHITE,
            frame_width: 1.5,
            frame_margin: 0.07,
            glyph: "?".to_string(),
            glyph_color: Rgb::WHITE,
            glyph_alpha: 0.30,
        }
    }
}

impl CardBackConfig {
    /// Back color for a zero-based set index. An empty list falls back to
    /// the stock colors.
    pub fn color_for_set(&self, set: usize) -> Rgb {
        let colors = if self.set_colors.is_empty() {
            &DEFAULT_SET_COLORS[..]
        } else {
            &self.set_colors[..]
        };
        colors[set % colors.len()]
    }
}

/// Pre-processing applied to every card image. Factors of 1.0 are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnhanceConfig {
    pub enabled: bool,
    pub auto_contrast: bool,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub sharpness: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_contrast: true,
            saturation: 1.3,
            contrast: 1.1,
            brightness: 1.0,
            sharpness: 1.0,
        }
    }
}

/// Where non-standard fonts come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Directory holding `<FontName>.ttf` files; downloads are cached here.
    pub cache_dir: String,
    /// Download missing fonts from Google Fonts.
    pub fetch: bool,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            cache_dir: "fonts".to_string(),
            fetch: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    /// Title stored in the PDF document info.
    pub title: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "Guess Who - Custom Cards".to_string(),
        }
    }
}

impl CardConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("page.width", self.page.width),
            ("page.height", self.page.height),
            ("card.width", self.card.width),
            ("card.height", self.card.height),
            ("name_label.font_size", self.name_label.font_size),
        ];
        for (key, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::Validation(format!("{key} must be positive")));
            }
        }
        let non_negative = [
            ("page.margin_x", self.page.margin_x),
            ("page.margin_y", self.page.margin_y),
            ("card.padding", self.card.padding),
            ("image.padding", self.image.padding),
            ("name_label.height", self.name_label.height),
            ("name_label.outline_width", self.name_label.outline_width),
            ("border.width", self.border.width),
            ("crop_marks.length", self.crop_marks.length),
            ("crop_marks.offset", self.crop_marks.offset),
            ("crop_marks.width", self.crop_marks.width),
            ("card_back.frame_width", self.card_back.frame_width),
            ("card_back.frame_margin", self.card_back.frame_margin),
        ];
        for (key, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{key} must not be negative"
                )));
            }
        }
        if self.card.columns == 0 || self.card.rows == 0 {
            return Err(ConfigError::Validation(
                "card.columns and card.rows must be at least 1".into(),
            ));
        }
        if self.game.sets == 0 {
            return Err(ConfigError::Validation("game.sets must be at least 1".into()));
        }
        if self.name_label.font.trim().is_empty() {
            return Err(ConfigError::Validation(
                "name_label.font must not be empty".into(),
            ));
        }
        if self.image_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "image_extensions must not be empty".into(),
            ));
        }
        if self.card_back.enabled && self.card_back.set_colors.is_empty() {
            return Err(ConfigError::Validation(
                "card_back.set_colors must not be empty when card backs are enabled".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.card_back.glyph_alpha) {
            return Err(ConfigError::Validation(
                "card_back.glyph_alpha must be 0.0-1.0".into(),
            ));
        }
        let enhance = &self.image_enhance;
        for (key, value) in [
            ("image_enhance.saturation", enhance.saturation),
            ("image_enhance.contrast", enhance.contrast),
            ("image_enhance.brightness", enhance.brightness),
            ("image_enhance.sharpness", enhance.sharpness),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{key} must not be negative"
                )));
            }
        }
        if self.card.layout == CardLayout::LabelBand {
            let image_w = self.card.width - 2.0 * self.image.padding;
            let image_h = self.card.height - self.image.padding - self.name_label.height;
            if image_w <= 0.0 || image_h <= 0.0 {
                return Err(ConfigError::Validation(
                    "image.padding and name_label.height leave no room for the image".into(),
                ));
            }
        }
        self.validate_colors()
    }

    fn validate_colors(&self) -> Result<(), ConfigError> {
        let mut colors = vec![
            ("card.background_color", self.card.background_color),
            ("name_label.color", self.name_label.color),
            ("name_label.outline_color", self.name_label.outline_color),
            ("border.color", self.border.color),
            ("crop_marks.color", self.crop_marks.color),
            ("card_back.frame_color", self.card_back.frame_color),
            ("card_back.glyph_color", self.card_back.glyph_color),
        ];
        colors.extend(
            self.card_back
                .set_colors
                .iter()
                .map(|c| ("card_back.set_colors", *c)),
        );
        match colors.into_iter().find(|(_, c)| !c.is_normalized()) {
            Some((key, _)) => Err(ConfigError::Validation(format!(
                "{key} components must be 0.0-1.0"
            ))),
            None => Ok(()),
        }
    }

    /// Grid size against the space inside the page margins, when the grid is
    /// larger. The grid is still centered and drawn; this is only a warning.
    pub fn grid_overflow(&self) -> Option<GridOverflow> {
        const EPSILON: f32 = 1e-4;
        let grid = (
            self.card.columns as f32 * (self.card.width + 2.0 * self.card.padding),
            self.card.rows as f32 * (self.card.height + 2.0 * self.card.padding),
        );
        let available = (
            self.page.width - 2.0 * self.page.margin_x,
            self.page.height - 2.0 * self.page.margin_y,
        );
        if grid.0 > available.0 + EPSILON || grid.1 > available.1 + EPSILON {
            Some(GridOverflow { grid, available })
        } else {
            None
        }
    }

    /// Lowercased extensions without the leading dot.
    pub fn normalized_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self
            .image_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        exts
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CardConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Unlike an implicit lookup, an explicitly named file that does not exist
/// is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CardConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, overridden by `path` if given.
pub fn load_config(path: Option<&Path>) -> Result<CardConfig, ConfigError> {
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Card Sheet Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# All dimensions are in inches unless noted otherwise.
# Colors are [r, g, b] with each component from 0.0 to 1.0.
# Unknown keys will cause an error.

# Files picked up from the image directory (case-insensitive).
image_extensions = ["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"]

# ---------------------------------------------------------------------------
# Page setup (US Letter)
# ---------------------------------------------------------------------------
[page]
width = 8.5
height = 11.0
# The card grid is always centered; a grid wider or taller than the space
# inside these margins still renders, with a warning.
margin_x = 0.5
margin_y = 0.5

# ---------------------------------------------------------------------------
# Card dimensions and grid
# ---------------------------------------------------------------------------
[card]
width = 1.25
height = 1.375
columns = 5
rows = 5
padding = 0.125                     # spacing around each card in the grid
background_color = [1.0, 1.0, 1.0]
# "full-bleed": image covers the whole card, outlined label on top.
# "label-band": image fills a band above a reserved label strip.
layout = "full-bleed"

# ---------------------------------------------------------------------------
# Image area
# ---------------------------------------------------------------------------
[image]
padding = 0.0                       # inset of image (label-band) and label

# ---------------------------------------------------------------------------
# Name label
# ---------------------------------------------------------------------------
[name_label]
height = 0.28                       # reserved strip in the label-band layout
font = "Helvetica-Bold"             # standard PDF font or fonts/<name>.ttf
font_size = 12.0                    # points
color = [0.0, 0.0, 0.0]
outline_color = [1.0, 1.0, 1.0]     # outline around letters (full-bleed)
outline_width = 2.0                 # points (0 to disable)
bottom_padding = 0.15               # gap between card bottom and baseline

# ---------------------------------------------------------------------------
# Card border
# ---------------------------------------------------------------------------
[border]
color = [1.0, 1.0, 1.0]
width = 0.0                         # points (0 to disable)

# ---------------------------------------------------------------------------
# Crop marks (cutting guides)
# ---------------------------------------------------------------------------
[crop_marks]
enabled = true
length = 0.15
offset = 0.04                       # gap between card edge and mark
color = [0.4, 0.4, 0.4]
width = 0.5                         # points

# ---------------------------------------------------------------------------
# Game settings
# ---------------------------------------------------------------------------
[game]
max_cards = 24                      # characters per set (0 for no cap)
sets = 2                            # number of sets, each with its own back

# ---------------------------------------------------------------------------
# Duplex alignment
# ---------------------------------------------------------------------------
# Print one sheet, hold it against the light, measure how far the backs are
# off, and enter the opposite here. Positive x moves backs right, positive y
# moves them up.
[duplex]
back_offset_x = 0.0
back_offset_y = 0.0

# ---------------------------------------------------------------------------
# Card backs
# ---------------------------------------------------------------------------
[card_back]
enabled = true
set_colors = [
    [0.18, 0.38, 0.72],             # set 1: blue
    [0.72, 0.18, 0.18],             # set 2: red
]
frame_color = [1.0, 1.0, 1.0]
frame_width = 1.5                   # points
frame_margin = 0.07                 # from card edge to frame
glyph = "?"
glyph_color = [1.0, 1.0, 1.0]
glyph_alpha = 0.3                   # 0.0-1.0

# ---------------------------------------------------------------------------
# Image enhancement (1.0 = unchanged)
# ---------------------------------------------------------------------------
[image_enhance]
enabled = true
auto_contrast = true                # stretch each channel's tonal range
saturation = 1.3
contrast = 1.1
brightness = 1.0
sharpness = 1.0

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
cache_dir = "fonts"                 # <cache_dir>/<font>.ttf
fetch = true                        # download missing fonts from Google Fonts

# ---------------------------------------------------------------------------
# Output document
# ---------------------------------------------------------------------------
[document]
title = "Guess Who - Custom Cards"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, content: &str) -> PathBuf {
        let path = tmp.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = CardConfig::default();
        assert_eq!(config.page.width, 8.5);
        assert_eq!(config.card.columns, 5);
        assert_eq!(config.card.rows, 5);
        assert_eq!(config.card.layout, CardLayout::FullBleed);
        assert_eq!(config.name_label.font, "Helvetica-Bold");
        assert_eq!(config.game.sets, 2);
        assert_eq!(config.card_back.set_colors.len(), 2);
    }

    #[test]
    fn points_converts_inches() {
        assert_eq!(points(1.0), 72.0);
        assert_eq!(points(0.5), 36.0);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[card]
layout = "label-band"
"#;
        let config: CardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.card.layout, CardLayout::LabelBand);
        // Defaults preserved
        assert_eq!(config.card.width, 1.25);
        assert_eq!(config.game.max_cards, 24);
    }

    #[test]
    fn integer_dimensions_are_accepted() {
        let toml = r#"
[border]
width = 0

[page]
width = 8
"#;
        let config: CardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.border.width, 0.0);
        assert_eq!(config.page.width, 8.0);
    }

    #[test]
    fn color_for_set_wraps() {
        let back = CardBackConfig::default();
        assert_eq!(back.color_for_set(0), back.set_colors[0]);
        assert_eq!(back.color_for_set(1), back.set_colors[1]);
        assert_eq!(back.color_for_set(2), back.set_colors[0]);
    }

    #[test]
    fn color_for_set_without_colors_uses_stock() {
        let mut back = CardBackConfig::default();
        let stock = back.set_colors.clone();
        back.set_colors.clear();
        assert_eq!(back.color_for_set(0), stock[0]);
        assert_eq!(back.color_for_set(3), stock[1]);
    }

    #[test]
    fn normalized_extensions_strip_dots_and_case() {
        let config = CardConfig {
            image_extensions: vec![".PNG".into(), "jpg".into(), ".png".into(), " ".into()],
            ..CardConfig::default()
        };
        assert_eq!(config.normalized_extensions(), vec!["jpg", "png"]);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_without_file_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.card.width, 1.25);
        assert_eq!(config.card_back.glyph, "?");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[game]
sets = 1
max_cards = 0

[name_label]
font_size = 9.5
"#,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.game.sets, 1);
        assert_eq!(config.game.max_cards, 0);
        assert_eq!(config.name_label.font_size, 9.5);
        // Unspecified values should be defaults
        assert_eq!(config.name_label.font, "Helvetica-Bold");
    }

    #[test]
    fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "this is not valid toml [[[");
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            r#"
[card_back]
glyph_alpha = 1.5
"#,
        );
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"sets = 2"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"sets = 1"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("sets").unwrap().as_integer(), Some(1));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[card]
columns = 5
rows = 5
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[card]
rows = 4
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let card = merged.get("card").unwrap();
        assert_eq!(card.get("rows").unwrap().as_integer(), Some(4));
        assert_eq!(card.get("columns").unwrap().as_integer(), Some(5));
    }

    #[test]
    fn merge_toml_replaces_arrays_wholesale() {
        let base: toml::Value = toml::from_str(
            r#"
[card_back]
set_colors = [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[card_back]
set_colors = [[0.0, 0.0, 0.0]]
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let colors = merged
            .get("card_back")
            .unwrap()
            .get("set_colors")
            .unwrap()
            .as_array()
            .unwrap();
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn merge_toml_does_not_mutate_defaults() {
        let overlay: toml::Value = toml::from_str("[game]\nsets = 7").unwrap();
        let merged = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(merged.game.sets, 7);
        assert_eq!(CardConfig::default().game.sets, 2);
        assert_eq!(load_config(None).unwrap().game.sets, 2);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<CardConfig, _> = toml::from_str("[card]\ncolumnz = 4\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<CardConfig, _> = toml::from_str("[cards]\ncolumns = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_layout_rejected() {
        let result: Result<CardConfig, _> = toml::from_str("[card]\nlayout = \"tiled\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(CardConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_columns() {
        let mut config = CardConfig::default();
        config.card.columns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_sets() {
        let mut config = CardConfig::default();
        config.game.sets = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_color_out_of_range() {
        let mut config = CardConfig::default();
        config.border.color = Rgb([1.2, 0.0, 0.0]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("border.color"));
    }

    #[test]
    fn validate_empty_set_colors_only_matters_with_backs() {
        let mut config = CardConfig::default();
        config.card_back.set_colors.clear();
        assert!(config.validate().is_err());

        config.card_back.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_grid_is_valid_but_reported() {
        let mut config = CardConfig::default();
        assert_eq!(config.grid_overflow(), None);

        config.card.width = 1.5;
        assert!(config.validate().is_ok());
        let overflow = config.grid_overflow().unwrap();
        assert!((overflow.grid.0 - 8.75).abs() < 1e-4);
        assert!((overflow.available.0 - 7.5).abs() < 1e-4);
    }

    #[test]
    fn validate_label_band_needs_image_room() {
        let mut config = CardConfig::default();
        config.card.layout = CardLayout::LabelBand;
        config.name_label.height = config.card.height;
        assert!(config.validate().is_err());

        // Only the label-band layout reserves a strip.
        config.card.layout = CardLayout::FullBleed;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_negative_dimension() {
        let mut config = CardConfig::default();
        config.crop_marks.offset = -0.1;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let content = stock_config_toml();
        let _: toml::Value = toml::from_str(content).expect("stock config must be valid TOML");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: CardConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = CardConfig::default();
        assert_eq!(
            toml::Value::try_from(&parsed).unwrap(),
            toml::Value::try_from(&defaults).unwrap()
        );
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        for section in [
            "page",
            "card",
            "image",
            "name_label",
            "border",
            "crop_marks",
            "game",
            "duplex",
            "card_back",
            "image_enhance",
            "fonts",
            "document",
        ] {
            assert!(val.get(section).is_some(), "missing section {section}");
        }
    }
}
