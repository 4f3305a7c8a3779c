//! Font resolution.
//!
//! A label font name is resolved to a [`Font`] through the [`FontResolver`]
//! trait, injected into the document assembler:
//!
//! | Resolver | Standard PDF fonts | Other names |
//! |---|---|---|
//! | [`LocalFontCache`] | used directly | `<cache_dir>/<name>.ttf`, error if absent |
//! | [`FetchingFontCache`] | used directly | local file, else download from Google Fonts into the cache |
//!
//! Downloads are a single attempt with a 15 second timeout. The family name
//! is derived from the font name: `BodoniModa-Bold` → `Bodoni Moda`.

pub mod standard;
pub mod truetype;

pub use standard::StandardFont;
pub use truetype::TrueTypeFont;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Font '{name}' could not be parsed: {reason}")]
    Parse { name: String, reason: String },
    #[error("Font '{name}' not found: expected '{}'", .path.display())]
    Missing { name: String, path: PathBuf },
    #[error(
        "Could not download font '{name}': {reason}. Manually place the font file at '{}'",
        .path.display()
    )]
    Download {
        name: String,
        path: PathBuf,
        reason: String,
    },
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A resolved font, ready for measuring and embedding.
#[derive(Debug, Clone)]
pub enum Font {
    Standard(StandardFont),
    TrueType(Arc<TrueTypeFont>),
}

impl Font {
    pub fn name(&self) -> &str {
        match self {
            Font::Standard(f) => f.base_font(),
            Font::TrueType(f) => &f.name,
        }
    }

    /// Rendered width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            Font::Standard(f) => f.text_width(text, size),
            Font::TrueType(f) => f.text_width(text, size),
        }
    }

    /// Bytes for a PDF string operand in this font's encoding.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Font::Standard(_) => standard::encode_win_ansi(text),
            Font::TrueType(f) => f.encode(text),
        }
    }
}

/// Maps a configured font name to a usable [`Font`].
pub trait FontResolver {
    fn resolve(&self, name: &str) -> Result<Font, FontError>;
}

// ============================================================================
// Local cache
// ============================================================================

/// Resolves fonts without touching the network.
pub struct LocalFontCache {
    dir: PathBuf,
}

impl LocalFontCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the TrueType file for `name` lives (or would be cached).
    pub fn font_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.ttf"))
    }

    fn load(&self, name: &str, path: &Path) -> Result<Font, FontError> {
        let font = TrueTypeFont::from_file(name, path)?;
        Ok(Font::TrueType(Arc::new(font)))
    }
}

impl FontResolver for LocalFontCache {
    fn resolve(&self, name: &str) -> Result<Font, FontError> {
        if let Some(font) = StandardFont::from_name(name) {
            return Ok(Font::Standard(font));
        }
        let path = self.font_path(name);
        if !path.is_file() {
            return Err(FontError::Missing {
                name: name.to_string(),
                path,
            });
        }
        self.load(name, &path)
    }
}

// ============================================================================
// Fetching cache
// ============================================================================

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2";
const GSTATIC_PREFIX: &str = "url(https://fonts.gstatic.com/";
/// Old user agents get TrueType URLs instead of WOFF2.
const LEGACY_USER_AGENT: &str = "Mozilla/4.0";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Local cache first, then a one-shot download from Google Fonts.
pub struct FetchingFontCache {
    local: LocalFontCache,
    client: reqwest::blocking::Client,
}

impl FetchingFontCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, FontError> {
        let local = LocalFontCache::new(dir);
        let client = reqwest::blocking::Client::builder()
            .user_agent(LEGACY_USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self { local, client })
    }

    fn download(&self, name: &str, path: &Path) -> Result<(), FontError> {
        let family = camel_to_words(name);
        let fail = |reason: String| FontError::Download {
            name: name.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        let css_url = reqwest::Url::parse_with_params(GOOGLE_FONTS_CSS, &[("family", &family)])
            .map_err(|e| fail(e.to_string()))?;
        let css = self
            .client
            .get(css_url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| fail(e.to_string()))?;
        let font_url = first_font_url(&css)
            .ok_or_else(|| fail(format!("no TTF URLs in Google Fonts response for '{family}'")))?;
        let bytes = self
            .client
            .get(font_url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| fail(e.to_string()))?;

        fs::create_dir_all(self.local.dir())?;
        fs::write(path, &bytes)?;
        Ok(())
    }
}

impl FontResolver for FetchingFontCache {
    fn resolve(&self, name: &str) -> Result<Font, FontError> {
        match self.local.resolve(name) {
            Err(FontError::Missing { path, .. }) => {
                self.download(name, &path)?;
                self.local.load(name, &path)
            }
            other => other,
        }
    }
}

/// Google Fonts family for a font file name: the style suffix after the first
/// `-` is dropped and CamelCase is split into words.
pub fn camel_to_words(name: &str) -> String {
    let base = name.split('-').next().unwrap_or(name);
    let mut out = String::with_capacity(base.len() + 4);
    let mut prev_lower = false;
    for c in base.chars() {
        if prev_lower && c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
        prev_lower = c.is_lowercase();
    }
    out
}

/// First `fonts.gstatic.com` URL in a Google Fonts CSS response.
fn first_font_url(css: &str) -> Option<&str> {
    let start = css.find(GSTATIC_PREFIX)? + "url(".len();
    let len = css[start..].find(')')?;
    Some(&css[start..start + len])
}
