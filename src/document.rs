//! Document assembly.
//!
//! Turns the scanned card items into the finished PDF:
//!
//! ```text
//! for set in 0..sets
//!     for sheet in pages of cols x rows items
//!         front page: card fronts in row-major cells
//!         back page:  card backs in mirrored cells, shifted by the duplex offset
//! ```
//!
//! Backs are skipped entirely when `card_back.enabled` is false. A short last
//! sheet leaves its remaining cells blank on both faces.
//!
//! Images are decoded once per file and reused across sets. A file that fails
//! to decode becomes a placeholder card and a [`RenderEvent::ImageFallback`];
//! it never aborts the document. Font resolution is the only fatal step once
//! rendering starts. The output file is written only after the whole
//! document rendered, so a failed run leaves no partial PDF behind.

use crate::config::{CardConfig, points};
use crate::fonts::{Font, FontError, FontResolver, StandardFont};
use crate::imaging::{ImageBackend, RustBackend};
use crate::layout::{GridGeometry, Side, paginate};
use crate::pdf::{Canvas, ImageId};
use crate::render::{CardFonts, draw_back, draw_front};
use crate::scan::CardItem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("No cards to render")]
    NoCards,
}

/// Progress reported while rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// A new set of cards is starting (zero-based `set`).
    SetStarted { set: usize, sets: usize },
    /// A page of fronts or backs is done.
    PageRendered { page: PageKind, cards: usize },
    /// An image could not be loaded; a placeholder was drawn instead.
    ImageFallback { path: PathBuf, reason: String },
}

/// What one emitted PDF page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageKind {
    pub set: usize,
    pub sheet: usize,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    /// Emitted pages in order.
    pub pages: Vec<PageKind>,
    /// Cards per set.
    pub cards: usize,
    pub sets: usize,
    /// Placeholder cards drawn, counted per set.
    pub fallbacks: usize,
}

impl DocumentSummary {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn sheets_per_set(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.set == 0 && p.side == Side::Front)
            .count()
    }
}

pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub summary: DocumentSummary,
}

/// Render and write the PDF using the `image` crate backend.
pub fn generate(
    items: &[CardItem],
    config: &CardConfig,
    output: &Path,
    fonts: &dyn FontResolver,
    events: Option<Sender<RenderEvent>>,
) -> Result<DocumentSummary, RenderError> {
    generate_with_backend(&RustBackend::new(), items, config, output, fonts, events)
}

/// Render and write the PDF with a specific image backend (allows testing
/// with a mock).
pub fn generate_with_backend(
    backend: &impl ImageBackend,
    items: &[CardItem],
    config: &CardConfig,
    output: &Path,
    fonts: &dyn FontResolver,
    events: Option<Sender<RenderEvent>>,
) -> Result<DocumentSummary, RenderError> {
    let document = render_document(backend, items, config, fonts, events)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &document.bytes)?;
    Ok(document.summary)
}

/// Render the whole document in memory.
pub fn render_document(
    backend: &impl ImageBackend,
    items: &[CardItem],
    config: &CardConfig,
    fonts: &dyn FontResolver,
    events: Option<Sender<RenderEvent>>,
) -> Result<RenderedDocument, RenderError> {
    if items.is_empty() {
        return Err(RenderError::NoCards);
    }

    let grid = GridGeometry::from_config(config);
    let mut canvas = Canvas::new(grid.page_width, grid.page_height);
    canvas.set_title(&config.document.title);

    let label_font = fonts.resolve(&config.name_label.font)?;
    let card_fonts = CardFonts {
        label: canvas.add_font(&label_font),
        placeholder: canvas.add_font(&Font::Standard(StandardFont::Helvetica)),
    };

    let emit = |event: RenderEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let offset = (
        points(config.duplex.back_offset_x),
        points(config.duplex.back_offset_y),
    );
    let sheets = paginate(items, grid.cards_per_page());
    let mut images: HashMap<&Path, Result<ImageId, String>> = HashMap::new();
    let mut pages = Vec::new();
    let mut fallbacks = 0;

    for set in 0..config.game.sets {
        emit(RenderEvent::SetStarted {
            set,
            sets: config.game.sets,
        });

        for (sheet, sheet_items) in sheets.iter().enumerate() {
            canvas.begin_page();
            for (index, item) in sheet_items.iter().enumerate() {
                let image = images
                    .entry(item.path.as_path())
                    .or_insert_with(|| {
                        backend
                            .load(&item.path, &config.image_enhance)
                            .map(|prepared| canvas.add_image(&prepared))
                            .map_err(|e| e.to_string())
                    })
                    .clone();
                let image = match image {
                    Ok(id) => Some(id),
                    Err(reason) => {
                        fallbacks += 1;
                        emit(RenderEvent::ImageFallback {
                            path: item.path.clone(),
                            reason,
                        });
                        None
                    }
                };
                let card = grid.front_rect(index);
                draw_front(&mut canvas, card_fonts, config, card, image, &item.name);
            }
            let page = PageKind {
                set,
                sheet,
                side: Side::Front,
            };
            pages.push(page);
            emit(RenderEvent::PageRendered {
                page,
                cards: sheet_items.len(),
            });

            if !config.card_back.enabled {
                continue;
            }
            canvas.begin_page();
            for index in 0..sheet_items.len() {
                let card = grid.back_rect(index, offset);
                draw_back(&mut canvas, card_fonts.label, config, card, set);
            }
            let page = PageKind {
                set,
                sheet,
                side: Side::Back,
            };
            pages.push(page);
            emit(RenderEvent::PageRendered {
                page,
                cards: sheet_items.len(),
            });
        }
    }

    Ok(RenderedDocument {
        bytes: canvas.finish(),
        summary: DocumentSummary {
            pages,
            cards: items.len(),
            sets: config.game.sets,
            fallbacks,
        },
    })
}
