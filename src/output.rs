//! CLI output formatting for every stage.
//!
//! # Information-First Display
//!
//! Each card is shown by its positional index and display name, with the
//! source file as an indented `Source:` context line, so the listing reads as
//! the deck's inventory while still tracing back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Cards (24)
//! 001 Anna Smith
//!     Source: anna_smith.png
//! 002 Uncle Bob
//!     Source: uncle-bob.jpg
//! ```
//!
//! ## Layout plan
//!
//! ```text
//! Layout
//!     5 x 5 cards per sheet, 1.25in x 1.375in cards
//!     1 sheet per set, 2 sets, backs on
//!     4 pages
//! ```
//!
//! ## Render
//!
//! ```text
//! Set 1 of 2
//!     Sheet 1 front (24 cards)
//!     Sheet 1 back (24 cards)
//! ```
//!
//! Warnings (card-cap notes, oversized grid, placeholder images) go to stderr.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to the terminal. Format functions are
//! pure: no I/O, no side effects.

use crate::config::{CardConfig, GridOverflow};
use crate::document::{DocumentSummary, RenderEvent};
use crate::layout::Side;
use crate::scan::{CardCount, CardItem};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 card`, `2 cards`.
fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Front => "front",
        Side::Back => "back",
    }
}

// ============================================================================
// Scan output
// ============================================================================

/// Format the collected cards.
pub fn format_scan_output(items: &[CardItem]) -> Vec<String> {
    let mut lines = vec![format!("Cards ({})", items.len())];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.name));
        lines.push(format!("{}Source: {}", indent(1), item.filename()));
    }
    lines
}

pub fn print_scan_output(items: &[CardItem]) {
    for line in format_scan_output(items) {
        println!("{}", line);
    }
}

/// Note about the card cap, if the image count does not match it.
pub fn format_card_count(count: &CardCount) -> Option<String> {
    match *count {
        CardCount::Matches(_) => None,
        CardCount::Truncated { found, used } => Some(format!(
            "Note: found {found} images, using the first {used} (game.max_cards = {used})"
        )),
        CardCount::Short { found, expected } => Some(format!(
            "Note: found {found} images, fewer than game.max_cards = {expected}; using all {found}"
        )),
    }
}

pub fn print_card_count(count: &CardCount) {
    if let Some(note) = format_card_count(count) {
        eprintln!("{}", note);
    }
}

// ============================================================================
// Layout plan
// ============================================================================

/// Pages the document will have for `cards` cards.
pub fn planned_pages(cards: usize, config: &CardConfig) -> usize {
    let sheets = cards.div_ceil(config.card.cards_per_page().max(1));
    let faces = if config.card_back.enabled { 2 } else { 1 };
    sheets * config.game.sets * faces
}

/// Format the grid and page plan without rendering anything.
pub fn format_layout_plan(cards: usize, config: &CardConfig) -> Vec<String> {
    let sheets = cards.div_ceil(config.card.cards_per_page().max(1));
    let backs = if config.card_back.enabled {
        "backs on"
    } else {
        "backs off"
    };
    vec![
        "Layout".to_string(),
        format!(
            "{}{} x {} cards per sheet, {}in x {}in cards",
            indent(1),
            config.card.columns,
            config.card.rows,
            config.card.width,
            config.card.height
        ),
        format!(
            "{}{} per set, {}, {}",
            indent(1),
            plural(sheets, "sheet"),
            plural(config.game.sets, "set"),
            backs
        ),
        format!(
            "{}{}",
            indent(1),
            plural(planned_pages(cards, config), "page")
        ),
    ]
}

pub fn print_layout_plan(cards: usize, config: &CardConfig) {
    for line in format_layout_plan(cards, config) {
        println!("{}", line);
    }
}

/// Warning for a grid that spills past the page margins.
pub fn format_grid_overflow(overflow: &GridOverflow) -> String {
    format!(
        "Warning: card grid ({:.3}in x {:.3}in) is larger than the area inside the \
         page margins ({:.3}in x {:.3}in); it is centered on the page anyway",
        overflow.grid.0, overflow.grid.1, overflow.available.0, overflow.available.1
    )
}

pub fn print_grid_overflow(config: &CardConfig) {
    if let Some(overflow) = config.grid_overflow() {
        eprintln!("{}", format_grid_overflow(&overflow));
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Format a single render progress event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::SetStarted { set, sets } => {
            vec![format!("Set {} of {}", set + 1, sets)]
        }
        RenderEvent::PageRendered { page, cards } => vec![format!(
            "{}Sheet {} {} ({})",
            indent(1),
            page.sheet + 1,
            side_label(page.side),
            plural(*cards, "card")
        )],
        RenderEvent::ImageFallback { path, reason } => vec![format!(
            "Warning: Could not load image: {} ({})",
            path.display(),
            reason
        )],
    }
}

/// Print an event; fallbacks are warnings and go to stderr.
pub fn print_render_event(event: &RenderEvent) {
    let warning = matches!(event, RenderEvent::ImageFallback { .. });
    for line in format_render_event(event) {
        if warning {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Format the final document summary.
pub fn format_summary(summary: &DocumentSummary, output: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Wrote {} ({} x {}) \u{2192} {}",
        plural(summary.page_count(), "page"),
        plural(summary.cards, "card"),
        plural(summary.sets, "set"),
        output.display()
    )];
    if summary.fallbacks > 0 {
        lines.push(format!(
            "{}{} drawn with a placeholder image",
            indent(1),
            plural(summary.fallbacks, "card")
        ));
    }
    lines
}

pub fn print_summary(summary: &DocumentSummary, output: &Path) {
    for line in format_summary(summary, output) {
        println!("{}", line);
    }
}
