//! Page grid layout.
//!
//! Pure arithmetic, in PDF points with the origin at the bottom-left of the
//! page. The grid of `columns x rows` cells is centered on the page; each cell
//! is the card plus `padding` on every side, and each card rectangle is
//! anchored by its bottom-left corner.
//!
//! ```text
//!  origin (top-left of grid)
//!  +--------+--------+--------+
//!  | (0,0)  | (0,1)  | (0,2)  |   row 0 is the top row
//!  +--------+--------+--------+
//!  | (1,0)  | (1,1)  | (1,2)  |
//!  +--------+--------+--------+
//! ```
//!
//! Back pages mirror the column (`cols - 1 - col`, same row) so that after a
//! long-edge duplex flip every back lands behind its front.

use crate::config::{CardConfig, points};

/// An axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink by `margin` on every side.
    pub fn inset(&self, margin: f32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Grid position of a card on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Which face of the sheet a page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Derived grid values, computed once per document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub padding: f32,
    pub columns: usize,
    pub rows: usize,
    /// Top-left corner of the grid.
    pub origin_x: f32,
    pub origin_y: f32,
}

impl GridGeometry {
    /// Build the geometry from raw point values.
    pub fn new(
        page: (f32, f32),
        card: (f32, f32),
        padding: f32,
        columns: usize,
        rows: usize,
    ) -> Self {
        let (page_width, page_height) = page;
        let (card_width, card_height) = card;
        let cell_w = card_width + 2.0 * padding;
        let cell_h = card_height + 2.0 * padding;
        let grid_width = columns as f32 * cell_w;
        let grid_height = rows as f32 * cell_h;
        Self {
            page_width,
            page_height,
            card_width,
            card_height,
            padding,
            columns,
            rows,
            origin_x: (page_width - grid_width) / 2.0,
            origin_y: page_height - (page_height - grid_height) / 2.0,
        }
    }

    /// Geometry for a configuration (inches converted to points).
    pub fn from_config(config: &CardConfig) -> Self {
        Self::new(
            (points(config.page.width), points(config.page.height)),
            (points(config.card.width), points(config.card.height)),
            points(config.card.padding),
            config.card.columns as usize,
            config.card.rows as usize,
        )
    }

    pub fn cell_width(&self) -> f32 {
        self.card_width + 2.0 * self.padding
    }

    pub fn cell_height(&self) -> f32 {
        self.card_height + 2.0 * self.padding
    }

    pub fn grid_width(&self) -> f32 {
        self.columns as f32 * self.cell_width()
    }

    pub fn grid_height(&self) -> f32 {
        self.rows as f32 * self.cell_height()
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Row-major cell of the `index`-th card on a page.
    pub fn cell(&self, index: usize) -> Cell {
        Cell {
            row: index / self.columns,
            col: index % self.columns,
        }
    }

    /// Cell holding the back of the card whose front is at `front`.
    pub fn mirrored(&self, front: Cell) -> Cell {
        Cell {
            row: front.row,
            col: self.columns - 1 - front.col,
        }
    }

    /// Card rectangle for a cell.
    pub fn card_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            self.origin_x + cell.col as f32 * self.cell_width() + self.padding,
            self.origin_y - (cell.row + 1) as f32 * self.cell_height() + self.padding,
            self.card_width,
            self.card_height,
        )
    }

    /// Front rectangle of the `index`-th card on a page.
    pub fn front_rect(&self, index: usize) -> Rect {
        self.card_rect(self.cell(index))
    }

    /// Back rectangle of the `index`-th card: mirrored column, then shifted
    /// by the duplex offset (points).
    pub fn back_rect(&self, index: usize, offset: (f32, f32)) -> Rect {
        self.card_rect(self.mirrored(self.cell(index)))
            .translate(offset.0, offset.1)
    }
}

/// Split items into consecutive pages of at most `per_page` entries.
///
/// Empty input produces no pages.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
    if per_page == 0 {
        return Vec::new();
    }
    items.chunks(per_page).collect()
}
