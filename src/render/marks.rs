//! Crop marks: short cutting guides outside each card corner.
//!
//! Each corner gets a horizontal segment on the card's horizontal edge line
//! and a vertical one on its vertical edge line, both starting `offset` away
//! from the corner and pointing outward.

use crate::config::{CropMarksConfig, points};
use crate::layout::Rect;
use crate::pdf::Canvas;

pub type Segment = ((f32, f32), (f32, f32));

/// The eight mark segments for `card`, in points.
pub fn crop_mark_segments(card: Rect, offset: f32, length: f32) -> [Segment; 8] {
    // (corner x, corner y, outward x direction, outward y direction)
    let corners = [
        (card.x, card.top(), -1.0, 1.0),
        (card.right(), card.top(), 1.0, 1.0),
        (card.x, card.y, -1.0, -1.0),
        (card.right(), card.y, 1.0, -1.0),
    ];
    let mut segments = [((0.0, 0.0), (0.0, 0.0)); 8];
    for (i, (cx, cy, dx, dy)) in corners.into_iter().enumerate() {
        segments[2 * i] = ((cx + dx * offset, cy), (cx + dx * (offset + length), cy));
        segments[2 * i + 1] = ((cx, cy + dy * offset), (cx, cy + dy * (offset + length)));
    }
    segments
}

pub fn draw_crop_marks(canvas: &mut Canvas, card: Rect, config: &CropMarksConfig) {
    if !config.enabled {
        return;
    }
    let offset = points(config.offset);
    let length = points(config.length);
    for (from, to) in crop_mark_segments(card, offset, length) {
        canvas.line(from, to, config.color, config.width);
    }
}
