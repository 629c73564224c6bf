//! Visible byte range calculation.

use serde::Serialize;

use super::grid::{LayoutModel, Point};

/// Half-open range `[start, end)` of byte indices that must be drawn.
///
/// # Invariants
/// - `start <= end`
/// - `end <= byte_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VisibleRange {
    /// First byte to draw (inclusive)
    pub start: usize,
    /// One past the last byte to draw (exclusive)
    pub end: usize,
}

impl VisibleRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "visible range start after end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    /// Iterate over the byte indices in the range.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Compute the bytes intersecting the viewport.
///
/// Both bounds come from [`LayoutModel::coordinate_to_byte`], so scrolling and
/// drawing share one geometry. The end is looked up one row below the viewport
/// bottom so a partially visible trailing row is never skipped. With no
/// viewport height everything from `start` on is visible.
pub fn visible_range(
    scroll_offset: f64,
    viewport_height: Option<u32>,
    layout: &LayoutModel,
    byte_count: usize,
) -> VisibleRange {
    if !layout.is_established() {
        return VisibleRange::default();
    }
    let scroll_offset = scroll_offset.max(0.0);
    let start = layout
        .coordinate_to_byte(Point::new(0.0, scroll_offset))
        .unwrap_or(byte_count)
        .min(byte_count);
    let end = match viewport_height {
        None => byte_count,
        Some(height) => {
            let y = scroll_offset + f64::from(height) + f64::from(layout.bit_height);
            layout
                .coordinate_to_byte(Point::new(0.0, y))
                .unwrap_or(byte_count)
                .min(byte_count)
        }
    };
    VisibleRange::new(start, end.max(start))
}
