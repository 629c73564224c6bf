//! Pointer hover tracking.

use crate::layout::{LayoutModel, Point};

/// Maps surface-local pointer positions to byte indices.
///
/// The hovered index is derived from the last pointer position and the scroll
/// offset at the time of the last update, so it may point past the end of the
/// byte sequence; consumers bound it against the byte count.
#[derive(Debug, Default)]
pub struct HoverTracker {
    pointer: Option<Point>,
    hovered: Option<usize>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently hovered byte index, unbounded.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Last pointer position over the surface.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Pointer moved (or entered) at `point` in surface-local pixels.
    ///
    /// Returns `true` if the hovered byte changed.
    pub fn pointer_moved(
        &mut self,
        point: Point,
        scroll_offset: f64,
        layout: Option<&LayoutModel>,
    ) -> bool {
        self.pointer = Some(point);
        self.refresh(scroll_offset, layout)
    }

    /// Pointer left the surface. Returns `true` if a byte was hovered.
    pub fn pointer_left(&mut self) -> bool {
        self.pointer = None;
        self.hovered.take().is_some()
    }

    /// Re-derive the hovered byte after scroll or layout changed under a
    /// stationary pointer.
    pub fn refresh(&mut self, scroll_offset: f64, layout: Option<&LayoutModel>) -> bool {
        let next = match (self.pointer, layout) {
            (Some(point), Some(layout)) => {
                layout.coordinate_to_byte(Point::new(point.x, point.y + scroll_offset))
            }
            _ => None,
        };
        if next == self.hovered {
            return false;
        }
        self.hovered = next;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::LayoutParams;

    fn layout() -> LayoutModel {
        LayoutModel::compute(400.0, &LayoutParams::new(5, 20))
    }

    #[test]
    fn test_move_maps_to_byte() {
        let layout = layout();
        let mut hover = HoverTracker::new();
        assert!(hover.pointer_moved(Point::new(85.0, 25.0), 0.0, Some(&layout)));
        assert_eq!(hover.hovered(), Some(12));
    }

    #[test]
    fn test_jitter_inside_a_cell_is_not_a_change() {
        let layout = layout();
        let mut hover = HoverTracker::new();
        hover.pointer_moved(Point::new(81.0, 21.0), 0.0, Some(&layout));
        assert!(!hover.pointer_moved(Point::new(119.0, 39.0), 0.0, Some(&layout)));
    }

    #[test]
    fn test_scroll_offset_is_added_to_y() {
        let layout = layout();
        let mut hover = HoverTracker::new();
        hover.pointer_moved(Point::new(0.0, 5.0), 40.0, Some(&layout));
        assert_eq!(hover.hovered(), Some(20));
    }

    #[test]
    fn test_leave_clears_hover() {
        let layout = layout();
        let mut hover = HoverTracker::new();
        hover.pointer_moved(Point::new(0.0, 0.0), 0.0, Some(&layout));
        assert_eq!(hover.pointer(), Some(Point::new(0.0, 0.0)));
        assert!(hover.pointer_left());
        assert_eq!(hover.hovered(), None);
        assert_eq!(hover.pointer(), None);
        assert!(!hover.pointer_left());
    }

    #[test]
    fn test_no_layout_means_no_hover() {
        let mut hover = HoverTracker::new();
        assert!(!hover.pointer_moved(Point::new(10.0, 10.0), 0.0, None));
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn test_refresh_follows_scroll() {
        let layout = layout();
        let mut hover = HoverTracker::new();
        hover.pointer_moved(Point::new(0.0, 0.0), 0.0, Some(&layout));
        assert!(hover.refresh(20.0, Some(&layout)));
        assert_eq!(hover.hovered(), Some(10));
    }
}
