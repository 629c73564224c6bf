//! Layout recomputation on container width changes.

use crate::layout::{LayoutModel, LayoutParams};

/// Tracks the last measured container width and the layout derived from it.
#[derive(Debug, Default)]
pub struct ResizeController {
    container_width: f64,
    layout: Option<LayoutModel>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last width reported by the host.
    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Current layout; `None` while no byte column fits.
    pub fn layout(&self) -> Option<&LayoutModel> {
        self.layout.as_ref()
    }

    /// Width used by byte cells (a whole number of columns), 0 without layout.
    pub fn content_width(&self) -> u32 {
        self.layout.map_or(0, |l| l.content_width())
    }

    /// Handle a new container width. Returns `true` if the published layout
    /// changed and the surface needs a relayout and redraw.
    pub fn container_resized(&mut self, container_width: f64, params: &LayoutParams) -> bool {
        self.container_width = container_width;
        self.relayout(params)
    }

    /// Recompute against the last measured width, e.g. after params changed.
    ///
    /// Only a change in column count (or layout params) publishes a new
    /// layout; width changes inside the same column count return `false`
    /// and cause no redraw.
    pub fn relayout(&mut self, params: &LayoutParams) -> bool {
        let computed = LayoutModel::compute(self.container_width, params);
        let next = computed.is_established().then_some(computed);
        if next == self.layout {
            return false;
        }
        if next.is_none() {
            log::debug!(
                "container width {} fits no byte column of {}px; nothing will be drawn",
                self.container_width,
                params.byte_pixel_width()
            );
        }
        self.layout = next;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_has_no_layout() {
        let resize = ResizeController::new();
        assert!(resize.layout().is_none());
        assert_eq!(resize.content_width(), 0);
    }

    #[test]
    fn test_resize_publishes_layout() {
        let params = LayoutParams::new(5, 20);
        let mut resize = ResizeController::new();
        assert!(resize.container_resized(419.0, &params));
        assert_eq!(resize.layout().unwrap().bytes_per_row, 10);
        assert_eq!(resize.content_width(), 400);
        assert_eq!(resize.container_width(), 419.0);
    }

    #[test]
    fn test_same_column_count_is_not_a_change() {
        let params = LayoutParams::new(5, 20);
        let mut resize = ResizeController::new();
        resize.container_resized(400.0, &params);
        assert!(!resize.container_resized(410.0, &params));
        assert!(resize.container_resized(440.0, &params));
    }

    #[test]
    fn test_shrinking_below_one_byte_drops_layout() {
        let params = LayoutParams::new(5, 20);
        let mut resize = ResizeController::new();
        resize.container_resized(400.0, &params);
        assert!(resize.container_resized(30.0, &params));
        assert!(resize.layout().is_none());
        assert!(!resize.container_resized(20.0, &params));
    }

    #[test]
    fn test_relayout_after_params_change() {
        let mut resize = ResizeController::new();
        resize.container_resized(400.0, &LayoutParams::new(5, 20));
        assert!(resize.relayout(&LayoutParams::new(10, 20)));
        assert_eq!(resize.layout().unwrap().bytes_per_row, 5);
    }
}
