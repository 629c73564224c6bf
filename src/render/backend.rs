//! Drawing surface trait for pluggable render targets.
//!
//! The bit renderer only needs rectangles, so a surface is a small set of
//! fill/clear operations. Canvas 2D implements it in the browser; the
//! recording surface implements it for tests and native hosts.

use serde::Serialize;

use crate::layout::{LayoutModel, VisibleRange};

use super::colors::Palette;
use super::masks::BitMaskTable;

/// Trait for drawing surfaces.
///
/// Coordinates are logical pixels; implementations apply the device pixel
/// ratio themselves.
pub trait DrawSurface {
    /// Resize the surface to `width` x `height` logical pixels.
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Start a frame: reset transforms and fill the whole surface with
    /// `background`.
    fn begin_frame(&mut self, background: &str);

    /// Set the color used by subsequent [`fill_rect`](Self::fill_rect) calls.
    fn set_fill_color(&mut self, color: &str);

    /// Fill a rectangle with the current fill color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Clear a rectangle back to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Current logical width.
    fn width(&self) -> u32;

    /// Current logical height.
    fn height(&self) -> u32;
}

/// Everything the renderer reads for one frame.
pub struct RenderParams<'a> {
    pub bytes: &'a [u8],
    pub layout: &'a LayoutModel,
    /// Current committed scroll offset; drawing is relative to the viewport.
    pub scroll_offset: f64,
    pub masks: &'a BitMaskTable,
    pub palette: &'a Palette,
}

/// Per-frame draw statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameStats {
    /// Byte range drawn in the window pass
    pub range: VisibleRange,
    /// Number of bytes drawn in the window pass
    pub bytes_drawn: usize,
    /// Whether the hovered byte was redrawn with the highlight style
    pub highlighted: bool,
    /// True when nothing was drawn because no layout is established
    pub skipped: bool,
    /// Wall-clock draw time, when the host can measure it
    pub draw_ms: f64,
}
