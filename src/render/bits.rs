//! Bit-by-bit rendering of byte cells.
//!
//! A byte is drawn as eight bit cells, most significant bit on the left. The
//! default style only fills 1-bits (0-bits stay background). The highlight
//! style fills every cell, with distinct colors for 1- and 0-bits, so the
//! hovered byte stands out against the sparse default.

use crate::layout::{VisibleRange, BITS_PER_BYTE};

use super::backend::{DrawSurface, FrameStats, RenderParams};
use super::colors::HighlightStyle;

/// Draw one byte at its viewport-relative position.
///
/// Returns `false` without drawing when the index is outside the byte
/// sequence or no layout is established.
pub fn render_byte<S: DrawSurface + ?Sized>(
    surface: &mut S,
    params: &RenderParams,
    byte_index: usize,
    style: Option<&HighlightStyle>,
) -> bool {
    let Some(&byte) = params.bytes.get(byte_index) else {
        return false;
    };
    let Some(origin) = params.layout.byte_to_coordinate(byte_index) else {
        return false;
    };
    let bit_width = f64::from(params.layout.bit_width);
    let bit_height = f64::from(params.layout.bit_height);
    let y = origin.y - params.scroll_offset;
    let mut x = origin.x;

    for position in (0..BITS_PER_BYTE as usize).rev() {
        let high = params.masks.is_set(byte, position);
        match style {
            Some(style) => {
                surface.set_fill_color(if high { &style.high } else { &style.low });
                surface.fill_rect(x, y, bit_width, bit_height);
            }
            None if high => surface.fill_rect(x, y, bit_width, bit_height),
            None => {}
        }
        x += bit_width;
    }
    true
}

/// Draw every byte in `range` with the default style.
///
/// Returns the number of bytes drawn.
pub fn render_window<S: DrawSurface + ?Sized>(
    surface: &mut S,
    params: &RenderParams,
    range: VisibleRange,
) -> usize {
    surface.set_fill_color(&params.palette.bit);
    range
        .indices()
        .filter(|&index| render_byte(&mut *surface, params, index, None))
        .count()
}

/// Clear the hovered byte's cell and redraw it with the highlight style.
///
/// Hover indices past the end of the byte sequence are skipped without
/// drawing anything.
pub fn render_highlight<S: DrawSurface + ?Sized>(
    surface: &mut S,
    params: &RenderParams,
    hovered: Option<usize>,
) -> bool {
    let Some(index) = hovered.filter(|&i| i < params.bytes.len()) else {
        return false;
    };
    let Some(origin) = params.layout.byte_to_coordinate(index) else {
        return false;
    };
    surface.clear_rect(
        origin.x,
        origin.y - params.scroll_offset,
        f64::from(params.layout.byte_width),
        f64::from(params.layout.bit_height),
    );
    let drawn = render_byte(surface, params, index, Some(&params.palette.highlight));
    // Leave the default fill in place for whoever draws next
    surface.set_fill_color(&params.palette.bit);
    drawn
}

/// Draw a full frame: background, visible window, then the hover highlight.
pub fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    params: &RenderParams,
    range: VisibleRange,
    hovered: Option<usize>,
) -> FrameStats {
    surface.begin_frame(&params.palette.background);
    let bytes_drawn = render_window(surface, params, range);
    let highlighted = render_highlight(surface, params, hovered);
    FrameStats {
        range,
        bytes_drawn,
        highlighted,
        skipped: false,
        draw_ms: 0.0,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::unreachable
)]
mod tests {
    use super::*;
    use crate::layout::{LayoutModel, LayoutParams};
    use crate::render::{BitMaskTable, DrawCommand, Palette, RecordingSurface};

    struct Fixture {
        layout: LayoutModel,
        masks: BitMaskTable,
        palette: Palette,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                layout: LayoutModel::compute(400.0, &LayoutParams::new(5, 20)),
                masks: BitMaskTable::new(),
                palette: Palette::default(),
            }
        }

        fn params<'a>(&'a self, bytes: &'a [u8], scroll_offset: f64) -> RenderParams<'a> {
            RenderParams {
                bytes,
                layout: &self.layout,
                scroll_offset,
                masks: &self.masks,
                palette: &self.palette,
            }
        }
    }

    fn fill_xs(surface: &RecordingSurface) -> Vec<f64> {
        surface
            .fills()
            .map(|c| match c {
                DrawCommand::Fill { x, .. } => *x,
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_default_style_fills_only_high_bits_msb_first() {
        let fx = Fixture::new();
        let bytes = [0b1000_0001u8];
        let mut surface = RecordingSurface::new();
        assert!(render_byte(&mut surface, &fx.params(&bytes, 0.0), 0, None));
        // MSB at x=0, LSB at x=35
        assert_eq!(fill_xs(&surface), vec![0.0, 35.0]);
    }

    #[test]
    fn test_zero_byte_draws_nothing_in_default_style() {
        let fx = Fixture::new();
        let bytes = [0u8];
        let mut surface = RecordingSurface::new();
        assert!(render_byte(&mut surface, &fx.params(&bytes, 0.0), 0, None));
        assert_eq!(surface.fills().count(), 0);
    }

    #[test]
    fn test_highlight_style_fills_every_bit() {
        let fx = Fixture::new();
        let bytes = [0b1010_0000u8];
        let mut surface = RecordingSurface::new();
        let style = HighlightStyle::default();
        render_byte(&mut surface, &fx.params(&bytes, 0.0), 0, Some(&style));
        let colors: Vec<String> = surface
            .fills()
            .map(|c| match c {
                DrawCommand::Fill { color, .. } => color.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], style.high);
        assert_eq!(colors[1], style.low);
        assert_eq!(colors[2], style.high);
        assert!(colors[3..].iter().all(|c| *c == style.low));
    }

    #[test]
    fn test_scroll_offset_shifts_y() {
        let fx = Fixture::new();
        let bytes = vec![0xFFu8; 30];
        let mut surface = RecordingSurface::new();
        render_byte(&mut surface, &fx.params(&bytes, 20.0), 25, None);
        for cmd in surface.fills() {
            let DrawCommand::Fill { y, height, .. } = cmd else {
                unreachable!()
            };
            // Row 2 in content space is row 1 in the viewport
            assert_eq!(*y, 20.0);
            assert_eq!(*height, 20.0);
        }
    }

    #[test]
    fn test_out_of_range_byte_is_not_drawn() {
        let fx = Fixture::new();
        let bytes = [0xFFu8];
        let mut surface = RecordingSurface::new();
        assert!(!render_byte(&mut surface, &fx.params(&bytes, 0.0), 1, None));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_window_counts_bytes() {
        let fx = Fixture::new();
        let bytes = vec![0x01u8; 50];
        let mut surface = RecordingSurface::new();
        let drawn = render_window(&mut surface, &fx.params(&bytes, 0.0), VisibleRange::new(10, 30));
        assert_eq!(drawn, 20);
        assert_eq!(surface.fills().count(), 20);
    }

    #[test]
    fn test_highlight_clears_cell_then_redraws() {
        let fx = Fixture::new();
        let bytes = vec![0x0Fu8; 20];
        let mut surface = RecordingSurface::new();
        assert!(render_highlight(&mut surface, &fx.params(&bytes, 0.0), Some(12)));
        let first = surface.commands().first().cloned();
        assert_eq!(
            first,
            Some(DrawCommand::Clear {
                x: 80.0,
                y: 20.0,
                width: 40.0,
                height: 20.0
            })
        );
        assert_eq!(surface.fills().count(), 8);
        assert_eq!(
            surface.commands().last(),
            Some(&DrawCommand::SetFill(fx.palette.bit.clone()))
        );
    }

    #[test]
    fn test_highlight_past_end_is_skipped() {
        let fx = Fixture::new();
        let bytes = vec![0xFFu8; 20];
        let mut surface = RecordingSurface::new();
        assert!(!render_highlight(&mut surface, &fx.params(&bytes, 0.0), Some(20)));
        assert!(!render_highlight(&mut surface, &fx.params(&bytes, 0.0), None));
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_frame_begins_with_background() {
        let fx = Fixture::new();
        let bytes = vec![0x80u8; 5];
        let mut surface = RecordingSurface::new();
        let stats = render_frame(
            &mut surface,
            &fx.params(&bytes, 0.0),
            VisibleRange::new(0, 5),
            Some(2),
        );
        assert_eq!(
            surface.commands().first(),
            Some(&DrawCommand::BeginFrame {
                background: fx.palette.background.clone()
            })
        );
        assert_eq!(stats.bytes_drawn, 5);
        assert!(stats.highlighted);
        assert!(!stats.skipped);
    }
}
