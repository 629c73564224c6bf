//! Renderer draw-command tests
//!
//! Draws into a `RecordingSurface` and checks exactly which cells are filled,
//! cleared and highlighted.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use bitview::layout::{visible_range, LayoutModel, LayoutParams, VisibleRange};
use bitview::render::{
    palette, render_frame, BitMaskTable, DrawCommand, HighlightStyle, Palette, RecordingSurface,
    RenderParams,
};

struct Scene {
    bytes: Vec<u8>,
    layout: LayoutModel,
    masks: BitMaskTable,
    palette: Palette,
}

impl Scene {
    fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            layout: LayoutModel::compute(400.0, &LayoutParams::new(5, 20)),
            masks: BitMaskTable::new(),
            palette: Palette::default(),
        }
    }

    fn draw(&self, scroll_offset: f64, hovered: Option<usize>) -> RecordingSurface {
        let params = RenderParams {
            bytes: &self.bytes,
            layout: &self.layout,
            scroll_offset,
            masks: &self.masks,
            palette: &self.palette,
        };
        let range = visible_range(scroll_offset, Some(40), &self.layout, self.bytes.len());
        let mut surface = RecordingSurface::new();
        render_frame(&mut surface, &params, range, hovered);
        surface
    }
}

/// (x, y, color) of every fill
fn fills(surface: &RecordingSurface) -> Vec<(f64, f64, String)> {
    surface
        .fills()
        .filter_map(|cmd| match cmd {
            DrawCommand::Fill { x, y, color, .. } => Some((*x, *y, color.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_mask_table_is_powers_of_two() {
    let masks = BitMaskTable::new();
    assert_eq!(masks.as_slice(), &[1, 2, 4, 8, 16, 32, 64, 128]);
}

#[test]
fn test_frame_fills_only_one_bits_in_bit_color() {
    let scene = Scene::new(vec![0b0100_0000, 0b0000_0001]);
    let surface = scene.draw(0.0, None);
    assert_eq!(
        fills(&surface),
        vec![
            (5.0, 0.0, palette::BIT.to_string()),
            (75.0, 0.0, palette::BIT.to_string()),
        ]
    );
    assert_eq!(surface.frame_count(), 1);
    assert_eq!(surface.clears().count(), 0);
}

#[test]
fn test_bytes_outside_window_are_never_drawn() {
    let scene = Scene::new(vec![0xFF; 1000]);
    let surface = scene.draw(200.0, None);
    // Window starts at row 10; drawing is viewport-relative
    let ys: Vec<f64> = fills(&surface).iter().map(|(_, y, _)| *y).collect();
    assert!(ys.iter().all(|y| *y >= 0.0 && *y < 60.0));
    assert_eq!(fills(&surface).len(), 30 * 8);
}

#[test]
fn test_hovered_byte_is_cleared_and_fully_filled() {
    let scene = Scene::new(vec![0b1100_0000; 30]);
    let surface = scene.draw(0.0, Some(11));
    let clears: Vec<&DrawCommand> = surface.clears().collect();
    assert_eq!(
        clears,
        vec![&DrawCommand::Clear {
            x: 40.0,
            y: 20.0,
            width: 40.0,
            height: 20.0
        }]
    );

    let style = HighlightStyle::default();
    let highlight: Vec<(f64, f64, String)> = fills(&surface)
        .into_iter()
        .filter(|(_, y, color)| *y == 20.0 && *color != palette::BIT)
        .collect();
    assert_eq!(highlight.len(), 8);
    assert_eq!(highlight[0], (40.0, 20.0, style.high.clone()));
    assert_eq!(highlight[1], (45.0, 20.0, style.high.clone()));
    assert!(highlight[2..].iter().all(|(_, _, c)| *c == style.low));
}

#[test]
fn test_hover_past_end_draws_no_highlight() {
    let scene = Scene::new(vec![0xFF; 25]);
    let surface = scene.draw(0.0, Some(27));
    assert_eq!(surface.clears().count(), 0);
    assert!(fills(&surface)
        .iter()
        .all(|(_, _, color)| color == palette::BIT));
}

#[test]
fn test_custom_palette_colors_are_used() {
    let mut scene = Scene::new(vec![0x80]);
    scene.palette = Palette {
        bit: "#112233".to_string(),
        background: "#445566".to_string(),
        highlight: HighlightStyle::default(),
    };
    let surface = scene.draw(0.0, None);
    assert_eq!(
        surface.commands().first(),
        Some(&DrawCommand::BeginFrame {
            background: "#445566".to_string()
        })
    );
    assert_eq!(fills(&surface), vec![(0.0, 0.0, "#112233".to_string())]);
}

#[test]
fn test_empty_sequence_draws_background_only() {
    let scene = Scene::new(Vec::new());
    let surface = scene.draw(0.0, Some(0));
    assert_eq!(surface.frame_count(), 1);
    assert_eq!(surface.fills().count(), 0);
    assert_eq!(surface.clears().count(), 0);
}

#[test]
fn test_visible_range_of_scene() {
    let scene = Scene::new(vec![0; 100]);
    assert_eq!(
        visible_range(0.0, Some(40), &scene.layout, scene.bytes.len()),
        VisibleRange::new(0, 30)
    );
}
