//! In-memory surface that records draw commands.
//!
//! Used by native hosts and tests to observe exactly what a frame draws
//! without a display.

use super::backend::DrawSurface;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Surface resized to logical `width` x `height` at `dpr`
    Resize { width: u32, height: u32, dpr: f32 },
    /// Frame started; whole surface filled with `background`
    BeginFrame { background: String },
    /// Fill color changed
    SetFill(String),
    /// Rectangle filled with `color` (the fill color in effect)
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    /// Rectangle cleared
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Surface that appends every operation to a command list.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    width: u32,
    height: u32,
    dpr: f32,
    fill: String,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            dpr: 1.0,
            ..Self::default()
        }
    }

    /// Recorded commands since creation or the last [`take`](Self::take).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded fills, in order.
    pub fn fills(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
    }

    /// Recorded clears, in order.
    pub fn clears(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear { .. }))
    }

    /// Number of frames started.
    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BeginFrame { .. }))
            .count()
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.commands.push(DrawCommand::Resize { width, height, dpr });
    }

    fn begin_frame(&mut self, background: &str) {
        self.commands.push(DrawCommand::BeginFrame {
            background: background.to_string(),
        });
    }

    fn set_fill_color(&mut self, color: &str) {
        self.fill = color.to_string();
        self.commands.push(DrawCommand::SetFill(color.to_string()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Fill {
            x,
            y,
            width,
            height,
            color: self.fill.clone(),
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
