//! Canvas 2D drawing surface.
//!
//! Implements [`DrawSurface`] using the HTML Canvas 2D API via web-sys. The
//! backing store is sized in physical pixels; drawing uses logical pixels
//! after the device-pixel-ratio scale applied in `begin_frame`.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{BitviewError, Result};

use super::backend::DrawSurface;

/// Canvas 2D surface owning one canvas element for its lifetime
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
}

/// Logical size scaled to physical pixels, rounded up.
/// The cast is safe: the product is clamped to the u32 range first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn physical(logical: u32, dpr: f32) -> u32 {
    (f64::from(logical) * f64::from(dpr))
        .ceil()
        .clamp(0.0, f64::from(u32::MAX)) as u32
}

impl CanvasSurface {
    /// Create a surface from an `HtmlCanvasElement`
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| BitviewError::Surface("Failed to get 2d context".into()))?
            .ok_or_else(|| BitviewError::Surface("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BitviewError::Surface("Failed to cast to CanvasRenderingContext2d".into()))?;

        Ok(Self {
            canvas,
            ctx,
            width: 0,
            height: 0,
            dpr: 1.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Position the canvas at `top` logical pixels inside its scroll
    /// container so it stays over the visible window.
    pub fn set_top(&self, top: f64) {
        let _ = self
            .canvas
            .style()
            .set_property("top", &format!("{}px", top));
    }

    fn set_canvas_css_size(&self, css_w: u32, css_h: u32) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", css_w));
        let _ = style.set_property("height", &format!("{}px", css_h));
    }
}

impl DrawSurface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        if self.width == width && self.height == height && (self.dpr - dpr).abs() < f32::EPSILON {
            return;
        }
        self.width = width;
        self.height = height;
        self.dpr = dpr;

        // Setting the buffer size also clears it and resets the context state
        self.canvas.set_width(physical(width, dpr));
        self.canvas.set_height(physical(height, dpr));
        self.set_canvas_css_size(width, height);
    }

    fn begin_frame(&mut self, background: &str) {
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_fill_style_str(background);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        let _ = self.ctx.scale(f64::from(self.dpr), f64::from(self.dpr));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
