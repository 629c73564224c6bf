//! Rendering engine with pluggable surfaces.
//!
//! This module provides:
//! - The surface-agnostic `DrawSurface` trait and per-frame parameters
//! - Bit-by-bit byte rendering with an optional highlight style
//! - A recording surface for native hosts and tests
//! - Canvas 2D surface (wasm32)
//! - Color parsing utilities

pub mod backend;
pub mod bits;
pub mod colors;
pub mod masks;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

// Re-export commonly used types
pub use backend::{DrawSurface, FrameStats, RenderParams};
pub use bits::{render_byte, render_frame, render_highlight, render_window};
pub use colors::{palette, parse_color, CssColor, HighlightStyle, Palette};
pub use masks::BitMaskTable;
pub use recording::{DrawCommand, RecordingSurface};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
