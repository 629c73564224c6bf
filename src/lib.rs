//! bitview - bit-level byte sequence viewer for the web
//!
//! Renders an arbitrary byte sequence as a scrollable grid of bits on a
//! Canvas 2D surface via WebAssembly:
//! - One row of bit cells per `floor(width / byte_width)` bytes, MSB first
//! - Only the rows intersecting the viewport are drawn
//! - Debounced scrolling (one draw per 50ms burst)
//! - Hover highlight with an optional change callback
//!
//! The engine itself ([`viewer::BitEngine`]) is platform independent and
//! runs natively against [`viewer::ManualHost`] and
//! [`render::RecordingSurface`].
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { BitView } from 'bitview';
//! await init();
//! const view = new BitView(container, { bitWidth: 5, bitHeight: 20, maxHeight: 400 }, devicePixelRatio);
//! view.set_hover_callback((index) => console.log(index));
//! view.set_bytes(bytes);
//! ```

pub mod error;
pub mod logging;

// Geometry and drawing
pub mod layout;
pub mod render;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{BitviewError, Result};
pub use layout::{LayoutModel, LayoutParams, Point, VisibleRange};
pub use render::{DrawSurface, FrameStats, Palette, RecordingSurface};
pub use viewer::{BitEngine, EngineEvent, Host, ManualHost};

#[cfg(target_arch = "wasm32")]
pub use viewer::BitView;

/// Install the platform logger at `level` ("error", "warn", "info", "debug",
/// "trace" or "off"). Unknown names fall back to "info".
///
/// Returns `false` if a logger was already installed.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    let filter = level.parse().unwrap_or(log::LevelFilter::Info);
    logging::init(filter)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
