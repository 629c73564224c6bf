//! Geometry for the bit grid.
//!
//! This module handles:
//! - Host-supplied layout parameters
//! - Deriving bytes-per-row and content size from the container width
//! - Byte index <-> pixel coordinate mapping
//! - Limiting drawing to the bytes intersecting the viewport

mod grid;
mod params;
mod visible;

pub use grid::{LayoutModel, Point};
pub use params::{LayoutParams, BITS_PER_BYTE};
pub use visible::{visible_range, VisibleRange};
