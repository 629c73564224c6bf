//! Byte grid geometry.
//!
//! Maps byte indices to content-space pixel coordinates and back. Rows are
//! `bit_pixel_height` tall; each byte occupies eight bit cells side by side.
//! All mappings use floor semantics so that row and column boundaries map
//! exactly.

use super::params::LayoutParams;

/// A point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry derived from the container width and the layout params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutModel {
    /// Whole byte cells that fit in one row (0 = nothing fits)
    pub bytes_per_row: u32,
    /// Pixel width of one byte cell
    pub byte_width: u32,
    /// Pixel width of one bit cell
    pub bit_width: u32,
    /// Pixel height of one row
    pub bit_height: u32,
}

/// Floor a non-negative finite pixel value to an integer cell count.
/// The cast is safe: the value is finite, non-negative and clamped first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_cells(value: f64) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.floor().min(u64::MAX as f64) as u64)
}

impl LayoutModel {
    /// Derive the layout for a container of the given width.
    ///
    /// `bytes_per_row = floor(container_width / byte_width)`, clamped to zero
    /// for negative or non-finite widths.
    pub fn compute(container_width: f64, params: &LayoutParams) -> Self {
        let byte_width = params.byte_pixel_width();
        let bytes_per_row = if byte_width == 0 {
            0
        } else {
            floor_cells(container_width / f64::from(byte_width))
                .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
        };
        Self {
            bytes_per_row,
            byte_width,
            bit_width: params.bit_pixel_width,
            bit_height: params.bit_pixel_height,
        }
    }

    /// True when at least one byte column fits.
    pub fn is_established(&self) -> bool {
        self.bytes_per_row > 0 && self.bit_height > 0
    }

    /// Width actually used by byte cells; always a whole number of columns.
    pub fn content_width(&self) -> u32 {
        self.bytes_per_row.saturating_mul(self.byte_width)
    }

    /// Top-left corner of a byte's cell in content space (not adjusted for
    /// scroll). `None` when no layout is established.
    pub fn byte_to_coordinate(&self, byte_index: usize) -> Option<Point> {
        if !self.is_established() {
            return None;
        }
        let per_row = usize::try_from(self.bytes_per_row).ok()?;
        let row = byte_index / per_row;
        let col = byte_index - row * per_row;
        Some(Point {
            x: col as f64 * f64::from(self.byte_width),
            y: row as f64 * f64::from(self.bit_height),
        })
    }

    /// Byte index whose cell contains the content-space point.
    ///
    /// The result may be past the end of the byte sequence; callers bound it.
    /// `None` for negative or non-finite coordinates, or when no layout is
    /// established.
    pub fn coordinate_to_byte(&self, point: Point) -> Option<usize> {
        if !self.is_established() {
            return None;
        }
        let row = floor_cells(point.y / f64::from(self.bit_height))?;
        let col = floor_cells(point.x / f64::from(self.byte_width))?;
        let index = row
            .checked_mul(u64::from(self.bytes_per_row))?
            .checked_add(col)?;
        usize::try_from(index).ok()
    }

    /// Number of rows needed for `byte_count` bytes; never less than one.
    pub fn row_count(&self, byte_count: usize) -> u64 {
        if !self.is_established() {
            return 1;
        }
        let per_row = u64::from(self.bytes_per_row);
        let count = u64::try_from(byte_count).unwrap_or(u64::MAX);
        count.div_ceil(per_row).max(1)
    }

    /// Pixel height of the full unscrolled content for `byte_count` bytes.
    ///
    /// An empty sequence still reserves one row.
    pub fn content_height(&self, byte_count: usize) -> u64 {
        self.row_count(byte_count)
            .saturating_mul(u64::from(self.bit_height))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn layout(width: f64) -> LayoutModel {
        LayoutModel::compute(width, &LayoutParams::new(5, 20))
    }

    #[test]
    fn test_compute_reference_layout() {
        let l = layout(400.0);
        assert_eq!(l.byte_width, 40);
        assert_eq!(l.bytes_per_row, 10);
        assert_eq!(l.content_width(), 400);
    }

    #[test_case(0.0, 0 ; "zero width")]
    #[test_case(39.9, 0 ; "narrower than one byte")]
    #[test_case(40.0, 1 ; "exactly one byte")]
    #[test_case(419.0, 10 ; "partial trailing column dropped")]
    #[test_case(-10.0, 0 ; "negative width")]
    #[test_case(f64::NAN, 0 ; "nan width")]
    fn test_bytes_per_row(width: f64, expected: u32) {
        assert_eq!(layout(width).bytes_per_row, expected);
    }

    #[test]
    fn test_degenerate_layout_maps_nothing() {
        let l = layout(10.0);
        assert!(!l.is_established());
        assert_eq!(l.content_width(), 0);
        assert_eq!(l.byte_to_coordinate(0), None);
        assert_eq!(l.coordinate_to_byte(Point::new(0.0, 0.0)), None);
        assert_eq!(l.content_height(100), 20);
    }

    #[test]
    fn test_byte_to_coordinate() {
        let l = layout(400.0);
        assert_eq!(l.byte_to_coordinate(0), Some(Point::new(0.0, 0.0)));
        assert_eq!(l.byte_to_coordinate(9), Some(Point::new(360.0, 0.0)));
        assert_eq!(l.byte_to_coordinate(10), Some(Point::new(0.0, 20.0)));
        assert_eq!(l.byte_to_coordinate(23), Some(Point::new(120.0, 40.0)));
    }

    #[test]
    fn test_coordinate_to_byte_floor_at_boundaries() {
        let l = layout(400.0);
        assert_eq!(l.coordinate_to_byte(Point::new(39.999, 19.999)), Some(0));
        assert_eq!(l.coordinate_to_byte(Point::new(40.0, 0.0)), Some(1));
        assert_eq!(l.coordinate_to_byte(Point::new(0.0, 20.0)), Some(10));
    }

    #[test]
    fn test_coordinate_to_byte_rejects_negative() {
        let l = layout(400.0);
        assert_eq!(l.coordinate_to_byte(Point::new(-1.0, 0.0)), None);
        assert_eq!(l.coordinate_to_byte(Point::new(0.0, -0.5)), None);
    }

    #[test]
    fn test_round_trip_inside_cell() {
        let l = layout(400.0);
        for index in 0..250 {
            let p = l.byte_to_coordinate(index).unwrap();
            assert_eq!(l.coordinate_to_byte(p), Some(index));
            let inner = Point::new(p.x + 39.5, p.y + 19.5);
            assert_eq!(l.coordinate_to_byte(inner), Some(index));
        }
    }

    #[test_case(0, 20 ; "empty reserves one row")]
    #[test_case(1, 20 ; "single byte")]
    #[test_case(10, 20 ; "full row")]
    #[test_case(25, 60 ; "partial last row")]
    fn test_content_height(count: usize, expected: u64) {
        assert_eq!(layout(400.0).content_height(count), expected);
    }
}
