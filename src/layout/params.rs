//! Host-supplied layout configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BitviewError, Result};
use crate::render::Palette;

/// Bits per byte; a byte cell is this many bit cells wide.
pub const BITS_PER_BYTE: u32 = 8;

/// Immutable layout configuration supplied by the host.
///
/// Field names deserialize from camelCase, and also accept the short names
/// used by existing embedders (`bitWidth`, `bitHeight`, `borderWidth`,
/// `maxHeight`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParams {
    /// Width of one bit cell in logical pixels
    #[serde(alias = "bitWidth")]
    pub bit_pixel_width: u32,
    /// Height of one bit cell (and of one row) in logical pixels
    #[serde(alias = "bitHeight")]
    pub bit_pixel_height: u32,
    /// Border drawn around the scroll container
    #[serde(alias = "borderWidth", default)]
    pub border_pixel_width: u32,
    /// Visible window height; `None` renders everything without virtualization
    #[serde(alias = "maxHeight", default)]
    pub viewport_pixel_height: Option<u32>,
    /// Colors used for drawing
    #[serde(default)]
    pub palette: Palette,
}

impl LayoutParams {
    /// Create params with no border, no viewport limit and the default palette.
    pub fn new(bit_pixel_width: u32, bit_pixel_height: u32) -> Self {
        Self {
            bit_pixel_width,
            bit_pixel_height,
            border_pixel_width: 0,
            viewport_pixel_height: None,
            palette: Palette::default(),
        }
    }

    #[must_use]
    pub fn with_border(mut self, border_pixel_width: u32) -> Self {
        self.border_pixel_width = border_pixel_width;
        self
    }

    #[must_use]
    pub fn with_viewport_height(mut self, viewport_pixel_height: u32) -> Self {
        self.viewport_pixel_height = Some(viewport_pixel_height);
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Pixel width of one byte cell (eight bit cells).
    pub fn byte_pixel_width(&self) -> u32 {
        self.bit_pixel_width.saturating_mul(BITS_PER_BYTE)
    }

    /// Check the constraints and normalize palette colors.
    pub fn validate(mut self) -> Result<Self> {
        if self.bit_pixel_width == 0 {
            return Err(BitviewError::InvalidParams(
                "bit pixel width must be positive".into(),
            ));
        }
        if self.bit_pixel_height == 0 {
            return Err(BitviewError::InvalidParams(
                "bit pixel height must be positive".into(),
            ));
        }
        if self.viewport_pixel_height == Some(0) {
            return Err(BitviewError::InvalidParams(
                "viewport height must be positive when set".into(),
            ));
        }
        self.palette = self.palette.normalized()?;
        Ok(self)
    }

    /// Parse and validate params from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()
    }

    /// Parse and validate params from a JavaScript object.
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self> {
        let params: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|e| BitviewError::InvalidParams(e.to_string()))?;
        params.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_width_is_eight_bits() {
        assert_eq!(LayoutParams::new(5, 20).byte_pixel_width(), 40);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        assert!(LayoutParams::new(0, 20).validate().is_err());
        assert!(LayoutParams::new(5, 0).validate().is_err());
        assert!(LayoutParams::new(5, 20)
            .with_viewport_height(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json_camel_case() {
        let params = LayoutParams::from_json(
            r#"{"bitPixelWidth": 5, "bitPixelHeight": 20, "viewportPixelHeight": 400}"#,
        )
        .unwrap();
        assert_eq!(params.bit_pixel_width, 5);
        assert_eq!(params.viewport_pixel_height, Some(400));
        assert_eq!(params.border_pixel_width, 0);
    }

    #[test]
    fn test_from_json_short_aliases() {
        let params = LayoutParams::from_json(
            r#"{"bitWidth": 2, "bitHeight": 10, "borderWidth": 1, "maxHeight": 300}"#,
        )
        .unwrap();
        assert_eq!(params, LayoutParams::new(2, 10).with_border(1).with_viewport_height(300));
    }

    #[test]
    fn test_from_json_palette_override_is_normalized() {
        let params = LayoutParams::from_json(
            r#"{"bitWidth": 2, "bitHeight": 10, "palette": {"bit": "ff0000"}}"#,
        )
        .unwrap();
        assert_eq!(params.palette.bit, "#FF0000");
        assert_eq!(params.palette.background, "#FFFFFF");
    }

    #[test]
    fn test_from_json_missing_field_is_config_error() {
        let err = LayoutParams::from_json(r#"{"bitWidth": 2}"#).unwrap_err();
        assert!(matches!(err, BitviewError::Config(_)));
    }
}
