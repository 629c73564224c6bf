//! Color handling for bit rendering.
//!
//! Colors are kept as CSS color strings, which Canvas 2D consumes directly.

use serde::{Deserialize, Serialize};

use crate::error::{BitviewError, Result};

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// Parse a color string and normalize it to CSS format.
///
/// Supports formats:
/// - "#RRGGBB" (hex without alpha)
/// - "#AARRGGBB" (alpha first)
/// - "RRGGBB" (hex without # prefix)
/// - "rgb(r, g, b)" (CSS-style)
/// - "rgba(r, g, b, a)" (CSS-style with alpha)
pub fn parse_color(s: &str) -> Option<CssColor> {
    let s = s.trim();

    if s.starts_with('#') {
        parse_hex_color(s)
    } else if s.starts_with("rgb") {
        // Already CSS; only validate the components
        parse_color_rgba(s).map(|_| s.to_string())
    } else {
        parse_hex_color(&format!("#{}", s))
    }
}

fn parse_hex_color(s: &str) -> Option<CssColor> {
    let (r, g, b, a) = parse_hex_rgba(s)?;
    if a >= 1.0 {
        Some(format!("#{:02X}{:02X}{:02X}", r, g, b))
    } else {
        Some(format!("rgba({}, {}, {}, {:.2})", r, g, b, a))
    }
}

/// Parse color and return RGBA components (0-255 for RGB, 0.0-1.0 for alpha)
pub fn parse_color_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let s = s.trim();

    if s.starts_with('#') {
        parse_hex_rgba(s)
    } else if s.starts_with("rgba(") {
        parse_rgba_string(s)
    } else if s.starts_with("rgb(") {
        parse_rgb_string(s)
    } else {
        parse_hex_rgba(&format!("#{}", s))
    }
}

fn parse_hex_rgba(s: &str) -> Option<(u8, u8, u8, f64)> {
    let hex = s.strip_prefix('#')?;

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some((r, g, b, 1.0))
        }
        8 => {
            let a = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let r = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(6..8)?, 16).ok()?;
            Some((r, g, b, f64::from(a) / 255.0))
        }
        _ => None,
    }
}

fn parse_rgb_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim());
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((r, g, b, 1.0))
}

fn parse_rgba_string(s: &str) -> Option<(u8, u8, u8, f64)> {
    let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim());
    let r: u8 = parts.next()?.parse().ok()?;
    let g: u8 = parts.next()?.parse().ok()?;
    let b: u8 = parts.next()?.parse().ok()?;
    let a: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(0.0..=1.0).contains(&a) {
        return None;
    }
    Some((r, g, b, a))
}

/// Default colors used in bit rendering (CSS format)
pub mod palette {
    /// Surface background, also the color of a 0-bit in the default style
    pub const BACKGROUND: &str = "#FFFFFF";

    /// Fill for a 1-bit in the default style
    pub const BIT: &str = "#000000";

    /// Fill for a 1-bit of the hovered byte
    pub const HIGHLIGHT_HIGH: &str = "rgb(200, 200, 0)";

    /// Fill for a 0-bit of the hovered byte
    pub const HIGHLIGHT_LOW: &str = "rgb(255, 255, 200)";
}

/// Two-tone style used for the hovered byte: every bit cell is filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Fill for 1-bits
    pub high: CssColor,
    /// Fill for 0-bits
    pub low: CssColor,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            high: palette::HIGHLIGHT_HIGH.to_string(),
            low: palette::HIGHLIGHT_LOW.to_string(),
        }
    }
}

/// Full set of colors the renderer draws with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Fill for 1-bits in the default sparse style
    pub bit: CssColor,
    /// Surface background
    pub background: CssColor,
    /// Style for the hovered byte
    pub highlight: HighlightStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bit: palette::BIT.to_string(),
            background: palette::BACKGROUND.to_string(),
            highlight: HighlightStyle::default(),
        }
    }
}

impl Palette {
    /// Validate every entry and return a copy with normalized CSS strings.
    pub fn normalized(&self) -> Result<Self> {
        let norm = |s: &str| parse_color(s).ok_or_else(|| BitviewError::InvalidColor(s.into()));
        Ok(Self {
            bit: norm(&self.bit)?,
            background: norm(&self.background)?,
            highlight: HighlightStyle {
                high: norm(&self.highlight.high)?,
                low: norm(&self.highlight.low)?,
            },
        })
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

    #[test]
    fn test_parse_hex_6() {
        assert_eq!(parse_color("#ff0000").unwrap(), "#FF0000");
    }

    #[test]
    fn test_parse_hex_without_hash() {
        assert_eq!(parse_color("00FF00").unwrap(), "#00FF00");
    }

    #[test]
    fn test_parse_hex_8_transparent() {
        let color = parse_color("#80FF0000").unwrap();
        assert!(color.starts_with("rgba(255, 0, 0,"));
    }

    #[test]
    fn test_parse_rgb_passthrough() {
        assert_eq!(parse_color("rgb(200, 200, 0)").unwrap(), "rgb(200, 200, 0)");
    }

    #[test]
    fn test_parse_rgb_rejects_out_of_range() {
        assert!(parse_color("rgb(300, 0, 0)").is_none());
        assert!(parse_color("rgba(0, 0, 0, 2.0)").is_none());
    }

    #[test]
    fn test_parse_rgba_components() {
        let (r, g, b, a) = parse_color_rgba("rgba(1, 2, 3, 0.5)").unwrap();
        assert_eq!((r, g, b), (1, 2, 3));
        assert_eq!(a, 0.5);
    }

    #[test]
    fn test_default_palette_is_valid() {
        let palette = Palette::default();
        let normalized = palette.normalized().unwrap();
        assert_eq!(normalized.bit, "#000000");
        assert_eq!(normalized.highlight.high, "rgb(200, 200, 0)");
    }

    #[test]
    fn test_palette_rejects_garbage() {
        let palette = Palette {
            bit: "not-a-color".into(),
            ..Palette::default()
        };
        let err = palette.normalized().unwrap_err();
        assert!(matches!(err, BitviewError::InvalidColor(ref c) if c == "not-a-color"));
    }
}
