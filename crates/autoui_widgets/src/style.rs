//! Cosmetic style hints.
//!
//! AutoUI does not ship a styling engine. Widgets only carry a class name,
//! a tint and a text alignment for the host renderer to interpret.

use serde::Deserialize;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates a color from hex value (0xRRGGBBAA).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let a = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, a)
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#').unwrap_or(text);
        let raw = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::hex((raw << 8) | 0xFF)),
            8 => Some(Self::hex(raw)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Horizontal text alignment inside a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Style hints attached to a widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleHint {
    /// Host-defined style class.
    pub class: Option<String>,
    /// Tint color.
    pub color: Option<Color>,
    /// Text alignment.
    pub alignment: Option<TextAlignment>,
}

impl StyleHint {
    /// Returns true if no hint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.color.is_none() && self.alignment.is_none()
    }

    /// Overlays the hints set in `other` onto `self`.
    pub fn merge(&mut self, other: &Self) {
        if other.class.is_some() {
            self.class.clone_from(&other.class);
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.alignment.is_some() {
            self.alignment = other.alignment;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let color = Color::hex(0xFF00_00FF);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!((color.g - 0.0).abs() < 0.01);
        assert!((color.b - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_color_parse() {
        let color = Color::parse("#00FF00").unwrap();
        assert!((color.g - 1.0).abs() < 0.01);
        assert!((color.a - 1.0).abs() < 0.01);

        let translucent = Color::parse("#0000FF80").unwrap();
        assert!((translucent.a - 0.5).abs() < 0.01);

        assert!(Color::parse("#123").is_none());
        assert!(Color::parse("zzzzzz").is_none());
    }

    #[test]
    fn test_style_merge_keeps_unset_fields() {
        let mut base = StyleHint {
            class: Some("field".into()),
            color: None,
            alignment: Some(TextAlignment::Left),
        };
        base.merge(&StyleHint {
            class: None,
            color: Some(Color::BLACK),
            alignment: None,
        });

        assert_eq!(base.class.as_deref(), Some("field"));
        assert_eq!(base.color, Some(Color::BLACK));
        assert_eq!(base.alignment, Some(TextAlignment::Left));
    }
}
