//! # Decoration Style
//!
//! Theme values for block decoration: background fill and border. These come
//! from configuration and are copied into painted rectangles unmodified; the
//! engine never computes a color or a line width.

use serde::{Deserialize, Serialize};

/// An RGBA color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a theme color such as `"FFFFCC"`, `"#ffc"` or `"#EEEEEE"`.
    /// Malformed digits fall back to 0 for that channel; non-ASCII input
    /// is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Self::BLACK;
        }
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }
}

/// How a border line is stroked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Border stroke parameters for a decorated block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub width: f64,
    #[serde(default = "default_border_color")]
    pub color: Color,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub style: BorderStyle,
}

fn default_border_color() -> Color {
    Color::BLACK
}

/// Background and border painted behind a block on every extent it spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub border: Option<Border>,
}

impl Decoration {
    /// True when painting would produce nothing visible.
    pub fn is_empty(&self) -> bool {
        let visible_background = self.background.map(|bg| bg.a > 0.0).unwrap_or(false);
        let visible_border = self.border.map(|b| b.width > 0.0).unwrap_or(false);
        !visible_background && !visible_border
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits() {
        let c = Color::hex("FFFFCC");
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 1.0);
        assert!((c.b - 0.8).abs() < 1e-9);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn hex_short_form_with_hash() {
        assert_eq!(Color::hex("#eee"), Color::hex("EEEEEE"));
    }

    #[test]
    fn hex_with_multibyte_characters_is_black() {
        assert_eq!(Color::hex("é1"), Color::BLACK);
        assert_eq!(Color::hex("#ééé"), Color::BLACK);
        assert_eq!(Color::hex("ff\u{e9}f"), Color::BLACK);
    }

    #[test]
    fn zero_width_border_is_not_visible() {
        let deco = Decoration {
            background: None,
            border: Some(Border {
                width: 0.0,
                color: Color::BLACK,
                radius: 0.0,
                style: BorderStyle::Solid,
            }),
        };
        assert!(deco.is_empty());
        let filled = Decoration {
            background: Some(Color::hex("FFFFCC")),
            border: None,
        };
        assert!(!filled.is_empty());
    }

    #[test]
    fn border_deserializes_with_defaults() {
        let border: Border = serde_json::from_str(r#"{ "width": 0.5 }"#).unwrap();
        assert_eq!(border.color, Color::BLACK);
        assert_eq!(border.style, BorderStyle::Solid);
        assert_eq!(border.radius, 0.0);
    }
}
