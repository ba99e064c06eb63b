//! # Colors and Text Styles
//!
//! The report has a fixed visual identity, so there is no style cascade here:
//! just a color type, the palette constants, and the handful of text styles
//! the layout modules draw with.

use serde::{Deserialize, Serialize};

use crate::font::FontFace;

/// An opaque RGB color with channels in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parse `#rrggbb` or `#rgb`. Returns `None` for anything else.
    pub fn hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(Self::from_rgb8)
    }
}

/// Convert a `#rrggbb` / `#rgb` hex string to 8-bit RGB channels.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some([r, g, b])
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// Palette shared by the cover, chrome and body.
pub mod palette {
    use super::Color;

    /// Section titles, rules and cover block headings (#00afee).
    pub const BRAND: Color = Color {
        r: 0.0,
        g: 175.0 / 255.0,
        b: 238.0 / 255.0,
    };
    /// Body text (#111827).
    pub const INK: Color = Color {
        r: 17.0 / 255.0,
        g: 24.0 / 255.0,
        b: 39.0 / 255.0,
    };
    /// Footer and copyright text (#667085).
    pub const MUTED: Color = Color {
        r: 102.0 / 255.0,
        g: 112.0 / 255.0,
        b: 133.0 / 255.0,
    };
}

/// Font, size and color of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f64, color: Color) -> Self {
        Self { face, size, color }
    }
}
