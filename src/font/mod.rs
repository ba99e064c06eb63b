//! # Font Management
//!
//! The report draws with three of the standard PDF fonts (Helvetica, bold and
//! oblique), which need no embedding, plus one optional TrueType face used for
//! cover-page values that may carry characters outside WinAnsi (names with
//! diacritics). The TrueType face is parsed with ttf-parser for metrics and
//! embedded whole by the PDF writer.

pub mod metrics;

use std::collections::HashMap;
use std::path::Path;

pub use metrics::StandardFontMetrics;

use crate::error::ReportError;

/// The faces the layout asks for. `Unicode` resolves to the configured
/// TrueType font, or to Helvetica when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Oblique,
    Unicode,
}

/// The standard PDF fonts the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::HelveticaBold => StandardFontMetrics::HELVETICA_BOLD,
            Self::Helvetica | Self::HelveticaOblique => StandardFontMetrics::HELVETICA,
        }
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    /// Maps characters to their glyph IDs in the font.
    pub glyph_ids: HashMap<char, u16>,
}

impl CustomFontMetrics {
    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Advance width in PDF glyph space (1/1000 em).
    pub fn pdf_width(&self, advance: u16) -> f64 {
        advance as f64 * 1000.0 / self.units_per_em as f64
    }

    fn from_face(face: &ttf_parser::Face) -> Self {
        let units_per_em = face.units_per_em();
        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        // Basic Multilingual Plane only; the cover never needs more.
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                glyph_ids.insert(ch, glyph_id.0);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }
        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        let rect = face.global_bounding_box();
        Self {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or(face.ascender()),
            bbox: [rect.x_min, rect.y_min, rect.x_max, rect.y_max],
            glyph_ids,
        }
    }
}

/// A TrueType font loaded from disk, kept whole for embedding.
#[derive(Debug, Clone)]
pub struct CustomFont {
    pub name: String,
    pub data: Vec<u8>,
    pub metrics: CustomFontMetrics,
}

impl CustomFont {
    /// Parse font bytes. `fallback_name` is used when the font has no
    /// PostScript name record.
    pub fn parse(data: Vec<u8>, fallback_name: &str) -> Result<Self, ReportError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| ReportError::Font(format!("cannot parse '{}': {}", fallback_name, e)))?;
        let name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| fallback_name.to_string());
        let metrics = CustomFontMetrics::from_face(&face);
        Ok(Self {
            name: sanitize_font_name(&name),
            data,
            metrics,
        })
    }
}

/// PDF names cannot contain whitespace or delimiters.
fn sanitize_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect();
    if cleaned.is_empty() {
        "UnicodeFont".to_string()
    } else {
        cleaned
    }
}

/// What a [`FontFace`] resolves to.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedFont<'a> {
    Standard(StandardFont),
    Custom(&'a CustomFont),
}

/// Shared font context used by layout and PDF serialization.
/// Provides text measurement with real glyph metrics.
#[derive(Debug, Default)]
pub struct FontContext {
    unicode: Option<CustomFont>,
}

impl FontContext {
    /// Standard fonts only.
    pub fn new() -> Self {
        Self { unicode: None }
    }

    /// Build the context, loading the unicode value font when one is
    /// configured. A configured font that cannot be read or parsed is fatal.
    pub fn load(unicode: Option<&Path>) -> Result<Self, ReportError> {
        let Some(path) = unicode else {
            return Ok(Self::new());
        };
        let data = std::fs::read(path).map_err(|e| {
            ReportError::Font(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UnicodeFont");
        let font = CustomFont::parse(data, stem)?;
        log::debug!("Loaded unicode font '{}' from {}", font.name, path.display());
        Ok(Self {
            unicode: Some(font),
        })
    }

    /// Standard fonts plus an already-parsed unicode font.
    pub fn with_unicode(font: CustomFont) -> Self {
        Self {
            unicode: Some(font),
        }
    }

    pub fn resolve(&self, face: FontFace) -> ResolvedFont<'_> {
        match face {
            FontFace::Regular => ResolvedFont::Standard(StandardFont::Helvetica),
            FontFace::Bold => ResolvedFont::Standard(StandardFont::HelveticaBold),
            FontFace::Oblique => ResolvedFont::Standard(StandardFont::HelveticaOblique),
            FontFace::Unicode => match &self.unicode {
                Some(font) => ResolvedFont::Custom(font),
                None => ResolvedFont::Standard(StandardFont::Helvetica),
            },
        }
    }

    /// Measure the width of a string in points.
    pub fn measure(&self, text: &str, face: FontFace, font_size: f64) -> f64 {
        match self.resolve(face) {
            ResolvedFont::Standard(font) => font.metrics().measure_string(text, font_size),
            ResolvedFont::Custom(font) => text
                .chars()
                .map(|ch| font.metrics.char_width(ch, font_size))
                .sum(),
        }
    }

    pub fn unicode_font(&self) -> Option<&CustomFont> {
        self.unicode.as_ref()
    }
}
