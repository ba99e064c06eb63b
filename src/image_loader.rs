//! # Image Loading and Decoding
//!
//! Resolves an image source to bytes and decodes it. Sources are file paths
//! or `data:image/...;base64,...` URIs (uploads embedded in a draft). Only
//! PNG and JPEG are decoded; SVG bytes are recognised so logos can be routed
//! to the vector path instead.

use std::io::Cursor;

use image::DynamicImage;

use crate::error::ReportError;

/// What a logo source turned out to be.
#[derive(Debug)]
pub enum LogoData {
    Svg(String),
    Raster(DynamicImage),
}

/// Load and decode a raster image (PNG or JPEG).
pub fn load_raster(src: &str) -> Result<DynamicImage, ReportError> {
    let bytes = read_source_bytes(src)?;
    decode_image_bytes(&bytes).map_err(|message| ReportError::Image {
        src: display_src(src),
        message,
    })
}

/// Load a logo, which may be SVG markup or a raster image.
pub fn load_logo(src: &str) -> Result<LogoData, ReportError> {
    let bytes = read_source_bytes(src)?;
    if is_svg(&bytes) {
        let text = String::from_utf8(bytes).map_err(|e| ReportError::Image {
            src: display_src(src),
            message: format!("SVG is not valid UTF-8: {}", e),
        })?;
        return Ok(LogoData::Svg(text));
    }
    decode_image_bytes(&bytes)
        .map(LogoData::Raster)
        .map_err(|message| ReportError::Image {
            src: display_src(src),
            message,
        })
}

/// Resolve the source string to raw bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, ReportError> {
    // Data URI: data:image/png;base64,iVBOR...
    if let Some(rest) = src.strip_prefix("data:image/") {
        let comma_pos = rest.find(',').ok_or_else(|| ReportError::Image {
            src: display_src(src),
            message: "Invalid data URI: missing comma".to_string(),
        })?;
        let (header, payload) = (&rest[..comma_pos], &rest[comma_pos + 1..]);
        if header.ends_with(";base64") {
            return base64_decode(payload).map_err(|message| ReportError::Image {
                src: display_src(src),
                message,
            });
        }
        // Unencoded payloads only make sense for SVG text.
        return Ok(payload.as_bytes().to_vec());
    }

    std::fs::read(src).map_err(|e| ReportError::Io {
        path: src.into(),
        source: e,
    })
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| format!("Base64 decode error: {}", e))
}

/// Data URIs can be megabytes long; keep error messages readable.
fn display_src(src: &str) -> String {
    if src.starts_with("data:") && src.len() > 40 {
        let cut = src
            .char_indices()
            .nth(40)
            .map(|(i, _)| i)
            .unwrap_or(src.len());
        format!("{}...", &src[..cut])
    } else {
        src.to_string()
    }
}

/// Detect image format from magic bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<DynamicImage, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }
    if !is_jpeg(data) && !is_png(data) {
        return Err("Unsupported image format (expected JPEG or PNG)".to_string());
    }

    image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Format detection error: {}", e))?
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

fn is_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let trimmed = head.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg")
        || (trimmed.starts_with("<?xml") && head.contains("<svg"))
        || (trimmed.starts_with("<!--") && head.contains("<svg"))
}
