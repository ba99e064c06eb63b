//! # labreport
//!
//! Laboratory test-report generator.
//!
//! A report draft (JSON) carries branding, cover metadata and an ordered list
//! of sections. The generator draws a branded cover page and then flows the
//! sections **into** fixed A4 pages: every header, label/value row, figure
//! block and notes paragraph is checked against the bottom of the current
//! page before it is drawn, and a new page with the same header and footer
//! is opened when it would not fit. Nothing is laid out on an endless canvas
//! and sliced afterwards.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON draft)
//!       ↓
//!   [model]    — ReportConfig, sections, image blocks
//!       ↓
//!   [layout]   — cover, chrome, section flow, figure grids
//!       ↓        (text wrapping, fonts, raster + svg assets)
//!   [pdf]      — Serialize to PDF bytes
//! ```

pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod raster;
pub mod style;
pub mod svg;
pub mod text;

use std::path::Path;

pub use error::ReportError;
pub use model::ReportConfig;

use font::FontContext;
use pdf::{DocumentInfo, PdfWriter};

/// Render a report to PDF bytes.
///
/// This is the primary entry point. Asset paths in `config` are used as
/// given; see [`render_json`] for resolving them against a directory.
pub fn generate(config: &ReportConfig) -> Result<Vec<u8>, ReportError> {
    config.validate()?;
    let fonts = FontContext::load(config.fonts.unicode.as_deref())?;
    let doc = layout::render_report(&fonts, config)?;
    let bytes = PdfWriter::new().write(&doc, &DocumentInfo::from_config(config), &fonts);
    log::info!("Rendered {} pages ({} bytes)", doc.pages.len(), bytes.len());
    Ok(bytes)
}

/// Render a report and write it to `path`. The whole document is produced
/// in memory first, so a failed generation never leaves a partial file.
pub fn generate_to_path(config: &ReportConfig, path: &Path) -> Result<usize, ReportError> {
    let bytes = generate(config)?;
    std::fs::write(path, &bytes).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(bytes.len())
}

/// Parse a JSON draft, resolve its relative asset paths against `base_dir`,
/// and render it to PDF bytes.
pub fn render_json(json: &str, base_dir: &Path) -> Result<Vec<u8>, ReportError> {
    generate(&draft_config(json, base_dir)?)
}

/// [`render_json`], then write the result to `path` the way
/// [`generate_to_path`] does.
pub fn render_json_to_path(json: &str, base_dir: &Path, path: &Path) -> Result<usize, ReportError> {
    generate_to_path(&draft_config(json, base_dir)?, path)
}

fn draft_config(json: &str, base_dir: &Path) -> Result<ReportConfig, ReportError> {
    let mut config = ReportConfig::from_json(json)?;
    config.resolve_paths(base_dir);
    Ok(config)
}
