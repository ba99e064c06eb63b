//! The cover page: photo banner with the brand wash, logo, title, subtitles,
//! the provider and customer info blocks, and an optional copyright line.
//!
//! The info blocks are measured before drawing so the pair sits at a fixed
//! distance below the banner no matter how many lines the values wrap to.

use std::path::Path;

use crate::error::ReportError;
use crate::font::FontFace;
use crate::image_loader;
use crate::model::{InfoValue, ReportConfig};
use crate::raster::{composite_over, cover_crop, make_gradient, white_wash, RasterImage};
use crate::style::{palette, Color, TextStyle};
use crate::text::wrap_text;

use super::{LogoAsset, Surface, MM};

const LOGO_HEIGHT: f64 = 48.0;
const TITLE_SIZE: f64 = 28.0;
const SUBTITLE_SIZE: f64 = 14.0;
const INFO_LINE_H: f64 = 18.0;
const INFO_SIZE: f64 = 12.0;

const HEADING: TextStyle = TextStyle::new(FontFace::Bold, 14.0, palette::BRAND);
const INFO_LABEL: TextStyle = TextStyle::new(FontFace::Bold, INFO_SIZE, palette::INK);
const INFO_VALUE: TextStyle = TextStyle::new(FontFace::Unicode, INFO_SIZE, palette::INK);

/// Draw page 1. Fails only when the banner photo is missing or unreadable.
pub fn compose_cover(surface: &mut Surface<'_>, config: &ReportConfig) -> Result<(), ReportError> {
    let g = *surface.geometry();
    let banner_w = g.width.floor();
    let banner_h = (g.height * config.banner_ratio).floor();

    let banner = build_banner(config, banner_w as u32, banner_h as u32)?;
    surface.begin_page();
    let banner = surface.add_image(banner);
    surface.draw_image(banner, 0.0, 0.0, banner_w, banner_h);

    if let Some(logo) = LogoAsset::load(surface, config.logo_title.as_deref(), "cover logo") {
        logo.draw(surface, 16.0 * MM, 30.0 * MM - LOGO_HEIGHT, LOGO_HEIGHT);
    }

    let max_width = g.width - 80.0 * MM;
    let center = g.width / 2.0;
    let title_style = TextStyle::new(FontFace::Bold, TITLE_SIZE, Color::WHITE);
    let lines = wrap_text(surface.fonts(), &config.title, title_style.face, title_style.size, max_width);
    let first = banner_h - 35.0 * MM - lines.len().saturating_sub(1) as f64 * 6.0;
    for (i, line) in lines.iter().enumerate() {
        let baseline = first + i as f64 * TITLE_SIZE * 1.1;
        surface.draw_text_centered(center, baseline, line, title_style);
    }

    let sub = TextStyle::new(FontFace::Regular, SUBTITLE_SIZE, Color::WHITE);
    surface.draw_text_centered(
        center,
        banner_h - 16.0 * MM,
        &format!("According to {}", config.standard),
        sub,
    );
    surface.draw_text_centered(
        center,
        banner_h - 8.0 * MM,
        &format!("No. {}", config.report_no),
        sub,
    );

    let provider = config.provider_items();
    let customer = config.customer_items();
    let mut info = InfoBlocks {
        x: 16.0 * MM,
        max_width,
        current: 0.0,
    };
    info.current = banner_h + 180.0 * MM
        - info.measure(surface, &provider)
        - info.measure(surface, &customer)
        - 10.0 * MM;
    info.draw(surface, &config.labels.provider_heading, &provider);
    info.draw(surface, &config.labels.customer_heading, &customer);

    if let Some(copyright) = config.copyright.as_deref().filter(|c| !c.is_empty()) {
        surface.draw_text_centered(
            center,
            g.height - 12.0 * MM,
            copyright,
            TextStyle::new(FontFace::Regular, 9.0, palette::MUTED),
        );
    }

    log::debug!("Cover composed, banner {}x{} pt", banner_w, banner_h);
    Ok(())
}

/// Cover-crop the photo, wash it with white, then lay the gradient on top.
fn build_banner(config: &ReportConfig, width: u32, height: u32) -> Result<RasterImage, ReportError> {
    let src = config.lab_image.as_str();
    if !src.starts_with("data:") && !Path::new(src).exists() {
        return Err(ReportError::MissingAsset {
            what: "banner photo",
            path: src.into(),
        });
    }
    let photo = image_loader::load_raster(src)?;

    let mut banner = cover_crop(&photo, width, height).to_rgba8();
    white_wash(&mut banner, config.fade_alpha_255 as u8);
    let gradient = make_gradient(
        banner.width(),
        banner.height(),
        &config.ombre_left,
        &config.ombre_right,
        config.ombre_alpha,
    )?;
    composite_over(&mut banner, &gradient);
    Ok(RasterImage::from_rgba(&banner))
}

struct InfoBlocks {
    x: f64,
    max_width: f64,
    /// Baseline of the next heading.
    current: f64,
}

impl InfoBlocks {
    fn value_lines(&self, surface: &Surface<'_>, text: &str) -> Vec<String> {
        wrap_text(surface.fonts(), text, INFO_VALUE.face, INFO_VALUE.size, self.max_width)
    }

    /// Height the block will take: one line per list entry or wrapped line,
    /// at least one per item, plus the heading and tail gaps.
    fn measure(&self, surface: &Surface<'_>, items: &[(&str, InfoValue)]) -> f64 {
        let lines: usize = items
            .iter()
            .map(|(_, value)| match value {
                InfoValue::List(entries) => entries.len().max(1),
                InfoValue::Text(text) => self.value_lines(surface, text).len().max(1),
            })
            .sum();
        lines as f64 * INFO_LINE_H + 8.0 * MM + 14.0 * MM
    }

    fn draw(&mut self, surface: &mut Surface<'_>, heading: &str, items: &[(&str, InfoValue)]) {
        surface.draw_text(self.x, self.current + 2.0, heading, HEADING);

        let label_x = self.x + 2.0 * MM;
        let mut y = self.current + 8.0 * MM;
        for (label, value) in items {
            let label = format!("{}:", label);
            let value_x = label_x + surface.measure(&label, INFO_LABEL.face, INFO_LABEL.size) + 4.0;
            surface.draw_text(label_x, y, &label, INFO_LABEL);

            match value {
                InfoValue::List(entries) => {
                    for entry in entries {
                        surface.draw_text(value_x, y, entry, INFO_VALUE);
                        y += INFO_LINE_H;
                    }
                    if entries.is_empty() {
                        y += INFO_LINE_H;
                    }
                }
                InfoValue::Text(text) => {
                    // Continuation lines start under the label.
                    for (i, line) in self.value_lines(surface, text).iter().enumerate() {
                        if i > 0 {
                            y += INFO_LINE_H;
                        }
                        let x = if i == 0 { value_x } else { label_x };
                        surface.draw_text(x, y, line, INFO_VALUE);
                    }
                    y += INFO_LINE_H;
                }
            }
        }
        self.current = y + 14.0 * MM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::{DrawCommand, LayoutElement, LayoutPage, PageGeometry};
    use image::{Rgb, RgbImage};

    fn config_with_photo(dir: &Path) -> ReportConfig {
        let photo = dir.join("lab.png");
        RgbImage::from_pixel(300, 120, Rgb([40, 40, 40])).save(&photo).unwrap();
        let mut cfg = ReportConfig::from_json(r#"{"lab_image": "x"}"#).unwrap();
        cfg.lab_image = photo.to_string_lossy().into_owned();
        cfg.standard = "ISO 21254-2:2011".to_string();
        cfg.report_no = "R-7".to_string();
        cfg
    }

    fn compose(cfg: &ReportConfig) -> Result<crate::layout::RenderedDocument, ReportError> {
        let fonts = FontContext::new();
        let mut surface = Surface::new(&fonts, PageGeometry::a4(&cfg.margins));
        compose_cover(&mut surface, cfg)?;
        Ok(surface.finish())
    }

    fn text<'a>(page: &'a LayoutPage, s: &str) -> &'a LayoutElement {
        page.elements
            .iter()
            .find(|e| matches!(&e.draw, DrawCommand::Text { text, .. } if text == s))
            .unwrap()
    }

    #[test]
    fn test_missing_banner_photo_is_fatal() {
        let cfg = ReportConfig::from_json(r#"{"lab_image": "/no/such/lab.jpg"}"#).unwrap();
        match compose(&cfg) {
            Err(ReportError::MissingAsset { what, .. }) => assert_eq!(what, "banner photo"),
            other => panic!("expected MissingAsset, got {:?}", other.map(|d| d.pages.len())),
        }
    }

    #[test]
    fn test_banner_size_and_wash() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with_photo(dir.path());
        let doc = compose(&cfg).unwrap();
        assert_eq!(doc.pages.len(), 1);

        let banner = &doc.images[0];
        let expected_h = (PageGeometry::a4(&cfg.margins).height * 0.35).floor() as u32;
        assert_eq!((banner.width_px, banner.height_px), (595, expected_h));
        assert!(banner.alpha.is_none(), "the composited banner is opaque");

        let el = &doc.pages[0].elements[0];
        assert_eq!((el.x, el.y, el.width), (0.0, 0.0, 595.0));
    }

    #[test]
    fn test_subtitles_are_centered_in_banner() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with_photo(dir.path());
        let doc = compose(&cfg).unwrap();
        let page = &doc.pages[0];
        let banner_h = (page.height * 0.35).floor();

        let std_line = text(page, "According to ISO 21254-2:2011");
        assert!((std_line.x + std_line.width / 2.0 - page.width / 2.0).abs() < 1e-9);
        assert!((std_line.y - (banner_h - 16.0 * MM)).abs() < 1e-9);
        let no = text(page, "No. R-7");
        assert!((no.y - (banner_h - 8.0 * MM)).abs() < 1e-9);
    }

    #[test]
    fn test_info_blocks_are_anchored_below_banner() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_with_photo(dir.path());
        cfg.prepared_by = vec!["A. One".to_string(), "B. Two".to_string()];
        cfg.approved_by = "C. Three".to_string();
        let doc = compose(&cfg).unwrap();
        let page = &doc.pages[0];
        let banner_h = (page.height * 0.35).floor();

        // Provider: 2 preparers + 3 single lines; customer: 4 single lines.
        let h1 = 5.0 * 18.0 + 22.0 * MM;
        let h2 = 4.0 * 18.0 + 22.0 * MM;
        let start = banner_h + 180.0 * MM - h1 - h2 - 10.0 * MM;
        assert!((text(page, "HiLASE").y - (start + 2.0)).abs() < 1e-9);
        assert!((text(page, "Customer").y - (start + h1 + 2.0)).abs() < 1e-9);

        let first = text(page, "A. One");
        let second = text(page, "B. Two");
        assert_eq!(first.x, second.x);
        assert!((second.y - first.y - 18.0).abs() < 1e-9);
        let label = text(page, "Prepared by:");
        assert!((first.x - (label.x + label.width + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_copyright_only_when_given() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_with_photo(dir.path());
        let doc = compose(&cfg).unwrap();
        assert!(!doc.pages[0].texts().any(|t| t.contains('©')));

        cfg.copyright = Some("© 2024 HiLASE Centre".to_string());
        let doc = compose(&cfg).unwrap();
        let line = text(&doc.pages[0], "© 2024 HiLASE Centre");
        assert!((line.y - (doc.pages[0].height - 12.0 * MM)).abs() < 1e-9);
    }
}
