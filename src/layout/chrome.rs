//! Header and footer drawn on every body page.
//!
//! The header is a full-width gradient bar with the inner logo on the left
//! and the running title on the right. The footer carries the report number
//! and the absolute page number (the cover counts as page 1).

use crate::error::ReportError;
use crate::font::FontFace;
use crate::model::ReportConfig;
use crate::raster::{make_gradient, RasterImage};
use crate::style::{palette, Color, TextStyle};

use super::{ImageId, LogoAsset, PageStarter, Surface};

/// Height of the header bar in points.
pub const HEADER_HEIGHT: f64 = 45.0;
const LOGO_HEIGHT: f64 = 25.0;
const TITLE_SIZE: f64 = 10.5;
const FOOTER_SIZE: f64 = 9.0;

/// Page decoration for body pages. Built once per document; the gradient
/// and the logo are registered with the surface a single time and shared by
/// every page.
#[derive(Debug, Clone)]
pub struct BodyChrome {
    header: ImageId,
    logo: Option<LogoAsset>,
    running_title: String,
    report_no: String,
}

impl BodyChrome {
    pub fn prepare(surface: &mut Surface<'_>, config: &ReportConfig) -> Result<Self, ReportError> {
        let width_px = surface.geometry().width as u32;
        let gradient = make_gradient(
            width_px,
            HEADER_HEIGHT as u32,
            &config.ombre_left,
            &config.ombre_right,
            config.ombre_alpha,
        )?;
        let header = surface.add_image(RasterImage::from_rgba(&gradient));
        let logo = LogoAsset::load(surface, config.logo_inner.as_deref(), "header logo");

        Ok(Self {
            header,
            logo,
            running_title: format!("{} \u{2013} {}", config.labels.header, config.sample),
            report_no: config.report_no.clone(),
        })
    }

    /// Draw the chrome onto the current page.
    pub fn draw(&self, surface: &mut Surface<'_>) {
        let g = *surface.geometry();

        surface.draw_image(self.header, 0.0, 0.0, g.width, HEADER_HEIGHT);

        if let Some(logo) = &self.logo {
            let top = (HEADER_HEIGHT - LOGO_HEIGHT) / 2.0;
            logo.draw(surface, g.left, top, LOGO_HEIGHT);
        }

        let title_baseline = HEADER_HEIGHT - ((HEADER_HEIGHT - TITLE_SIZE) / 2.0 + 1.0);
        surface.draw_text_right(
            g.right_x(),
            title_baseline,
            &self.running_title,
            TextStyle::new(FontFace::Regular, TITLE_SIZE, Color::WHITE),
        );

        let footer = TextStyle::new(FontFace::Regular, FOOTER_SIZE, palette::MUTED);
        let footer_baseline = g.height - g.bottom + 6.0;
        surface.draw_text(
            g.left,
            footer_baseline,
            &format!("Report No: {}", self.report_no),
            footer,
        );
        let page = surface.page_number();
        surface.draw_text_right(g.right_x(), footer_baseline, &format!("Page {}", page), footer);
    }
}

impl PageStarter for BodyChrome {
    fn start_new_page(&mut self, surface: &mut Surface<'_>) -> f64 {
        let number = surface.begin_page();
        log::debug!("Starting body page {}", number);
        self.draw(surface);
        surface.geometry().content_top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::layout::{DrawCommand, PageGeometry};

    fn config() -> ReportConfig {
        let mut cfg = ReportConfig::from_json(r#"{"lab_image": "lab.jpg"}"#).unwrap();
        cfg.sample = "FS-17".to_string();
        cfg.report_no = "R-042".to_string();
        cfg
    }

    #[test]
    fn test_chrome_is_identical_on_every_page() {
        let fonts = FontContext::new();
        let cfg = config();
        let mut surface = Surface::new(&fonts, PageGeometry::a4(&cfg.margins));
        surface.begin_page(); // cover
        let mut chrome = BodyChrome::prepare(&mut surface, &cfg).unwrap();

        let y1 = chrome.start_new_page(&mut surface);
        let y2 = chrome.start_new_page(&mut surface);
        assert_eq!(y1, y2);
        assert_eq!(y1, surface.geometry().content_top());

        let doc = surface.finish();
        // Gradient registered once, drawn on both pages.
        assert_eq!(doc.images.len(), 1);
        for page in &doc.pages[1..] {
            assert!(matches!(page.elements[0].draw, DrawCommand::Image { .. }));
            let texts: Vec<&str> = page.texts().collect();
            assert_eq!(texts[0], "LIDT Test \u{2013} FS-17");
            assert_eq!(texts[1], "Report No: R-042");
            assert_eq!(texts[2], format!("Page {}", page.number));
        }
        assert_eq!(doc.pages[2].texts().last(), Some("Page 3"));
    }

    #[test]
    fn test_running_title_is_right_aligned() {
        let fonts = FontContext::new();
        let cfg = config();
        let mut surface = Surface::new(&fonts, PageGeometry::a4(&cfg.margins));
        let mut chrome = BodyChrome::prepare(&mut surface, &cfg).unwrap();
        chrome.start_new_page(&mut surface);
        let g = *surface.geometry();
        let doc = surface.finish();
        let title = doc.pages[0]
            .elements
            .iter()
            .find(|e| matches!(&e.draw, DrawCommand::Text { text, .. } if text.starts_with("LIDT")))
            .unwrap();
        assert!((title.x + title.width - g.right_x()).abs() < 1e-9);
        assert!((title.y - 26.75).abs() < 1e-9);
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        let fonts = FontContext::new();
        let mut cfg = config();
        cfg.logo_inner = Some("/nope/logo.svg".to_string());
        let mut surface = Surface::new(&fonts, PageGeometry::a4(&cfg.margins));
        let mut chrome = BodyChrome::prepare(&mut surface, &cfg).unwrap();
        chrome.start_new_page(&mut surface);
        let doc = surface.finish();
        assert!(doc.vectors.is_empty());
        assert!(!doc.pages[0]
            .elements
            .iter()
            .any(|e| matches!(e.draw, DrawCommand::Vector { .. })));
    }
}
