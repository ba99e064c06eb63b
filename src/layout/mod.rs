//! # Page Layout
//!
//! The report is laid out directly onto fixed A4 pages. There is no flow
//! tree and no slicing: every drawing routine takes the current vertical
//! position, asks whether the next unit of content fits above the bottom
//! limit, opens a new page through a [`PageStarter`] if it does not, draws,
//! and returns the next position.
//!
//! ```text
//!   ReportConfig
//!       │
//!       ├── cover::compose_cover        page 1, never paginated
//!       │
//!       └── sections::flow_sections     pages 2..n
//!               ├── figures::place_image_block
//!               └── PageStarter (chrome::BodyChrome) on every break
//! ```
//!
//! Coordinates are points with the origin at the top-left of the page and
//! y growing downward. The PDF writer flips them.

pub mod chrome;
pub mod cover;
pub mod figures;
pub mod sections;

use crate::error::ReportError;
use crate::font::{FontContext, FontFace};
use crate::image_loader::{self, LogoData};
use crate::model::{Margins, ReportConfig};
use crate::raster::RasterImage;
use crate::style::{Color, TextStyle};
use crate::svg::SvgLogo;

/// Points per millimeter.
pub const MM: f64 = 72.0 / 25.4;
/// A4 width in points.
pub const PAGE_WIDTH: f64 = 210.0 * MM;
/// A4 height in points.
pub const PAGE_HEIGHT: f64 = 297.0 * MM;
/// Clearance kept between the lowest content and the bottom margin.
pub const MIN_BOTTOM_GAP: f64 = 20.0;

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PageGeometry {
    pub fn a4(margins: &Margins) -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            left: margins.left_mm * MM,
            right: margins.right_mm * MM,
            top: margins.top_mm * MM,
            bottom: margins.bottom_mm * MM,
        }
    }

    pub fn usable_width(&self) -> f64 {
        self.width - self.left - self.right
    }

    pub fn right_x(&self) -> f64 {
        self.width - self.right
    }

    /// Lowest y any body content may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.height - self.bottom - MIN_BOTTOM_GAP
    }

    /// Where body content starts on every chrome page.
    pub fn content_top(&self) -> f64 {
        self.top + chrome::HEADER_HEIGHT + 6.0
    }

    /// Whether `needed` points starting at `y` stay above the bottom limit.
    pub fn fits(&self, y: f64, needed: f64) -> bool {
        y + needed <= self.bottom_limit()
    }
}

/// Handle to a raster registered with the [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Handle to a vector logo registered with the [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorId(pub usize);

/// What to draw for a positioned element.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle.
    Rect { fill: Color },
    /// One line of text. The element's `y` is the baseline.
    Text { text: String, style: TextStyle },
    /// A raster scaled into the element box.
    Image { image: ImageId },
    /// A vector logo scaled into the element box.
    Vector { logo: VectorId },
}

/// A positioned element on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    /// Top-left corner (baseline start for text).
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
}

/// A finished page.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    /// 1-based, counting the cover.
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match &e.draw {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Everything the PDF writer needs: pages plus the shared resources they
/// reference by id.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pages: Vec<LayoutPage>,
    pub images: Vec<RasterImage>,
    pub vectors: Vec<SvgLogo>,
}

/// The single drawing surface of one generation call. Pages are appended,
/// never revisited.
pub struct Surface<'f> {
    fonts: &'f FontContext,
    geometry: PageGeometry,
    pages: Vec<LayoutPage>,
    images: Vec<RasterImage>,
    vectors: Vec<SvgLogo>,
}

impl<'f> Surface<'f> {
    pub fn new(fonts: &'f FontContext, geometry: PageGeometry) -> Self {
        Self {
            fonts,
            geometry,
            pages: Vec::new(),
            images: Vec::new(),
            vectors: Vec::new(),
        }
    }

    pub fn fonts(&self) -> &'f FontContext {
        self.fonts
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn measure(&self, text: &str, face: FontFace, size: f64) -> f64 {
        self.fonts.measure(text, face, size)
    }

    /// Append a blank page and return its number.
    pub fn begin_page(&mut self) -> usize {
        let number = self.pages.len() + 1;
        self.pages.push(LayoutPage {
            number,
            width: self.geometry.width,
            height: self.geometry.height,
            elements: Vec::new(),
        });
        number
    }

    /// Number of the page being drawn, 0 before the first page.
    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[LayoutPage] {
        &self.pages
    }

    fn push(&mut self, element: LayoutElement) {
        if self.pages.is_empty() {
            self.begin_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Draw one line of text with its baseline at `baseline`.
    pub fn draw_text(&mut self, x: f64, baseline: f64, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let width = self.measure(text, style.face, style.size);
        self.push(LayoutElement {
            x,
            y: baseline,
            width,
            height: style.size,
            draw: DrawCommand::Text {
                text: text.to_string(),
                style,
            },
        });
    }

    /// Draw text ending at `right_x`.
    pub fn draw_text_right(&mut self, right_x: f64, baseline: f64, text: &str, style: TextStyle) {
        let width = self.measure(text, style.face, style.size);
        self.draw_text(right_x - width, baseline, text, style);
    }

    /// Draw text centered on `center_x`.
    pub fn draw_text_centered(&mut self, center_x: f64, baseline: f64, text: &str, style: TextStyle) {
        let width = self.measure(text, style.face, style.size);
        self.draw_text(center_x - width / 2.0, baseline, text, style);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Color) {
        self.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Rect { fill },
        });
    }

    pub fn add_image(&mut self, image: RasterImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn draw_image(&mut self, image: ImageId, x: f64, y: f64, width: f64, height: f64) {
        self.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Image { image },
        });
    }

    pub fn add_vector(&mut self, logo: SvgLogo) -> VectorId {
        self.vectors.push(logo);
        VectorId(self.vectors.len() - 1)
    }

    pub fn draw_vector(&mut self, logo: VectorId, x: f64, y: f64, width: f64, height: f64) {
        self.push(LayoutElement {
            x,
            y,
            width,
            height,
            draw: DrawCommand::Vector { logo },
        });
    }

    pub fn finish(self) -> RenderedDocument {
        RenderedDocument {
            pages: self.pages,
            images: self.images,
            vectors: self.vectors,
        }
    }
}

/// Opens pages on demand. Implementations draw whatever decoration a fresh
/// page needs and return the y at which content resumes.
pub trait PageStarter {
    fn start_new_page(&mut self, surface: &mut Surface<'_>) -> f64;
}

/// Document-wide numbering of image blocks that actually drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FigureCounter {
    drawn: u32,
}

impl FigureCounter {
    /// Number the next drawn block will carry.
    pub fn next_number(self) -> u32 {
        self.drawn + 1
    }

    pub fn record(self, drawn: bool) -> Self {
        Self {
            drawn: self.drawn + u32::from(drawn),
        }
    }

    pub fn count(self) -> u32 {
        self.drawn
    }
}

/// Result of placing one image block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub y: f64,
    pub drawn: bool,
}

/// Result of flowing the section list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOutcome {
    pub y: f64,
    pub figures: FigureCounter,
}

/// A logo registered with the surface, either vector or raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoAsset {
    kind: LogoKind,
    /// width / height
    aspect: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LogoKind {
    Vector(VectorId),
    Raster(ImageId),
}

impl LogoAsset {
    /// Load a logo and register it. Missing or unreadable logos are skipped
    /// with a warning.
    pub fn load(surface: &mut Surface<'_>, src: Option<&str>, what: &str) -> Option<Self> {
        let src = src.filter(|s| !s.trim().is_empty())?;
        let loaded = image_loader::load_logo(src).and_then(|data| match data {
            LogoData::Svg(text) => SvgLogo::parse(&text).map(|logo| {
                let aspect = logo.view_box.width / logo.view_box.height;
                Self {
                    kind: LogoKind::Vector(surface.add_vector(logo)),
                    aspect,
                }
            }),
            LogoData::Raster(img) => {
                let aspect = img.width() as f64 / img.height().max(1) as f64;
                let id = surface.add_image(RasterImage::from_dynamic(&img));
                Ok(Self {
                    kind: LogoKind::Raster(id),
                    aspect,
                })
            }
        });
        match loaded {
            Ok(asset) => Some(asset),
            Err(e) => {
                log::warn!("Skipping {}: {}", what, e);
                None
            }
        }
    }

    pub fn width_for_height(&self, height: f64) -> f64 {
        self.aspect * height
    }

    /// Draw scaled to `height` with its top-left corner at (x, y).
    pub fn draw(&self, surface: &mut Surface<'_>, x: f64, y: f64, height: f64) {
        let width = self.width_for_height(height);
        match self.kind {
            LogoKind::Vector(id) => surface.draw_vector(id, x, y, width, height),
            LogoKind::Raster(id) => surface.draw_image(id, x, y, width, height),
        }
    }
}

/// Lay out the whole report: cover, then the flowed body.
pub fn render_report(
    fonts: &FontContext,
    config: &ReportConfig,
) -> Result<RenderedDocument, ReportError> {
    let mut surface = Surface::new(fonts, PageGeometry::a4(&config.margins));

    cover::compose_cover(&mut surface, config)?;

    let mut chrome = chrome::BodyChrome::prepare(&mut surface, config)?;
    let y = chrome.start_new_page(&mut surface);
    let outcome = sections::flow_sections(
        &mut surface,
        &mut chrome,
        &config.sections,
        y,
        config.raster_scale(),
    );

    let doc = surface.finish();
    log::info!(
        "Laid out {} sections on {} pages ({} figures)",
        config.sections.len(),
        doc.pages.len(),
        outcome.figures.count()
    );
    Ok(doc)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Starts bare pages, no decoration.
    pub struct PlainPages {
        pub breaks: usize,
    }

    impl PlainPages {
        pub fn new() -> Self {
            Self { breaks: 0 }
        }
    }

    impl PageStarter for PlainPages {
        fn start_new_page(&mut self, surface: &mut Surface<'_>) -> f64 {
            self.breaks += 1;
            surface.begin_page();
            surface.geometry().content_top()
        }
    }
}
