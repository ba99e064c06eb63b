//! Integration tests for the labreport pipeline.
//!
//! These tests exercise the full path from a JSON draft to PDF output.
//! They verify:
//! - Drafts deserialize and validate
//! - The cover, chrome and section flow land on the right pages
//! - Page breaks happen at the right places
//! - Figure numbering skips blocks that fail to draw
//! - PDF output is structurally valid

use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{json, Value};

use labreport::font::{FontContext, FontFace};
use labreport::layout::{render_report, DrawCommand, LayoutPage, RenderedDocument};
use labreport::model::{ReportConfig, EXAMPLE_DRAFT};
use labreport::ReportError;

// ─── Helpers ────────────────────────────────────────────────────

const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 40">
  <g fill="#ffffff"><rect x="0" y="0" width="40" height="40"/><circle cx="80" cy="20" r="18"/></g>
</svg>"##;

fn write_photo(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(640, 360, Rgb([90, 110, 130])).save(path).unwrap();
}

fn write_png(path: &Path, w: u32, h: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(w, h, Rgba([20, 160, 220, 255])).save(path).unwrap();
}

/// A draft whose assets live in `dir`, with the given sections.
fn draft(dir: &Path, sections: Value) -> ReportConfig {
    write_photo(&dir.join("lab.jpg"));
    std::fs::write(dir.join("logo.svg"), LOGO_SVG).unwrap();
    let value = json!({
        "lab_image": "lab.jpg",
        "logo_title": "logo.svg",
        "logo_inner": "logo.svg",
        "title": "Laser-Induced Damage Threshold Test (LIDT) Report",
        "sample": "FS-17",
        "standard": "ISO 21254-2:2011",
        "report_no": "R-2024-03",
        "prepared_by": ["Jana Nováková"],
        "sections": sections,
    });
    let mut cfg = ReportConfig::from_json(&value.to_string()).unwrap();
    cfg.resolve_paths(dir);
    cfg
}

fn layout(cfg: &ReportConfig) -> RenderedDocument {
    let fonts = FontContext::new();
    render_report(&fonts, cfg).unwrap()
}

fn texts(page: &LayoutPage) -> Vec<&str> {
    page.texts().collect()
}

fn all_texts(doc: &RenderedDocument) -> Vec<&str> {
    doc.pages.iter().flat_map(|p| p.texts()).collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

fn count_pages_in_pdf(bytes: &[u8]) -> usize {
    String::from_utf8_lossy(bytes).matches("/Type /Page ").count()
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_no_sections_gives_cover_and_one_body_page() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = draft(dir.path(), json!([]));
    let doc = layout(&cfg);
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(
        texts(&doc.pages[1]),
        ["LIDT Test \u{2013} FS-17", "Report No: R-2024-03", "Page 2"]
    );
}

#[test]
fn test_cover_page_content() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = draft(dir.path(), json!([]));
    let doc = layout(&cfg);
    let cover = texts(&doc.pages[0]);
    assert!(cover.contains(&"According to ISO 21254-2:2011"));
    assert!(cover.contains(&"No. R-2024-03"));
    assert!(cover.contains(&"HiLASE"));
    assert!(cover.contains(&"Customer"));
    assert!(cover.contains(&"Jana Nováková"));
    // The cover has no footer.
    assert!(!cover.iter().any(|t| t.starts_with("Page ")));
    // Cover and body logos resolve to the same file but are registered per use.
    assert_eq!(doc.vectors.len(), 2);
}

#[test]
fn test_sample_information_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = draft(
        dir.path(),
        json!([{
            "title": "Sample Information",
            "items": [["Description", "Test coupon"], ["Date Received", "2024-01-15"]]
        }]),
    );
    let doc = layout(&cfg);
    assert_eq!(doc.pages.len(), 2, "no page break");

    let body = texts(&doc.pages[1]);
    assert_eq!(
        &body[3..],
        [
            "1. Sample Information",
            "Description:",
            "Test coupon",
            "Date Received:",
            "2024-01-15"
        ]
    );
    assert!(!all_texts(&doc).iter().any(|t| t.starts_with("Figure")));
}

// ─── Page Overflow Tests ────────────────────────────────────────

#[test]
fn test_long_item_list_breaks_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let items: Vec<Value> = (1..=60)
        .map(|i| json!([format!("Shot {}", i), format!("{}.0 J/cm²", i)]))
        .collect();
    let cfg = draft(dir.path(), json!([{ "title": "Results", "items": items }]));
    let doc = layout(&cfg);
    assert_eq!(doc.pages.len(), 3, "cover plus two body pages");

    // Chrome redrawn on the continuation page.
    let page3 = texts(&doc.pages[2]);
    assert_eq!(page3[0], "LIDT Test \u{2013} FS-17");
    assert_eq!(page3[2], "Page 3");

    // Every pair appears once, in order.
    let labels: Vec<String> = all_texts(&doc)
        .into_iter()
        .filter(|t| t.starts_with("Shot "))
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = (1..=60).map(|i| format!("Shot {}:", i)).collect();
    assert_eq!(labels, expected);

    // The continuation starts at the top of the content area.
    let top = labreport::layout::PageGeometry::a4(&cfg.margins).content_top();
    let first_row = doc.pages[2]
        .elements
        .iter()
        .find(|e| matches!(&e.draw, DrawCommand::Text { text, .. } if text.starts_with("Shot ")))
        .unwrap();
    assert!((first_row.y - top).abs() < 1e-9);
}

// ─── Figure Tests ───────────────────────────────────────────────

#[test]
fn test_template1_two_line_caption() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("setup.png"), 800, 400);
    let caption = "Experimental arrangement showing the laser head, the variable attenuator, \
                   the focusing optics and the sample mount in front of the beam dump";
    let cfg = draft(
        dir.path(),
        json!([{
            "title": "Test Setup",
            "images": {
                "layout": "template1",
                "items": [{ "path": "setup.png" }],
                "caption": caption,
                "width_pct": 1.0
            }
        }]),
    );
    let doc = layout(&cfg);
    assert_eq!(doc.pages.len(), 2);

    let g = labreport::layout::PageGeometry::a4(&cfg.margins);
    let page = &doc.pages[1];
    let caption_lines: Vec<_> = page
        .elements
        .iter()
        .filter(|e| {
            matches!(&e.draw, DrawCommand::Text { style, .. } if style.face == FontFace::Oblique && style.size == 10.0)
        })
        .collect();
    assert_eq!(caption_lines.len(), 2);
    assert!(caption_lines.iter().all(|e| (e.x - g.left).abs() < 1e-9));

    let image = page
        .elements
        .iter()
        .filter(|e| matches!(e.draw, DrawCommand::Image { .. }))
        .find(|e| e.y > 50.0)
        .unwrap();
    assert!((image.width - g.usable_width()).abs() < 1e-9);
    assert!((image.height - g.usable_width() / 2.0).abs() < 1e-9);
    // Last caption baseline sits two line steps below the image gap.
    let last = caption_lines[1];
    assert!((last.y - (image.y + image.height + 8.0 + 24.0)).abs() < 1e-9);
}

#[test]
fn test_template2_with_three_images_never_draws() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png", "c.png", "d.png"] {
        write_png(&dir.path().join(name), 64, 64);
    }
    let cfg = draft(
        dir.path(),
        json!([
            {
                "title": "Short",
                "images": {
                    "layout": "template2",
                    "items": [{ "path": "a.png" }, { "path": "b.png" }, { "path": "c.png" }],
                    "caption": "never shown"
                }
            },
            {
                "title": "Full",
                "images": {
                    "layout": "template2",
                    "items": [{ "path": "a.png" }, { "path": "b.png" }, { "path": "c.png" }, { "path": "d.png" }],
                    "caption": "Beam profiles"
                }
            }
        ]),
    );
    let doc = layout(&cfg);
    let figures: Vec<&str> = all_texts(&doc)
        .into_iter()
        .filter(|t| t.starts_with("Figure"))
        .collect();
    assert_eq!(figures, ["Figure 1: Beam profiles"]);
    let letters: Vec<&str> = all_texts(&doc)
        .into_iter()
        .filter(|t| ["a", "b", "c", "d"].contains(t))
        .collect();
    assert_eq!(letters, ["a", "b", "c", "d"]);
}

#[test]
fn test_figure_numbers_are_consecutive() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("one.png"), 100, 60);
    for name in ["l.png", "r.png", "b.png"] {
        write_png(&dir.path().join(name), 90, 90);
    }
    let block = |layout: &str, items: Vec<&str>, caption: &str| {
        json!({
            "layout": layout,
            "items": items.into_iter().map(|p| json!({ "path": p })).collect::<Vec<_>>(),
            "caption": caption
        })
    };
    let cfg = draft(
        dir.path(),
        json!([
            { "title": "A", "images": block("template1", vec!["one.png"], "first") },
            { "title": "B", "images": block("template1", vec!["missing.png"], "broken") },
            { "title": "C", "images": {} },
            { "title": "D", "images": block("template3", vec!["l.png", "r.png", "b.png"], "") },
            { "title": "E", "images": block("template9", vec!["one.png"], "unknown") },
            { "title": "F", "images": block("template1", vec!["one.png"], "last") }
        ]),
    );
    let doc = layout(&cfg);
    let figures: Vec<&str> = all_texts(&doc)
        .into_iter()
        .filter(|t| t.starts_with("Figure"))
        .collect();
    assert_eq!(figures, ["Figure 1: first", "Figure 2", "Figure 3: last"]);

    // All six section headers still render.
    let headers: Vec<&str> = all_texts(&doc)
        .into_iter()
        .filter(|t| t.len() == 4 && t.as_bytes()[1..3] == *b". ")
        .collect();
    assert_eq!(headers, ["1. A", "2. B", "3. C", "4. D", "5. E", "6. F"]);
}

// ─── Error Tests ────────────────────────────────────────────────

#[test]
fn test_missing_banner_photo_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = draft(dir.path(), json!([]));
    cfg.lab_image = dir.path().join("gone.jpg").to_string_lossy().into_owned();
    let out = dir.path().join("report.pdf");

    let err = labreport::generate_to_path(&cfg, &out).unwrap_err();
    assert!(matches!(err, ReportError::MissingAsset { what: "banner photo", .. }));
    assert!(!out.exists(), "no partial output");
}

#[test]
fn test_draft_without_lab_image_fails_to_parse() {
    let err = ReportConfig::from_json(r#"{"title": "x"}"#).unwrap_err();
    assert!(matches!(err, ReportError::Parse { .. }));
    assert!(err.to_string().contains("lab_image"));
}

#[test]
fn test_unreadable_unicode_font_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = draft(dir.path(), json!([]));
    cfg.fonts.unicode = Some(dir.path().join("DejaVuSans.ttf"));
    let err = labreport::generate(&cfg).unwrap_err();
    assert!(matches!(err, ReportError::Font(_)));
}

#[test]
fn test_invalid_color_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = draft(dir.path(), json!([]));
    cfg.ombre_left = "teal".to_string();
    let err = labreport::generate(&cfg).unwrap_err();
    assert!(matches!(err, ReportError::InvalidConfig(_)));
}

#[test]
fn test_missing_inner_logo_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = draft(dir.path(), json!([]));
    cfg.logo_inner = Some(dir.path().join("nope.svg").to_string_lossy().into_owned());
    let doc = layout(&cfg);
    assert_eq!(doc.pages.len(), 2);
    assert_eq!(doc.vectors.len(), 1, "only the cover logo");
}

// ─── PDF Output Tests ───────────────────────────────────────────

#[test]
fn test_generate_writes_valid_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let items: Vec<Value> = (1..=60).map(|i| json!([format!("Row {}", i), i])).collect();
    let cfg = draft(dir.path(), json!([{ "title": "Data", "items": items }]));
    let out = dir.path().join("report.pdf");

    let written = labreport::generate_to_path(&cfg, &out).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(written, bytes.len());
    assert_valid_pdf(&bytes);
    assert_eq!(count_pages_in_pdf(&bytes), 3);

    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
    assert!(text.contains("/Subject (ISO 21254-2:2011, No. R-2024-03)"));
}

#[test]
fn test_example_draft_renders() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_photo(&root.join("assets/images/lab.jpg"));
    std::fs::create_dir_all(root.join("assets/logos")).unwrap();
    std::fs::write(root.join("assets/logos/logo_white.svg"), LOGO_SVG).unwrap();
    for name in ["near_field", "far_field", "temporal", "spectrum", "setup"] {
        write_png(&root.join(format!("assets/images/{}.png", name)), 120, 80);
    }

    let bytes = labreport::render_json(EXAMPLE_DRAFT, root).unwrap();
    assert_valid_pdf(&bytes);

    let mut cfg = ReportConfig::from_json(EXAMPLE_DRAFT).unwrap();
    cfg.resolve_paths(root);
    let doc = layout(&cfg);
    let figures: Vec<&str> = all_texts(&doc)
        .into_iter()
        .filter(|t| t.starts_with("Figure"))
        .collect();
    assert_eq!(figures, ["Figure 1: Beam characterisation.", "Figure 2: Test setup."]);
    assert_eq!(count_pages_in_pdf(&bytes), doc.pages.len());
}

#[test]
fn test_render_json_to_path_resolves_and_writes() {
    let dir = tempfile::tempdir().unwrap();
    write_photo(&dir.path().join("lab.jpg"));
    let json = json!({ "lab_image": "lab.jpg", "sections": [{ "title": "Data" }] }).to_string();
    let out = dir.path().join("report.pdf");

    let written = labreport::render_json_to_path(&json, dir.path(), &out).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(written, bytes.len());
    assert_valid_pdf(&bytes);
    assert_eq!(count_pages_in_pdf(&bytes), 2);

    let missing = dir.path().join("missing.pdf");
    let err = labreport::render_json_to_path(r#"{"lab_image": "gone.jpg"}"#, dir.path(), &missing)
        .unwrap_err();
    assert!(matches!(err, ReportError::MissingAsset { .. }));
    assert!(!missing.exists());
}
