//! # Report Model
//!
//! The input contract for the generator: one JSON document (a "draft") that
//! carries branding, page geometry, cover metadata and the ordered body
//! sections. Key names match the drafts written by the report form.
//!
//! Deserialization is deliberately lenient where drafts are sloppy (item
//! values may be numbers, `images` may be `{}`), and strict where the cover
//! cannot be composed without the value (`lab_image`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::ReportError;
use crate::style::hex_to_rgb;

/// A complete report draft ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Banner photo for the cover. Required.
    pub lab_image: String,
    /// Logo drawn on the cover banner (SVG or raster).
    #[serde(default)]
    pub logo_title: Option<String>,
    /// Logo drawn in the header of every body page.
    #[serde(default)]
    pub logo_inner: Option<String>,

    #[serde(default = "default_ombre_left")]
    pub ombre_left: String,
    #[serde(default = "default_ombre_right")]
    pub ombre_right: String,
    /// Gradient opacity, 0-1.
    #[serde(default = "default_ombre_alpha")]
    pub ombre_alpha: f64,
    /// Opacity of the white wash over the banner photo, 0-255.
    #[serde(default = "default_fade_alpha")]
    pub fade_alpha_255: f64,
    /// Banner height as a fraction of the page height.
    #[serde(default = "default_banner_ratio")]
    pub banner_ratio: f64,

    #[serde(default)]
    pub margins: Margins,

    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub sample: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub report_no: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub prepared_by: Vec<String>,
    #[serde(default)]
    pub approved_by: String,
    #[serde(default)]
    pub institute: String,
    #[serde(default)]
    pub inst_address: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub cust_address: String,
    #[serde(default)]
    pub cust_contact: String,
    #[serde(default)]
    pub copyright: Option<String>,

    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub fonts: FontConfig,
    /// Raster pixels per PDF point for cropped images.
    #[serde(default = "default_image_scale")]
    pub image_scale: f64,

    #[serde(default)]
    pub sections: Vec<Section>,
}

fn default_ombre_left() -> String {
    "#00afee".to_string()
}
fn default_ombre_right() -> String {
    "#64bb2f".to_string()
}
fn default_ombre_alpha() -> f64 {
    0.8
}
fn default_fade_alpha() -> f64 {
    160.0
}
fn default_banner_ratio() -> f64 {
    0.35
}
fn default_title() -> String {
    "Laser-Induced Damage Threshold Test (LIDT) Report".to_string()
}
fn default_image_scale() -> f64 {
    1.0
}

/// Page margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default = "default_side_mm")]
    pub left_mm: f64,
    #[serde(default = "default_side_mm")]
    pub right_mm: f64,
    #[serde(default = "default_side_mm")]
    pub top_mm: f64,
    #[serde(default = "default_bottom_mm")]
    pub bottom_mm: f64,
}

fn default_side_mm() -> f64 {
    16.0
}
fn default_bottom_mm() -> f64 {
    20.0
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left_mm: 16.0,
            right_mm: 16.0,
            top_mm: 16.0,
            bottom_mm: 20.0,
        }
    }
}

/// Fixed wording that differs between report families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    /// Running title prefix in the page header ("LIDT Test – <sample>").
    #[serde(default = "default_header_label")]
    pub header: String,
    /// Heading of the first cover info block.
    #[serde(default = "default_provider_heading")]
    pub provider_heading: String,
    #[serde(default = "default_customer_heading")]
    pub customer_heading: String,
}

fn default_header_label() -> String {
    "LIDT Test".to_string()
}
fn default_provider_heading() -> String {
    "HiLASE".to_string()
}
fn default_customer_heading() -> String {
    "Customer".to_string()
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            header: default_header_label(),
            provider_heading: default_provider_heading(),
            customer_heading: default_customer_heading(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// TrueType font for cover values that need more than WinAnsi.
    #[serde(default)]
    pub unicode: Option<PathBuf>,
}

/// One body section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Falls back to "Section <n>" when absent.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub images: Option<ImageBlockSpec>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Section {
    pub fn display_title(&self, number: usize) -> String {
        match &self.title {
            Some(t) => t.clone(),
            None => format!("Section {}", number),
        }
    }
}

/// A `[label, value]` row. Scalars of any JSON type are accepted and shown
/// as text; `null` becomes empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item(
    #[serde(deserialize_with = "scalar_as_string")] pub String,
    #[serde(deserialize_with = "scalar_as_string")] pub String,
);

impl Item {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self(label.into(), value.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn value(&self) -> &str {
        &self.1
    }
}

fn scalar_as_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    use serde::de::Error;
    match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, found {}",
            other
        ))),
    }
}

fn string_or_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match Option::<OneOrMany>::deserialize(d)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// An image block as written in the draft. An empty object means "no block".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlockSpec {
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub items: Vec<ImageRef>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub overlay_color: Option<String>,
    #[serde(default = "default_width_pct")]
    pub width_pct: f64,
    #[serde(default)]
    pub flatten_alpha_to_white: bool,
}

fn default_width_pct() -> f64 {
    0.8
}

impl Default for ImageBlockSpec {
    fn default() -> Self {
        Self {
            layout: None,
            items: Vec::new(),
            caption: String::new(),
            overlay_color: None,
            width_pct: default_width_pct(),
            flatten_alpha_to_white: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub path: Option<String>,
}

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// Color of the a/b/c/d letters drawn on multi-image blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayColor {
    #[default]
    White,
    Black,
}

/// The three grid layouts, each holding exactly the images it draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLayout {
    /// One full-width image (`template1`).
    Single { image: String },
    /// 2x2 grid of square cells, lettered a-d row-major (`template2`).
    Quad { images: [String; 4] },
    /// A third and two thirds on top, one full-width image below (`template3`).
    ThirdTwoThirds {
        top_left: String,
        top_right: String,
        bottom: String,
    },
}

/// Why an image block is skipped before any drawing happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockRejection {
    #[error("no layout given")]
    NoLayout,
    #[error("unknown layout '{0}'")]
    UnknownLayout(String),
    #[error("{layout} needs {needed} images, found {found}")]
    TooFewImages {
        layout: &'static str,
        needed: usize,
        found: usize,
    },
}

/// A validated image block.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub layout: ImageLayout,
    /// User caption, trimmed. May be empty.
    pub caption: String,
    pub overlay: OverlayColor,
    /// Fraction of the usable width, clamped to [0.1, 1].
    pub width_pct: f64,
    pub flatten_alpha: bool,
}

impl ImageBlock {
    pub fn from_spec(spec: &ImageBlockSpec) -> Result<Self, BlockRejection> {
        // The first `n` entries must carry a path; extras are ignored.
        fn take<const N: usize>(
            items: &[ImageRef],
            layout: &'static str,
        ) -> Result<[String; N], BlockRejection> {
            let paths: Vec<String> = items
                .iter()
                .take(N)
                .map_while(|r| r.path.clone().filter(|p| !p.trim().is_empty()))
                .collect();
            let found = paths.len();
            paths.try_into().map_err(|_| BlockRejection::TooFewImages {
                layout,
                needed: N,
                found,
            })
        }

        let layout = match spec.layout.as_deref().map(str::trim) {
            None | Some("") => return Err(BlockRejection::NoLayout),
            Some("template1") => {
                let [image] = take::<1>(&spec.items, "template1")?;
                ImageLayout::Single { image }
            }
            Some("template2") => ImageLayout::Quad {
                images: take::<4>(&spec.items, "template2")?,
            },
            Some("template3") => {
                let [top_left, top_right, bottom] = take::<3>(&spec.items, "template3")?;
                ImageLayout::ThirdTwoThirds {
                    top_left,
                    top_right,
                    bottom,
                }
            }
            Some(other) => return Err(BlockRejection::UnknownLayout(other.to_string())),
        };

        let overlay = match spec.overlay_color.as_deref() {
            None | Some("white") => OverlayColor::White,
            Some(_) => OverlayColor::Black,
        };
        let width_pct = if spec.width_pct.is_finite() {
            spec.width_pct.clamp(0.1, 1.0)
        } else {
            default_width_pct()
        };

        Ok(Self {
            layout,
            caption: spec.caption.trim().to_string(),
            overlay,
            width_pct,
            flatten_alpha: spec.flatten_alpha_to_white,
        })
    }
}

/// A value in a cover info block.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Text(String),
    /// One line per entry under a single label.
    List(Vec<String>),
}

impl ReportConfig {
    /// Parse a draft from JSON.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject values the layout cannot use.
    pub fn validate(&self) -> Result<(), ReportError> {
        let invalid = |msg: String| Err(ReportError::InvalidConfig(msg));

        if self.lab_image.trim().is_empty() {
            return invalid("`lab_image` is empty".to_string());
        }
        for (key, value) in [("ombre_left", &self.ombre_left), ("ombre_right", &self.ombre_right)] {
            if hex_to_rgb(value).is_none() {
                return invalid(format!("`{}` is not a hex color: '{}'", key, value));
            }
        }
        if !(0.0..=1.0).contains(&self.ombre_alpha) {
            return invalid(format!("`ombre_alpha` must be 0-1, got {}", self.ombre_alpha));
        }
        if !(0.0..=255.0).contains(&self.fade_alpha_255) {
            return invalid(format!(
                "`fade_alpha_255` must be 0-255, got {}",
                self.fade_alpha_255
            ));
        }
        if !(self.banner_ratio > 0.0 && self.banner_ratio < 1.0) {
            return invalid(format!(
                "`banner_ratio` must be between 0 and 1, got {}",
                self.banner_ratio
            ));
        }

        let m = &self.margins;
        for (key, v) in [
            ("left_mm", m.left_mm),
            ("right_mm", m.right_mm),
            ("top_mm", m.top_mm),
            ("bottom_mm", m.bottom_mm),
        ] {
            if !v.is_finite() || v < 0.0 {
                return invalid(format!("margin `{}` must be a non-negative number", key));
            }
        }
        // A4 is 210 x 297 mm.
        if m.left_mm + m.right_mm >= 200.0 {
            return invalid("left and right margins leave no usable width".to_string());
        }
        if m.top_mm + m.bottom_mm >= 200.0 {
            return invalid("top and bottom margins leave no usable height".to_string());
        }
        if !self.image_scale.is_finite() || self.image_scale <= 0.0 {
            return invalid(format!("`image_scale` must be positive, got {}", self.image_scale));
        }
        Ok(())
    }

    /// Make relative asset paths relative to `base` (the draft's directory).
    /// Data URIs and absolute paths are left alone.
    pub fn resolve_paths(&mut self, base: &Path) {
        resolve_in_place(&mut self.lab_image, base);
        for logo in [&mut self.logo_title, &mut self.logo_inner].into_iter().flatten() {
            resolve_in_place(logo, base);
        }
        if let Some(font) = &mut self.fonts.unicode {
            if font.is_relative() {
                *font = base.join(&*font);
            }
        }
        for section in &mut self.sections {
            if let Some(images) = &mut section.images {
                for path in images.items.iter_mut().filter_map(|r| r.path.as_mut()) {
                    resolve_in_place(path, base);
                }
            }
        }
    }

    /// Pixels per point for figure rasters, clamped to a sane range.
    pub fn raster_scale(&self) -> f64 {
        self.image_scale.clamp(0.5, 4.0)
    }

    /// Items of the provider (first) cover block.
    pub fn provider_items(&self) -> Vec<(&'static str, InfoValue)> {
        vec![
            ("Prepared by", InfoValue::List(self.prepared_by.clone())),
            ("Approved by", InfoValue::Text(self.approved_by.clone())),
            ("Institute", InfoValue::Text(self.institute.clone())),
            ("Address", InfoValue::Text(self.inst_address.clone())),
        ]
    }

    /// Items of the customer (second) cover block.
    pub fn customer_items(&self) -> Vec<(&'static str, InfoValue)> {
        vec![
            ("Name", InfoValue::Text(self.customer.clone())),
            ("Sample ID", InfoValue::Text(self.sample.clone())),
            ("Address", InfoValue::Text(self.cust_address.clone())),
            ("Contact", InfoValue::Text(self.cust_contact.clone())),
        ]
    }
}

fn resolve_in_place(path: &mut String, base: &Path) {
    if path.starts_with("data:") || path.is_empty() {
        return;
    }
    if Path::new(path.as_str()).is_relative() {
        *path = base.join(path.as_str()).to_string_lossy().into_owned();
    }
}

/// A complete draft, printed by `labreport --example`.
pub const EXAMPLE_DRAFT: &str = r##"{
  "lab_image": "assets/images/lab.jpg",
  "logo_title": "assets/logos/logo_white.svg",
  "logo_inner": "assets/logos/logo_white.svg",
  "ombre_left": "#00afee",
  "ombre_right": "#64bb2f",
  "ombre_alpha": 0.8,
  "fade_alpha_255": 160,
  "banner_ratio": 0.35,
  "margins": { "left_mm": 16, "right_mm": 16, "top_mm": 16, "bottom_mm": 20 },
  "title": "Laser-Induced Damage Threshold Test (LIDT) Report",
  "sample": "FS-2024-017",
  "standard": "ISO 21254-2:2011",
  "report_no": "DRAFT",
  "issue_date": "15 January 2024",
  "prepared_by": ["Jana Nováková", "Petr Dvořák"],
  "approved_by": "Martin Smrž",
  "institute": "HiLASE Centre, Institute of Physics of the Czech Academy of Sciences",
  "inst_address": "Za Radnicí 828, 252 41 Dolní Břežany, Czech Republic",
  "customer": "Optics Example s.r.o.",
  "cust_address": "Example Street 1, Prague",
  "cust_contact": "lab@example.com",
  "copyright": "© 2024 HiLASE Centre",
  "sections": [
    {
      "title": "Report Identification",
      "items": [["Report Number", "DRAFT"], ["Issue Date", "15 January 2024"]]
    },
    {
      "title": "Sample Information",
      "items": [
        ["Sample ID", "FS-2024-017"],
        ["Description", "Test coupon"],
        ["Date Received", "2024-01-15"],
        ["Preparation", "Drag-wiped with isopropyl alcohol"]
      ]
    },
    {
      "title": "Laser and Environmental Conditions",
      "items": [
        ["Laser Type", "Yb:YAG thin-disk"],
        ["Wavelength (nm)", 1030],
        ["Pulse Duration (1/e²)", "1.2 ps"],
        ["Polarization", "Linear"]
      ],
      "images": {
        "layout": "template2",
        "items": [
          { "path": "assets/images/near_field.png" },
          { "path": "assets/images/far_field.png" },
          { "path": "assets/images/temporal.png" },
          { "path": "assets/images/spectrum.png" }
        ],
        "overlay_color": "white",
        "caption": "Beam characterisation.",
        "width_pct": 0.8,
        "flatten_alpha_to_white": true
      },
      "notes": "Beam parameters measured at the sample plane."
    },
    {
      "title": "Test Setup",
      "images": {
        "layout": "template1",
        "items": [{ "path": "assets/images/setup.png" }],
        "overlay_color": "black",
        "caption": "Test setup.",
        "width_pct": 1
      }
    }
  ]
}
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ReportConfig {
        ReportConfig::from_json(r#"{"lab_image": "lab.jpg"}"#).unwrap()
    }

    #[test]
    fn test_defaults_match_house_style() {
        let cfg = minimal();
        assert_eq!(cfg.ombre_left, "#00afee");
        assert_eq!(cfg.ombre_right, "#64bb2f");
        assert_eq!(cfg.ombre_alpha, 0.8);
        assert_eq!(cfg.fade_alpha_255, 160.0);
        assert_eq!(cfg.banner_ratio, 0.35);
        assert_eq!(cfg.margins, Margins::default());
        assert_eq!(cfg.labels.header, "LIDT Test");
        assert!(cfg.sections.is_empty());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_missing_lab_image_is_fatal() {
        let err = ReportConfig::from_json(r#"{"title": "x"}"#).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("lab_image"), "{}", msg);
    }

    #[test]
    fn test_partial_margins_keep_defaults() {
        let cfg =
            ReportConfig::from_json(r#"{"lab_image": "a", "margins": {"left_mm": 25}}"#).unwrap();
        assert_eq!(cfg.margins.left_mm, 25.0);
        assert_eq!(cfg.margins.bottom_mm, 20.0);
    }

    #[test]
    fn test_items_accept_scalars() {
        let cfg = ReportConfig::from_json(
            r#"{"lab_image": "a", "sections": [{"items": [["Wavelength (nm)", 1030], ["Flag", true], ["Empty", null]]}]}"#,
        )
        .unwrap();
        let items = &cfg.sections[0].items;
        assert_eq!(items[0].value(), "1030");
        assert_eq!(items[1].value(), "true");
        assert_eq!(items[2].value(), "");
        assert_eq!(cfg.sections[0].display_title(1), "Section 1");
    }

    #[test]
    fn test_empty_images_object_parses() {
        let cfg = ReportConfig::from_json(
            r#"{"lab_image": "a", "sections": [{"title": "t", "images": {}}]}"#,
        )
        .unwrap();
        let spec = cfg.sections[0].images.as_ref().unwrap();
        assert_eq!(ImageBlock::from_spec(spec), Err(BlockRejection::NoLayout));
    }

    #[test]
    fn test_prepared_by_string_or_list() {
        let one = ReportConfig::from_json(r#"{"lab_image": "a", "prepared_by": "Jan"}"#).unwrap();
        assert_eq!(one.prepared_by, vec!["Jan"]);
        let many =
            ReportConfig::from_json(r#"{"lab_image": "a", "prepared_by": ["A", "B"]}"#).unwrap();
        assert_eq!(many.prepared_by.len(), 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = minimal();
        cfg.ombre_left = "teal".to_string();
        assert!(matches!(cfg.validate(), Err(ReportError::InvalidConfig(_))));

        let mut cfg = minimal();
        cfg.ombre_alpha = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = minimal();
        cfg.banner_ratio = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = minimal();
        cfg.margins.left_mm = 120.0;
        cfg.margins.right_mm = 90.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_template_counts() {
        let spec = |layout: &str, n: usize| ImageBlockSpec {
            layout: Some(layout.to_string()),
            items: (0..n).map(|i| ImageRef::new(format!("{}.png", i))).collect(),
            ..Default::default()
        };
        assert!(matches!(
            ImageBlock::from_spec(&spec("template1", 1)).unwrap().layout,
            ImageLayout::Single { .. }
        ));
        assert_eq!(
            ImageBlock::from_spec(&spec("template2", 3)),
            Err(BlockRejection::TooFewImages {
                layout: "template2",
                needed: 4,
                found: 3
            })
        );
        assert!(ImageBlock::from_spec(&spec("template3", 2)).is_err());
        assert!(ImageBlock::from_spec(&spec("template3", 5)).is_ok());
        assert_eq!(
            ImageBlock::from_spec(&spec("template9", 1)),
            Err(BlockRejection::UnknownLayout("template9".to_string()))
        );
        assert!(ImageBlock::from_spec(&spec("template1", 0)).is_err());
    }

    #[test]
    fn test_null_path_counts_as_missing() {
        let spec = ImageBlockSpec {
            layout: Some("template1".to_string()),
            items: vec![ImageRef { path: None }],
            ..Default::default()
        };
        assert!(ImageBlock::from_spec(&spec).is_err());
    }

    #[test]
    fn test_width_pct_and_overlay_normalised() {
        let mut spec = ImageBlockSpec {
            layout: Some("template1".to_string()),
            items: vec![ImageRef::new("a.png")],
            caption: "  Test setup.  ".to_string(),
            overlay_color: Some("black".to_string()),
            width_pct: 3.0,
            flatten_alpha_to_white: false,
        };
        let block = ImageBlock::from_spec(&spec).unwrap();
        assert_eq!(block.width_pct, 1.0);
        assert_eq!(block.overlay, OverlayColor::Black);
        assert_eq!(block.caption, "Test setup.");

        spec.width_pct = 0.0;
        assert_eq!(ImageBlock::from_spec(&spec).unwrap().width_pct, 0.1);
    }

    #[test]
    fn test_resolve_paths() {
        let mut cfg = ReportConfig::from_json(
            r#"{"lab_image": "img/lab.jpg", "logo_inner": "/abs/logo.svg",
                "sections": [{"images": {"layout": "template1", "items": [{"path": "data:image/png;base64,AAAA"}, {"path": "b.png"}]}}]}"#,
        )
        .unwrap();
        cfg.resolve_paths(Path::new("/drafts"));
        assert_eq!(Path::new(&cfg.lab_image), Path::new("/drafts/img/lab.jpg"));
        assert_eq!(cfg.logo_inner.as_deref(), Some("/abs/logo.svg"));
        let items = &cfg.sections[0].images.as_ref().unwrap().items;
        assert!(items[0].path.as_ref().unwrap().starts_with("data:"));
        assert_eq!(
            Path::new(items[1].path.as_ref().unwrap()),
            Path::new("/drafts/b.png")
        );
    }

    #[test]
    fn test_example_draft_parses_and_validates() {
        let cfg = ReportConfig::from_json(EXAMPLE_DRAFT).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.sections.len(), 4);
        assert_eq!(cfg.prepared_by.len(), 2);
    }

    #[test]
    fn test_cover_items_order() {
        let cfg = ReportConfig::from_json(EXAMPLE_DRAFT).unwrap();
        let labels: Vec<&str> = cfg.provider_items().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Prepared by", "Approved by", "Institute", "Address"]);
        let labels: Vec<&str> = cfg.customer_items().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["Name", "Sample ID", "Address", "Contact"]);
    }
}
