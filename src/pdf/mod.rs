//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer covering exactly what a report
//! needs: filled rectangles, single-line text runs, raster images and vector
//! logos.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, images, pages, content streams)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! ## Shared resources
//!
//! Every raster registered with the layout surface becomes one image XObject
//! (plus an SMask when it has transparency), written once and referenced as
//! `/Im<n>` from every page that draws it. The header gradient and the logo
//! are therefore embedded a single time however many pages there are.
//!
//! ## Font Embedding
//!
//! The Helvetica family uses simple Type1 references with WinAnsi encoding.
//! The optional unicode face is embedded whole as CIDFontType2 with
//! Identity-H encoding, producing 5 PDF objects: FontFile2, FontDescriptor,
//! CIDFont, ToUnicode CMap, and the root Type0 dictionary.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::font::{CustomFont, FontContext, ResolvedFont, StandardFont};
use crate::layout::{DrawCommand, LayoutElement, LayoutPage, RenderedDocument};
use crate::model::ReportConfig;
use crate::raster::RasterImage;
use crate::style::Color;
use crate::svg::{SvgCommand, SvgLogo};

/// Values for the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl DocumentInfo {
    /// Title and sample, preparers as author, standard / number / date as subject.
    pub fn from_config(config: &ReportConfig) -> Self {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());

        let title = match non_empty(&config.sample) {
            Some(sample) => Some(format!("{} \u{2013} {}", config.title, sample)),
            None => non_empty(&config.title),
        };
        let author = non_empty(&config.prepared_by.join(", "));
        let subject_parts: Vec<String> = [
            non_empty(&config.standard),
            non_empty(&config.report_no).map(|n| format!("No. {}", n)),
            config.issue_date.as_deref().and_then(non_empty),
        ]
        .into_iter()
        .flatten()
        .collect();
        let subject = (!subject_parts.is_empty()).then(|| subject_parts.join(", "));

        Self {
            title,
            author,
            subject,
        }
    }
}

/// A font resource as it appears in a page's /Font dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FontSlot {
    Standard(StandardFont),
    Custom,
}

impl FontSlot {
    fn of(font: ResolvedFont<'_>) -> Self {
        match font {
            ResolvedFont::Standard(f) => Self::Standard(f),
            ResolvedFont::Custom(_) => Self::Custom,
        }
    }
}

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Font slots in resource order (/F0, /F1, ...) with their object ids.
    font_objects: Vec<(FontSlot, usize)>,
    /// XObject ids, indexed like `RenderedDocument::images` (/Im0, /Im1, ...).
    image_objects: Vec<usize>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(PdfObject { data });
        self.objects.len() - 1
    }

    fn push_stream(&mut self, dict_extra: &str, raw: &[u8]) -> usize {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {} /Filter /FlateDecode{} >>\nstream\n",
            compressed.len(),
            dict_extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }

    fn font_index(&self, slot: FontSlot) -> usize {
        self.font_objects
            .iter()
            .position(|(s, _)| *s == slot)
            .unwrap_or(0)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a laid-out document to a PDF byte vector.
    pub fn write(&self, doc: &RenderedDocument, info: &DocumentInfo, fonts: &FontContext) -> Vec<u8> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
            image_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        builder.push(Vec::new());
        builder.push(Vec::new());
        builder.push(Vec::new());

        self.register_fonts(&mut builder, &doc.pages, fonts);
        for image in &doc.images {
            let id = Self::write_image_xobject(&mut builder, image);
            builder.image_objects.push(id);
        }

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in &doc.pages {
            let content = self.build_content_stream(page, doc, &builder, fonts);
            let content_obj_id = builder.push_stream("", content.as_bytes());

            let font_resources = self.build_font_resource_dict(&builder.font_objects);
            let xobject_resources = self.build_xobject_resource_dict(page, &builder);
            let mut resources = format!("/Font << {} >>", font_resources);
            if !xobject_resources.is_empty() {
                let _ = write!(resources, " /XObject << {} >>", xobject_resources);
            }
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_obj_id, resources
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let mut info_dict = String::from("<< ");
        for (key, value) in [
            ("Title", &info.title),
            ("Author", &info.author),
            ("Subject", &info.subject),
        ] {
            if let Some(value) = value {
                let _ = write!(info_dict, "/{} {} ", key, Self::text_string(value));
            }
        }
        let _ = write!(
            info_dict,
            "/Producer (labreport {}) /Creator (labreport) >>",
            env!("CARGO_PKG_VERSION")
        );
        let info_obj_id = builder.push(info_dict.into_bytes());

        let bytes = self.serialize(&builder, info_obj_id);
        log::debug!(
            "Serialized {} pages, {} images, {} fonts into {} bytes",
            doc.pages.len(),
            doc.images.len(),
            builder.font_objects.len(),
            bytes.len()
        );
        bytes
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(
        &self,
        page: &LayoutPage,
        doc: &RenderedDocument,
        builder: &PdfBuilder,
        fonts: &FontContext,
    ) -> String {
        let mut stream = String::new();
        for element in &page.elements {
            self.write_element(&mut stream, element, page.height, doc, builder, fonts);
        }
        stream
    }

    /// Write a single layout element as PDF operators.
    fn write_element(
        &self,
        stream: &mut String,
        element: &LayoutElement,
        page_height: f64,
        doc: &RenderedDocument,
        builder: &PdfBuilder,
        fonts: &FontContext,
    ) {
        match &element.draw {
            DrawCommand::Rect { fill } => {
                let y = page_height - element.y - element.height;
                let _ = write!(
                    stream,
                    "q\n{}{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    Self::fill_color(fill),
                    element.x,
                    y,
                    element.width,
                    element.height
                );
            }

            DrawCommand::Text { text, style } => {
                let resolved = fonts.resolve(style.face);
                let idx = builder.font_index(FontSlot::of(resolved));
                let pdf_y = page_height - element.y;
                let _ = write!(
                    stream,
                    "BT\n{}/F{} {:.1} Tf\n{:.2} {:.2} Td\n",
                    Self::fill_color(&style.color),
                    idx,
                    style.size,
                    element.x,
                    pdf_y
                );
                match resolved {
                    ResolvedFont::Custom(font) => {
                        let _ = write!(stream, "<{}> Tj\n", Self::encode_glyphs(font, text));
                    }
                    ResolvedFont::Standard(_) => {
                        let _ = write!(stream, "({}) Tj\n", Self::encode_winansi(text));
                    }
                }
                stream.push_str("ET\n");
            }

            DrawCommand::Image { image } => {
                let y = page_height - element.y - element.height;
                let _ = write!(
                    stream,
                    "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                    element.width, element.height, element.x, y, image.0
                );
            }

            DrawCommand::Vector { logo } => {
                if let Some(svg) = doc.vectors.get(logo.0) {
                    Self::write_vector(stream, svg, element, page_height);
                }
            }
        }
    }

    /// Draw a vector logo into the element box. SVG user space is y-down, so
    /// the transform flips it while scaling to the element height.
    fn write_vector(stream: &mut String, logo: &SvgLogo, element: &LayoutElement, page_height: f64) {
        let s = logo.scale_for_height(element.height);
        let vb = &logo.view_box;
        let _ = write!(
            stream,
            "q\n{:.6} 0 0 {:.6} {:.4} {:.4} cm\n",
            s,
            -s,
            element.x - vb.min_x * s,
            page_height - element.y + vb.min_y * s
        );
        for cmd in &logo.commands {
            let _ = match *cmd {
                SvgCommand::MoveTo(x, y) => writeln!(stream, "{:.3} {:.3} m", x, y),
                SvgCommand::LineTo(x, y) => writeln!(stream, "{:.3} {:.3} l", x, y),
                SvgCommand::CurveTo(x1, y1, x2, y2, x, y) => writeln!(
                    stream,
                    "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c",
                    x1, y1, x2, y2, x, y
                ),
                SvgCommand::ClosePath => writeln!(stream, "h"),
                SvgCommand::SetFill(r, g, b) => writeln!(stream, "{:.3} {:.3} {:.3} rg", r, g, b),
                SvgCommand::SetStroke(r, g, b) => writeln!(stream, "{:.3} {:.3} {:.3} RG", r, g, b),
                SvgCommand::SetStrokeWidth(w) => writeln!(stream, "{:.3} w", w),
                SvgCommand::Transform([a, b, c, d, e, f]) => writeln!(
                    stream,
                    "{:.6} {:.6} {:.6} {:.6} {:.4} {:.4} cm",
                    a, b, c, d, e, f
                ),
                SvgCommand::Fill => writeln!(stream, "f"),
                SvgCommand::Stroke => writeln!(stream, "S"),
                SvgCommand::FillAndStroke => writeln!(stream, "B"),
                SvgCommand::SaveState => writeln!(stream, "q"),
                SvgCommand::RestoreState => writeln!(stream, "Q"),
            };
        }
        stream.push_str("Q\n");
    }

    fn fill_color(c: &Color) -> String {
        format!("{:.3} {:.3} {:.3} rg\n", c.r, c.g, c.b)
    }

    /// Register the fonts actually used across all pages, in first-use order.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[LayoutPage], fonts: &FontContext) {
        let mut slots: Vec<FontSlot> = Vec::new();
        let mut custom_chars: BTreeSet<char> = BTreeSet::new();

        for page in pages {
            for element in &page.elements {
                if let DrawCommand::Text { text, style } = &element.draw {
                    let resolved = fonts.resolve(style.face);
                    let slot = FontSlot::of(resolved);
                    if !slots.contains(&slot) {
                        slots.push(slot);
                    }
                    if let ResolvedFont::Custom(_) = resolved {
                        custom_chars.extend(text.chars());
                    }
                }
            }
        }
        // Pages always carry a /Font entry, even a page with no text.
        if slots.is_empty() {
            slots.push(FontSlot::Standard(StandardFont::Helvetica));
        }

        for slot in slots {
            let obj_id = match (slot, fonts.unicode_font()) {
                (FontSlot::Custom, Some(custom)) => {
                    Self::write_custom_font_objects(builder, custom, &custom_chars)
                }
                (FontSlot::Standard(font), _) => Self::write_standard_font(builder, font),
                (FontSlot::Custom, None) => {
                    Self::write_standard_font(builder, StandardFont::Helvetica)
                }
            };
            builder.font_objects.push((slot, obj_id));
        }
    }

    fn write_standard_font(builder: &mut PdfBuilder, font: StandardFont) -> usize {
        builder.push(
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            )
            .into_bytes(),
        )
    }

    /// Write a raster as one or two XObject PDF objects.
    /// Returns the main XObject ID.
    fn write_image_xobject(builder: &mut PdfBuilder, image: &RasterImage) -> usize {
        let smask_ref = image
            .alpha
            .as_ref()
            .map(|alpha| {
                let dict = format!(
                    " /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceGray /BitsPerComponent 8",
                    image.width_px, image.height_px
                );
                format!(" /SMask {} 0 R", builder.push_stream(&dict, alpha))
            })
            .unwrap_or_default();

        let dict = format!(
            " /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8{}",
            image.width_px, image.height_px, smask_ref
        );
        builder.push_stream(&dict, &image.rgb)
    }

    /// The /XObject entries for the images a page actually draws.
    fn build_xobject_resource_dict(&self, page: &LayoutPage, builder: &PdfBuilder) -> String {
        let used: BTreeSet<usize> = page
            .elements
            .iter()
            .filter_map(|e| match e.draw {
                DrawCommand::Image { image } => Some(image.0),
                _ => None,
            })
            .collect();
        used.into_iter()
            .filter_map(|idx| {
                builder
                    .image_objects
                    .get(idx)
                    .map(|obj_id| format!("/Im{} {} 0 R", idx, obj_id))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Write the 5 CIDFont PDF objects for the unicode font.
    /// Returns the object ID of the Type0 root font dictionary.
    fn write_custom_font_objects(
        builder: &mut PdfBuilder,
        font: &CustomFont,
        used_chars: &BTreeSet<char>,
    ) -> usize {
        let m = &font.metrics;
        let scale = 1000.0 / m.units_per_em as f64;

        // 1. FontFile2 stream
        let fontfile2_id = builder.push_stream(&format!(" /Length1 {}", font.data.len()), &font.data);

        // 2. FontDescriptor
        let font_descriptor_dict = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 4 \
             /FontBBox [{} {} {} {}] /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            font.name,
            (m.bbox[0] as f64 * scale) as i32,
            (m.bbox[1] as f64 * scale) as i32,
            (m.bbox[2] as f64 * scale) as i32,
            (m.bbox[3] as f64 * scale) as i32,
            (m.ascender as f64 * scale) as i32,
            (m.descender as f64 * scale) as i32,
            (m.cap_height as f64 * scale) as i32,
            fontfile2_id,
        );
        let font_descriptor_id = builder.push(font_descriptor_dict.into_bytes());

        // 3. CIDFont dictionary (DescendantFont)
        let char_to_gid: HashMap<char, u16> = used_chars
            .iter()
            .filter_map(|ch| m.glyph_ids.get(ch).map(|&gid| (*ch, gid)))
            .collect();
        let cidfont_dict = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW {} /W {} \
             /CIDToGIDMap /Identity >>",
            font.name,
            font_descriptor_id,
            m.pdf_width(m.default_advance) as u32,
            Self::build_w_array(font, &char_to_gid),
        );
        let cidfont_id = builder.push(cidfont_dict.into_bytes());

        // 4. ToUnicode CMap
        let cmap = Self::build_tounicode_cmap(&char_to_gid, &font.name);
        let tounicode_id = builder.push_stream("", cmap.as_bytes());

        // 5. Type0 font dictionary (the root, referenced by /Resources)
        let type0_dict = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
             /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] \
             /ToUnicode {} 0 R >>",
            font.name, cidfont_id, tounicode_id,
        );
        builder.push(type0_dict.into_bytes())
    }

    /// Build the /W array for per-glyph widths in CIDFont.
    /// Format: [gid [width] gid [width] ...]
    fn build_w_array(font: &CustomFont, char_to_gid: &HashMap<char, u16>) -> String {
        let mut seen: HashSet<u16> = HashSet::new();
        let mut entries: Vec<(u16, u32)> = char_to_gid
            .iter()
            .filter(|(_, gid)| seen.insert(**gid))
            .map(|(ch, &gid)| {
                let advance = font
                    .metrics
                    .advance_widths
                    .get(ch)
                    .copied()
                    .unwrap_or(font.metrics.default_advance);
                (gid, font.metrics.pdf_width(advance) as u32)
            })
            .collect();
        entries.sort_by_key(|(gid, _)| *gid);

        let mut result = String::from("[");
        for (gid, width) in &entries {
            let _ = write!(result, " {} [{}]", gid, width);
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap for text extraction/copy-paste support.
    fn build_tounicode_cmap(char_to_gid: &HashMap<char, u16>, font_name: &str) -> String {
        let mut gid_to_unicode: Vec<(u16, u32)> = char_to_gid
            .iter()
            .map(|(&ch, &gid)| (gid, ch as u32))
            .collect();
        gid_to_unicode.sort_unstable();
        gid_to_unicode.dedup_by_key(|(gid, _)| *gid);

        let mut cmap = String::new();
        cmap.push_str("/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n");
        cmap.push_str("/CIDSystemInfo\n<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        cmap.push_str("/CMapType 2 def\n1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");

        // At most 100 entries per beginbfchar block.
        for chunk in gid_to_unicode.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, unicode) in chunk {
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, Self::utf16_hex(unicode));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap
    }

    fn utf16_hex(cp: u32) -> String {
        char::from_u32(cp)
            .map(|ch| {
                let mut buf = [0u16; 2];
                ch.encode_utf16(&mut buf)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect()
            })
            .unwrap_or_else(|| "FFFD".to_string())
    }

    /// Glyph ids of `text` as a hex string; unmapped characters use glyph 0.
    fn encode_glyphs(font: &CustomFont, text: &str) -> String {
        text.chars()
            .map(|ch| format!("{:04X}", font.metrics.glyph_ids.get(&ch).copied().unwrap_or(0)))
            .collect()
    }

    /// Encode text for a standard font string literal. Characters outside
    /// WinAnsi become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::new();
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// An Info dictionary string: a literal for ASCII, UTF-16BE hex otherwise.
    fn text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let hex: String = s.encode_utf16().map(|u| format!("{:04X}", u)).collect();
        format!("<FEFF{}>", hex)
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    ///
    /// WinAnsiEncoding is based on Windows-1252. Most codepoints in
    /// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
    /// holds the typographic punctuation.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // S with caron
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E), // Z with caron
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98),
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // s with caron
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E), // z with caron
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(FontSlot, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in &offsets[1..] {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
