//! # SVG Logos
//!
//! Parses the subset of SVG that logo files use into drawing commands the PDF
//! writer can emit as path operators. Supported: `svg` sizing (`viewBox`, or
//! `width`/`height`), `g` grouping with inherited paint, `transform`
//! (`translate`, `scale`, `rotate`, `matrix`), `style` declarations, and the
//! shapes rect, circle, ellipse, line, polyline, polygon and path.
//!
//! Paint servers (gradients, patterns), clipping and text are not rendered.
//! Coordinates stay in SVG user space (y down); the writer maps them.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ReportError;
use crate::style::hex_to_rgb;

/// A parsed SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawing commands produced by the SVG parser.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
    SetFill(f64, f64, f64),
    SetStroke(f64, f64, f64),
    SetStrokeWidth(f64),
    /// Concatenate `[a b c d e f]` onto the current transform.
    Transform([f64; 6]),
    Fill,
    Stroke,
    FillAndStroke,
    SaveState,
    RestoreState,
}

type Rgb = (f64, f64, f64);

/// A logo ready to be placed: its user-space box and commands.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgLogo {
    pub view_box: ViewBox,
    pub commands: Vec<SvgCommand>,
}

impl SvgLogo {
    /// Parse SVG markup. Fails when there is no `svg` root or it has no
    /// usable size.
    pub fn parse(content: &str) -> Result<Self, ReportError> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        let mut view_box = None;
        let mut commands = Vec::new();
        let mut paint = vec![Paint::default()];
        // Depth inside <defs>, <clipPath> and friends; nothing there is drawn.
        let mut hidden_depth = 0usize;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| ReportError::Image {
                src: "svg".to_string(),
                message: format!("malformed SVG: {}", e),
            })?;
            match event {
                Event::Eof => break,
                Event::Start(e) => {
                    let tag = local_name(&e);
                    if hidden_depth > 0 || is_hidden_container(&tag) {
                        hidden_depth += 1;
                    } else if tag == "svg" || tag == "g" {
                        if tag == "svg" && view_box.is_none() {
                            view_box = root_view_box(&e);
                        }
                        let attrs = Attrs::read(&e);
                        let inherited = paint.last().copied().unwrap_or_default();
                        commands.push(SvgCommand::SaveState);
                        if let Some(t) = attrs.get("transform") {
                            commands.extend(parse_transform(t).into_iter().map(SvgCommand::Transform));
                        }
                        paint.push(inherited.apply(&attrs));
                    } else {
                        let inherited = paint.last().copied().unwrap_or_default();
                        emit_element(&mut commands, &tag, &e, inherited);
                    }
                }
                Event::Empty(e) => {
                    let tag = local_name(&e);
                    if hidden_depth == 0 && !is_hidden_container(&tag) {
                        if tag == "svg" && view_box.is_none() {
                            view_box = root_view_box(&e);
                        }
                        let inherited = paint.last().copied().unwrap_or_default();
                        emit_element(&mut commands, &tag, &e, inherited);
                    }
                }
                Event::End(e) => {
                    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    if hidden_depth > 0 {
                        hidden_depth -= 1;
                    } else if (tag == "svg" || tag == "g") && paint.len() > 1 {
                        paint.pop();
                        commands.push(SvgCommand::RestoreState);
                    }
                }
                _ => {}
            }
            buf.clear();
        }

        let view_box = view_box.ok_or_else(|| ReportError::Image {
            src: "svg".to_string(),
            message: "no <svg> root with a viewBox or width/height".to_string(),
        })?;
        Ok(Self { view_box, commands })
    }

    /// Uniform scale that makes the logo `height` points tall.
    pub fn scale_for_height(&self, height: f64) -> f64 {
        height / self.view_box.height
    }

    /// Width in points when scaled to `height`.
    pub fn width_for_height(&self, height: f64) -> f64 {
        self.view_box.width * self.scale_for_height(height)
    }
}

/// Inherited paint state.
#[derive(Debug, Clone, Copy)]
struct Paint {
    fill: Option<Rgb>,
    stroke: Option<Rgb>,
    stroke_width: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Some((0.0, 0.0, 0.0)),
            stroke: None,
            stroke_width: 1.0,
        }
    }
}

impl Paint {
    fn apply(self, attrs: &Attrs) -> Self {
        let fill = match attrs.get("fill") {
            Some("none") => None,
            Some(v) => parse_svg_color(v).or(self.fill),
            None => self.fill,
        };
        let stroke = match attrs.get("stroke") {
            Some("none") => None,
            Some(v) => parse_svg_color(v).or(self.stroke),
            None => self.stroke,
        };
        let stroke_width = attrs
            .get("stroke-width")
            .and_then(parse_length)
            .unwrap_or(self.stroke_width);
        Self {
            fill,
            stroke,
            stroke_width,
        }
    }
}

/// Element attributes with `style` declarations folded in (they win).
struct Attrs(Vec<(String, String)>);

impl Attrs {
    fn read(e: &BytesStart) -> Self {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut style = None;
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
            let value = String::from_utf8_lossy(&attr.value).to_string();
            if key == "style" {
                style = Some(value);
            } else {
                pairs.push((key, value));
            }
        }
        if let Some(style) = style {
            for decl in style.split(';') {
                if let Some((k, v)) = decl.split_once(':') {
                    let (k, v) = (k.trim().to_string(), v.trim().to_string());
                    pairs.retain(|(existing, _)| *existing != k);
                    pairs.push((k, v));
                }
            }
        }
        Self(pairs)
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
    }

    fn num(&self, key: &str) -> f64 {
        self.get(key).and_then(parse_length).unwrap_or(0.0)
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn is_hidden_container(tag: &str) -> bool {
    matches!(
        tag,
        "defs"
            | "clipPath"
            | "mask"
            | "symbol"
            | "pattern"
            | "linearGradient"
            | "radialGradient"
            | "style"
            | "title"
            | "desc"
            | "metadata"
            | "text"
    )
}

fn root_view_box(e: &BytesStart) -> Option<ViewBox> {
    let attrs = Attrs::read(e);
    if let Some(vb) = attrs.get("viewBox").and_then(parse_view_box) {
        return Some(vb);
    }
    let width = attrs.get("width").and_then(parse_length)?;
    let height = attrs.get("height").and_then(parse_length)?;
    (width > 0.0 && height > 0.0).then_some(ViewBox {
        min_x: 0.0,
        min_y: 0.0,
        width,
        height,
    })
}

/// Parse a viewBox string like "0 0 100 100" or "0,0,100,100".
pub fn parse_view_box(s: &str) -> Option<ViewBox> {
    let parts = NumberScanner::new(s).collect_all();
    match parts.as_slice() {
        [min_x, min_y, width, height] if *width > 0.0 && *height > 0.0 => Some(ViewBox {
            min_x: *min_x,
            min_y: *min_y,
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

/// A length with an optional `px`/`pt` unit. Percentages are unsupported.
fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s
        .strip_suffix("px")
        .or_else(|| s.strip_suffix("pt"))
        .unwrap_or(s);
    s.trim().parse::<f64>().ok()
}

fn emit_element(commands: &mut Vec<SvgCommand>, tag: &str, e: &BytesStart, inherited: Paint) {
    let attrs = Attrs::read(e);
    let paint = inherited.apply(&attrs);

    let outline = match tag {
        "rect" => {
            let (x, y) = (attrs.num("x"), attrs.num("y"));
            let (w, h) = (attrs.num("width"), attrs.num("height"));
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            vec![
                SvgCommand::MoveTo(x, y),
                SvgCommand::LineTo(x + w, y),
                SvgCommand::LineTo(x + w, y + h),
                SvgCommand::LineTo(x, y + h),
                SvgCommand::ClosePath,
            ]
        }
        "circle" => {
            let r = attrs.num("r");
            ellipse_commands(attrs.num("cx"), attrs.num("cy"), r, r)
        }
        "ellipse" => ellipse_commands(
            attrs.num("cx"),
            attrs.num("cy"),
            attrs.num("rx"),
            attrs.num("ry"),
        ),
        "line" => vec![
            SvgCommand::MoveTo(attrs.num("x1"), attrs.num("y1")),
            SvgCommand::LineTo(attrs.num("x2"), attrs.num("y2")),
        ],
        "polyline" | "polygon" => {
            let nums = NumberScanner::new(attrs.get("points").unwrap_or_default()).collect_all();
            let mut points = nums.chunks_exact(2).map(|p| (p[0], p[1]));
            let Some((x0, y0)) = points.next() else {
                return;
            };
            let mut cmds = vec![SvgCommand::MoveTo(x0, y0)];
            cmds.extend(points.map(|(x, y)| SvgCommand::LineTo(x, y)));
            if tag == "polygon" {
                cmds.push(SvgCommand::ClosePath);
            }
            cmds
        }
        "path" => parse_path_d(attrs.get("d").unwrap_or_default()),
        _ => return,
    };
    if outline.is_empty() {
        return;
    }

    // Lines have no interior.
    let fill = if tag == "line" { None } else { paint.fill };
    let op = match (fill.is_some(), paint.stroke.is_some()) {
        (true, true) => SvgCommand::FillAndStroke,
        (true, false) => SvgCommand::Fill,
        (false, true) => SvgCommand::Stroke,
        (false, false) => return,
    };

    commands.push(SvgCommand::SaveState);
    if let Some(t) = attrs.get("transform") {
        commands.extend(parse_transform(t).into_iter().map(SvgCommand::Transform));
    }
    if let Some((r, g, b)) = fill {
        commands.push(SvgCommand::SetFill(r, g, b));
    }
    if let Some((r, g, b)) = paint.stroke {
        commands.push(SvgCommand::SetStroke(r, g, b));
        commands.push(SvgCommand::SetStrokeWidth(paint.stroke_width));
    }
    commands.extend(outline);
    commands.push(op);
    commands.push(SvgCommand::RestoreState);
}

/// Cubic bezier approximation of an ellipse. Degenerate radii draw nothing.
fn ellipse_commands(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<SvgCommand> {
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    const K: f64 = 0.5522847498;
    let (kx, ky) = (rx * K, ry * K);
    vec![
        SvgCommand::MoveTo(cx + rx, cy),
        SvgCommand::CurveTo(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry),
        SvgCommand::CurveTo(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy),
        SvgCommand::CurveTo(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry),
        SvgCommand::CurveTo(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy),
        SvgCommand::ClosePath,
    ]
}

/// Parse a `transform` attribute into matrices, outermost first.
fn parse_transform(s: &str) -> Vec<[f64; 6]> {
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim().trim_start_matches(',').trim();
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        let args = NumberScanner::new(&rest[open + 1..open + close]).collect_all();
        let m = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Some([*a, *b, *c, *d, *e, *f]),
            ("translate", [tx]) => Some([1.0, 0.0, 0.0, 1.0, *tx, 0.0]),
            ("translate", [tx, ty]) => Some([1.0, 0.0, 0.0, 1.0, *tx, *ty]),
            ("scale", [sx]) => Some([*sx, 0.0, 0.0, *sx, 0.0, 0.0]),
            ("scale", [sx, sy]) => Some([*sx, 0.0, 0.0, *sy, 0.0, 0.0]),
            ("rotate", [deg]) => Some(rotation(*deg)),
            ("rotate", [deg, cx, cy]) => {
                out.push([1.0, 0.0, 0.0, 1.0, *cx, *cy]);
                out.push(rotation(*deg));
                Some([1.0, 0.0, 0.0, 1.0, -cx, -cy])
            }
            _ => None,
        };
        out.extend(m);
        rest = &rest[open + close + 1..];
    }
    out
}

fn rotation(deg: f64) -> [f64; 6] {
    let (sin, cos) = deg.to_radians().sin_cos();
    [cos, sin, -sin, cos, 0.0, 0.0]
}

/// Pulls numbers out of SVG number lists, where separators are optional
/// ("10-5" is two numbers, "0.5.5" is 0.5 and .5).
struct NumberScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> NumberScanner<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_whitespace() || self.bytes[self.pos] == b',')
        {
            self.pos += 1;
        }
    }

    fn peek_command(&mut self) -> Option<u8> {
        self.skip_separators();
        self.bytes
            .get(self.pos)
            .copied()
            .filter(|b| b.is_ascii_alphabetic() && *b != b'e' && *b != b'E')
    }

    fn at_number(&mut self) -> bool {
        self.skip_separators();
        matches!(self.bytes.get(self.pos), Some(b'0'..=b'9' | b'.' | b'-' | b'+'))
    }

    fn number(&mut self) -> Option<f64> {
        if !self.at_number() {
            return None;
        }
        let start = self.pos;
        let mut seen_dot = false;
        let mut seen_exp = false;
        if matches!(self.bytes[self.pos], b'-' | b'+') {
            self.pos += 1;
        }
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    self.pos += 1;
                }
                b'e' | b'E' if !seen_exp => {
                    seen_exp = true;
                    self.pos += 1;
                    if matches!(self.bytes.get(self.pos), Some(b'-' | b'+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        match text.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                // Skip the junk so callers cannot loop on it.
                self.pos = self.pos.max(start + 1);
                None
            }
        }
    }

    /// Arc flags may be written without separators ("a1 1 0 01 5 5").
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let b = *self.bytes.get(self.pos)?;
        match b {
            b'0' | b'1' => {
                self.pos += 1;
                Some(b == b'1')
            }
            _ => None,
        }
    }

    fn pair(&mut self) -> Option<(f64, f64)> {
        Some((self.number()?, self.number()?))
    }

    fn collect_all(mut self) -> Vec<f64> {
        let mut out = Vec::new();
        while self.pos < self.bytes.len() {
            match self.number() {
                Some(n) => out.push(n),
                None => {
                    if self.pos < self.bytes.len() && !self.at_number() {
                        self.pos += 1;
                    }
                }
            }
        }
        out
    }
}

/// Parse an SVG path `d` attribute into drawing commands (absolute coords).
fn parse_path_d(d: &str) -> Vec<SvgCommand> {
    let mut out = Vec::new();
    let mut sc = NumberScanner::new(d);
    let (mut cx, mut cy) = (0.0f64, 0.0f64);
    let (mut sx, mut sy) = (0.0f64, 0.0f64);
    // Reflection points for S and T.
    let mut last_cubic: Option<(f64, f64)> = None;
    let mut last_quad: Option<(f64, f64)> = None;

    while let Some(cmd) = sc.peek_command() {
        sc.pos += 1;
        let rel = cmd.is_ascii_lowercase();
        let mut first = true;

        loop {
            let mut next_cubic = None;
            let mut next_quad = None;
            match cmd.to_ascii_uppercase() {
                b'M' => {
                    let Some((x, y)) = sc.pair() else { break };
                    let (x, y) = if rel { (cx + x, cy + y) } else { (x, y) };
                    if first {
                        out.push(SvgCommand::MoveTo(x, y));
                        (sx, sy) = (x, y);
                    } else {
                        // Extra pairs after a moveto are implicit linetos.
                        out.push(SvgCommand::LineTo(x, y));
                    }
                    (cx, cy) = (x, y);
                }
                b'L' => {
                    let Some((x, y)) = sc.pair() else { break };
                    let (x, y) = if rel { (cx + x, cy + y) } else { (x, y) };
                    out.push(SvgCommand::LineTo(x, y));
                    (cx, cy) = (x, y);
                }
                b'H' => {
                    let Some(x) = sc.number() else { break };
                    cx = if rel { cx + x } else { x };
                    out.push(SvgCommand::LineTo(cx, cy));
                }
                b'V' => {
                    let Some(y) = sc.number() else { break };
                    cy = if rel { cy + y } else { y };
                    out.push(SvgCommand::LineTo(cx, cy));
                }
                b'C' => {
                    let (Some(p1), Some(p2), Some(p)) = (sc.pair(), sc.pair(), sc.pair()) else {
                        break;
                    };
                    let base = if rel { (cx, cy) } else { (0.0, 0.0) };
                    let (x1, y1) = (base.0 + p1.0, base.1 + p1.1);
                    let (x2, y2) = (base.0 + p2.0, base.1 + p2.1);
                    let (x, y) = (base.0 + p.0, base.1 + p.1);
                    out.push(SvgCommand::CurveTo(x1, y1, x2, y2, x, y));
                    next_cubic = Some((x2, y2));
                    (cx, cy) = (x, y);
                }
                b'S' => {
                    let (Some(p2), Some(p)) = (sc.pair(), sc.pair()) else {
                        break;
                    };
                    let base = if rel { (cx, cy) } else { (0.0, 0.0) };
                    let (x1, y1) = match last_cubic {
                        Some((px, py)) => (2.0 * cx - px, 2.0 * cy - py),
                        None => (cx, cy),
                    };
                    let (x2, y2) = (base.0 + p2.0, base.1 + p2.1);
                    let (x, y) = (base.0 + p.0, base.1 + p.1);
                    out.push(SvgCommand::CurveTo(x1, y1, x2, y2, x, y));
                    next_cubic = Some((x2, y2));
                    (cx, cy) = (x, y);
                }
                b'Q' => {
                    let (Some(q), Some(p)) = (sc.pair(), sc.pair()) else {
                        break;
                    };
                    let base = if rel { (cx, cy) } else { (0.0, 0.0) };
                    let (qx, qy) = (base.0 + q.0, base.1 + q.1);
                    let (x, y) = (base.0 + p.0, base.1 + p.1);
                    out.push(quad_to_cubic((cx, cy), (qx, qy), (x, y)));
                    next_quad = Some((qx, qy));
                    (cx, cy) = (x, y);
                }
                b'T' => {
                    let Some(p) = sc.pair() else { break };
                    let (x, y) = if rel { (cx + p.0, cy + p.1) } else { p };
                    let (qx, qy) = match last_quad {
                        Some((px, py)) => (2.0 * cx - px, 2.0 * cy - py),
                        None => (cx, cy),
                    };
                    out.push(quad_to_cubic((cx, cy), (qx, qy), (x, y)));
                    next_quad = Some((qx, qy));
                    (cx, cy) = (x, y);
                }
                b'A' => {
                    // Arcs are flattened to their chord.
                    let (Some(_rx), Some(_ry), Some(_rot)) = (sc.number(), sc.number(), sc.number())
                    else {
                        break;
                    };
                    let (Some(_large), Some(_sweep)) = (sc.flag(), sc.flag()) else {
                        break;
                    };
                    let Some(p) = sc.pair() else { break };
                    let (x, y) = if rel { (cx + p.0, cy + p.1) } else { p };
                    out.push(SvgCommand::LineTo(x, y));
                    (cx, cy) = (x, y);
                }
                b'Z' => {
                    out.push(SvgCommand::ClosePath);
                    (cx, cy) = (sx, sy);
                    last_cubic = None;
                    last_quad = None;
                    break;
                }
                _ => break,
            }
            last_cubic = next_cubic;
            last_quad = next_quad;
            first = false;
            if !sc.at_number() {
                break;
            }
        }
    }

    out
}

fn quad_to_cubic(p0: (f64, f64), q: (f64, f64), p: (f64, f64)) -> SvgCommand {
    let c1x = p0.0 + (2.0 / 3.0) * (q.0 - p0.0);
    let c1y = p0.1 + (2.0 / 3.0) * (q.1 - p0.1);
    let c2x = p.0 + (2.0 / 3.0) * (q.0 - p.0);
    let c2y = p.1 + (2.0 / 3.0) * (q.1 - p.1);
    SvgCommand::CurveTo(c1x, c1y, c2x, c2y, p.0, p.1)
}

/// Parse an SVG color string (hex, `rgb()`, a few named colors).
fn parse_svg_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    if s.starts_with('#') {
        let [r, g, b] = hex_to_rgb(s)?;
        return Some((r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0));
    }
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<f64> = inner
            .split(',')
            .filter_map(|p| p.trim().parse::<f64>().ok())
            .collect();
        return match parts.as_slice() {
            [r, g, b] => Some((r / 255.0, g / 255.0, b / 255.0)),
            _ => None,
        };
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Some((0.0, 0.0, 0.0)),
        "white" => Some((1.0, 1.0, 1.0)),
        "red" => Some((1.0, 0.0, 0.0)),
        "green" => Some((0.0, 0.502, 0.0)),
        "blue" => Some((0.0, 0.0, 1.0)),
        "gray" | "grey" => Some((0.502, 0.502, 0.502)),
        _ => None,
    }
}
