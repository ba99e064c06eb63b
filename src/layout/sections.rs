//! Body flow: numbered section headers, label/value rows, image blocks and
//! notes, breaking pages whenever the next unit would cross the bottom limit.

use crate::font::FontFace;
use crate::model::{BlockRejection, ImageBlock, Item, Section};
use crate::style::{palette, TextStyle};
use crate::text::wrap_text;

use super::figures::place_image_block;
use super::{FigureCounter, FlowOutcome, PageStarter, Surface, MM};

const LINE_H: f64 = 14.0;
const BODY_SIZE: f64 = 11.0;
const TITLE_SIZE: f64 = 14.0;
/// Title, rule and the gap before the first row.
const HEADER_BLOCK_H: f64 = 38.3;
const RULE_OFFSET: f64 = 8.0;
const RULE_H: f64 = 0.3;
const TITLE_GAP: f64 = 24.0;
/// Step between wrapped title lines.
const TITLE_LINE_H: f64 = 18.0;
const ITEMS_TAIL: f64 = 24.0;
const NOTES_TAIL: f64 = 12.0;
/// Space between a label and its value, and after the "Notes:" prefix.
const LABEL_GAP: f64 = 4.0;
const NOTES_PREFIX_GAP: f64 = 6.0;

const LABEL: TextStyle = TextStyle::new(FontFace::Bold, BODY_SIZE, palette::INK);
const VALUE: TextStyle = TextStyle::new(FontFace::Regular, BODY_SIZE, palette::INK);
const NOTES: TextStyle = TextStyle::new(FontFace::Oblique, BODY_SIZE, palette::INK);
const TITLE: TextStyle = TextStyle::new(FontFace::Bold, TITLE_SIZE, palette::BRAND);

/// Flow every section from `y` onward. Sections are numbered from 1; figures
/// are numbered across the whole list.
pub fn flow_sections(
    surface: &mut Surface<'_>,
    pages: &mut dyn PageStarter,
    sections: &[Section],
    y: f64,
    pixels_per_point: f64,
) -> FlowOutcome {
    let mut y = y;
    let mut figures = FigureCounter::default();

    for (i, section) in sections.iter().enumerate() {
        let number = i + 1;
        y = draw_header(surface, pages, &section.display_title(number), number, y);

        for item in &section.items {
            y = draw_item(surface, pages, item, y);
        }
        y += ITEMS_TAIL;

        if let Some(spec) = &section.images {
            match ImageBlock::from_spec(spec) {
                Ok(block) => {
                    let placed = place_image_block(
                        surface,
                        pages,
                        &block,
                        y,
                        figures.next_number(),
                        pixels_per_point,
                    );
                    y = placed.y;
                    figures = figures.record(placed.drawn);
                }
                Err(BlockRejection::NoLayout) => {}
                Err(e) => log::warn!("Skipping figure block in section {}: {}", number, e),
            }
        }

        if let Some(notes) = section.notes.as_deref().map(str::trim) {
            if !notes.is_empty() {
                y = draw_notes(surface, pages, notes, y);
            }
        }
    }

    FlowOutcome { y, figures }
}

fn draw_header(
    surface: &mut Surface<'_>,
    pages: &mut dyn PageStarter,
    title: &str,
    number: usize,
    y: f64,
) -> f64 {
    let g = *surface.geometry();
    let lines = wrap_text(
        surface.fonts(),
        &format!("{}. {}", number, title),
        TITLE.face,
        TITLE.size,
        g.usable_width(),
    );
    let extra = lines.len().saturating_sub(1) as f64 * TITLE_LINE_H;

    let mut y = y;
    if !g.fits(y, HEADER_BLOCK_H + extra + LINE_H) {
        log::debug!("Section {} header moves to a new page", number);
        y = pages.start_new_page(surface);
    }

    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(g.left, y + i as f64 * TITLE_LINE_H, line, TITLE);
    }
    let y = y + extra;
    surface.fill_rect(
        g.left,
        y + RULE_OFFSET - RULE_H,
        g.usable_width(),
        RULE_H,
        palette::BRAND,
    );
    y + TITLE_GAP
}

/// One label/value row. The label column is as wide as the first wrapped
/// label line; the value takes the rest. Each printed line checks the bottom
/// limit on its own, so a long value can continue on the next page.
fn draw_item(surface: &mut Surface<'_>, pages: &mut dyn PageStarter, item: &Item, y: f64) -> f64 {
    let g = *surface.geometry();
    let fonts = surface.fonts();
    let usable = g.usable_width();
    let label_x = g.left + 2.0 * MM;

    let labels = wrap_text(
        fonts,
        &format!("{}:", item.label()),
        LABEL.face,
        LABEL.size,
        usable - 2.0 * MM,
    );
    let label_w = labels
        .first()
        .map_or(0.0, |l| fonts.measure(l, LABEL.face, LABEL.size));
    let value_x = label_x + label_w + LABEL_GAP;
    let values = wrap_text(
        fonts,
        item.value(),
        VALUE.face,
        VALUE.size,
        usable - (2.0 * MM + label_w + LABEL_GAP),
    );

    let mut y = y;
    for row in 0..labels.len().max(values.len()) {
        if !g.fits(y, LINE_H) {
            y = pages.start_new_page(surface);
        }
        if let Some(line) = labels.get(row) {
            surface.draw_text(label_x, y, line, LABEL);
        }
        if let Some(line) = values.get(row) {
            surface.draw_text(value_x, y, line, VALUE);
        }
        y += LINE_H;
    }
    y
}

fn draw_notes(surface: &mut Surface<'_>, pages: &mut dyn PageStarter, notes: &str, y: f64) -> f64 {
    let g = *surface.geometry();
    let x = g.left + 2.0 * MM;
    let prefix_w = surface.measure("Notes:", LABEL.face, LABEL.size) + NOTES_PREFIX_GAP;
    let lines = wrap_text(
        surface.fonts(),
        notes,
        NOTES.face,
        NOTES.size,
        g.usable_width() - prefix_w,
    );

    let mut y = y;
    if !g.fits(y, lines.len() as f64 * LINE_H + 4.0) {
        y = pages.start_new_page(surface);
    }

    let mut rest = lines.iter();
    if let Some(first) = rest.next() {
        surface.draw_text(x, y, "Notes:", LABEL);
        surface.draw_text(x + prefix_w, y, first, NOTES);
        y += LINE_H;
    }
    for line in rest {
        if !g.fits(y, LINE_H) {
            y = pages.start_new_page(surface);
        }
        surface.draw_text(x + prefix_w, y, line, NOTES);
        y += LINE_H;
    }
    y + NOTES_TAIL
}
