//! Image blocks: the three grid templates, letter overlays and captions.
//!
//! Every image of a block is decoded before anything is drawn, so a broken
//! file skips the whole block without leaving a half-drawn grid or an empty
//! page behind. A skipped block leaves the cursor where it was and does not
//! consume a figure number.

use image::{DynamicImage, GenericImageView};

use crate::error::ReportError;
use crate::font::FontFace;
use crate::image_loader;
use crate::model::{ImageBlock, ImageLayout, OverlayColor};
use crate::raster::{cover_crop, flatten_onto_white, to_opaque_rgb, RasterImage};
use crate::style::{palette, Color, TextStyle};
use crate::text::wrap_text;

use super::{PageStarter, Placement, Surface};

/// Space between cells and between the grid and its caption.
const GAP: f64 = 8.0;
const CAPTION_SIZE: f64 = 10.0;
const CAPTION_LINE: f64 = 12.0;
const CAPTION_STYLE: TextStyle = TextStyle::new(FontFace::Oblique, CAPTION_SIZE, palette::INK);
/// Gap after the last caption line.
const CAPTION_TAIL: f64 = 35.0;
/// Padding below the caption reserved in the space checks.
const BOTTOM_PAD: f64 = 16.0;
/// Smallest single image worth starting on the current page.
const MIN_SINGLE_H: f64 = 80.0;
/// Floor for the height a single image may be squeezed to.
const MIN_AVAILABLE_H: f64 = 40.0;
const LETTER_SIZE: f64 = 10.0;
const LETTER_INSET: f64 = 6.0;

/// Place one image block at `y`. Returns the new cursor and whether the block
/// drew; on a skip the cursor comes back unchanged.
pub fn place_image_block(
    surface: &mut Surface<'_>,
    pages: &mut dyn PageStarter,
    block: &ImageBlock,
    y: f64,
    figure_number: u32,
    pixels_per_point: f64,
) -> Placement {
    let sources = match load_sources(block) {
        Ok(images) => images,
        Err(e) => {
            log::warn!("Skipping figure block: {}", e);
            return Placement { y, drawn: false };
        }
    };

    let g = *surface.geometry();
    let usable = g.usable_width();
    let grid_w = usable * block.width_pct;
    let grid_x = g.left + (usable - grid_w) / 2.0;
    let caption = if block.caption.is_empty() {
        format!("Figure {}", figure_number)
    } else {
        format!("Figure {}: {}", figure_number, block.caption)
    };
    let caption_lines = wrap_text(
        surface.fonts(),
        &caption,
        CAPTION_STYLE.face,
        CAPTION_STYLE.size,
        usable,
    );
    let caption_h = caption_lines.len() as f64 * CAPTION_LINE;
    // A block at the top of a page stays there even when it does not fit.
    let needs_break = |y: f64, needed: f64| !g.fits(y, needed) && y > g.content_top();

    let render = |img: &DynamicImage, w: f64, h: f64| {
        RasterImage::from_dynamic(&cover_crop(
            img,
            (w * pixels_per_point) as u32,
            (h * pixels_per_point) as u32,
        ))
    };

    let y_after = match &block.layout {
        ImageLayout::Single { .. } => {
            let mut y = y;
            if needs_break(y, MIN_SINGLE_H + caption_h + BOTTOM_PAD) {
                y = pages.start_new_page(surface);
            }
            let available = (g.bottom_limit() - y - (caption_h + BOTTOM_PAD)).max(MIN_AVAILABLE_H);

            let img = &sources[0];
            let (w0, h0) = img.dimensions();
            let (w0, h0) = (w0.max(1) as f64, h0.max(1) as f64);
            let (mut img_w, mut img_h) = (grid_w, h0 * grid_w / w0);
            if img_h > available {
                img_h = available;
                img_w = w0 * available / h0;
            }
            let img_x = g.left + (usable - img_w) / 2.0;

            let id = surface.add_image(render(img, img_w, img_h));
            surface.draw_image(id, img_x, y, img_w, img_h);
            y + img_h + GAP
        }
        ImageLayout::Quad { .. } => {
            let cell = (grid_w - GAP) / 2.0;
            let mut y = y;
            if needs_break(y, cell + GAP + cell + GAP + caption_h + BOTTOM_PAD) {
                y = pages.start_new_page(surface);
            }
            let cols = [grid_x, grid_x + cell + GAP];
            let rows = [y, y + cell + GAP];
            for (i, (img, letter)) in sources.iter().zip(['a', 'b', 'c', 'd']).enumerate() {
                let (x, top) = (cols[i % 2], rows[i / 2]);
                let id = surface.add_image(render(img, cell, cell));
                surface.draw_image(id, x, top, cell, cell);
                draw_letter(surface, letter, x, top, block.overlay);
            }
            rows[1] + cell + GAP
        }
        ImageLayout::ThirdTwoThirds { .. } => {
            let w_a = (grid_w - GAP) / 3.0;
            let w_b = (grid_w - GAP) * 2.0 / 3.0;
            let h = w_a;
            let mut y = y;
            if needs_break(y, h + GAP + h + GAP + caption_h + BOTTOM_PAD) {
                y = pages.start_new_page(surface);
            }
            let bottom_top = y + h + GAP;
            let cells = [
                (grid_x, y, w_a, 'a'),
                (grid_x + w_a + GAP, y, w_b, 'b'),
                (grid_x, bottom_top, grid_w, 'c'),
            ];
            for (img, (x, top, w, letter)) in sources.iter().zip(cells) {
                let id = surface.add_image(render(img, w, h));
                surface.draw_image(id, x, top, w, h);
                draw_letter(surface, letter, x, top, block.overlay);
            }
            bottom_top + h + 12.0
        }
    };

    let y = draw_caption(surface, pages, &caption_lines, y_after);

    log::debug!("Placed figure {} ending at y={:.1}", figure_number, y);
    Placement { y, drawn: true }
}

/// Decode the block's images in cell order, applying its alpha policy.
fn load_sources(block: &ImageBlock) -> Result<Vec<DynamicImage>, ReportError> {
    let paths: Vec<&str> = match &block.layout {
        ImageLayout::Single { image } => vec![image.as_str()],
        ImageLayout::Quad { images } => images.iter().map(String::as_str).collect(),
        ImageLayout::ThirdTwoThirds {
            top_left,
            top_right,
            bottom,
        } => vec![top_left.as_str(), top_right.as_str(), bottom.as_str()],
    };
    paths
        .into_iter()
        .map(|path| {
            let img = image_loader::load_raster(path)?;
            Ok(if block.flatten_alpha {
                flatten_onto_white(&img)
            } else {
                to_opaque_rgb(&img)
            })
        })
        .collect()
}

fn draw_letter(surface: &mut Surface<'_>, letter: char, x: f64, top: f64, overlay: OverlayColor) {
    let color = match overlay {
        OverlayColor::White => Color::WHITE,
        OverlayColor::Black => palette::INK,
    };
    surface.draw_text(
        x + LETTER_INSET,
        top + LETTER_INSET + LETTER_SIZE,
        &letter.to_string(),
        TextStyle::new(FontFace::Bold, LETTER_SIZE, color),
    );
}

/// One line is centered in the usable width; several are left-aligned and
/// continue on a new page once a line would cross the bottom limit.
fn draw_caption(
    surface: &mut Surface<'_>,
    pages: &mut dyn PageStarter,
    lines: &[String],
    y: f64,
) -> f64 {
    let g = *surface.geometry();
    let usable = g.usable_width();

    let mut baseline = y + CAPTION_LINE;
    for line in lines {
        if baseline > g.bottom_limit() {
            baseline = pages.start_new_page(surface) + CAPTION_LINE;
        }
        if lines.len() == 1 {
            surface.draw_text_centered(g.left + usable / 2.0, baseline, line, CAPTION_STYLE);
        } else {
            surface.draw_text(g.left, baseline, line, CAPTION_STYLE);
        }
        baseline += CAPTION_LINE;
    }
    baseline + CAPTION_TAIL
}
