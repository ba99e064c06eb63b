//! # Raster Primitives
//!
//! Pixel-level helpers used by the cover banner, the page header and the
//! figure blocks: cover-crop, the two-color gradient, alpha handling, and the
//! split into RGB + alpha planes that the PDF writer embeds.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::ReportError;
use crate::style::hex_to_rgb;

/// Crop `img` symmetrically to the aspect ratio of `width` x `height`, then
/// resize to exactly that size. Zero dimensions are treated as 1.
pub fn cover_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let width = width.max(1);
    let height = height.max(1);
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return DynamicImage::new_rgba8(width, height);
    }

    let target_ratio = width as f64 / height as f64;
    let src_ratio = src_w as f64 / src_h as f64;
    let (x, y, w, h) = if src_ratio > target_ratio {
        let new_w = ((src_h as f64 * target_ratio) as u32).clamp(1, src_w);
        ((src_w - new_w) / 2, 0, new_w, src_h)
    } else {
        let new_h = ((src_w as f64 / target_ratio) as u32).clamp(1, src_h);
        (0, (src_h - new_h) / 2, src_w, new_h)
    };

    img.crop_imm(x, y, w, h)
        .resize_exact(width, height, FilterType::Lanczos3)
}

/// A left-to-right gradient between two hex colors. Every pixel carries
/// alpha `round(255 * alpha)`.
pub fn make_gradient(
    width: u32,
    height: u32,
    left: &str,
    right: &str,
    alpha: f64,
) -> Result<RgbaImage, ReportError> {
    let c1 = hex_to_rgb(left)
        .ok_or_else(|| ReportError::InvalidConfig(format!("bad gradient color '{}'", left)))?;
    let c2 = hex_to_rgb(right)
        .ok_or_else(|| ReportError::InvalidConfig(format!("bad gradient color '{}'", right)))?;
    let a = (255.0 * alpha.clamp(0.0, 1.0)).round() as u8;

    let columns: Vec<Rgba<u8>> = (0..width)
        .map(|x| {
            let t = if width > 1 {
                x as f64 / (width - 1) as f64
            } else {
                0.0
            };
            let mix = |i: usize| (c1[i] as f64 * (1.0 - t) + c2[i] as f64 * t) as u8;
            Rgba([mix(0), mix(1), mix(2), a])
        })
        .collect();

    Ok(RgbaImage::from_fn(width, height, |x, _| columns[x as usize]))
}

/// Source-over composite of `over` onto `base`, both the same size.
/// `base` is assumed opaque and stays opaque.
pub fn composite_over(base: &mut RgbaImage, over: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(over.pixels()) {
        let a = src.0[3] as f64 / 255.0;
        if a <= 0.0 {
            continue;
        }
        let inv = 1.0 - a;
        for i in 0..3 {
            dst.0[i] = (src.0[i] as f64 * a + dst.0[i] as f64 * inv).round() as u8;
        }
        dst.0[3] = 255;
    }
}

/// Wash an opaque image with white at the given alpha (0-255).
pub fn white_wash(base: &mut RgbaImage, alpha: u8) {
    let layer = RgbaImage::from_pixel(base.width(), base.height(), Rgba([255, 255, 255, alpha]));
    composite_over(base, &layer);
}

/// Composite any transparency onto white.
pub fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return DynamicImage::ImageRgb8(img.to_rgb8());
    }
    let mut white = RgbaImage::from_pixel(img.width(), img.height(), Rgba([255, 255, 255, 255]));
    composite_over(&mut white, &img.to_rgba8());
    DynamicImage::ImageRgba8(white).into_rgb8().into()
}

/// Drop transparency without compositing. Fully transparent pixels keep
/// whatever color they store, which for most encoders is black.
pub fn to_opaque_rgb(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgb8(img.to_rgb8())
}

/// Decoded pixels in the form the PDF writer embeds: packed RGB plus an
/// optional grayscale alpha plane (present only when some pixel is
/// non-opaque).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width_px: u32,
    pub height_px: u32,
    /// width * height * 3 bytes
    pub rgb: Vec<u8>,
    /// width * height bytes
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        if img.color().has_alpha() {
            Self::from_rgba(&img.to_rgba8())
        } else {
            let rgb = img.to_rgb8();
            Self {
                width_px: rgb.width(),
                height_px: rgb.height(),
                rgb: rgb.into_raw(),
                alpha: None,
            }
        }
    }

    pub fn from_rgba(img: &RgbaImage) -> Self {
        let pixel_count = (img.width() * img.height()) as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        let mut has_transparency = false;

        for pixel in img.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
            if pixel.0[3] != 255 {
                has_transparency = true;
            }
        }

        Self {
            width_px: img.width(),
            height_px: img.height(),
            rgb,
            alpha: has_transparency.then_some(alpha),
        }
    }
}
