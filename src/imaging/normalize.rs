//! Pixel-mode normalization: any decoded image → float RGB + inverted mask.
//!
//! Sources arrive in many layouts (8/16-bit gray, paletted, RGB, RGBA, …).
//! The output is always the same pair:
//!
//! - **RGB**: `W×H×3`, samples in `[0.0, 1.0]`
//! - **Mask**: `W×H`, samples in `[0.0, 1.0]`, where `0.0` means fully opaque
//!
//! | Source | Handling |
//! |---|---|
//! | wide integer gray | each sample × 1/255, truncated and clamped to 8 bits, then as opaque |
//! | RGBA (any depth) | promoted to RGBA8, `mask = 1 − alpha/255`, alpha dropped |
//! | anything else, gray+alpha included | converted to RGB, mask all `1.0` |
//!
//! The wide gray rescale is a raw intensity remap, not a bit-depth
//! conversion: samples from `255 * 256` up saturate to white. 32-bit integer
//! gray arrives here already narrowed to 16 bits by the backend.
//!
//! A stored gray+alpha channel does not produce a mask. Gray images whose
//! transparency comes from a `tRNS` key reach this module as RGBA8.

use super::backend::SourceFormat;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, Rgb32FImage, RgbaImage};
use serde::Serialize;

/// Single-channel float mask, same dimensions as the RGB buffer.
pub type Mask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Which normalization row a source image went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelMode {
    /// Wide integer grayscale, rescaled by 1/255 and then treated as opaque.
    WideGray,
    /// Carries transparency; the mask comes from the alpha channel.
    Alpha,
    /// No transparency; the mask is all ones.
    Opaque,
}

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
    pub mode: PixelMode,
    pub rgb: Rgb32FImage,
    pub mask: Mask,
}

/// Decide which normalization row applies to `image`.
pub fn classify(image: &DynamicImage, format: SourceFormat) -> PixelMode {
    match image {
        DynamicImage::ImageLuma16(_) => PixelMode::WideGray,
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_) => PixelMode::Opaque,
        img if img.color().has_alpha() => {
            if format.synthesizes_alpha() && is_fully_opaque(img) {
                PixelMode::Opaque
            } else {
                PixelMode::Alpha
            }
        }
        _ => PixelMode::Opaque,
    }
}

/// Normalize a decoded image into float RGB + mask.
pub fn normalize(image: DynamicImage, format: SourceFormat) -> Normalized {
    let mode = classify(&image, format);
    let (rgb, mask) = match mode {
        PixelMode::WideGray => opaque_planes(DynamicImage::ImageLuma8(rescale_wide_gray(&image))),
        PixelMode::Alpha => alpha_planes(image.into_rgba8()),
        PixelMode::Opaque => opaque_planes(image),
    };
    Normalized { mode, rgb, mask }
}

fn is_fully_opaque(image: &DynamicImage) -> bool {
    match image.as_rgba8() {
        Some(buf) => buf.pixels().all(|p| p[3] == u8::MAX),
        None => image.to_rgba8().pixels().all(|p| p[3] == u8::MAX),
    }
}

/// Divide each wide gray sample by 255, dropping the fraction, and saturate
/// into 8 bits.
fn rescale_wide_gray(image: &DynamicImage) -> GrayImage {
    let wide = image.to_luma16();
    GrayImage::from_fn(wide.width(), wide.height(), |x, y| {
        let v = wide.get_pixel(x, y)[0] / 255;
        Luma([v.min(255) as u8])
    })
}

fn alpha_planes(rgba: RgbaImage) -> (Rgb32FImage, Mask) {
    let (width, height) = rgba.dimensions();
    let mask = Mask::from_fn(width, height, |x, y| {
        Luma([1.0 - unit(rgba.get_pixel(x, y)[3])])
    });
    let rgb = Rgb32FImage::from_fn(width, height, |x, y| {
        let [r, g, b, _] = rgba.get_pixel(x, y).0;
        Rgb([unit(r), unit(g), unit(b)])
    });
    (rgb, mask)
}

fn opaque_planes(image: DynamicImage) -> (Rgb32FImage, Mask) {
    let rgb8 = image.into_rgb8();
    let (width, height) = rgb8.dimensions();
    let rgb = Rgb32FImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb8.get_pixel(x, y).0;
        Rgb([unit(r), unit(g), unit(b)])
    });
    (rgb, Mask::from_pixel(width, height, Luma([1.0])))
}

/// Map an 8-bit sample onto `[0.0, 1.0]`.
#[inline]
fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}
