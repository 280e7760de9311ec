//! Pure Rust decode backend built on the `image` crate.
//!
//! ## Format detection
//!
//! The format is sniffed from the file's leading bytes, falling back to the
//! extension only when the content is not recognized. A PNG saved as
//! `photo.jpg` therefore decodes as PNG, and a WebP renamed to `.png` is still
//! accepted, while an ICO renamed to `.png` is rejected as unsupported.
//!
//! | Format | Decoder |
//! |---|---|
//! | JPEG | `image::codecs::jpeg` (zune-jpeg) |
//! | PNG | `image::codecs::png` (palette and tRNS expanded to RGBA) |
//! | BMP | `image::codecs::bmp` |
//! | TIFF | `image::codecs::tiff`, or `tiff` directly for 32-bit integer gray |
//! | WebP | `image::codecs::webp` (image-webp) |
//! | GIF | `image::codecs::gif` (first frame, always RGBA8) |
//!
//! ## Transparency keys
//!
//! The PNG decoder expands a grayscale `tRNS` key into a gray+alpha buffer,
//! which is indistinguishable from a stored gray+alpha image. Keyed gray is
//! therefore promoted to RGBA8 here, where the PNG header is still at hand;
//! normalization treats stored gray+alpha as opaque.

use super::backend::{BackendError, ImageBackend, LoadedImage, SourceFormat};
use image::{DynamicImage, ImageBuffer, ImageError, ImageReader, Luma};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

/// IHDR colour type of a grayscale PNG without an alpha channel.
const PNG_GRAYSCALE: u8 = 0;
/// Offset of the IHDR colour type byte: signature, chunk length, chunk type,
/// width, height, bit depth.
const PNG_COLOR_TYPE_OFFSET: usize = 8 + 4 + 4 + 4 + 4 + 1;

/// Decode backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn load(&self, path: &Path) -> Result<LoadedImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;

        let detected = reader.format().ok_or(BackendError::UnknownFormat)?;
        let format = SourceFormat::from_image_format(detected).ok_or_else(|| {
            BackendError::UnsupportedFormat(format!("{detected:?}").to_uppercase())
        })?;

        let image = match reader.decode() {
            Ok(image) => image,
            Err(e @ ImageError::Unsupported(_)) if format == SourceFormat::Tiff => {
                decode_gray32_tiff(path)?
                    .ok_or_else(|| BackendError::Decode(e.to_string()))?
            }
            Err(e) => return Err(BackendError::Decode(e.to_string())),
        };

        let keyed_gray = format == SourceFormat::Png
            && matches!(image, DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLumaA16(_))
            && png_color_type(path)? == PNG_GRAYSCALE;
        let image = if keyed_gray {
            DynamicImage::ImageRgba8(image.into_rgba8())
        } else {
            image
        };

        Ok(LoadedImage { format, image })
    }
}

/// Decode a 32-bit integer grayscale TIFF as 16-bit gray.
///
/// Returns `None` for any other TIFF layout. Samples saturate at
/// `u16::MAX`: wide gray is rescaled by 1/255 and clamped to 8 bits, so
/// every sample from `255 * 256` up is white either way.
fn decode_gray32_tiff(path: &Path) -> Result<Option<DynamicImage>, BackendError> {
    let tiff_err = |e: tiff::TiffError| BackendError::Decode(e.to_string());

    let mut decoder = Decoder::new(BufReader::new(File::open(path)?)).map_err(tiff_err)?;
    if decoder.colortype().map_err(tiff_err)? != ColorType::Gray(32) {
        return Ok(None);
    }
    let (width, height) = decoder.dimensions().map_err(tiff_err)?;

    let samples: Vec<u16> = match decoder.read_image().map_err(tiff_err)? {
        DecodingResult::U32(data) => data
            .into_iter()
            .map(|v| v.min(u32::from(u16::MAX)) as u16)
            .collect(),
        DecodingResult::I32(data) => data
            .into_iter()
            .map(|v| v.clamp(0, i32::from(u16::MAX)) as u16)
            .collect(),
        _ => return Ok(None),
    };

    Ok(ImageBuffer::<Luma<u16>, _>::from_raw(width, height, samples)
        .map(DynamicImage::ImageLuma16))
}

/// Colour type byte from a PNG's IHDR chunk.
fn png_color_type(path: &Path) -> Result<u8, BackendError> {
    let mut header = [0u8; PNG_COLOR_TYPE_OFFSET + 1];
    File::open(path)?.read_exact(&mut header)?;
    Ok(header[PNG_COLOR_TYPE_OFFSET])
}
