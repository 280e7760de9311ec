//! Image decode backend trait and shared types.
//!
//! The [`ImageBackend`] trait has a single operation, [`load`](ImageBackend::load):
//! open a file, identify its container format, and decode it to pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock so selection logic can be exercised
//! with synthetic pixel data that no encoder would write.

use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot identify image format")]
    UnknownFormat,
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Decode(String),
}

/// Container formats the selector accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceFormat {
    Jpeg,
    Png,
    Bmp,
    Tiff,
    WebP,
    Gif,
}

impl SourceFormat {
    /// Map a detected `image` crate format onto the accepted set.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            ImageFormat::WebP => Some(Self::WebP),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
            Self::WebP => "WEBP",
            Self::Gif => "GIF",
        }
    }

    /// Whether the decoder emits an alpha channel even for files that carry
    /// no transparency information.
    ///
    /// GIF frames always decode to RGBA8, so an all-opaque alpha plane there
    /// says nothing about the file.
    pub fn synthesizes_alpha(self) -> bool {
        matches!(self, Self::Gif)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded file together with the format it was detected as.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub format: SourceFormat,
    pub image: DynamicImage,
}

/// Trait for image decode backends.
pub trait ImageBackend: Sync {
    /// Open, identify and fully decode the image at `path`.
    ///
    /// Fails with [`BackendError::UnsupportedFormat`] when the file is a
    /// recognizable image outside [`SourceFormat`].
    fn load(&self, path: &Path) -> Result<LoadedImage, BackendError>;
}
