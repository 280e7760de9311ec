//! The recency-ranked image selector.
//!
//! Three operations share one pipeline:
//!
//! | Operation | Runs | On failure |
//! |---|---|---|
//! | [`Selector::select`] | scan → rank → decode → normalize | `Err(SelectError)` |
//! | [`Selector::validate`] | scan → rank → decode | `Validation::Invalid(reason)` |
//! | [`Selector::change_token`] | scan → rank | `NaN` |
//!
//! `validate` reports exactly the `Display` text of the error `select` would
//! return for the same inputs, so a host can pre-flight a configuration and
//! show the user the same message execution would produce.
//!
//! Every call rescans the directory and re-decodes the file. Hosts that want
//! caching compare successive [`change_token`](Selector::change_token) values
//! and only call `select` again when they differ.

use crate::extensions::ExtensionSet;
use crate::imaging::{
    BackendError, ImageBackend, LoadedImage, Mask, PixelMode, RustBackend, SourceFormat, normalize,
};
use crate::scan::{self, Candidate, ScanError};
use image::Rgb32FImage;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Invalid image file: {} - {source}", .path.display())]
    InvalidImage {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Inputs of one selection: where to look, what to match, which rank to take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
    pub directory: PathBuf,
    pub extensions: ExtensionSet,
    /// Zero-based recency rank; 0 is the most recently modified match.
    pub index: usize,
}

impl SelectionRequest {
    pub fn new(directory: impl Into<PathBuf>, extensions_csv: &str, index: usize) -> Self {
        Self {
            directory: directory.into(),
            extensions: ExtensionSet::parse(extensions_csv),
            index,
        }
    }
}

/// A selected file decoded into float RGB and mask planes of equal size.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub mode: PixelMode,
    rgb: Rgb32FImage,
    mask: Mask,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// `W×H×3` row-major samples in `[0, 1]`.
    pub fn rgb(&self) -> &Rgb32FImage {
        &self.rgb
    }

    /// `W×H` samples in `[0, 1]`; `0.0` is fully opaque.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn into_planes(self) -> (Rgb32FImage, Mask) {
        (self.rgb, self.mask)
    }
}

/// Outcome of [`Selector::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Validation {
    Ok,
    Invalid(String),
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The diagnostic, if validation failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// Recency-ranked image selector.
///
/// Holds nothing but its decode backend, so one selector can serve any
/// number of directories and callers.
pub struct Selector<B = RustBackend> {
    backend: B,
}

impl Selector {
    /// Selector backed by the `image` crate.
    pub fn new() -> Self {
        Self {
            backend: RustBackend::new(),
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> Selector<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Pick the requested file and decode it to RGB + mask.
    pub fn select(&self, request: &SelectionRequest) -> Result<DecodedImage, SelectError> {
        let (candidate, loaded) = self.load(request)?;
        info!(
            index = request.index,
            path = %candidate.path.display(),
            format = %loaded.format,
            "loading image"
        );

        let normalized = normalize(loaded.image, loaded.format);
        debug_assert_eq!(normalized.rgb.dimensions(), normalized.mask.dimensions());

        Ok(DecodedImage {
            path: candidate.path,
            format: loaded.format,
            mode: normalized.mode,
            rgb: normalized.rgb,
            mask: normalized.mask,
        })
    }

    /// Run every check `select` runs and report the first failure as text.
    pub fn validate(&self, request: &SelectionRequest) -> Validation {
        match self.load(request) {
            Ok(_) => Validation::Ok,
            Err(e) => Validation::Invalid(e.to_string()),
        }
    }

    /// Modification time of the file `select` would pick, or NaN.
    ///
    /// See [`change_token`].
    pub fn change_token(&self, request: &SelectionRequest) -> f64 {
        change_token(request)
    }

    fn load(&self, request: &SelectionRequest) -> Result<(Candidate, LoadedImage), SelectError> {
        let candidate = scan::pick(&request.directory, &request.extensions, request.index)?;
        let loaded = self
            .backend
            .load(&candidate.path)
            .map_err(|source| SelectError::InvalidImage {
                path: candidate.path.clone(),
                source,
            })?;
        Ok((candidate, loaded))
    }
}

/// Seconds-since-epoch modification time of the file at the requested rank.
///
/// Returns NaN when the directory is missing or unreadable, nothing matches,
/// or the rank is past the last match. The file itself is not opened. Since
/// `NaN != NaN`, a host comparing successive tokens sees a failing
/// configuration as changed on every call.
pub fn change_token(request: &SelectionRequest) -> f64 {
    scan::pick(&request.directory, &request.extensions, request.index)
        .map(|c| c.timestamp())
        .unwrap_or(f64::NAN)
}

/// Path of the file at the requested rank, without decoding it.
pub fn resolve(request: &SelectionRequest) -> Result<PathBuf, ScanError> {
    scan::pick(&request.directory, &request.extensions, request.index).map(|c| c.path)
}
