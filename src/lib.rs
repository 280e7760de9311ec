//! # recent-image
//!
//! Pick an image from a folder by how recently it was modified, and decode it
//! into a float RGB buffer plus a transparency mask.
//!
//! ```no_run
//! let decoded = recent_image::select("/photos/inbox", "png,jpg", 0)?;
//! println!("{} is {}x{}", decoded.path.display(), decoded.width(), decoded.height());
//! # Ok::<(), recent_image::SelectError>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! directory ─┐
//! extensions ├─ scan ─→ rank ─→ decode ─→ normalize ─→ RGB [H,W,3] + mask [H,W]
//! index ─────┘
//! ```
//!
//! 1. **Scan** lists the folder and keeps regular files whose name ends with
//!    one of the extensions (lowercase or UPPERCASE spelling).
//! 2. **Rank** orders them newest first by modification time and takes the
//!    one at `index` (0 = most recent).
//! 3. **Decode** sniffs the format (JPEG, PNG, BMP, TIFF, WebP or GIF) and
//!    decodes it.
//! 4. **Normalize** maps every pixel layout onto float RGB in `[0, 1]` and a
//!    mask where `0.0` is opaque and `1.0` is transparent.
//!
//! Nothing is cached. [`change_token`] returns the picked file's modification
//! time so a caller can decide when a fresh [`select`] is worth doing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extensions`] | Comma-separated extension list parsing and file name matching |
//! | [`scan`] | Directory listing, recency ordering, rank lookup |
//! | [`imaging`] | Decode backend (`image` crate) and pixel-mode normalization |
//! | [`select`] | The [`Selector`]: `select`, `validate`, `change_token` |
//! | [`descriptor`] | Static description of inputs/outputs for host pipelines |
//! | [`batch`] | Wrap a selection as a batch of one for host pipelines |
//! | [`config`] | TOML config layering for the command line tool |
//! | [`output`] | Command line output formatting |
//!
//! # Mask Convention
//!
//! The mask is the **inverse** of alpha: `mask = 1 − alpha / 255`. Images
//! without transparency get a mask of all ones. Both follow the convention of
//! the node pipelines this crate feeds, where the mask marks the area to fill
//! rather than the area to keep.

pub mod batch;
pub mod config;
pub mod descriptor;
pub mod extensions;
pub mod imaging;
pub mod output;
pub mod scan;
pub mod select;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use batch::BatchedImage;
pub use descriptor::descriptor;
pub use extensions::{DEFAULT_EXTENSIONS, ExtensionSet};
pub use scan::ScanError;
pub use select::{DecodedImage, SelectError, SelectionRequest, Selector, Validation};

use std::path::Path;

/// Decode the image at recency rank `index` in `directory`.
///
/// Shorthand for [`Selector::select`] with the default backend.
pub fn select(
    directory: impl AsRef<Path>,
    extensions_csv: &str,
    index: usize,
) -> Result<DecodedImage, SelectError> {
    Selector::new().select(&SelectionRequest::new(
        directory.as_ref(),
        extensions_csv,
        index,
    ))
}

/// Check whether [`select`] would succeed, without normalizing pixels.
pub fn validate(directory: impl AsRef<Path>, extensions_csv: &str, index: usize) -> Validation {
    Selector::new().validate(&SelectionRequest::new(
        directory.as_ref(),
        extensions_csv,
        index,
    ))
}

/// Modification time of the file [`select`] would pick, or NaN.
pub fn change_token(directory: impl AsRef<Path>, extensions_csv: &str, index: usize) -> f64 {
    select::change_token(&SelectionRequest::new(
        directory.as_ref(),
        extensions_csv,
        index,
    ))
}
