//! Image decoding and pixel-mode normalization, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::with_guessed_format` |
//! | **Decode** | `image::ImageReader::decode` |
//! | **Normalize** | [`normalize`] (float RGB + inverted alpha mask) |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Normalize**: pure functions from `DynamicImage` to RGB/mask buffers (unit testable)

pub mod backend;
pub mod normalize;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, LoadedImage, SourceFormat};
pub use normalize::{Mask, Normalized, PixelMode, normalize};
pub use rust_backend::RustBackend;
