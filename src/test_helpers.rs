//! Shared test utilities for the recent-image test suite.
//!
//! Fixtures are generated on the fly inside a [`TempDir`] rather than copied
//! from disk, because the interesting property of every fixture is its
//! modification time, and checked-in files lose that on checkout.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_rgb(tmp.path(), "a.png", 1, [255, 0, 0]);
//! write_rgb(tmp.path(), "b.jpg", 2, [0, 255, 0]);
//! touch(tmp.path(), "notes.png", 3); // not a decodable image
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tiff::encoder::{TiffEncoder, colortype};

pub use tempfile::TempDir;

/// Base of every fixture timestamp, so tick `n` maps to a fixed wall-clock time.
const BASE_EPOCH_SECS: u64 = 1_700_000_000;

// =========================================================================
// Timestamps
// =========================================================================

/// Wall-clock time for fixture tick `tick`.
pub fn tick_time(tick: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(BASE_EPOCH_SECS + tick)
}

/// Set a file's modification time to fixture tick `tick`.
pub fn set_mtime(path: &Path, tick: u64) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(tick_time(tick)))
        .unwrap_or_else(|e| panic!("failed to set mtime on {}: {e}", path.display()));
}

// =========================================================================
// Fixture writers
// =========================================================================

/// Write arbitrary bytes (not an image) and stamp the mtime.
pub fn touch(dir: &Path, name: &str, tick: u64) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"not really an image").unwrap();
    set_mtime(&path, tick);
    path
}

/// Write a solid-colour 8x6 RGB image. The encoder is picked from the extension.
pub fn write_rgb(dir: &Path, name: &str, tick: u64, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(8, 6, Rgb(color))
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    set_mtime(&path, tick);
    path
}

/// Write an RGBA PNG whose alpha channel is filled by `alpha(x, y)`.
pub fn write_rgba_png(
    dir: &Path,
    name: &str,
    tick: u64,
    (width, height): (u32, u32),
    alpha: impl Fn(u32, u32) -> u8,
) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_fn(width, height, |x, y| Rgba([10, 20, 30, alpha(x, y)]))
        .save(&path)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    set_mtime(&path, tick);
    path
}

/// Write a 32-bit unsigned integer grayscale TIFF, a layout the `image`
/// encoders cannot produce.
pub fn write_gray32_tiff(
    dir: &Path,
    name: &str,
    tick: u64,
    width: u32,
    samples: &[u32],
) -> PathBuf {
    let path = dir.join(name);
    let height = samples.len() as u32 / width;
    let mut encoder = TiffEncoder::new(File::create(&path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray32>(width, height, samples)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    set_mtime(&path, tick);
    path
}

/// Write a one-row 8-bit grayscale PNG whose `tRNS` chunk marks `key` as
/// fully transparent.
pub fn write_keyed_gray_png(dir: &Path, name: &str, tick: u64, row: &[u8], key: u8) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = png::Encoder::new(File::create(&path).unwrap(), row.len() as u32, 1);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_trns(vec![0, key]);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(row).unwrap();
    writer.finish().unwrap();
    set_mtime(&path, tick);
    path
}

/// File name component of a path, for readable assertions.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap()
}
