//! CLI output formatting.
//!
//! Every command has a `format_*` function that returns lines (pure, no I/O,
//! unit tested) and the binary prints them. Diagnostics go through `tracing`
//! on stderr; these lines are the command's actual result on stdout.
//!
//! ## Select
//!
//! ```text
//! 000 sunset.png
//!     Source: /photos/inbox/sunset.png
//!     Format: PNG (alpha)
//!     Size: 640x480
//!     Mask: min 0.000  mean 0.250  max 1.000
//! ```
//!
//! ## Check
//!
//! ```text
//! ok
//! ```
//! or the reason `select` would fail with.

use crate::imaging::{Mask, PixelMode};
use crate::select::{DecodedImage, Validation};

/// Format a 0-based rank as 3-digit zero-padded.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn mode_label(mode: PixelMode) -> &'static str {
    match mode {
        PixelMode::WideGray => "16-bit gray",
        PixelMode::Alpha => "alpha",
        PixelMode::Opaque => "opaque",
    }
}

/// Minimum, mean and maximum of a mask. Empty masks report zeros.
pub fn mask_stats(mask: &Mask) -> (f32, f32, f32) {
    let samples = mask.as_raw();
    if samples.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let (min, max, sum) = samples.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
        |(lo, hi, sum), &v| (lo.min(v), hi.max(v), sum + f64::from(v)),
    );
    (min, (sum / samples.len() as f64) as f32, max)
}

/// Summary of a successful selection.
pub fn format_selection(index: usize, decoded: &DecodedImage) -> Vec<String> {
    let name = decoded
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| decoded.path.display().to_string());
    let (min, mean, max) = mask_stats(decoded.mask());

    vec![
        format!("{} {}", format_index(index), name),
        format!("{}Source: {}", indent(1), decoded.path.display()),
        format!(
            "{}Format: {} ({})",
            indent(1),
            decoded.format,
            mode_label(decoded.mode)
        ),
        format!("{}Size: {}x{}", indent(1), decoded.width(), decoded.height()),
        format!(
            "{}Mask: min {:.3}  mean {:.3}  max {:.3}",
            indent(1),
            min,
            mean,
            max
        ),
    ]
}

/// Result of `check`: `ok`, or the failure reason.
pub fn format_validation(validation: &Validation) -> String {
    match validation {
        Validation::Ok => "ok".to_string(),
        Validation::Invalid(reason) => reason.clone(),
    }
}

/// Result of `token`: the timestamp with full precision, or `NaN`.
pub fn format_token(token: f64) -> String {
    if token.is_nan() {
        "NaN".to_string()
    } else {
        format!("{token:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::{SelectionRequest, Selector};
    use crate::test_helpers::*;
    use image::Luma;

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(0), "000");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn mask_stats_of_uniform_mask() {
        let mask = Mask::from_pixel(3, 3, Luma([1.0]));
        assert_eq!(mask_stats(&mask), (1.0, 1.0, 1.0));
    }

    #[test]
    fn mask_stats_of_split_mask() {
        let mask = Mask::from_fn(4, 1, |x, _| Luma([if x < 1 { 1.0 } else { 0.0 }]));
        assert_eq!(mask_stats(&mask), (0.0, 0.25, 1.0));
    }

    #[test]
    fn mask_stats_of_empty_mask() {
        let mask = Mask::new(0, 0);
        assert_eq!(mask_stats(&mask), (0.0, 0.0, 0.0));
    }

    #[test]
    fn selection_summary_lines() {
        let tmp = TempDir::new().unwrap();
        let path = write_rgb(tmp.path(), "sunset.png", 1, [255, 0, 0]);
        let decoded = Selector::new()
            .select(&SelectionRequest::new(tmp.path(), "png", 0))
            .unwrap();

        assert_eq!(
            format_selection(0, &decoded),
            [
                "000 sunset.png".to_string(),
                format!("    Source: {}", path.display()),
                "    Format: PNG (opaque)".to_string(),
                "    Size: 8x6".to_string(),
                "    Mask: min 1.000  mean 1.000  max 1.000".to_string(),
            ]
        );
    }

    #[test]
    fn validation_lines() {
        assert_eq!(format_validation(&Validation::Ok), "ok");
        assert_eq!(
            format_validation(&Validation::Invalid("No image files found in folder: /x".into())),
            "No image files found in folder: /x"
        );
    }

    #[test]
    fn token_lines() {
        assert_eq!(format_token(f64::NAN), "NaN");
        assert_eq!(format_token(1_700_000_000.5), "1700000000.500000");
    }
}
