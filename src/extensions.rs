//! Extension list parsing for the comma-separated `image_extensions` field.
//!
//! Users type extensions loosely: with or without the leading dot, in any case,
//! with stray spaces around commas. Every token is normalized the same way:
//!
//! - `"jpg"` → `".jpg"`
//! - `" .PNG "` → `".png"`
//! - `""` → `"."` (matches nothing useful, but is not rejected)
//!
//! Matching is done against both the lowercase token and its uppercase form,
//! so `photo.jpg` and `PHOTO.JPG` both match `jpg`. Mixed-case names such as
//! `photo.Jpg` do not match; only those two case variants are checked.

use serde::Serialize;

/// Default extension list used when the caller does not supply one.
pub const DEFAULT_EXTENSIONS: &str = "jpg,jpeg,png,bmp,tiff,tif,webp";

/// Normalized set of extension suffixes, in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSet {
    suffixes: Vec<String>,
}

impl ExtensionSet {
    /// Parse a comma-separated extension list.
    ///
    /// Tokens are trimmed, lowercased, and given a leading `.` if missing.
    /// Repeated tokens are collapsed to their first occurrence.
    pub fn parse(csv: &str) -> Self {
        let mut suffixes: Vec<String> = Vec::new();
        for token in csv.split(',') {
            let token = token.trim().to_lowercase();
            let suffix = if token.starts_with('.') {
                token
            } else {
                format!(".{token}")
            };
            if !suffixes.contains(&suffix) {
                suffixes.push(suffix);
            }
        }
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Whether a file name ends with any suffix, in lowercase or uppercase form.
    ///
    /// Hidden names (leading `.`) never match, the same way a `*.ext` glob
    /// skips them.
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.starts_with('.') {
            return false;
        }
        self.suffixes
            .iter()
            .any(|s| file_name.ends_with(s.as_str()) || file_name.ends_with(&s.to_uppercase()))
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::parse(DEFAULT_EXTENSIONS)
    }
}

impl std::fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffixes.join(","))
    }
}
