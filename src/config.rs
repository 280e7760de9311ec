//! Selector configuration for the `recent-image` command.
//!
//! The library API takes its three inputs directly. The command line tool
//! can also read them from a TOML file, so a watched folder can be set up once
//! and reused:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! directory = ""                              # Folder to pick images from
//! extensions = "jpg,jpeg,png,bmp,tiff,tif,webp"  # Comma-separated, case-insensitive
//! index = 0                                   # 0 = most recent, 1 = second most recent, ...
//! ```
//!
//! ## Layering
//!
//! Values are resolved in three layers, later layers winning key by key:
//!
//! 1. stock defaults
//! 2. the config file (`--config`), if given
//! 3. command line flags (`--dir`, `--extensions`, `--index`)
//!
//! A relative `directory` in a config file is resolved against the file's own
//! folder, not the working directory.
//!
//! Unknown keys are rejected to catch typos early.

use crate::descriptor::INDEX_MAX;
use crate::extensions::DEFAULT_EXTENSIONS;
use crate::select::SelectionRequest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Selector configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorConfig {
    /// Folder to pick images from.
    pub directory: PathBuf,
    /// Comma-separated extension list.
    pub extensions: String,
    /// Recency rank, 0 = most recently modified.
    pub index: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            extensions: DEFAULT_EXTENSIONS.to_string(),
            index: 0,
        }
    }
}

impl SelectorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index > INDEX_MAX {
            return Err(ConfigError::Validation(format!(
                "index must be 0-{INDEX_MAX}, got {}",
                self.index
            )));
        }
        let blank = self
            .extensions
            .split(',')
            .all(|token| token.trim().trim_start_matches('.').is_empty());
        if blank {
            return Err(ConfigError::Validation(
                "extensions must name at least one extension".into(),
            ));
        }
        Ok(())
    }

    pub fn to_request(&self) -> SelectionRequest {
        SelectionRequest::new(&self.directory, &self.extensions, self.index)
    }
}

/// Values given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub directory: Option<PathBuf>,
    pub extensions: Option<String>,
    pub index: Option<usize>,
}

impl Overrides {
    fn to_value(&self) -> toml::Value {
        let mut table = toml::Table::new();
        if let Some(dir) = &self.directory {
            table.insert(
                "directory".into(),
                toml::Value::String(dir.to_string_lossy().into_owned()),
            );
        }
        if let Some(ext) = &self.extensions {
            table.insert("extensions".into(), toml::Value::String(ext.clone()));
        }
        if let Some(index) = self.index {
            // toml integers are i64; anything larger fails validation anyway
            let index = i64::try_from(index).unwrap_or(i64::MAX);
            table.insert("index".into(), toml::Value::Integer(index));
        }
        toml::Value::Table(table)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    let mut table = toml::Table::new();
    table.insert("directory".into(), toml::Value::String(String::new()));
    table.insert(
        "extensions".into(),
        toml::Value::String(DEFAULT_EXTENSIONS.into()),
    );
    table.insert("index".into(), toml::Value::Integer(0));
    toml::Value::Table(table)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value, anchoring a relative `directory`
/// at the file's parent folder.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut value: toml::Value = toml::from_str(&content)?;

    let base = path.parent().unwrap_or(Path::new(""));
    if let Some(toml::Value::String(dir)) = value.get_mut("directory") {
        let dir_path = Path::new(dir.as_str());
        if !dir.is_empty() && dir_path.is_relative() {
            *dir = base.join(dir_path).to_string_lossy().into_owned();
        }
    }
    Ok(value)
}

/// Merge the optional config file and the command line overrides onto the
/// stock defaults, then deserialize and validate.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<SelectorConfig, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(path) = file {
        merged = merge_toml(merged, load_raw_config(path)?);
    }
    merged = merge_toml(merged, overrides.to_value());

    let config: SelectorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# recent-image configuration
# ==========================
#
# Every key is optional; the values below are the defaults. Command line
# flags (--dir, --extensions, --index) override anything set here.

# Folder to pick images from. Relative paths are resolved against the
# folder containing this file. Must be set here or with --dir.
directory = ""

# Comma-separated list of extensions to consider. A leading dot is optional
# and matching accepts both the lowercase and the UPPERCASE spelling
# (photo.jpg and PHOTO.JPG), but not mixed case.
extensions = "jpg,jpeg,png,bmp,tiff,tif,webp"

# Which file to pick, by modification time: 0 = most recent,
# 1 = second most recent, and so on (0-1000).
index = 0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("recent-image.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = SelectorConfig::default();
        assert_eq!(config.directory, PathBuf::new());
        assert_eq!(config.extensions, "jpg,jpeg,png,bmp,tiff,tif,webp");
        assert_eq!(config.index, 0);
    }

    #[test]
    fn resolve_without_file_or_flags_is_default() {
        let config = resolve_config(None, &Overrides::default()).unwrap();
        assert_eq!(config, SelectorConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "index = 3\n");

        let config = resolve_config(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.index, 3);
        assert_eq!(config.extensions, DEFAULT_EXTENSIONS);
    }

    #[test]
    fn flags_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "extensions = \"png\"\nindex = 3\n");
        let overrides = Overrides {
            index: Some(1),
            ..Overrides::default()
        };

        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.index, 1);
        assert_eq!(config.extensions, "png");
    }

    #[test]
    fn relative_directory_anchored_at_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "directory = \"inbox\"\n");

        let config = resolve_config(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.directory, tmp.path().join("inbox"));
    }

    #[test]
    fn absolute_directory_kept() {
        let tmp = TempDir::new().unwrap();
        let abs = tmp.path().join("elsewhere");
        let path = write_config(
            tmp.path(),
            &format!("directory = {:?}\n", abs.to_string_lossy()),
        );

        let config = resolve_config(Some(&path), &Overrides::default()).unwrap();
        assert_eq!(config.directory, abs);
    }

    #[test]
    fn flag_directory_not_reanchored() {
        let overrides = Overrides {
            directory: Some(PathBuf::from("relative/dir")),
            ..Overrides::default()
        };
        let config = resolve_config(None, &overrides).unwrap();
        assert_eq!(config.directory, PathBuf::from("relative/dir"));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "folder = \"/tmp\"\n");

        let result = resolve_config(Some(&path), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(tmp.path(), "index = [unclosed\n");

        let result = resolve_config(Some(&path), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = resolve_config(Some(&tmp.path().join("nope.toml")), &Overrides::default());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn validate_index_boundary_ok() {
        let config = SelectorConfig {
            index: 1000,
            ..SelectorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_index_too_high() {
        let overrides = Overrides {
            index: Some(1001),
            ..Overrides::default()
        };
        let result = resolve_config(None, &overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_blank_extensions() {
        let config = SelectorConfig {
            extensions: " , ".into(),
            ..SelectorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn to_request_parses_extensions() {
        let config = SelectorConfig {
            directory: PathBuf::from("/photos"),
            extensions: "PNG, gif".into(),
            index: 2,
        };
        let request = config.to_request();
        assert_eq!(request.directory, PathBuf::from("/photos"));
        assert_eq!(request.extensions.suffixes(), &[".png", ".gif"]);
        assert_eq!(request.index, 2);
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("index = 0\nextensions = \"png\"").unwrap();
        let overlay: toml::Value = toml::from_str("index = 4").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("index").unwrap().as_integer(), Some(4));
        assert_eq!(merged.get("extensions").unwrap().as_str(), Some("png"));
    }

    #[test]
    fn stock_defaults_value_deserializes_to_default() {
        let config: SelectorConfig = stock_defaults_value().try_into().unwrap();
        assert_eq!(config, SelectorConfig::default());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SelectorConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SelectorConfig::default());
    }
}
