//! # Configuration
//!
//! Settings are loaded with [`confique`] in layers, highest priority first:
//!
//! 1. **Environment variables**: `MILSYM_DEFAULT_STANDARD`,
//!    `MILSYM_FAVORITES_FILE`, `MILSYM_PREVIEW_SIZE`.
//! 2. **Config file**: `milsym.toml` in the data directory.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_standard` | `2525D` | Standard at startup (`2525D` or `2525C_B2`) |
//! | `favorites_file` | `SymbolFavorites.json` | Favorites document in the data directory |
//! | `preview_size` | `256` | Edge in pixels of the square preview |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MilsymError, Result};
use crate::standard::StandardVersion;

pub const CONFIG_FILE: &str = "milsym.toml";

/// Configuration for milsym, stored in `milsym.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MilsymConfig {
    /// Standard selected at startup ("2525D" or "2525C_B2").
    #[config(env = "MILSYM_DEFAULT_STANDARD", default = "2525D")]
    pub default_standard: String,

    /// Favorites document. Relative paths are resolved against the data
    /// directory.
    #[config(env = "MILSYM_FAVORITES_FILE", default = "SymbolFavorites.json")]
    pub favorites_file: String,

    /// Edge in pixels of the square symbol preview.
    #[config(env = "MILSYM_PREVIEW_SIZE", default = 256)]
    pub preview_size: u32,
}

impl Default for MilsymConfig {
    fn default() -> Self {
        Self {
            default_standard: StandardVersion::Mil2525D.as_str().to_string(),
            favorites_file: "SymbolFavorites.json".to_string(),
            preview_size: 256,
        }
    }
}

impl MilsymConfig {
    /// Load from the environment, `milsym.toml` in `data_dir`, and defaults.
    ///
    /// A missing config file is not an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| MilsymError::Config(e.to_string()))
    }

    /// The configured startup standard.
    pub fn standard(&self) -> Result<StandardVersion> {
        self.default_standard.parse()
    }

    /// Absolute location of the favorites document.
    pub fn favorites_path(&self, data_dir: &Path) -> PathBuf {
        let path = PathBuf::from(&self.favorites_file);
        if path.is_absolute() {
            path
        } else {
            data_dir.join(path)
        }
    }

    /// A commented `milsym.toml` listing every key with its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults() {
        let config = MilsymConfig::default();
        assert_eq!(config.standard().unwrap(), StandardVersion::Mil2525D);
        assert_eq!(config.favorites_file, "SymbolFavorites.json");
        assert_eq!(config.preview_size, 256);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "default_standard = \"2525C_B2\"\npreview_size = 96\n",
        )
        .unwrap();

        let config = MilsymConfig::load(dir.path()).unwrap();
        assert_eq!(config.standard().unwrap(), StandardVersion::Mil2525CB2);
        assert_eq!(config.preview_size, 96);
        assert_eq!(config.favorites_file, "SymbolFavorites.json");
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "preview_size = \"big\"\n").unwrap();
        assert!(matches!(
            MilsymConfig::load(dir.path()),
            Err(MilsymError::Config(_))
        ));
    }

    #[test]
    fn unknown_standard_is_rejected() {
        let config = MilsymConfig {
            default_standard: "APP-6".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.standard(),
            Err(MilsymError::UnknownStandard(_))
        ));
    }

    #[test]
    fn relative_favorites_file_lives_in_data_dir() {
        let config = MilsymConfig::default();
        assert_eq!(
            config.favorites_path(Path::new("/data")),
            PathBuf::from("/data/SymbolFavorites.json")
        );
    }

    #[test]
    fn template_lists_every_key() {
        let template = MilsymConfig::template();
        for key in ["default_standard", "favorites_file", "preview_size"] {
            assert!(template.contains(key), "missing {key}");
        }
    }
}
