//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/appswitcher/config.json`.
//! Every field is optional; a missing file or a minimal `{}` gives the
//! compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "apps_dir": "/Applications/Transcrib",
//!   "layout": {
//!     "base_size": 128,
//!     "min_size": 64,
//!     "screen_width_ratio": 0.8
//!   },
//!   "quit_others": true
//! }
//! ```

use crate::catalog::DEFAULT_APPS_DIR;
use crate::layout::{DEFAULT_BASE_SIZE, DEFAULT_MIN_SIZE, DEFAULT_SCREEN_WIDTH_RATIO};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for `.app` bundles.
    pub apps_dir: PathBuf,

    /// Row sizing.
    pub layout: LayoutConfig,

    /// Ask every other listed app to quit when one is launched.
    pub quit_others: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apps_dir: PathBuf::from(DEFAULT_APPS_DIR),
            layout: LayoutConfig::default(),
            quit_others: true,
        }
    }
}

/// Row sizing settings.  Sizes are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side length of each button when the row fits.
    pub base_size: u32,
    /// Buttons are never shrunk below this.
    pub min_size: u32,
    /// Share of the display width the row may take.
    pub screen_width_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_SIZE,
            min_size: DEFAULT_MIN_SIZE,
            screen_width_ratio: DEFAULT_SCREEN_WIDTH_RATIO,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        if l.min_size == 0 || l.base_size == 0 {
            return Err(ConfigError("layout sizes must be positive".into()));
        }
        if l.min_size > l.base_size {
            return Err(ConfigError(format!(
                "layout.min_size ({}) exceeds layout.base_size ({})",
                l.min_size, l.base_size
            )));
        }
        if !(l.screen_width_ratio > 0.0 && l.screen_width_ratio <= 1.0) {
            return Err(ConfigError(format!(
                "layout.screen_width_ratio must be in (0, 1], got {}",
                l.screen_width_ratio
            )));
        }
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_config() {
        let json = r#"{
            "apps_dir": "/Applications/Tools",
            "layout": {
                "base_size": 96,
                "min_size": 48,
                "screen_width_ratio": 0.5
            },
            "quit_others": false
        }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.apps_dir, PathBuf::from("/Applications/Tools"));
        assert_eq!(cfg.layout.base_size, 96);
        assert_eq!(cfg.layout.min_size, 48);
        assert_eq!(cfg.layout.screen_width_ratio, 0.5);
        assert!(!cfg.quit_others);
        cfg.validate().unwrap();
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.apps_dir, PathBuf::from(DEFAULT_APPS_DIR));
        assert_eq!(cfg.layout, LayoutConfig::default());
        assert!(cfg.quit_others);
    }

    #[test]
    fn deserialize_partial_layout() {
        let cfg: Config = serde_json::from_str(r#"{ "layout": { "min_size": 32 } }"#).unwrap();
        assert_eq!(cfg.layout.min_size, 32);
        assert_eq!(cfg.layout.base_size, DEFAULT_BASE_SIZE);
    }

    #[test]
    fn unknown_top_level_keys_ignored() {
        let json = r#"{ "quit_others": true, "future_section": { "key": 42 } }"#;
        let _cfg: Config = serde_json::from_str(json).unwrap();
    }

    #[test]
    fn load_rejects_floor_above_base() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "layout": { "base_size": 32, "min_size": 64 } }"#).unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("min_size"));
    }

    #[test]
    fn load_rejects_bad_ratio() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "layout": { "screen_width_ratio": 0.0 } }"#).unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Config::load(&tmp.path().join("absent.json")).is_err());
    }
}
