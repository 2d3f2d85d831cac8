//! Game configuration (`conf.toml`)
//!
//! Each game may ship a `conf.toml` at the root of its directory. Every
//! field is optional; a missing file means all defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::context::GraphicsConfig;
use crate::io::{FileSystem, FsError};
use crate::state::MAX_GRAPHIC_STATES;

/// File name looked up at the game root.
pub const CONF_FILE_NAME: &str = "conf.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read conf.toml: {0}")]
    Read(#[from] FsError),

    #[error("failed to parse conf.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its allowed range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-game settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Screen surface width in pixels (default: 256)
    #[serde(default = "default_size")]
    pub width: u32,
    /// Screen surface height in pixels (default: 256)
    #[serde(default = "default_size")]
    pub height: u32,
    /// Frame rate cap, 0 for uncapped (default: 0)
    #[serde(default)]
    pub fps: u32,
    /// Window scale factor (default: 1.0, must be >= 1)
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Show the mouse cursor (default: true)
    #[serde(default = "default_true")]
    pub cursor_visible: bool,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    /// Game identity, used for the write directory
    #[serde(default)]
    pub organisation: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
}

fn default_size() -> u32 {
    256
}

fn default_zoom() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_window_title() -> String {
    format!("sprig v{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            fps: 0,
            zoom: default_zoom(),
            cursor_visible: default_true(),
            window_title: default_window_title(),
            organisation: None,
            application: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a `conf.toml` document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `conf.toml` from the game root, falling back to defaults when
    /// the file does not exist.
    pub fn load(files: &dyn FileSystem) -> Result<Self, ConfigError> {
        match files.read(CONF_FILE_NAME) {
            Ok(bytes) => {
                let source = String::from_utf8_lossy(&bytes);
                Self::from_toml(&source)
            }
            Err(FsError::NotFound(_)) => {
                info!("no {CONF_FILE_NAME} found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::Invalid {
                field: "width",
                reason: "must be greater than 0".into(),
            });
        }
        if self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "height",
                reason: "must be greater than 0".into(),
            });
        }
        if self.zoom.is_nan() || self.zoom < 1.0 {
            return Err(ConfigError::Invalid {
                field: "zoom",
                reason: format!("must be at least 1, got {}", self.zoom),
            });
        }
        Ok(())
    }

    /// Construction parameters for the graphics context.
    pub fn graphics(&self) -> GraphicsConfig {
        GraphicsConfig {
            width: self.width,
            height: self.height,
            capacity: MAX_GRAPHIC_STATES,
        }
    }

    /// `(organisation, application)` when both are set.
    pub fn identity(&self) -> Option<(&str, &str)> {
        match (&self.organisation, &self.application) {
            (Some(org), Some(app)) => Some((org.as_str(), app.as_str())),
            _ => None,
        }
    }

    /// Platform data directory for this game's writes.
    ///
    /// On Linux: `~/.local/share/<application>`
    ///
    /// Returns `None` without an identity or when the home directory cannot
    /// be determined.
    pub fn write_dir(&self) -> Option<PathBuf> {
        let (org, app) = self.identity()?;
        directories::ProjectDirs::from("", org, app).map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFileSystem;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.width, 256);
        assert_eq!(config.height, 256);
        assert_eq!(config.fps, 0);
        assert_eq!(config.zoom, 1.0);
        assert!(config.cursor_visible);
        assert!(config.window_title.starts_with("sprig v"));
        assert!(config.identity().is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(GameConfig::from_toml("").unwrap(), GameConfig::default());
    }

    // =============================================================
    // Parsing tests
    // =============================================================

    #[test]
    fn test_partial_toml() {
        let config = GameConfig::from_toml("width = 320\nfps = 60\n").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 256);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn test_full_toml() {
        let toml_str = r#"
            width = 160
            height = 144
            fps = 30
            zoom = 3.0
            cursor_visible = false
            window_title = "Pocket"
            organisation = "acme"
            application = "pocket"
        "#;
        let config = GameConfig::from_toml(toml_str).unwrap();
        assert_eq!((config.width, config.height), (160, 144));
        assert_eq!(config.zoom, 3.0);
        assert!(!config.cursor_visible);
        assert_eq!(config.window_title, "Pocket");
        assert_eq!(config.identity(), Some(("acme", "pocket")));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            GameConfig::from_toml("width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }

    // =============================================================
    // Validation tests
    // =============================================================

    #[test]
    fn test_zero_width_rejected() {
        let err = GameConfig::from_toml("width = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "width", .. }));
    }

    #[test]
    fn test_zero_height_rejected() {
        let err = GameConfig::from_toml("height = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "height", .. }));
    }

    #[test]
    fn test_small_zoom_rejected() {
        let err = GameConfig::from_toml("zoom = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom", .. }));
    }

    // =============================================================
    // Loading tests
    // =============================================================

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let files = MemoryFileSystem::new();
        assert_eq!(GameConfig::load(&files).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_load_reads_game_root() {
        let mut files = MemoryFileSystem::new();
        files.insert("/conf.toml", "width = 64\nheight = 32").unwrap();
        let config = GameConfig::load(&files).unwrap();
        let graphics = config.graphics();
        assert_eq!((graphics.width, graphics.height), (64, 32));
        assert_eq!(graphics.capacity, MAX_GRAPHIC_STATES);
    }
}
