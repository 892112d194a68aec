//! Configuration file support for lensview.
//!
//! This module provides serialization and deserialization of lens defaults
//! and user preferences, stored as JSON in the user's config directory.

use lensview_core::constants::{
    DEFAULT_LENS_SIZE, DEFAULT_ZOOM_FACTOR, MAX_LENS_SIZE, MAX_ZOOM_FACTOR, MIN_LENS_SIZE,
    MIN_ZOOM_FACTOR,
};
use lensview_core::LensError;
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;
use crate::paint::LensColor;
use crate::units::UnitMapping;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Parse a level name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|level| level.name().to_lowercase() == lower)
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Lens defaults
    #[serde(default)]
    pub lens: LensSettings,
}

fn default_app_name() -> String {
    "lensview".to_string()
}

/// User preferences section of the config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Default export folder path
    #[serde(default)]
    pub export_folder: String,

    /// Format used when a save path has no extension
    #[serde(default)]
    pub export_format: ExportFormat,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl UserPreferences {
    /// Place a relative export path inside the export folder, if one is set.
    /// Absolute paths are used as given.
    pub fn export_path(&self, path: &std::path::Path) -> std::path::PathBuf {
        if self.export_folder.is_empty() || path.is_absolute() {
            path.to_path_buf()
        } else {
            std::path::Path::new(&self.export_folder).join(path)
        }
    }
}

/// Initial lens state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensSettings {
    /// Lens width on screen, in pixels
    #[serde(default = "default_lens_size")]
    pub width: i32,

    /// Lens height on screen, in pixels
    #[serde(default = "default_lens_size")]
    pub height: i32,

    /// Preview magnification
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f32,

    /// Magnification of the displayed image
    #[serde(default = "default_image_zoom_factor")]
    pub image_zoom_factor: f32,

    /// Outline colour
    #[serde(default)]
    pub color: LensColor,

    /// Draw resize grips on the lens outline
    #[serde(default = "default_show_handles")]
    pub show_handles: bool,

    /// Report the lens extent in microns rather than pixels
    #[serde(default)]
    pub show_microns: bool,

    /// Physical pixel size, if known
    #[serde(default)]
    pub units: Option<UnitMapping>,
}

fn default_lens_size() -> i32 {
    DEFAULT_LENS_SIZE
}

fn default_zoom_factor() -> f32 {
    DEFAULT_ZOOM_FACTOR
}

fn default_image_zoom_factor() -> f32 {
    1.0
}

fn default_show_handles() -> bool {
    true
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            width: default_lens_size(),
            height: default_lens_size(),
            zoom_factor: default_zoom_factor(),
            image_zoom_factor: default_image_zoom_factor(),
            color: LensColor::default(),
            show_handles: default_show_handles(),
            show_microns: false,
            units: None,
        }
    }
}

impl LensSettings {
    /// Check that the settings describe a usable lens.
    pub fn validate(&self) -> Result<(), LensError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_LENS_SIZE..=MAX_LENS_SIZE).contains(&value) {
                return Err(LensError::invalid_argument(format!(
                    "lens {} {} outside [{}, {}]",
                    name, value, MIN_LENS_SIZE, MAX_LENS_SIZE
                )));
            }
        }
        if !(MIN_ZOOM_FACTOR..=MAX_ZOOM_FACTOR).contains(&self.zoom_factor) {
            return Err(LensError::invalid_argument(format!(
                "zoom factor {} outside [{}, {}]",
                self.zoom_factor, MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR
            )));
        }
        if !(self.image_zoom_factor.is_finite() && self.image_zoom_factor > 0.0) {
            return Err(LensError::invalid_argument(format!(
                "image zoom factor must be positive, got {}",
                self.image_zoom_factor
            )));
        }
        if let Some(units) = &self.units {
            if UnitMapping::new(units.micron_per_pixel_x, units.micron_per_pixel_y).is_none() {
                return Err(LensError::invalid_argument("pixel sizes must be positive"));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            preferences: UserPreferences::default(),
            lens: LensSettings::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config
            .lens
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "lensview-config.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("lensview").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("lensview")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = AppConfig::new();
        let json = config.to_json().unwrap();
        let parsed = AppConfig::from_json(&json).unwrap();
        assert_eq!(parsed.version, CONFIG_VERSION);
        assert_eq!(parsed.lens.width, DEFAULT_LENS_SIZE);
        assert_eq!(parsed.preferences.export_format, ExportFormat::Png);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed = AppConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(parsed.app_name, "lensview");
        assert_eq!(parsed.lens.zoom_factor, DEFAULT_ZOOM_FACTOR);
        assert_eq!(parsed.preferences.log_level, LogLevel::Info);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let err = AppConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::VersionTooNew { file_version: 99, .. }));
    }

    #[test]
    fn test_invalid_lens_is_rejected() {
        let json = r#"{ "version": 1, "lens": { "width": 5 } }"#;
        let err = AppConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_enums_use_lowercase_names() {
        let json = r#"{
            "version": 1,
            "preferences": { "export_format": "tiff", "log_level": "debug" },
            "lens": { "color": "yellow" }
        }"#;
        let parsed = AppConfig::from_json(json).unwrap();
        assert_eq!(parsed.preferences.export_format, ExportFormat::Tiff);
        assert_eq!(parsed.preferences.log_level, LogLevel::Debug);
        assert_eq!(parsed.lens.color, LensColor::Yellow);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = LensSettings::default();
        assert!(settings.validate().is_ok());
        settings.zoom_factor = 11.0;
        assert!(settings.validate().is_err());
        settings.zoom_factor = 2.0;
        settings.image_zoom_factor = 0.0;
        assert!(settings.validate().is_err());
        settings.image_zoom_factor = 1.0;
        settings.units = Some(UnitMapping {
            micron_per_pixel_x: -1.0,
            micron_per_pixel_y: 1.0,
        });
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_log_level_from_name() {
        assert_eq!(LogLevel::from_name("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name("loud"), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join(AppConfig::default_filename());
        let mut config = AppConfig::new();
        config.lens.color = LensColor::Green;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.lens.color, LensColor::Green);
    }

    #[test]
    fn test_export_path_uses_folder_for_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = UserPreferences {
            export_folder: dir.path().to_string_lossy().into_owned(),
            ..UserPreferences::default()
        };
        assert_eq!(
            prefs.export_path(std::path::Path::new("zoom.png")),
            dir.path().join("zoom.png")
        );
        let absolute = dir.path().join("elsewhere").join("zoom.png");
        assert_eq!(prefs.export_path(&absolute), absolute);

        let unset = UserPreferences::default();
        assert_eq!(
            unset.export_path(std::path::Path::new("zoom.png")),
            std::path::PathBuf::from("zoom.png")
        );
    }

    #[test]
    fn test_show_handles_defaults_on() {
        let parsed = AppConfig::from_json(r#"{ "version": 1, "lens": {} }"#).unwrap();
        assert!(parsed.lens.show_handles);
        let parsed =
            AppConfig::from_json(r#"{ "version": 1, "lens": { "show_handles": false } }"#).unwrap();
        assert!(!parsed.lens.show_handles);
    }
}
