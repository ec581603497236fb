//! Configuration file support for the snip-box editor.
//!
//! Settings are stored as versioned JSON. Loading validates both the version
//! and the values, so an editor never runs with a zoom step or box floor that
//! would break its invariants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BOX_HEIGHT_FRACTION, DEFAULT_BOX_WIDTH_FRACTION, MAX_ZOOM_FACTOR, MIN_BOX_SIZE,
    MIN_ZOOM_FACTOR, MIN_ZOOM_STEP, ZOOM_STEP,
};
use crate::viewport::WheelConvention;

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

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Zoom multiplier per wheel tick
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    /// Largest user zoom factor on top of the fit scale
    #[serde(default = "default_max_zoom_factor")]
    pub max_zoom_factor: f32,

    /// Which scroll direction zooms in
    #[serde(default)]
    pub wheel_convention: WheelConvention,

    /// Smallest box width/height a resize may produce (scene pixels)
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f32,

    /// New box width as a fraction of the visible scene width
    #[serde(default = "default_box_width_fraction")]
    pub default_box_width_fraction: f32,

    /// New box height as a fraction of the visible scene height
    #[serde(default = "default_box_height_fraction")]
    pub default_box_height_fraction: f32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_zoom_step() -> f32 {
    ZOOM_STEP
}

fn default_max_zoom_factor() -> f32 {
    MAX_ZOOM_FACTOR
}

fn default_min_box_size() -> f32 {
    MIN_BOX_SIZE
}

fn default_box_width_fraction() -> f32 {
    DEFAULT_BOX_WIDTH_FRACTION
}

fn default_box_height_fraction() -> f32 {
    DEFAULT_BOX_HEIGHT_FRACTION
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            zoom_step: default_zoom_step(),
            max_zoom_factor: default_max_zoom_factor(),
            wheel_convention: WheelConvention::default(),
            min_box_size: default_min_box_size(),
            default_box_width_fraction: default_box_width_fraction(),
            default_box_height_fraction: default_box_height_fraction(),
            log_level: LogLevel::default(),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom_step.is_finite() || self.zoom_step < MIN_ZOOM_STEP {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be at least {MIN_ZOOM_STEP}, got {}",
                self.zoom_step
            )));
        }
        if !self.max_zoom_factor.is_finite() || self.max_zoom_factor < MIN_ZOOM_FACTOR {
            return Err(ConfigError::Invalid(format!(
                "max_zoom_factor must be at least {MIN_ZOOM_FACTOR}, got {}",
                self.max_zoom_factor
            )));
        }
        if !self.min_box_size.is_finite() || self.min_box_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_box_size must be positive, got {}",
                self.min_box_size
            )));
        }
        for (name, value) in [
            ("default_box_width_fraction", self.default_box_width_fraction),
            ("default_box_height_fraction", self.default_box_height_fraction),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
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

        config.validate()?;
        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "snipbox-config.json"
    }

    /// Get the default config file path (XDG config directory).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snipbox").join(Self::default_filename()))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from a file that may not exist yet.
    /// Returns `Ok(None)` if there is no file at `path`.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save configuration to a file, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for EditorConfig {
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
    #[error("Configuration version {file_version} is newer than supported {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
