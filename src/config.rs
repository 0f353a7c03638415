//! Configuration file support for cubeview.
//!
//! Settings are read from `cubeview.json` in the working directory when it
//! exists; every field has a default so partial files are accepted.

use std::path::Path;

use cubeview_gpu::{ClearColor, GpuConfig};
use serde::{Deserialize, Serialize};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

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

/// How the offscreen cube texture is put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Plain quad covering the whole window.
    Full,
    /// Movable panel; only the part inside the window is drawn.
    #[default]
    Cropped,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Full => DisplayMode::Cropped,
            DisplayMode::Cropped => DisplayMode::Full,
        }
    }
}

/// Adapter and presentation tuning, see [`GpuConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GpuPreset {
    /// VSync, default adapter.
    #[default]
    Balanced,
    /// Mailbox presentation, one frame in flight, high-performance adapter.
    LowLatency,
    /// Low-power adapter.
    PowerSaving,
}

impl GpuPreset {
    pub fn to_gpu_config(self) -> GpuConfig {
        match self {
            GpuPreset::Balanced => GpuConfig::default(),
            GpuPreset::LowLatency => GpuConfig::low_latency(),
            GpuPreset::PowerSaving => GpuConfig::power_saving(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "cubeview - drag to rotate, right-drag to move, C to switch view".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,
    pub log_level: LogLevel,
    pub gpu: GpuPreset,
    pub window: WindowSettings,
    /// Panel size in logical points.
    pub panel_size: (f32, f32),
    pub display_mode: DisplayMode,
    /// Radians of cube rotation per pixel dragged.
    pub drag_sensitivity: f32,
    /// Background of the offscreen target, 8-bit RGB.
    pub clear_color: [u8; 3],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            gpu: GpuPreset::default(),
            window: WindowSettings::default(),
            panel_size: (300.0, 300.0),
            display_mode: DisplayMode::default(),
            drag_sensitivity: cubeview_gpu::camera::DEFAULT_DRAG_SENSITIVITY,
            clear_color: [128, 128, 128],
        }
    }
}

impl AppConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        let (width, height) = config.panel_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPanelSize { width, height });
        }

        Ok(config)
    }

    /// Get the default filename.
    pub fn default_filename() -> &'static str {
        "cubeview.json"
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path.as_ref());
        Ok(())
    }

    pub fn clear_color(&self) -> ClearColor {
        ClearColor::from_rgb8(self.clear_color)
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

    /// Panel size must be finite and positive
    #[error("Invalid panel size {width} x {height}")]
    InvalidPanelSize { width: f32, height: f32 },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
