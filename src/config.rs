//! Configuration file support for the demos.
//!
//! Settings are stored as versioned JSON. Every field has a serde default so
//! a partial file (or `{"version": 1}`) is a valid configuration.

use std::path::{Path, PathBuf};

use chroma_gpu::TextureConfig;
use serde::{Deserialize, Serialize};

use crate::effect::EffectKind;

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

/// Bounds of the single control each demo exposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub initial: f32,
}

impl ControlRange {
    pub const fn new(min: f32, max: f32, step: f32, initial: f32) -> Self {
        Self {
            min,
            max,
            step,
            initial,
        }
    }

    /// A range that only admits `0.0`.
    pub const fn fixed() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Clamp `value` into `min..=max`. NaN falls back to `initial`.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.initial;
        }
        value.clamp(self.min, self.max)
    }

    /// Move `value` by `steps` increments and clamp the result.
    pub fn step_by(&self, value: f32, steps: i32) -> f32 {
        self.clamp(value + self.step * steps as f32)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.min, self.max, self.step, self.initial]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min > self.max || self.step < 0.0 {
            return Err(ConfigError::InvalidControl(format!(
                "min {} max {} step {}",
                self.min, self.max, self.step
            )));
        }
        if self.initial < self.min || self.initial > self.max {
            return Err(ConfigError::InvalidControl(format!(
                "initial {} outside {}..={}",
                self.initial, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Sampler filtering for the source texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Nearest-neighbor, texels stay sharp
    #[default]
    Nearest,
    Linear,
}

impl TextureFilter {
    pub fn to_texture_config(self) -> TextureConfig {
        match self {
            TextureFilter::Nearest => TextureConfig::nearest(),
            TextureFilter::Linear => TextureConfig::linear(),
        }
    }
}

/// Initial window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_window_width")]
    pub width: u32,
    #[serde(default = "default_window_height")]
    pub height: u32,
    #[serde(default = "default_window_title")]
    pub title: String,
}

fn default_window_width() -> u32 {
    800
}

fn default_window_height() -> u32 {
    600
}

fn default_window_title() -> String {
    "Chroma Demos".to_string()
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
        }
    }
}

/// Demo configuration that can be loaded from and saved to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Image to load on startup; a generated test pattern is used otherwise
    #[serde(default)]
    pub image_path: Option<PathBuf>,

    /// Effect shown on startup
    #[serde(default)]
    pub effect: EffectKind,

    /// Override for the effect's default control range
    #[serde(default)]
    pub control: Option<ControlRange>,

    #[serde(default)]
    pub texture_filter: TextureFilter,

    #[serde(default)]
    pub window: WindowSettings,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl DemoConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            image_path: None,
            effect: EffectKind::default(),
            control: None,
            texture_filter: TextureFilter::default(),
            window: WindowSettings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Control range for the configured effect.
    pub fn control_range(&self) -> ControlRange {
        self.control_range_for(self.effect)
    }

    /// Control range for `effect`. The override only applies to the
    /// configured effect.
    pub fn control_range_for(&self, effect: EffectKind) -> ControlRange {
        match self.control {
            Some(control) if effect == self.effect => control,
            _ => effect.default_range(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version == 0 || config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        if let Some(control) = &config.control {
            control.validate()?;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("chroma_demos").join("config.json"))
        } else {
            dirs::home_dir().map(|home| home.join(".config").join("chroma_demos").join("config.json"))
        }
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load from `path` (or the default path when `None`).
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

impl Default for DemoConfig {
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

    #[error(
        "Configuration file version {file_version} is not supported (supported version {supported_version})"
    )]
    UnsupportedVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("Invalid control range: {0}")]
    InvalidControl(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DemoConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.effect, EffectKind::Passthrough);
        assert_eq!(config.texture_filter, TextureFilter::Nearest);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.image_path.is_none());
    }

    #[test]
    fn test_serialize_deserialize() {
        let mut config = DemoConfig::new();
        config.effect = EffectKind::Saturation;
        config.image_path = Some(PathBuf::from("photos/cat.png"));
        config.control = Some(ControlRange::new(-1.0, 0.5, 0.05, 0.0));
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let loaded = DemoConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let config = DemoConfig::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_effect_names_in_json() {
        let config = DemoConfig::from_json(r#"{"version": 1, "effect": "cpu_brightness"}"#).unwrap();
        assert_eq!(config.effect, EffectKind::CpuBrightness);
        assert_eq!(config.control_range(), EffectKind::CpuBrightness.default_range());
    }

    #[test]
    fn test_version_too_new() {
        let json = r#"{"version": 999}"#;
        let result = DemoConfig::from_json(json);
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion {
                file_version: 999,
                ..
            })
        ));
    }

    #[test]
    fn test_version_zero_rejected() {
        let result = DemoConfig::from_json(r#"{"version": 0}"#);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_invalid_control_rejected() {
        let json = r#"{"version": 1, "control": {"min": 1.0, "max": -1.0, "step": 0.1, "initial": 0.0}}"#;
        assert!(matches!(
            DemoConfig::from_json(json),
            Err(ConfigError::InvalidControl(_))
        ));

        let json = r#"{"version": 1, "control": {"min": 0.0, "max": 1.0, "step": 0.1, "initial": 2.0}}"#;
        assert!(matches!(
            DemoConfig::from_json(json),
            Err(ConfigError::InvalidControl(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DemoConfig::from_json("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_control_override() {
        let mut config = DemoConfig::new();
        config.effect = EffectKind::Hue;
        assert_eq!(config.control_range(), EffectKind::Hue.default_range());

        let custom = ControlRange::new(0.25, 0.75, 0.05, 0.5);
        config.control = Some(custom);
        assert_eq!(config.control_range(), custom);
        assert_eq!(
            config.control_range_for(EffectKind::Contrast),
            EffectKind::Contrast.default_range()
        );
    }

    #[test]
    fn test_control_clamp_and_step() {
        let range = ControlRange::new(-1.0, 1.0, 0.25, 0.0);
        assert_eq!(range.clamp(3.0), 1.0);
        assert_eq!(range.clamp(-3.0), -1.0);
        assert_eq!(range.clamp(f32::NAN), 0.0);
        assert_eq!(range.step_by(0.0, 2), 0.5);
        assert_eq!(range.step_by(0.0, -2), -0.5);
        assert_eq!(range.step_by(0.75, 10), 1.0);
        assert_eq!(ControlRange::fixed().step_by(0.0, 5), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("chroma_demos_config_{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut config = DemoConfig::new();
        config.effect = EffectKind::Contrast;
        config.texture_filter = TextureFilter::Linear;
        config.save(&path).unwrap();

        let loaded = DemoConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(DemoConfig::load_or_default(Some(&path)).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let path = std::env::temp_dir().join("chroma_demos_definitely_missing.json");
        let config = DemoConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_log_level_filters() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);

        let config = DemoConfig::from_json(r#"{"version": 1, "log_level": "trace"}"#).unwrap();
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Trace);
    }
}
