use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detection::infrastructure::onnx_face_detector::DEFAULT_CONFIDENCE;
use crate::detection::infrastructure::onnx_face_encoder::RECOMMENDED_TOLERANCE;
use crate::shared::constants::{
    DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_DOWNSCALE_FACTOR,
    DEFAULT_ENROLLMENT_PATH, DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH, DEFAULT_QUIT_KEY,
    DEFAULT_RETRY_DELAY_MS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Settings for one run of the access loop.
///
/// Every field is optional in the JSON file; missing ones take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub enrollment_path: PathBuf,
    pub capture_width: u32,
    pub capture_height: u32,
    pub downscale_factor: f64,
    pub tolerance: f64,
    pub retry_delay_ms: u64,
    pub panel_width: u32,
    pub panel_height: u32,
    pub confidence: f64,
    pub quit_key: char,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            enrollment_path: PathBuf::from(DEFAULT_ENROLLMENT_PATH),
            capture_width: DEFAULT_CAPTURE_WIDTH,
            capture_height: DEFAULT_CAPTURE_HEIGHT,
            downscale_factor: DEFAULT_DOWNSCALE_FACTOR,
            tolerance: RECOMMENDED_TOLERANCE,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
            confidence: DEFAULT_CONFIDENCE,
            quit_key: DEFAULT_QUIT_KEY,
        }
    }
}

impl AccessConfig {
    /// `<config dir>/FaceLock/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceLock").join("config.json"))
    }

    /// Loads settings from `explicit`, or from [`AccessConfig::default_path`]
    /// when that file exists, or falls back to defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.downscale_factor > 0.0 && self.downscale_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "downscale factor {} must be in (0, 1]",
                self.downscale_factor
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance {} must be positive",
                self.tolerance
            )));
        }
        if self.capture_width == 0 || self.capture_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "capture resolution {}x{} must be non-zero",
                self.capture_width, self.capture_height
            )));
        }
        if self.panel_width == 0 || self.panel_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "status panel {}x{} must be non-zero",
                self.panel_width, self.panel_height
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ConfigError::Invalid(format!(
                "confidence {} must be in [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
