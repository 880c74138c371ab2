//! Accessibility settings and analysis configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use navlog_telemetry::{event_types, EventLog, TelemetryError};

use crate::types::{Contrast, HapticStrength, Persona, TextScale};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for setting `{key}`")]
    InvalidOption { key: String, value: String },

    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accessibility settings of the navigation prototype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub contrast: Contrast,
    #[serde(rename = "textscale")]
    pub text_scale: TextScale,
    pub haptic_strength: HapticStrength,
    pub persona: Persona,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and apply one setting by its key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "contrast" => self.contrast = value.parse()?,
            "textscale" => self.text_scale = value.parse()?,
            "haptic_strength" => self.haptic_strength = value.parse()?,
            "persona" => self.persona = value.parse()?,
            other => return Err(ConfigError::UnknownSetting(other.to_string())),
        }
        Ok(())
    }

    /// Current value of a setting, by key
    pub fn get(&self, key: &str) -> Option<&'static str> {
        match key {
            "contrast" => Some(self.contrast.as_str()),
            "textscale" => Some(self.text_scale.as_str()),
            "haptic_strength" => Some(self.haptic_strength.as_str()),
            "persona" => Some(self.persona.as_str()),
            _ => None,
        }
    }

    /// Apply a setting and record the change as `settings_<key>`.
    /// Invalid values are rejected before anything is logged.
    pub fn set_and_log(&mut self, key: &str, value: &str, log: &EventLog) -> Result<(), ConfigError> {
        self.set(key, value)?;
        let applied = self.get(key).unwrap_or(value);
        log.log(
            &format!("{}{}", event_types::SETTINGS_PREFIX, key),
            "",
            applied,
        )?;
        Ok(())
    }
}

/// Maximum allowed median per latency metric, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cold_start_ms: f64,
    pub warm_start_ms: f64,
    pub tts_start_latency_ms: f64,
    pub reroute_latency_ms: f64,
}

impl Thresholds {
    pub fn new() -> Self {
        Self {
            cold_start_ms: 1500.0,
            warm_start_ms: 800.0,
            tts_start_latency_ms: 500.0,
            reroute_latency_ms: 1000.0,
        }
    }

    /// `(metric, max median)` pairs in report order
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            (event_types::COLD_START_MS, self.cold_start_ms),
            (event_types::WARM_START_MS, self.warm_start_ms),
            (event_types::TTS_START_LATENCY_MS, self.tts_start_latency_ms),
            (event_types::REROUTE_LATENCY_MS, self.reroute_latency_ms),
        ]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// Options of the offline report pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bootstrap iterations for confidence intervals
    pub n_boot: usize,

    /// Seed of the bootstrap RNG
    pub seed: u64,

    /// Charts and robust stats use only the latest session when set
    pub use_latest_only: bool,

    /// Event type whose presence puts a session in the ON group
    pub ab_marker: String,

    /// Metric compared between the ON and OFF groups
    pub ab_target: String,

    pub thresholds: Thresholds,

    pub logs_dir: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,
    pub surveys_dir: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            n_boot: 2000,
            seed: 42,
            use_latest_only: true,
            ab_marker: event_types::TTS_PREWARM_MS.to_string(),
            ab_target: event_types::TTS_START_LATENCY_MS.to_string(),
            thresholds: Thresholds::new(),
            logs_dir: None,
            charts_dir: None,
            surveys_dir: None,
        }
    }

    /// Load from a JSON file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading analysis config");
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_boot == 0 {
            return Err(ConfigError::Invalid("n_boot must be at least 1".into()));
        }
        if self.ab_marker.trim().is_empty() || self.ab_target.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ab_marker and ab_target must name event types".into(),
            ));
        }
        for (metric, max) in self.thresholds.entries() {
            if !max.is_finite() || max < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "threshold for {metric} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}
