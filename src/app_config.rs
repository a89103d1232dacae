use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Frame rate used for timecode frame counts
    #[serde(default = "default_fps")]
    pub fps: f64,

    /// Signed start offset in ms applied to every timecode; the sub-second
    /// part counts frames
    #[serde(default)]
    pub start_offset_ms: i64,

    /// Maximum silence gap in ms between same-speaker cues that still merge
    /// into one phrase; zero or negative disables merging
    #[serde(default = "default_join_interval_ms")]
    pub join_interval_ms: i64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            start_offset_ms: 0,
            join_interval_ms: default_join_interval_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and CLI overrides.
    ///
    /// The timecode codec treats a non-positive frame rate as undefined
    /// behavior, so it is rejected here at the boundary.
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(anyhow!("Frame rate must be positive, got {}", self.fps));
        }

        Ok(())
    }
}

fn default_fps() -> f64 {
    25.0
}

fn default_join_interval_ms() -> i64 {
    5000
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}
