//! Engine configuration.
//!
//! All tuning constants of the scoring pipeline live here so a scheduling
//! pass is a pure function of (memos, gaps, now, config). The config can be
//! loaded from and saved to a TOML file under the platform config dir.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Tuning constants for need scoring, duration prediction and allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Suggestions below this need are hidden from user-facing lists.
    pub hidden_threshold: f64,
    /// Suggestions at or above this need are mandatory for allocation.
    pub mandatory_threshold: f64,
    /// Plausible focused minutes per remaining day for deadline pressure.
    pub daily_capacity_minutes: u32,
    /// Days of inactivity before a backlog memo becomes visible.
    pub backlog_ramp_days: f64,
    /// Ceiling for backlog need; keeps backlog below mandatory.
    pub backlog_need_cap: f64,
    /// Exponential smoothing factor for the deadline duration multiplier.
    pub smoothing_alpha: f64,
    /// Lower clamp for the smoothed multiplier.
    pub multiplier_min: f64,
    /// Upper clamp for the smoothed multiplier.
    pub multiplier_max: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hidden_threshold: 0.5,
            mandatory_threshold: 1.0,
            daily_capacity_minutes: 120,
            backlog_ramp_days: 7.0,
            backlog_need_cap: 0.95,
            smoothing_alpha: 0.3,
            multiplier_min: 0.5,
            multiplier_max: 5.0,
        }
    }
}

impl EngineConfig {
    /// Path of the config file under the platform config dir.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = crate::storage::data_dir().map_err(|_| ConfigError::NoConfigDir)?;
        Ok(dir.join("config.toml"))
    }

    /// Load the config from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the config to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
