//! TOML-based application configuration.
//!
//! Stores:
//! - Entity and section count ceilings
//! - Alarm behavior (snooze duration, same-minute re-fire guard)
//! - Default sound id
//! - Recovery policy knobs
//!
//! Configuration is stored at `~/.config/chime/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Entity/section ceilings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_alarms")]
    pub max_alarms: usize,
    #[serde(default = "default_max_timers")]
    pub max_timers: usize,
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,
}

/// Alarm behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmsConfig {
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u32,
    /// Minimum seconds between two fires of the same alarm, guarding
    /// against double-firing within one matching minute.
    #[serde(default = "default_refire_guard_secs")]
    pub refire_guard_secs: u64,
}

/// Sound settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_sound")]
    pub default_sound: String,
}

/// Recovery policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Estimate a missing fire time as the midpoint of the away gap
    /// instead of pinning it to the last-active instant.
    #[serde(default = "default_true")]
    pub estimate_missing_fire_time: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/chime/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub alarms: AlarmsConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

// Default functions
fn default_max_alarms() -> usize {
    50
}
fn default_max_timers() -> usize {
    50
}
fn default_max_sections() -> usize {
    20
}
fn default_snooze_minutes() -> u32 {
    5
}
fn default_refire_guard_secs() -> u64 {
    59
}
fn default_sound() -> String {
    "classic-bell".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_alarms: default_max_alarms(),
            max_timers: default_max_timers(),
            max_sections: default_max_sections(),
        }
    }
}

impl Default for AlarmsConfig {
    fn default() -> Self {
        Self {
            snooze_minutes: default_snooze_minutes(),
            refire_guard_secs: default_refire_guard_secs(),
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            default_sound: default_sound(),
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            estimate_missing_fire_time: default_true(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            alarms: AlarmsConfig::default(),
            sounds: SoundsConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/chime"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }
}
