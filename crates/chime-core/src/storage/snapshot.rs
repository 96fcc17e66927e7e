//! Typed persisted snapshots and their logical keys.
//!
//! A corrupt or missing snapshot is never fatal: loading degrades to an
//! empty collection and the caller falls back to defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Gateway;
use crate::error::CoreError;
use crate::section::Section;

pub const KEY_USER_ALARMS: &str = "user_alarms";
pub const KEY_BUILTIN_ALARMS: &str = "builtin_alarms";
pub const KEY_ALARM_SECTIONS: &str = "alarm_sections";
pub const KEY_USER_TIMERS: &str = "user_timers";
pub const KEY_BUILTIN_TIMERS: &str = "builtin_timers";
pub const KEY_TIMER_SECTIONS: &str = "timer_sections";
pub const KEY_ALARM_LAST_ACTIVE: &str = "alarm_last_active";
pub const KEY_TIMER_LAST_ACTIVE: &str = "timer_last_active";
pub const KEY_STOPWATCH: &str = "stopwatch";

#[derive(Debug, Deserialize)]
struct EntitySnapshot<T> {
    entities: Vec<T>,
}

#[derive(Serialize)]
struct EntitySnapshotRef<'a, T> {
    entities: &'a [T],
}

#[derive(Debug, Deserialize)]
struct SectionSnapshot {
    sections: Vec<Section>,
}

#[derive(Serialize)]
struct SectionSnapshotRef<'a> {
    sections: &'a [Section],
}

/// Load an entity collection; missing or malformed input yields an empty
/// collection.
pub fn load_entities<T: DeserializeOwned>(gateway: &dyn Gateway, key: &str) -> Vec<T> {
    match gateway.load(key) {
        Ok(Some(raw)) => match serde_json::from_str::<EntitySnapshot<T>>(&raw) {
            Ok(snapshot) => snapshot.entities,
            Err(e) => {
                tracing::warn!(%key, error = %e, "malformed snapshot, falling back to empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to load snapshot, falling back to empty");
            Vec::new()
        }
    }
}

pub fn save_entities<T: Serialize>(
    gateway: &dyn Gateway,
    key: &str,
    entities: &[T],
) -> Result<(), CoreError> {
    let raw = serde_json::to_string(&EntitySnapshotRef { entities })?;
    gateway.save(key, &raw)?;
    Ok(())
}

pub fn load_sections(gateway: &dyn Gateway, key: &str) -> Vec<Section> {
    match gateway.load(key) {
        Ok(Some(raw)) => match serde_json::from_str::<SectionSnapshot>(&raw) {
            Ok(snapshot) => snapshot.sections,
            Err(e) => {
                tracing::warn!(%key, error = %e, "malformed section snapshot, falling back to empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to load section snapshot");
            Vec::new()
        }
    }
}

pub fn save_sections(
    gateway: &dyn Gateway,
    key: &str,
    sections: &[Section],
) -> Result<(), CoreError> {
    let raw = serde_json::to_string(&SectionSnapshotRef { sections })?;
    gateway.save(key, &raw)?;
    Ok(())
}

/// Load a last-active stamp. Missing or unparsable values yield `None`.
pub fn load_last_active(gateway: &dyn Gateway, key: &str) -> Option<u64> {
    match gateway.load(key) {
        Ok(Some(raw)) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }
}

pub fn save_last_active(gateway: &dyn Gateway, key: &str, now_ms: u64) -> Result<(), CoreError> {
    gateway.save(key, &now_ms.to_string())?;
    Ok(())
}
