//! Alarm entity and daily-occurrence arithmetic.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{datetime_to_ms, ms_to_datetime};
use crate::error::ValidationError;

/// Whether an entity was created by the user or bootstrapped as a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityOrigin {
    User,
    Builtin,
}

/// A daily alarm.
///
/// `rang_at_ms` marks an alarm that fired (or was reconciled as having
/// fired) but is not currently ringing -- rendered as "rang N ago". It is
/// mutually exclusive with `enabled` (enabling clears it) and with
/// `is_ringing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub title: String,
    pub hour: u32,
    pub minute: u32,
    pub sound: String,
    pub enabled: bool,
    pub origin: EntityOrigin,
    pub section_id: String,
    pub created_ms: u64,
    #[serde(default)]
    pub is_ringing: bool,
    /// Last fire timestamp; guards against re-firing within the same
    /// matching minute.
    #[serde(default)]
    pub last_triggered_ms: Option<u64>,
    #[serde(default)]
    pub rang_at_ms: Option<u64>,
    /// Parent alarm id when this alarm was created by a snooze.
    #[serde(default)]
    pub snoozed_from: Option<String>,
}

impl Alarm {
    pub fn new(
        title: impl Into<String>,
        hour: u32,
        minute: u32,
        sound: impl Into<String>,
        section_id: impl Into<String>,
        created_ms: u64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        validate_time(hour, minute)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            hour,
            minute,
            sound: sound.into(),
            enabled: true,
            origin: EntityOrigin::User,
            section_id: section_id.into(),
            created_ms,
            is_ringing: false,
            last_triggered_ms: None,
            rang_at_ms: None,
            snoozed_from: None,
        })
    }

    /// True when the wall clock sits inside this alarm's trigger minute
    /// and the re-fire guard has elapsed since the last trigger.
    pub fn due_at(&self, now: DateTime<Utc>, refire_guard_secs: u64) -> bool {
        if !self.enabled || self.is_ringing {
            return false;
        }
        if now.hour() != self.hour || now.minute() != self.minute {
            return false;
        }
        match self.last_triggered_ms {
            Some(last) => {
                datetime_to_ms(now).saturating_sub(last) >= refire_guard_secs.saturating_mul(1_000)
            }
            None => true,
        }
    }

    /// Most recent instant at or before `before` at which this alarm's
    /// hour:minute occurs.
    pub fn most_recent_occurrence(&self, before: DateTime<Utc>) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        let candidate = Utc.from_utc_datetime(&before.date_naive().and_time(time));
        if candidate > before {
            candidate - Duration::days(1)
        } else {
            candidate
        }
    }

    /// The trigger occurrence this alarm missed while the process was not
    /// running: strictly inside `(last_active, now)` and after the alarm
    /// was created. `None` when no occurrence was missed.
    pub fn missed_occurrence(
        &self,
        last_active: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let occurrence = self.most_recent_occurrence(now);
        let created = ms_to_datetime(self.created_ms);
        (occurrence > last_active && occurrence < now && occurrence > created).then_some(occurrence)
    }
}

pub fn validate_time(hour: u32, minute: u32) -> Result<(), ValidationError> {
    if hour > 23 {
        return Err(ValidationError::invalid("hour", format!("{hour} not in 0..=23")));
    }
    if minute > 59 {
        return Err(ValidationError::invalid(
            "minute",
            format!("{minute} not in 0..=59"),
        ));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::invalid("title", "must not be empty"));
    }
    Ok(())
}
