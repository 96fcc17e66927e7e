use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ringing::Domain;

/// Every accepted domain operation produces an Event.
/// Hosts render these; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    AlarmCreated {
        id: String,
        title: String,
        hour: u32,
        minute: u32,
        at: DateTime<Utc>,
    },
    AlarmUpdated {
        id: String,
        at: DateTime<Utc>,
    },
    AlarmDeleted {
        id: String,
        at: DateTime<Utc>,
    },
    AlarmToggled {
        id: String,
        enabled: bool,
        at: DateTime<Utc>,
    },
    /// An enabled alarm's hour:minute came due.
    AlarmFired {
        id: String,
        at: DateTime<Utc>,
    },
    AlarmDismissed {
        id: String,
        at: DateTime<Utc>,
    },
    /// A ringing alarm was snoozed: the original is dismissed and one
    /// child alarm is created a few minutes ahead.
    AlarmSnoozed {
        id: String,
        snoozed_from: String,
        hour: u32,
        minute: u32,
        at: DateTime<Utc>,
    },
    TimerCreated {
        id: String,
        title: String,
        at: DateTime<Utc>,
    },
    TimerUpdated {
        id: String,
        at: DateTime<Utc>,
    },
    TimerDeleted {
        id: String,
        at: DateTime<Utc>,
    },
    TimerStarted {
        id: String,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        id: String,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        id: String,
        at: DateTime<Utc>,
    },
    /// A running timer's countdown reached zero.
    TimerCompleted {
        id: String,
        at: DateTime<Utc>,
    },
    TimerDismissed {
        id: String,
        at: DateTime<Utc>,
    },
    /// A ringing timer was re-armed at its original duration.
    TimerRestarted {
        id: String,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPinned {
        id: String,
        at: DateTime<Utc>,
    },
    SectionCreated {
        domain: Domain,
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    SectionRenamed {
        domain: Domain,
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    SectionDeleted {
        domain: Domain,
        id: String,
        at: DateTime<Utc>,
    },
    StopwatchStarted {
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchLap {
        lap_index: usize,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
}
