//! Timer entity and drift-free countdown arithmetic.
//!
//! A running timer holds an absolute target timestamp. `remaining` is
//! recomputed from that target on every tick -- never decremented -- so
//! tick-rate jitter and long host pauses cannot accumulate error: the
//! displayed value is always consistent with wall-clock truth, and the
//! target survives process suspension unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarm::{validate_title, EntityOrigin};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Counts down a fixed duration.
    Countdown,
    /// Counts down to an absolute date.
    CountToDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub title: String,
    pub kind: TimerKind,
    pub sound: String,
    pub section_id: String,
    pub origin: EntityOrigin,
    pub created_ms: u64,
    /// Original duration in milliseconds. For count-to-date timers this is
    /// the span from creation to the target date.
    pub initial_ms: u64,
    pub remaining_ms: u64,
    /// Absolute countdown target. Present iff `is_running`.
    #[serde(default)]
    pub target_ms: Option<u64>,
    /// The chosen date of a count-to-date timer. Part of the definition,
    /// not cleared on pause.
    #[serde(default)]
    pub target_date_ms: Option<u64>,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub is_ringing: bool,
    /// The single timer driving the primary display.
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub rang_at_ms: Option<u64>,
}

impl Timer {
    pub fn countdown(
        title: impl Into<String>,
        duration_ms: u64,
        sound: impl Into<String>,
        section_id: impl Into<String>,
        created_ms: u64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        if duration_ms == 0 {
            return Err(ValidationError::invalid("duration", "must be positive"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            kind: TimerKind::Countdown,
            sound: sound.into(),
            section_id: section_id.into(),
            origin: EntityOrigin::User,
            created_ms,
            initial_ms: duration_ms,
            remaining_ms: duration_ms,
            target_ms: None,
            target_date_ms: None,
            is_running: false,
            is_ringing: false,
            is_pinned: false,
            rang_at_ms: None,
        })
    }

    /// A count-to-date timer starts running at creation with the target
    /// date already armed.
    pub fn count_to_date(
        title: impl Into<String>,
        target_date_ms: u64,
        sound: impl Into<String>,
        section_id: impl Into<String>,
        now_ms: u64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        if target_date_ms <= now_ms {
            return Err(ValidationError::invalid(
                "target_date",
                "must be in the future",
            ));
        }
        let span = target_date_ms - now_ms;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            kind: TimerKind::CountToDate,
            sound: sound.into(),
            section_id: section_id.into(),
            origin: EntityOrigin::User,
            created_ms: now_ms,
            initial_ms: span,
            remaining_ms: span,
            target_ms: Some(target_date_ms),
            target_date_ms: Some(target_date_ms),
            is_running: true,
            is_ringing: false,
            is_pinned: false,
            rang_at_ms: None,
        })
    }

    /// Arm the absolute target and mark running. Countdown timers target
    /// `now + remaining`; count-to-date timers re-derive from their date.
    pub fn arm(&mut self, now_ms: u64) {
        let target = match self.kind {
            TimerKind::Countdown => now_ms.saturating_add(self.remaining_ms),
            TimerKind::CountToDate => self.target_date_ms.unwrap_or(now_ms),
        };
        self.target_ms = Some(target);
        self.is_running = true;
        self.sync_remaining(now_ms);
    }

    /// Recompute `remaining` from the absolute target. Returns the new
    /// remaining; 0 means the countdown completed.
    pub fn sync_remaining(&mut self, now_ms: u64) -> u64 {
        if let Some(target) = self.target_ms {
            self.remaining_ms = target.saturating_sub(now_ms);
        }
        self.remaining_ms
    }

    /// Freeze `remaining` at its wall-clock value and stop running.
    pub fn disarm(&mut self, now_ms: u64) {
        self.sync_remaining(now_ms);
        self.target_ms = None;
        self.is_running = false;
    }

    /// Transition into the ringing state after a live completion.
    pub fn ring(&mut self) {
        self.is_running = false;
        self.is_ringing = true;
        self.target_ms = None;
        self.remaining_ms = 0;
        self.rang_at_ms = None;
    }

    /// Finalize a completion that happened while the process was not
    /// running: record when it rang instead of ringing now.
    pub fn finalize_rang(&mut self, rang_at_ms: u64) {
        self.is_running = false;
        self.is_ringing = false;
        self.target_ms = None;
        self.remaining_ms = 0;
        self.rang_at_ms = Some(rang_at_ms);
    }

    /// Restore the resting state: original duration for countdowns, the
    /// span to the target date for count-to-date timers.
    pub fn reset(&mut self, now_ms: u64) {
        self.is_running = false;
        self.target_ms = None;
        self.rang_at_ms = None;
        self.remaining_ms = match self.kind {
            TimerKind::Countdown => self.initial_ms,
            TimerKind::CountToDate => self
                .target_date_ms
                .map(|t| t.saturating_sub(now_ms))
                .unwrap_or(0),
        };
    }
}
