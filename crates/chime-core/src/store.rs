//! In-memory entity collections.
//!
//! The store exclusively owns every Alarm and Timer record; the ringing
//! sets hold only ids into it. Collections keep insertion order (builtin
//! entities iterate first) and user/builtin halves persist independently.

use crate::alarm::Alarm;
use crate::section::{Section, DEFAULT_SECTION_ID};
use crate::stopwatch::Stopwatch;
use crate::timer::Timer;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    pub builtin_alarms: Vec<Alarm>,
    pub user_alarms: Vec<Alarm>,
    pub alarm_sections: Vec<Section>,
    pub builtin_timers: Vec<Timer>,
    pub user_timers: Vec<Timer>,
    pub timer_sections: Vec<Section>,
    pub stopwatch: Stopwatch,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Alarms ───────────────────────────────────────────────────────

    pub fn alarms(&self) -> impl Iterator<Item = &Alarm> {
        self.builtin_alarms.iter().chain(self.user_alarms.iter())
    }

    pub fn alarms_mut(&mut self) -> impl Iterator<Item = &mut Alarm> {
        self.builtin_alarms
            .iter_mut()
            .chain(self.user_alarms.iter_mut())
    }

    pub fn alarm(&self, id: &str) -> Option<&Alarm> {
        self.alarms().find(|a| a.id == id)
    }

    pub fn alarm_mut(&mut self, id: &str) -> Option<&mut Alarm> {
        self.alarms_mut().find(|a| a.id == id)
    }

    pub fn alarm_count(&self) -> usize {
        self.builtin_alarms.len() + self.user_alarms.len()
    }

    pub fn user_alarm_count(&self) -> usize {
        self.user_alarms.len()
    }

    /// Remove a user alarm. Builtin alarms are not removable.
    pub fn remove_user_alarm(&mut self, id: &str) -> Option<Alarm> {
        let index = self.user_alarms.iter().position(|a| a.id == id)?;
        Some(self.user_alarms.remove(index))
    }

    // ── Timers ───────────────────────────────────────────────────────

    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.builtin_timers.iter().chain(self.user_timers.iter())
    }

    pub fn timers_mut(&mut self) -> impl Iterator<Item = &mut Timer> {
        self.builtin_timers
            .iter_mut()
            .chain(self.user_timers.iter_mut())
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.timers().find(|t| t.id == id)
    }

    pub fn timer_mut(&mut self, id: &str) -> Option<&mut Timer> {
        self.timers_mut().find(|t| t.id == id)
    }

    pub fn timer_count(&self) -> usize {
        self.builtin_timers.len() + self.user_timers.len()
    }

    pub fn user_timer_count(&self) -> usize {
        self.user_timers.len()
    }

    pub fn remove_user_timer(&mut self, id: &str) -> Option<Timer> {
        let index = self.user_timers.iter().position(|t| t.id == id)?;
        Some(self.user_timers.remove(index))
    }

    // ── Pinning ──────────────────────────────────────────────────────

    pub fn pinned_timer(&self) -> Option<&Timer> {
        self.timers().find(|t| t.is_pinned)
    }

    /// Re-establish the pinning invariant: exactly one pinned timer
    /// whenever the union is non-empty. Keeps the first pinned entity in
    /// iteration order and clears any duplicates from a corrupt snapshot;
    /// pins the first timer when none is marked.
    pub fn ensure_pinned(&mut self) {
        let mut seen_pinned = false;
        for timer in self.timers_mut() {
            if timer.is_pinned {
                if seen_pinned {
                    timer.is_pinned = false;
                } else {
                    seen_pinned = true;
                }
            }
        }
        if !seen_pinned {
            if let Some(first) = self.timers_mut().next() {
                first.is_pinned = true;
            }
        }
    }

    /// Move the pin to `id`. Returns false when the id is unknown.
    pub fn set_pinned(&mut self, id: &str) -> bool {
        if self.timer(id).is_none() {
            return false;
        }
        for timer in self.timers_mut() {
            timer.is_pinned = timer.id == id;
        }
        true
    }

    // ── Sections ─────────────────────────────────────────────────────

    /// Reassign every entity of the given alarm section to the default
    /// section. Used when a section is deleted.
    pub fn reassign_alarm_section(&mut self, section_id: &str) {
        for alarm in self.alarms_mut() {
            if alarm.section_id == section_id {
                alarm.section_id = DEFAULT_SECTION_ID.to_string();
            }
        }
    }

    pub fn reassign_timer_section(&mut self, section_id: &str) {
        for timer in self.timers_mut() {
            if timer.section_id == section_id {
                timer.section_id = DEFAULT_SECTION_ID.to_string();
            }
        }
    }
}
