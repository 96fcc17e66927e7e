//! Domain controller.
//!
//! One [`Controller`] instance owns the whole [`SchedulerState`] and is
//! the only writer. There is no per-entity callback machinery: the host
//! calls [`Controller::tick`] once per time slice (animation frame or
//! second), and the driver re-derives every running countdown from its
//! absolute target. Cancellation is structural -- pausing or deleting an
//! entity removes it from consideration before the next tick, and each
//! tick re-checks liveness by id before mutating.
//!
//! ## Ringing exclusivity
//!
//! While any entity of a domain rings, mutating operations on the rest of
//! that domain are rejected; only `dismiss`/`snooze`/`restart` of ringing
//! entities go through. The two domains lock independently.

use chrono::{Duration, Timelike};
use serde_json::json;

use crate::alarm::{validate_time, validate_title, Alarm, EntityOrigin};
use crate::clock::{datetime_to_ms, Clock};
use crate::defaults;
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::notify::{NotificationKind, Notifier};
use crate::recovery::{self, ReconcileReport, RecoveryPolicy};
use crate::ringing::{Domain, RingingSet};
use crate::section::{Section, DEFAULT_SECTION_ID};
use crate::sound::{SoundPlayer, SoundRef, FALLBACK_SOUND_ID};
use crate::stopwatch::Stopwatch;
use crate::storage::{snapshot, Config, Gateway};
use crate::store::EntityStore;
use crate::timer::{Timer, TimerKind};

/// All mutable scheduling state, owned by exactly one controller.
#[derive(Debug, Default)]
pub struct SchedulerState {
    pub store: EntityStore,
    pub alarm_ringing: RingingSet,
    pub timer_ringing: RingingSet,
    /// Per-domain teardown stamps loaded from storage; inputs to
    /// reconciliation.
    pub alarm_last_active_ms: Option<u64>,
    pub timer_last_active_ms: Option<u64>,
}

/// Partial update for an alarm. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AlarmUpdate {
    pub title: Option<String>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub sound: Option<String>,
    pub section_id: Option<String>,
}

/// Partial update for a timer. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TimerUpdate {
    pub title: Option<String>,
    /// New duration; countdown timers only, and only while idle.
    pub duration_ms: Option<u64>,
    pub sound: Option<String>,
    pub section_id: Option<String>,
}

pub struct Controller {
    state: SchedulerState,
    config: Config,
    clock: Box<dyn Clock>,
    sounds: Box<dyn SoundPlayer>,
    notifier: Box<dyn Notifier>,
}

impl Controller {
    pub fn new(
        config: Config,
        clock: Box<dyn Clock>,
        sounds: Box<dyn SoundPlayer>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            state: SchedulerState::default(),
            config,
            clock,
            sounds,
            notifier,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Populate the store from persisted snapshots. Corrupt or missing
    /// snapshots degrade to defaults; this never fails.
    pub fn load(&mut self, gateway: &dyn Gateway) {
        let now_ms = self.clock.now_ms();
        let store = &mut self.state.store;

        store.user_alarms = snapshot::load_entities(gateway, snapshot::KEY_USER_ALARMS);
        store.builtin_alarms = snapshot::load_entities(gateway, snapshot::KEY_BUILTIN_ALARMS);
        if store.builtin_alarms.is_empty() {
            store.builtin_alarms = defaults::builtin_alarms(now_ms);
        }
        store.alarm_sections = snapshot::load_sections(gateway, snapshot::KEY_ALARM_SECTIONS);
        ensure_default_section(&mut store.alarm_sections);

        store.user_timers = snapshot::load_entities(gateway, snapshot::KEY_USER_TIMERS);
        store.builtin_timers = snapshot::load_entities(gateway, snapshot::KEY_BUILTIN_TIMERS);
        store.timer_sections = snapshot::load_sections(gateway, snapshot::KEY_TIMER_SECTIONS);
        ensure_default_section(&mut store.timer_sections);

        store.stopwatch = match gateway.load(snapshot::KEY_STOPWATCH) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            _ => Stopwatch::default(),
        };

        self.state.alarm_last_active_ms =
            snapshot::load_last_active(gateway, snapshot::KEY_ALARM_LAST_ACTIVE);
        self.state.timer_last_active_ms =
            snapshot::load_last_active(gateway, snapshot::KEY_TIMER_LAST_ACTIVE);
    }

    /// Run startup reconciliation against elapsed wall-clock time. Call
    /// once, after [`load`](Self::load) and before the first tick.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let policy = RecoveryPolicy {
            estimate_missing_fire_time: self.config.recovery.estimate_missing_fire_time,
        };
        recovery::reconcile(
            &mut self.state.store,
            self.state.alarm_last_active_ms,
            self.state.timer_last_active_ms,
            self.clock.now_ms(),
            &policy,
        )
    }

    /// Write every snapshot and stamp both last-active keys. Entity
    /// collections are written before the stamps so a torn write is
    /// recovered conservatively.
    pub fn persist_all(&self, gateway: &dyn Gateway) -> Result<()> {
        let store = &self.state.store;
        snapshot::save_entities(gateway, snapshot::KEY_USER_ALARMS, &store.user_alarms)?;
        snapshot::save_entities(gateway, snapshot::KEY_BUILTIN_ALARMS, &store.builtin_alarms)?;
        snapshot::save_sections(gateway, snapshot::KEY_ALARM_SECTIONS, &store.alarm_sections)?;
        snapshot::save_entities(gateway, snapshot::KEY_USER_TIMERS, &store.user_timers)?;
        snapshot::save_entities(gateway, snapshot::KEY_BUILTIN_TIMERS, &store.builtin_timers)?;
        snapshot::save_sections(gateway, snapshot::KEY_TIMER_SECTIONS, &store.timer_sections)?;
        gateway.save(
            snapshot::KEY_STOPWATCH,
            &serde_json::to_string(&store.stopwatch)?,
        )?;
        let now_ms = self.clock.now_ms();
        snapshot::save_last_active(gateway, snapshot::KEY_ALARM_LAST_ACTIVE, now_ms)?;
        snapshot::save_last_active(gateway, snapshot::KEY_TIMER_LAST_ACTIVE, now_ms)?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &EntityStore {
        &self.state.store
    }

    pub fn alarms(&self) -> impl Iterator<Item = &Alarm> {
        self.state.store.alarms()
    }

    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.state.store.timers()
    }

    pub fn alarm(&self, id: &str) -> Option<&Alarm> {
        self.state.store.alarm(id)
    }

    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.state.store.timer(id)
    }

    pub fn pinned_timer(&self) -> Option<&Timer> {
        self.state.store.pinned_timer()
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.state.store.stopwatch
    }

    pub fn sections(&self, domain: Domain) -> &[Section] {
        match domain {
            Domain::Alarm => &self.state.store.alarm_sections,
            Domain::Timer => &self.state.store.timer_sections,
        }
    }

    pub fn is_ringing(&self, domain: Domain) -> bool {
        self.ringing_set(domain).locked()
    }

    /// Id of the entity currently presented as the active alert: the
    /// most recently fired one.
    pub fn active_ringing(&self, domain: Domain) -> Option<String> {
        self.ringing_set(domain).active().map(|(id, _)| id.to_string())
    }

    /// All ringing ids, newest first.
    pub fn ringing_ids(&self, domain: Domain) -> Vec<String> {
        self.ringing_set(domain).ids_newest_first()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ── Tick driver ──────────────────────────────────────────────────

    /// Advance both domains against the current wall clock. Returns the
    /// completion events that fired this tick.
    ///
    /// Ids are collected before mutation and every entity is re-fetched
    /// and re-checked, so state changed earlier in the same tick cannot
    /// resurrect a stale entry.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        let now_ms = datetime_to_ms(now);
        let mut events = Vec::new();

        let running: Vec<String> = self
            .state
            .store
            .timers()
            .filter(|t| t.is_running)
            .map(|t| t.id.clone())
            .collect();
        for id in running {
            let Some(timer) = self.state.store.timer_mut(&id) else {
                continue;
            };
            if !timer.is_running || timer.target_ms.is_none() {
                continue;
            }
            if timer.sync_remaining(now_ms) > 0 {
                continue;
            }
            timer.ring();
            tracing::info!(%id, "timer completed");
            let sound = self.start_timer_sound(&id);
            self.state.timer_ringing.insert(id.clone(), sound, now_ms);
            events.push(Event::TimerCompleted { id, at: now });
        }

        let guard = self.config.alarms.refire_guard_secs;
        let due: Vec<String> = self
            .state
            .store
            .alarms()
            .filter(|a| a.due_at(now, guard))
            .map(|a| a.id.clone())
            .collect();
        for id in due {
            let Some(alarm) = self.state.store.alarm_mut(&id) else {
                continue;
            };
            if !alarm.due_at(now, guard) {
                continue;
            }
            alarm.is_ringing = true;
            alarm.last_triggered_ms = Some(now_ms);
            alarm.rang_at_ms = None;
            tracing::info!(%id, "alarm fired");
            let sound = self.start_alarm_sound(&id);
            self.state.alarm_ringing.insert(id.clone(), sound, now_ms);
            events.push(Event::AlarmFired { id, at: now });
        }

        events
    }

    // ── Alarm operations ─────────────────────────────────────────────

    pub fn create_alarm(
        &mut self,
        title: impl Into<String>,
        hour: u32,
        minute: u32,
        sound: Option<String>,
        section_id: Option<String>,
    ) -> Result<Event> {
        self.ensure_unlocked(Domain::Alarm)?;
        if self.state.store.user_alarm_count() >= self.config.limits.max_alarms {
            return Err(self.reject_limit("alarms", self.config.limits.max_alarms));
        }
        let sound = self.sound_or_fallback(sound);
        let section_id = self.resolve_section(Domain::Alarm, section_id)?;
        let now = self.clock.now();
        let alarm = Alarm::new(title, hour, minute, sound, section_id, datetime_to_ms(now))?;
        let event = Event::AlarmCreated {
            id: alarm.id.clone(),
            title: alarm.title.clone(),
            hour: alarm.hour,
            minute: alarm.minute,
            at: now,
        };
        self.state.store.user_alarms.push(alarm);
        self.notify_success("alarm.created", &event);
        Ok(event)
    }

    pub fn update_alarm(&mut self, id: &str, update: AlarmUpdate) -> Result<Event> {
        self.ensure_unlocked(Domain::Alarm)?;
        if let (Some(hour), Some(minute)) = (
            update.hour.or_else(|| self.alarm(id).map(|a| a.hour)),
            update.minute.or_else(|| self.alarm(id).map(|a| a.minute)),
        ) {
            validate_time(hour, minute)?;
        }
        let sound = update.sound.map(|s| self.sound_or_fallback(Some(s)));
        let section_id = match update.section_id {
            Some(s) => Some(self.resolve_section(Domain::Alarm, Some(s))?),
            None => None,
        };
        let now = self.clock.now();

        let alarm = self
            .state
            .store
            .alarm_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if let Some(title) = update.title {
            validate_title(&title)?;
            alarm.title = title;
        }
        let time_changed = update.hour.is_some() || update.minute.is_some();
        if let Some(hour) = update.hour {
            alarm.hour = hour;
        }
        if let Some(minute) = update.minute {
            alarm.minute = minute;
        }
        if time_changed {
            // Markers for the old trigger time are stale.
            alarm.rang_at_ms = None;
            alarm.last_triggered_ms = None;
        }
        if let Some(sound) = sound {
            alarm.sound = sound;
        }
        if let Some(section_id) = section_id {
            alarm.section_id = section_id;
        }
        let event = Event::AlarmUpdated {
            id: id.to_string(),
            at: now,
        };
        self.notify_success("alarm.updated", &event);
        Ok(event)
    }

    pub fn delete_alarm(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Alarm)?;
        let alarm = self
            .state
            .store
            .alarm(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if alarm.origin == EntityOrigin::Builtin {
            return Err(CoreError::InvalidState(
                "builtin alarms cannot be deleted".to_string(),
            ));
        }
        self.state.store.remove_user_alarm(id);
        let event = Event::AlarmDeleted {
            id: id.to_string(),
            at: self.clock.now(),
        };
        self.notify_success("alarm.deleted", &event);
        Ok(event)
    }

    pub fn toggle_alarm(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Alarm)?;
        let now = self.clock.now();
        let alarm = self
            .state
            .store
            .alarm_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        alarm.enabled = !alarm.enabled;
        if alarm.enabled {
            // Enabling clears the rang-at marker.
            alarm.rang_at_ms = None;
        }
        Ok(Event::AlarmToggled {
            id: id.to_string(),
            enabled: alarm.enabled,
            at: now,
        })
    }

    pub fn dismiss_alarm(&mut self, id: &str) -> Result<Event> {
        self.require_ringing(Domain::Alarm, id)?;
        let alarm = self
            .state
            .store
            .alarm_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        alarm.is_ringing = false;
        alarm.enabled = false;
        alarm.rang_at_ms = None;
        self.state.alarm_ringing.remove(id);
        self.sounds.stop(id);
        Ok(Event::AlarmDismissed {
            id: id.to_string(),
            at: self.clock.now(),
        })
    }

    /// Dismiss a ringing alarm and create one child alarm a few minutes
    /// ahead. The child records its parent through `snoozed_from`.
    pub fn snooze_alarm(&mut self, id: &str) -> Result<Event> {
        self.require_ringing(Domain::Alarm, id)?;
        let now = self.clock.now();
        let when = now + Duration::minutes(i64::from(self.config.alarms.snooze_minutes));

        let alarm = self
            .state
            .store
            .alarm_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        let (title, sound, section_id) = (
            alarm.title.clone(),
            alarm.sound.clone(),
            alarm.section_id.clone(),
        );
        alarm.is_ringing = false;
        alarm.enabled = false;
        alarm.rang_at_ms = None;
        self.state.alarm_ringing.remove(id);
        self.sounds.stop(id);

        if self.state.store.user_alarm_count() >= self.config.limits.max_alarms {
            self.reject_limit("alarms", self.config.limits.max_alarms);
            return Ok(Event::AlarmDismissed {
                id: id.to_string(),
                at: now,
            });
        }

        let mut child = Alarm::new(
            title,
            when.hour(),
            when.minute(),
            sound,
            section_id,
            datetime_to_ms(now),
        )?;
        child.snoozed_from = Some(id.to_string());
        let event = Event::AlarmSnoozed {
            id: child.id.clone(),
            snoozed_from: id.to_string(),
            hour: child.hour,
            minute: child.minute,
            at: now,
        };
        self.state.store.user_alarms.push(child);
        Ok(event)
    }

    // ── Timer operations ─────────────────────────────────────────────

    pub fn create_countdown_timer(
        &mut self,
        title: impl Into<String>,
        duration_ms: u64,
        sound: Option<String>,
        section_id: Option<String>,
    ) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        if self.state.store.user_timer_count() >= self.config.limits.max_timers {
            return Err(self.reject_limit("timers", self.config.limits.max_timers));
        }
        let sound = self.sound_or_fallback(sound);
        let section_id = self.resolve_section(Domain::Timer, section_id)?;
        let now = self.clock.now();
        let timer = Timer::countdown(title, duration_ms, sound, section_id, datetime_to_ms(now))?;
        let event = Event::TimerCreated {
            id: timer.id.clone(),
            title: timer.title.clone(),
            at: now,
        };
        self.state.store.user_timers.push(timer);
        self.state.store.ensure_pinned();
        self.notify_success("timer.created", &event);
        Ok(event)
    }

    pub fn create_count_to_date_timer(
        &mut self,
        title: impl Into<String>,
        target_date_ms: u64,
        sound: Option<String>,
        section_id: Option<String>,
    ) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        if self.state.store.user_timer_count() >= self.config.limits.max_timers {
            return Err(self.reject_limit("timers", self.config.limits.max_timers));
        }
        let sound = self.sound_or_fallback(sound);
        let section_id = self.resolve_section(Domain::Timer, section_id)?;
        let now_ms = self.clock.now_ms();
        let timer = Timer::count_to_date(title, target_date_ms, sound, section_id, now_ms)?;
        let event = Event::TimerCreated {
            id: timer.id.clone(),
            title: timer.title.clone(),
            at: self.clock.now(),
        };
        self.state.store.user_timers.push(timer);
        self.state.store.ensure_pinned();
        self.notify_success("timer.created", &event);
        Ok(event)
    }

    pub fn update_timer(&mut self, id: &str, update: TimerUpdate) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        let sound = update.sound.map(|s| self.sound_or_fallback(Some(s)));
        let section_id = match update.section_id {
            Some(s) => Some(self.resolve_section(Domain::Timer, Some(s))?),
            None => None,
        };
        let now = self.clock.now();

        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if timer.origin == EntityOrigin::Builtin {
            return Err(CoreError::InvalidState(
                "builtin timers can only be reset".to_string(),
            ));
        }
        if let Some(title) = update.title {
            validate_title(&title)?;
            timer.title = title;
        }
        if let Some(duration_ms) = update.duration_ms {
            if timer.kind != TimerKind::Countdown {
                return Err(ValidationError::invalid(
                    "duration",
                    "only countdown timers have a duration",
                )
                .into());
            }
            if timer.is_running {
                return Err(CoreError::InvalidState(
                    "pause the timer before changing its duration".to_string(),
                ));
            }
            if duration_ms == 0 {
                return Err(ValidationError::invalid("duration", "must be positive").into());
            }
            timer.initial_ms = duration_ms;
            timer.remaining_ms = duration_ms;
            timer.rang_at_ms = None;
        }
        if let Some(sound) = sound {
            timer.sound = sound;
        }
        if let Some(section_id) = section_id {
            timer.section_id = section_id;
        }
        let event = Event::TimerUpdated {
            id: id.to_string(),
            at: now,
        };
        self.notify_success("timer.updated", &event);
        Ok(event)
    }

    pub fn delete_timer(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        let timer = self
            .state
            .store
            .timer(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if timer.origin == EntityOrigin::Builtin {
            return Err(CoreError::InvalidState(
                "builtin timers cannot be deleted".to_string(),
            ));
        }
        let removed = self.state.store.remove_user_timer(id);
        if removed.map(|t| t.is_pinned).unwrap_or(false) {
            // The pinned slot is reassigned atomically with the removal.
            self.state.store.ensure_pinned();
        }
        let event = Event::TimerDeleted {
            id: id.to_string(),
            at: self.clock.now(),
        };
        self.notify_success("timer.deleted", &event);
        Ok(event)
    }

    pub fn start_timer(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        let now_ms = self.clock.now_ms();
        let now = self.clock.now();
        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if timer.is_ringing {
            return Err(CoreError::InvalidState(
                "dismiss the timer before starting it".to_string(),
            ));
        }
        if timer.is_running {
            return Err(CoreError::InvalidState("timer is already running".to_string()));
        }
        timer.rang_at_ms = None;
        timer.arm(now_ms);
        Ok(Event::TimerStarted {
            id: id.to_string(),
            remaining_ms: timer.remaining_ms,
            at: now,
        })
    }

    pub fn pause_timer(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        let now_ms = self.clock.now_ms();
        let now = self.clock.now();
        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if !timer.is_running {
            return Err(CoreError::InvalidState("timer is not running".to_string()));
        }
        timer.disarm(now_ms);
        Ok(Event::TimerPaused {
            id: id.to_string(),
            remaining_ms: timer.remaining_ms,
            at: now,
        })
    }

    pub fn reset_timer(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        let now_ms = self.clock.now_ms();
        let now = self.clock.now();
        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if timer.is_ringing {
            return Err(CoreError::InvalidState(
                "dismiss the timer before resetting it".to_string(),
            ));
        }
        timer.reset(now_ms);
        Ok(Event::TimerReset {
            id: id.to_string(),
            at: now,
        })
    }

    pub fn dismiss_timer(&mut self, id: &str) -> Result<Event> {
        self.require_ringing(Domain::Timer, id)?;
        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        timer.is_ringing = false;
        timer.rang_at_ms = None;
        if timer.kind == TimerKind::Countdown {
            timer.remaining_ms = timer.initial_ms;
        }
        self.state.timer_ringing.remove(id);
        self.sounds.stop(id);
        Ok(Event::TimerDismissed {
            id: id.to_string(),
            at: self.clock.now(),
        })
    }

    /// Re-arm a ringing countdown timer at its original duration.
    pub fn restart_timer(&mut self, id: &str) -> Result<Event> {
        self.require_ringing(Domain::Timer, id)?;
        let now_ms = self.clock.now_ms();
        let now = self.clock.now();
        let timer = self
            .state
            .store
            .timer_mut(id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        if timer.kind != TimerKind::Countdown {
            return Err(CoreError::InvalidState(
                "only countdown timers can be restarted".to_string(),
            ));
        }
        timer.is_ringing = false;
        timer.rang_at_ms = None;
        timer.remaining_ms = timer.initial_ms;
        timer.arm(now_ms);
        self.state.timer_ringing.remove(id);
        self.sounds.stop(id);
        Ok(Event::TimerRestarted {
            id: id.to_string(),
            remaining_ms: timer.remaining_ms,
            at: now,
        })
    }

    pub fn pin_timer(&mut self, id: &str) -> Result<Event> {
        self.ensure_unlocked(Domain::Timer)?;
        if !self.state.store.set_pinned(id) {
            return Err(CoreError::UnknownEntity { id: id.to_string() });
        }
        Ok(Event::TimerPinned {
            id: id.to_string(),
            at: self.clock.now(),
        })
    }

    // ── Sections ─────────────────────────────────────────────────────

    pub fn create_section(&mut self, domain: Domain, name: impl Into<String>) -> Result<Event> {
        self.ensure_unlocked(domain)?;
        if self.sections(domain).len() >= self.config.limits.max_sections {
            return Err(self.reject_limit("sections", self.config.limits.max_sections));
        }
        let section = Section::new(name)?;
        let event = Event::SectionCreated {
            domain,
            id: section.id.clone(),
            name: section.name.clone(),
            at: self.clock.now(),
        };
        self.sections_mut(domain).push(section);
        self.notify_success("section.created", &event);
        Ok(event)
    }

    pub fn rename_section(
        &mut self,
        domain: Domain,
        id: &str,
        name: impl Into<String>,
    ) -> Result<Event> {
        self.ensure_unlocked(domain)?;
        let name = name.into();
        validate_title(&name)?;
        let now = self.clock.now();
        let section = self
            .sections_mut(domain)
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        section.name = name.clone();
        let event = Event::SectionRenamed {
            domain,
            id: id.to_string(),
            name,
            at: now,
        };
        self.notify_success("section.renamed", &event);
        Ok(event)
    }

    /// Delete a section, moving its entities back to the default section.
    pub fn delete_section(&mut self, domain: Domain, id: &str) -> Result<Event> {
        self.ensure_unlocked(domain)?;
        if id == DEFAULT_SECTION_ID {
            return Err(CoreError::InvalidState(
                "the default section cannot be deleted".to_string(),
            ));
        }
        let sections = self.sections_mut(domain);
        let index = sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::UnknownEntity { id: id.to_string() })?;
        sections.remove(index);
        match domain {
            Domain::Alarm => self.state.store.reassign_alarm_section(id),
            Domain::Timer => self.state.store.reassign_timer_section(id),
        }
        let event = Event::SectionDeleted {
            domain,
            id: id.to_string(),
            at: self.clock.now(),
        };
        self.notify_success("section.deleted", &event);
        Ok(event)
    }

    // ── Stopwatch ────────────────────────────────────────────────────

    pub fn stopwatch_start(&mut self) -> Event {
        let now_ms = self.clock.now_ms();
        self.state.store.stopwatch.start(now_ms);
        Event::StopwatchStarted { at: self.clock.now() }
    }

    pub fn stopwatch_pause(&mut self) -> Event {
        let now_ms = self.clock.now_ms();
        self.state.store.stopwatch.pause(now_ms);
        Event::StopwatchPaused {
            elapsed_ms: self.state.store.stopwatch.elapsed(now_ms),
            at: self.clock.now(),
        }
    }

    pub fn stopwatch_lap(&mut self) -> Event {
        let now_ms = self.clock.now_ms();
        let elapsed_ms = self.state.store.stopwatch.lap(now_ms);
        Event::StopwatchLap {
            lap_index: self.state.store.stopwatch.laps_ms.len() - 1,
            elapsed_ms,
            at: self.clock.now(),
        }
    }

    pub fn stopwatch_reset(&mut self) -> Event {
        self.state.store.stopwatch.reset();
        Event::StopwatchReset { at: self.clock.now() }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ringing_set(&self, domain: Domain) -> &RingingSet {
        match domain {
            Domain::Alarm => &self.state.alarm_ringing,
            Domain::Timer => &self.state.timer_ringing,
        }
    }

    fn sections_mut(&mut self, domain: Domain) -> &mut Vec<Section> {
        match domain {
            Domain::Alarm => &mut self.state.store.alarm_sections,
            Domain::Timer => &mut self.state.store.timer_sections,
        }
    }

    /// Reject a mutating operation while the domain has a ringing entity.
    fn ensure_unlocked(&self, domain: Domain) -> Result<()> {
        if self.ringing_set(domain).locked() {
            self.notifier.notify(
                NotificationKind::Warning,
                "domain.locked",
                json!({ "domain": domain.as_str() }),
            );
            return Err(CoreError::DomainLocked { domain });
        }
        Ok(())
    }

    fn require_ringing(&self, domain: Domain, id: &str) -> Result<()> {
        if !self.ringing_set(domain).contains(id) {
            return Err(CoreError::InvalidState(format!(
                "entity '{id}' is not ringing"
            )));
        }
        Ok(())
    }

    /// Validate a requested sound id, substituting the fallback for one
    /// that does not resolve. `None` requests the configured default.
    fn sound_or_fallback(&self, requested: Option<String>) -> String {
        let id = requested.unwrap_or_else(|| self.config.sounds.default_sound.clone());
        if self.sounds.resolve(&id).is_some() {
            return id;
        }
        self.notifier.notify(
            NotificationKind::Warning,
            "sound.fallback",
            json!({ "requested": id }),
        );
        FALLBACK_SOUND_ID.to_string()
    }

    fn resolve_section(&self, domain: Domain, section_id: Option<String>) -> Result<String> {
        match section_id {
            None => Ok(DEFAULT_SECTION_ID.to_string()),
            Some(id) => {
                if self.sections(domain).iter().any(|s| s.id == id) {
                    Ok(id)
                } else {
                    Err(ValidationError::invalid("section", format!("unknown section '{id}'")).into())
                }
            }
        }
    }

    fn reject_limit(&self, what: &'static str, limit: usize) -> CoreError {
        self.notifier.notify(
            NotificationKind::Warning,
            "limit.exceeded",
            json!({ "what": what, "limit": limit }),
        );
        CoreError::LimitExceeded { what, limit }
    }

    fn notify_success(&self, message_key: &str, event: &Event) {
        let data = serde_json::to_value(event).unwrap_or(serde_json::Value::Null);
        self.notifier
            .notify(NotificationKind::Success, message_key, data);
    }

    /// Resolve and start the sound for a fired timer, persisting the
    /// fallback substitution onto the entity when the id is unknown.
    fn start_timer_sound(&mut self, id: &str) -> String {
        let requested = self
            .state
            .store
            .timer(id)
            .map(|t| t.sound.clone())
            .unwrap_or_default();
        let resolved = self.resolve_with_fallback(&requested);
        if resolved.id != requested {
            if let Some(timer) = self.state.store.timer_mut(id) {
                timer.sound = resolved.id.clone();
            }
        }
        self.sounds.play(&resolved, id);
        resolved.id
    }

    fn start_alarm_sound(&mut self, id: &str) -> String {
        let requested = self
            .state
            .store
            .alarm(id)
            .map(|a| a.sound.clone())
            .unwrap_or_default();
        let resolved = self.resolve_with_fallback(&requested);
        if resolved.id != requested {
            if let Some(alarm) = self.state.store.alarm_mut(id) {
                alarm.sound = resolved.id.clone();
            }
        }
        self.sounds.play(&resolved, id);
        resolved.id
    }

    fn resolve_with_fallback(&self, requested: &str) -> SoundRef {
        if let Some(sound) = self.sounds.resolve(requested) {
            return sound;
        }
        self.notifier.notify(
            NotificationKind::Warning,
            "sound.fallback",
            json!({ "requested": requested }),
        );
        self.sounds
            .resolve(FALLBACK_SOUND_ID)
            .unwrap_or_else(|| SoundRef {
                id: FALLBACK_SOUND_ID.to_string(),
                name: "Fallback".to_string(),
            })
    }
}

fn ensure_default_section(sections: &mut Vec<Section>) {
    if !sections.iter().any(|s| s.is_default()) {
        sections.insert(0, Section::default_section());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::MemoryNotifier;
    use crate::sound::{RecordingSounds, SoundCall};
    use crate::storage::MemoryGateway;

    struct Harness {
        clock: Arc<ManualClock>,
        sounds: Arc<RecordingSounds>,
        notifier: Arc<MemoryNotifier>,
        controller: Controller,
    }

    fn harness_with_config(now_ms: u64, config: Config) -> Harness {
        let clock = Arc::new(ManualClock::new(now_ms));
        let sounds = Arc::new(RecordingSounds::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let controller = Controller::new(
            config,
            Box::new(clock.clone()),
            Box::new(sounds.clone()),
            Box::new(notifier.clone()),
        );
        Harness {
            clock,
            sounds,
            notifier,
            controller,
        }
    }

    fn harness_at_ms(now_ms: u64) -> Harness {
        harness_with_config(now_ms, Config::default())
    }

    fn utc_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> u64 {
        datetime_to_ms(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    fn created_id(event: Event) -> String {
        match event {
            Event::AlarmCreated { id, .. }
            | Event::TimerCreated { id, .. }
            | Event::AlarmSnoozed { id, .. } => id,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    fn ringing_timer(h: &mut Harness, duration_ms: u64) -> String {
        let id = created_id(
            h.controller
                .create_countdown_timer("T", duration_ms, None, None)
                .unwrap(),
        );
        h.controller.start_timer(&id).unwrap();
        h.clock.advance_ms(duration_ms);
        let events = h.controller.tick();
        assert!(matches!(events.as_slice(), [Event::TimerCompleted { .. }]));
        id
    }

    #[test]
    fn tick_completes_countdown_at_wall_clock_target() {
        let mut h = harness_at_ms(0);
        let id = created_id(
            h.controller
                .create_countdown_timer("Tea", 60_000, None, None)
                .unwrap(),
        );
        h.controller.start_timer(&id).unwrap();

        h.clock.advance_ms(59_999);
        assert!(h.controller.tick().is_empty());
        assert_eq!(h.controller.timer(&id).unwrap().remaining_ms, 1);

        h.clock.advance_ms(1);
        let events = h.controller.tick();
        assert!(matches!(events.as_slice(), [Event::TimerCompleted { .. }]));
        let timer = h.controller.timer(&id).unwrap();
        assert!(timer.is_ringing);
        assert!(!timer.is_running);
        assert_eq!(timer.remaining_ms, 0);
        assert!(h.controller.is_ringing(Domain::Timer));
        assert!(h.sounds.drain().iter().any(|c| matches!(
            c,
            SoundCall::Play { instance_key, .. } if *instance_key == id
        )));
    }

    #[test]
    fn irregular_ticks_do_not_drift() {
        let mut h = harness_at_ms(0);
        let id = created_id(
            h.controller
                .create_countdown_timer("Tea", 100_000, None, None)
                .unwrap(),
        );
        h.controller.start_timer(&id).unwrap();
        // Wildly uneven tick schedule: remaining always matches the
        // wall-clock distance to the target.
        for (advance, expect) in [(1u64, 99_999u64), (8_999, 91_000), (41_000, 50_000)] {
            h.clock.advance_ms(advance);
            h.controller.tick();
            assert_eq!(h.controller.timer(&id).unwrap().remaining_ms, expect);
        }
    }

    #[test]
    fn ringing_locks_the_rest_of_the_timer_domain() {
        let mut h = harness_at_ms(0);
        let other = created_id(
            h.controller
                .create_countdown_timer("Other", 300_000, None, None)
                .unwrap(),
        );
        let ringing = ringing_timer(&mut h, 1_000);
        let before = h.controller.timer(&other).unwrap().clone();

        assert!(matches!(
            h.controller.create_countdown_timer("New", 1_000, None, None),
            Err(CoreError::DomainLocked { domain: Domain::Timer })
        ));
        assert!(matches!(
            h.controller.start_timer(&other),
            Err(CoreError::DomainLocked { .. })
        ));
        assert!(matches!(
            h.controller.delete_timer(&other),
            Err(CoreError::DomainLocked { .. })
        ));
        assert!(matches!(
            h.controller.pin_timer(&other),
            Err(CoreError::DomainLocked { .. })
        ));
        assert_eq!(h.controller.timer(&other).unwrap(), &before);
        assert!(h
            .notifier
            .drain()
            .iter()
            .any(|n| n.message_key == "domain.locked"));

        // The alarm domain is independent.
        assert!(h.controller.create_alarm("A", 9, 0, None, None).is_ok());

        // Dismissing the ringing timer is the permitted operation and
        // unlocks the domain.
        h.controller.dismiss_timer(&ringing).unwrap();
        assert!(!h.controller.is_ringing(Domain::Timer));
        assert!(h.controller.start_timer(&other).is_ok());
    }

    #[test]
    fn dismiss_resets_countdown_to_initial() {
        let mut h = harness_at_ms(0);
        let id = ringing_timer(&mut h, 5_000);
        h.controller.dismiss_timer(&id).unwrap();
        let timer = h.controller.timer(&id).unwrap();
        assert!(!timer.is_ringing);
        assert_eq!(timer.remaining_ms, 5_000);
        assert_eq!(timer.rang_at_ms, None);
        assert!(h
            .sounds
            .drain()
            .contains(&SoundCall::Stop { instance_key: id }));
    }

    #[test]
    fn restart_rearms_at_original_duration() {
        let mut h = harness_at_ms(0);
        let id = ringing_timer(&mut h, 5_000);
        let event = h.controller.restart_timer(&id).unwrap();
        assert!(matches!(event, Event::TimerRestarted { remaining_ms: 5_000, .. }));
        let timer = h.controller.timer(&id).unwrap();
        assert!(timer.is_running);
        assert!(!timer.is_ringing);
        assert_eq!(timer.target_ms, Some(h.clock.now_ms() + 5_000));
    }

    #[test]
    fn stacked_completions_present_newest_as_active() {
        let mut h = harness_at_ms(0);
        let first = created_id(
            h.controller
                .create_countdown_timer("First", 1_000, None, None)
                .unwrap(),
        );
        let second = created_id(
            h.controller
                .create_countdown_timer("Second", 3_000, None, None)
                .unwrap(),
        );
        h.controller.start_timer(&first).unwrap();
        h.controller.start_timer(&second).unwrap();

        h.clock.advance_ms(1_000);
        h.controller.tick();
        // Second completes while the first is still ringing: completions
        // stack, they are not blocked by the lock.
        h.clock.advance_ms(2_000);
        h.controller.tick();

        assert_eq!(h.controller.ringing_ids(Domain::Timer), vec![second.clone(), first.clone()]);
        assert_eq!(h.controller.active_ringing(Domain::Timer), Some(second.clone()));

        // Both stay individually dismissible.
        h.controller.dismiss_timer(&first).unwrap();
        assert_eq!(h.controller.active_ringing(Domain::Timer), Some(second.clone()));
        h.controller.dismiss_timer(&second).unwrap();
        assert!(!h.controller.is_ringing(Domain::Timer));
    }

    #[test]
    fn alarm_fires_in_matching_minute_and_guards_refire() {
        let start = utc_ms(2026, 3, 1, 8, 59, 50);
        let mut h = harness_at_ms(start);
        let id = created_id(h.controller.create_alarm("Wake", 9, 0, None, None).unwrap());

        assert!(h.controller.tick().is_empty());

        h.clock.set_ms(utc_ms(2026, 3, 1, 9, 0, 5));
        let events = h.controller.tick();
        assert!(matches!(events.as_slice(), [Event::AlarmFired { .. }]));
        assert!(h.controller.alarm(&id).unwrap().is_ringing);
        assert!(h.controller.is_ringing(Domain::Alarm));

        // Dismiss, re-enable within the same minute: the guard holds.
        h.controller.dismiss_alarm(&id).unwrap();
        assert!(!h.controller.alarm(&id).unwrap().enabled);
        h.controller.toggle_alarm(&id).unwrap();
        h.clock.set_ms(utc_ms(2026, 3, 1, 9, 0, 30));
        assert!(h.controller.tick().is_empty());

        // The next day it fires again.
        h.clock.set_ms(utc_ms(2026, 3, 2, 9, 0, 2));
        assert_eq!(h.controller.tick().len(), 1);
    }

    #[test]
    fn snooze_creates_exactly_one_child_alarm() {
        let start = utc_ms(2026, 3, 1, 7, 0, 10);
        let mut h = harness_at_ms(start);
        let id = created_id(h.controller.create_alarm("Wake", 7, 0, None, None).unwrap());
        // Make the creation instant precede the trigger minute.
        h.controller.tick();
        assert!(h.controller.alarm(&id).unwrap().is_ringing);

        let event = h.controller.snooze_alarm(&id).unwrap();
        let child_id = match &event {
            Event::AlarmSnoozed {
                id: child_id,
                snoozed_from,
                hour,
                minute,
                ..
            } => {
                assert_eq!(snoozed_from, &id);
                assert_eq!((*hour, *minute), (7, 5));
                child_id.clone()
            }
            other => panic!("unexpected event: {other:?}"),
        };

        let original = h.controller.alarm(&id).unwrap();
        assert!(!original.enabled);
        assert!(!original.is_ringing);
        assert_eq!(original.rang_at_ms, None);

        let child = h.controller.alarm(&child_id).unwrap();
        assert!(child.enabled);
        assert_eq!(child.snoozed_from.as_deref(), Some(id.as_str()));
        assert_eq!(
            h.controller.alarms().filter(|a| a.snoozed_from.is_some()).count(),
            1
        );
        assert!(!h.controller.is_ringing(Domain::Alarm));
    }

    #[test]
    fn unresolvable_sound_is_substituted_and_persisted() {
        let gw = MemoryGateway::new();
        let timer = Timer::countdown("T", 1_000, "ghost-sound", "default", 0).unwrap();
        let id = timer.id.clone();
        snapshot::save_entities(&gw, snapshot::KEY_USER_TIMERS, &[timer]).unwrap();

        let mut h = harness_at_ms(0);
        h.controller.load(&gw);
        h.controller.reconcile();
        h.controller.start_timer(&id).unwrap();
        h.clock.advance_ms(1_000);
        let events = h.controller.tick();
        assert!(matches!(events.as_slice(), [Event::TimerCompleted { .. }]));

        // The substitution is written back onto the entity and the
        // fallback is what actually plays.
        assert_eq!(h.controller.timer(&id).unwrap().sound, FALLBACK_SOUND_ID);
        assert!(h.sounds.drain().contains(&SoundCall::Play {
            sound_id: FALLBACK_SOUND_ID.to_string(),
            instance_key: id.clone(),
        }));

        h.controller.persist_all(&gw).unwrap();
        let persisted: Vec<Timer> = snapshot::load_entities(&gw, snapshot::KEY_USER_TIMERS);
        assert_eq!(persisted[0].sound, FALLBACK_SOUND_ID);
    }

    #[test]
    fn persist_and_reload_resumes_running_timer_without_drift() {
        let gw = MemoryGateway::new();
        let id;
        {
            let mut h = harness_at_ms(10_000);
            id = created_id(
                h.controller
                    .create_countdown_timer("Long", 120_000, None, None)
                    .unwrap(),
            );
            h.controller.start_timer(&id).unwrap();
            h.controller.persist_all(&gw).unwrap();
        }

        // One minute later in a fresh process: the absolute target
        // survived, remaining reflects the outage.
        let mut h = harness_at_ms(70_000);
        h.controller.load(&gw);
        let report = h.controller.reconcile();
        assert_eq!(report.resumed, 1);
        let timer = h.controller.timer(&id).unwrap();
        assert!(timer.is_running);
        assert_eq!(timer.remaining_ms, 60_000);

        // And it fires exactly at the wall-clock target.
        h.clock.set_ms(130_000);
        assert_eq!(h.controller.tick().len(), 1);
        assert!(h.controller.timer(&id).unwrap().is_ringing);
    }

    #[test]
    fn missed_alarm_is_reported_after_reload() {
        let gw = MemoryGateway::new();
        let id;
        {
            // Last active yesterday 08:00 with an enabled 09:00 alarm.
            let mut h = harness_at_ms(utc_ms(2026, 2, 28, 7, 0, 0));
            id = created_id(h.controller.create_alarm("Wake", 9, 0, None, None).unwrap());
            h.clock.set_ms(utc_ms(2026, 2, 28, 8, 0, 0));
            h.controller.persist_all(&gw).unwrap();
        }

        let mut h = harness_at_ms(utc_ms(2026, 3, 1, 10, 0, 0));
        h.controller.load(&gw);
        let report = h.controller.reconcile();
        assert_eq!(report.missed, 1);
        let alarm = h.controller.alarm(&id).unwrap();
        assert!(!alarm.enabled);
        assert_eq!(alarm.rang_at_ms, Some(utc_ms(2026, 3, 1, 9, 0, 0)));
    }

    #[test]
    fn load_on_empty_storage_bootstraps_defaults() {
        let gw = MemoryGateway::new();
        let mut h = harness_at_ms(1_000);
        h.controller.load(&gw);
        let report = h.controller.reconcile();

        assert!(!h.controller.store().builtin_alarms.is_empty());
        assert_eq!(report.seeded, defaults::builtin_timers(0).len());
        assert_eq!(h.controller.timers().filter(|t| t.is_pinned).count(), 1);
        assert!(h.controller.sections(Domain::Alarm)[0].is_default());
        assert!(h.controller.sections(Domain::Timer)[0].is_default());
    }

    #[test]
    fn malformed_snapshots_degrade_to_defaults() {
        let gw = MemoryGateway::new();
        gw.insert(snapshot::KEY_USER_TIMERS, "{definitely not json");
        gw.insert(snapshot::KEY_TIMER_LAST_ACTIVE, "yesterday-ish");
        let mut h = harness_at_ms(1_000);
        h.controller.load(&gw);
        h.controller.reconcile();
        assert_eq!(h.controller.store().user_timers.len(), 0);
        assert!(h.controller.timers().count() > 0); // builtin seeds survive
    }

    #[test]
    fn entity_limit_rejects_creation() {
        let mut config = Config::default();
        config.limits.max_alarms = 1;
        let mut h = harness_with_config(0, config);
        h.controller.create_alarm("One", 8, 0, None, None).unwrap();
        let err = h.controller.create_alarm("Two", 9, 0, None, None);
        assert!(matches!(err, Err(CoreError::LimitExceeded { what: "alarms", .. })));
        assert_eq!(h.controller.store().user_alarm_count(), 1);
        assert!(h
            .notifier
            .drain()
            .iter()
            .any(|n| n.message_key == "limit.exceeded"));
    }

    #[test]
    fn unknown_ids_are_rejected_without_panic() {
        let mut h = harness_at_ms(0);
        assert!(matches!(
            h.controller.start_timer("nope"),
            Err(CoreError::UnknownEntity { .. })
        ));
        assert!(matches!(
            h.controller.toggle_alarm("nope"),
            Err(CoreError::UnknownEntity { .. })
        ));
        assert!(matches!(
            h.controller.dismiss_timer("nope"),
            Err(CoreError::InvalidState(_))
        ));
    }

    #[test]
    fn builtin_timers_cannot_be_deleted() {
        let gw = MemoryGateway::new();
        let mut h = harness_at_ms(0);
        h.controller.load(&gw);
        h.controller.reconcile();
        let builtin_id = h.controller.store().builtin_timers[0].id.clone();
        assert!(matches!(
            h.controller.delete_timer(&builtin_id),
            Err(CoreError::InvalidState(_))
        ));
        // Reset is the supported operation.
        assert!(h.controller.reset_timer(&builtin_id).is_ok());
    }

    #[test]
    fn pin_moves_and_survives_deletion() {
        let mut h = harness_at_ms(0);
        let a = created_id(
            h.controller
                .create_countdown_timer("A", 1_000, None, None)
                .unwrap(),
        );
        let b = created_id(
            h.controller
                .create_countdown_timer("B", 1_000, None, None)
                .unwrap(),
        );
        assert_eq!(h.controller.pinned_timer().unwrap().id, a);

        h.controller.pin_timer(&b).unwrap();
        assert_eq!(h.controller.pinned_timer().unwrap().id, b);

        h.controller.delete_timer(&b).unwrap();
        assert_eq!(h.controller.pinned_timer().unwrap().id, a);
        assert_eq!(h.controller.timers().filter(|t| t.is_pinned).count(), 1);
    }

    #[test]
    fn section_lifecycle_reassigns_entities() {
        let mut h = harness_at_ms(0);
        let section_id = match h.controller.create_section(Domain::Timer, "Kitchen").unwrap() {
            Event::SectionCreated { id, .. } => id,
            other => panic!("unexpected event: {other:?}"),
        };
        let timer_id = created_id(
            h.controller
                .create_countdown_timer("Tea", 1_000, None, Some(section_id.clone()))
                .unwrap(),
        );
        assert_eq!(h.controller.timer(&timer_id).unwrap().section_id, section_id);

        h.controller
            .rename_section(Domain::Timer, &section_id, "Kitchen 2")
            .unwrap();
        h.controller.delete_section(Domain::Timer, &section_id).unwrap();
        assert_eq!(
            h.controller.timer(&timer_id).unwrap().section_id,
            DEFAULT_SECTION_ID
        );
        assert!(matches!(
            h.controller.delete_section(Domain::Timer, DEFAULT_SECTION_ID),
            Err(CoreError::InvalidState(_))
        ));
    }

    #[test]
    fn stopwatch_ops_flow_through_controller() {
        let mut h = harness_at_ms(1_000);
        h.controller.stopwatch_start();
        h.clock.advance_ms(2_500);
        let event = h.controller.stopwatch_lap();
        assert!(matches!(event, Event::StopwatchLap { elapsed_ms: 2_500, .. }));
        h.controller.stopwatch_pause();
        h.clock.advance_ms(10_000);
        assert_eq!(h.controller.stopwatch().elapsed(h.clock.now_ms()), 2_500);
        h.controller.stopwatch_reset();
        assert_eq!(h.controller.stopwatch(), &Stopwatch::default());
    }
}
