//! Builtin seed data.
//!
//! Builtin entities ship with the application: they are bootstrapped on
//! first run and re-seeded (merged by id) during reconciliation when a
//! persisted snapshot predates their introduction. Builtin timers are
//! never deleted, only reset.

use crate::alarm::{Alarm, EntityOrigin};
use crate::section::DEFAULT_SECTION_ID;
use crate::timer::{Timer, TimerKind};

/// Builtin sound registry: (id, display name).
pub const BUILTIN_SOUNDS: &[(&str, &str)] = &[
    ("classic-bell", "Classic Bell"),
    ("digital-beep", "Digital Beep"),
    ("soft-chime", "Soft Chime"),
    ("rooster", "Rooster"),
    ("marimba", "Marimba"),
];

const MINUTE_MS: u64 = 60 * 1_000;

fn builtin_alarm(id: &str, title: &str, hour: u32, minute: u32, sound: &str, now_ms: u64) -> Alarm {
    Alarm {
        id: id.to_string(),
        title: title.to_string(),
        hour,
        minute,
        sound: sound.to_string(),
        enabled: false,
        origin: EntityOrigin::Builtin,
        section_id: DEFAULT_SECTION_ID.to_string(),
        created_ms: now_ms,
        is_ringing: false,
        last_triggered_ms: None,
        rang_at_ms: None,
        snoozed_from: None,
    }
}

fn builtin_timer(id: &str, title: &str, minutes: u64, sound: &str, now_ms: u64) -> Timer {
    Timer {
        id: id.to_string(),
        title: title.to_string(),
        kind: TimerKind::Countdown,
        sound: sound.to_string(),
        section_id: DEFAULT_SECTION_ID.to_string(),
        origin: EntityOrigin::Builtin,
        created_ms: now_ms,
        initial_ms: minutes * MINUTE_MS,
        remaining_ms: minutes * MINUTE_MS,
        target_ms: None,
        target_date_ms: None,
        is_running: false,
        is_ringing: false,
        is_pinned: false,
        rang_at_ms: None,
    }
}

/// Default alarms, shipped disabled.
pub fn builtin_alarms(now_ms: u64) -> Vec<Alarm> {
    vec![
        builtin_alarm("builtin-alarm-wake", "Wake up", 7, 0, "classic-bell", now_ms),
        builtin_alarm("builtin-alarm-lunch", "Lunch", 12, 30, "soft-chime", now_ms),
        builtin_alarm("builtin-alarm-bedtime", "Bedtime", 22, 30, "marimba", now_ms),
    ]
}

/// Default countdown timers.
pub fn builtin_timers(now_ms: u64) -> Vec<Timer> {
    vec![
        builtin_timer("builtin-timer-pomodoro", "Pomodoro", 25, "digital-beep", now_ms),
        builtin_timer("builtin-timer-tea", "Tea", 5, "soft-chime", now_ms),
        builtin_timer("builtin-timer-workout", "Workout", 10, "digital-beep", now_ms),
        builtin_timer("builtin-timer-nap", "Power Nap", 20, "marimba", now_ms),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_stable_and_unique() {
        let timers = builtin_timers(0);
        let mut ids: Vec<&str> = timers.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), timers.len());
        assert!(timers.iter().all(|t| t.origin == EntityOrigin::Builtin));
    }

    #[test]
    fn builtin_sounds_exist_for_seeds() {
        let known: Vec<&str> = BUILTIN_SOUNDS.iter().map(|(id, _)| *id).collect();
        for alarm in builtin_alarms(0) {
            assert!(known.contains(&alarm.sound.as_str()));
        }
        for timer in builtin_timers(0) {
            assert!(known.contains(&timer.sound.as_str()));
        }
    }

    #[test]
    fn builtin_alarms_ship_disabled() {
        assert!(builtin_alarms(0).iter().all(|a| !a.enabled));
    }
}
