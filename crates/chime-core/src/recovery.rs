//! Startup reconciliation.
//!
//! Runs once, synchronously, before the first tick. The in-memory driver
//! cannot fire anything while the process is not running, so this engine
//! compares the persisted last-active timestamp against the current time
//! and retroactively resolves what happened in the gap: fire-and-mark,
//! never fire-and-replay. An entity that should have fired while the
//! process was away ends up finalized with a `rang_at` marker ("rang N
//! ago"), not ringing.
//!
//! Reconciliation never fails as a whole. A per-entity error is recorded
//! as a `Failed` action and leaves that entity in its last known-good
//! state; siblings are unaffected.

use serde::{Deserialize, Serialize};

use crate::alarm::Alarm;
use crate::clock::{datetime_to_ms, ms_to_datetime};
use crate::defaults;
use crate::error::CoreError;
use crate::store::EntityStore;
use crate::timer::{Timer, TimerKind};

/// Result of reconciling a single entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReconcileAction {
    /// The entity fired (or should have fired) while the process was not
    /// running; it now carries a `rang_at` marker.
    Finalized { id: String, rang_at_ms: u64 },
    /// A running timer's target is still in the future; its countdown
    /// resumes against the same absolute target.
    Resumed { id: String, target_ms: u64 },
    /// An enabled alarm's daily trigger fell inside the away gap.
    MissedAlarm { id: String, rang_at_ms: u64 },
    /// A builtin entity absent from the persisted snapshot was seeded
    /// from the static template.
    Seeded { id: String },
    /// Reconciling this entity failed; it was left untouched.
    Failed { id: String, error: String },
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub examined: usize,
    pub finalized: usize,
    pub resumed: usize,
    pub missed: usize,
    pub seeded: usize,
    pub failed: usize,
    pub actions: Vec<ReconcileAction>,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, action: ReconcileAction) {
        match &action {
            ReconcileAction::Finalized { id, rang_at_ms } => {
                tracing::info!(%id, rang_at_ms, "reconcile: finalized");
                self.finalized += 1;
            }
            ReconcileAction::Resumed { id, target_ms } => {
                tracing::info!(%id, target_ms, "reconcile: resumed");
                self.resumed += 1;
            }
            ReconcileAction::MissedAlarm { id, rang_at_ms } => {
                tracing::info!(%id, rang_at_ms, "reconcile: missed alarm");
                self.missed += 1;
            }
            ReconcileAction::Seeded { id } => {
                tracing::info!(%id, "reconcile: seeded builtin");
                self.seeded += 1;
            }
            ReconcileAction::Failed { id, error } => {
                tracing::warn!(%id, %error, "reconcile: failed");
                self.failed += 1;
            }
        }
        self.actions.push(action);
    }
}

/// Policy knobs for reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryPolicy {
    /// When an entity was persisted mid-ring without an exact fire
    /// timestamp, estimate the fire instant as the midpoint of the away
    /// gap. When false, the last-active instant is used instead.
    pub estimate_missing_fire_time: bool,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            estimate_missing_fire_time: true,
        }
    }
}

/// Reconcile the whole store against elapsed wall-clock time.
///
/// `alarm_last_active_ms` / `timer_last_active_ms` are the per-domain
/// teardown stamps; `None` means the stamp was never written (or was lost
/// to a partial write), which disables gap-based inference for that
/// domain but still resolves absolute targets.
pub fn reconcile(
    store: &mut EntityStore,
    alarm_last_active_ms: Option<u64>,
    timer_last_active_ms: Option<u64>,
    now_ms: u64,
    policy: &RecoveryPolicy,
) -> ReconcileReport {
    let mut report = ReconcileReport::new();

    for alarm in store.alarms_mut() {
        report.examined += 1;
        match reconcile_alarm(alarm, alarm_last_active_ms, now_ms, policy) {
            Ok(Some(action)) => report.record(action),
            Ok(None) => {}
            Err(e) => report.record(ReconcileAction::Failed {
                id: alarm.id.clone(),
                error: e.to_string(),
            }),
        }
    }

    for timer in store.timers_mut() {
        report.examined += 1;
        match reconcile_timer(timer, timer_last_active_ms, now_ms, policy) {
            Ok(Some(action)) => report.record(action),
            Ok(None) => {}
            Err(e) => report.record(ReconcileAction::Failed {
                id: timer.id.clone(),
                error: e.to_string(),
            }),
        }
    }

    seed_builtin_timers(store, now_ms, &mut report);
    store.ensure_pinned();

    report
}

fn reconcile_alarm(
    alarm: &mut Alarm,
    last_active_ms: Option<u64>,
    now_ms: u64,
    policy: &RecoveryPolicy,
) -> Result<Option<ReconcileAction>, CoreError> {
    // Invariant repair on load: an enabled alarm cannot carry a rang-at
    // marker.
    if alarm.enabled && alarm.rang_at_ms.is_some() {
        alarm.rang_at_ms = None;
    }

    if alarm.is_ringing {
        // It was mid-ring at teardown. The ring screen cannot be restored
        // retroactively; record when it rang instead.
        let rang_at = alarm
            .last_triggered_ms
            .unwrap_or_else(|| estimate_fire_ms(last_active_ms, now_ms, policy));
        alarm.is_ringing = false;
        alarm.enabled = false;
        alarm.rang_at_ms = Some(rang_at);
        return Ok(Some(ReconcileAction::Finalized {
            id: alarm.id.clone(),
            rang_at_ms: rang_at,
        }));
    }

    if alarm.enabled {
        if let Some(last_active) = last_active_ms {
            if let Some(occurrence) =
                alarm.missed_occurrence(ms_to_datetime(last_active), ms_to_datetime(now_ms))
            {
                let rang_at = datetime_to_ms(occurrence);
                alarm.enabled = false;
                alarm.rang_at_ms = Some(rang_at);
                return Ok(Some(ReconcileAction::MissedAlarm {
                    id: alarm.id.clone(),
                    rang_at_ms: rang_at,
                }));
            }
        }
    }

    Ok(None)
}

fn reconcile_timer(
    timer: &mut Timer,
    last_active_ms: Option<u64>,
    now_ms: u64,
    policy: &RecoveryPolicy,
) -> Result<Option<ReconcileAction>, CoreError> {
    if timer.is_ringing {
        let rang_at = timer
            .target_ms
            .unwrap_or_else(|| estimate_fire_ms(last_active_ms, now_ms, policy));
        timer.finalize_rang(rang_at);
        return Ok(Some(ReconcileAction::Finalized {
            id: timer.id.clone(),
            rang_at_ms: rang_at,
        }));
    }

    if !timer.is_running {
        return Ok(None);
    }

    let target = timer.target_ms.or(match timer.kind {
        TimerKind::CountToDate => timer.target_date_ms,
        TimerKind::Countdown => None,
    });
    let Some(target) = target else {
        return Err(CoreError::InvalidState(format!(
            "running timer '{}' has no target",
            timer.id
        )));
    };

    if target <= now_ms {
        // Its natural completion was missed while the process was away.
        timer.finalize_rang(target);
        Ok(Some(ReconcileAction::Finalized {
            id: timer.id.clone(),
            rang_at_ms: target,
        }))
    } else {
        // The absolute target survived the outage; resume against it.
        timer.target_ms = Some(target);
        timer.sync_remaining(now_ms);
        Ok(Some(ReconcileAction::Resumed {
            id: timer.id.clone(),
            target_ms: target,
        }))
    }
}

/// Best-effort fire instant for an entity persisted mid-ring without an
/// exact timestamp.
fn estimate_fire_ms(last_active_ms: Option<u64>, now_ms: u64, policy: &RecoveryPolicy) -> u64 {
    match last_active_ms {
        Some(last) if policy.estimate_missing_fire_time => {
            last.saturating_add(now_ms.saturating_sub(last) / 2)
        }
        Some(last) => last,
        None => now_ms,
    }
}

/// Merge builtin timer templates into the persisted collection by id,
/// without clobbering existing instances. Schema-evolution safety net for
/// snapshots written before a builtin was introduced.
fn seed_builtin_timers(store: &mut EntityStore, now_ms: u64, report: &mut ReconcileReport) {
    for template in defaults::builtin_timers(now_ms) {
        if store.builtin_timers.iter().any(|t| t.id == template.id) {
            continue;
        }
        report.record(ReconcileAction::Seeded {
            id: template.id.clone(),
        });
        store.builtin_timers.push(template);
    }
}
