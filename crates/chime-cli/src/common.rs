//! Shared CLI session plumbing.

use std::error::Error;

use chime_core::{Config, Controller, Database, Event, LogNotifier, SoundBank, SystemClock};

/// One CLI invocation is one process lifetime: open storage, reconcile
/// persisted state against elapsed wall-clock time, run a command, then
/// persist everything and stamp the last-active keys.
pub struct Session {
    db: Database,
    pub controller: Controller,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn Error>> {
        let db = Database::open()?;
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Config::default()
            }
        };
        let mut controller = Controller::new(
            config,
            Box::new(SystemClock),
            Box::new(SoundBank::builtin()),
            Box::new(LogNotifier),
        );
        controller.load(&db);
        let report = controller.reconcile();
        if !report.is_clean() {
            tracing::warn!(failed = report.failed, "reconciliation reported failures");
        }
        Ok(Self { db, controller })
    }

    /// Persist all state; the teardown stamp this writes is what the next
    /// invocation reconciles against.
    pub fn finish(self) -> Result<(), Box<dyn Error>> {
        self.controller.persist_all(&self.db)?;
        Ok(())
    }
}

pub fn print_event(event: &Event) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
