//! # Chime Core Library
//!
//! Core scheduling and recovery logic for the Chime alarm/timer
//! application. The library is host-agnostic: rendering, audio playback
//! and toasts live behind collaborator traits, and the host drives the
//! engine by calling `tick()` once per time slice.
//!
//! ## Architecture
//!
//! - **Countdown engine**: running timers hold an absolute target
//!   timestamp; every tick recomputes the remaining time from it, so the
//!   countdown cannot drift and survives suspension
//! - **Ringing state machine**: completed entities ring until dismissed,
//!   snoozed or restarted; while a domain rings, the rest of that domain
//!   is locked against mutation
//! - **Recovery engine**: at startup, persisted state is reconciled
//!   against elapsed wall-clock time -- entities that should have fired
//!   while the process was not running are finalized with a "rang at"
//!   marker instead of replayed
//! - **Storage**: SQLite-backed key-value snapshots and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`Controller`]: single owner of all scheduling state
//! - [`Alarm`] / [`Timer`]: domain entities
//! - [`reconcile`](recovery::reconcile): the startup recovery pass
//! - [`Database`]: snapshot persistence

pub mod alarm;
pub mod clock;
pub mod controller;
pub mod defaults;
pub mod error;
pub mod events;
pub mod notify;
pub mod recovery;
pub mod ringing;
pub mod section;
pub mod sound;
pub mod stopwatch;
pub mod storage;
pub mod store;
pub mod timer;

pub use alarm::{Alarm, EntityOrigin};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{AlarmUpdate, Controller, SchedulerState, TimerUpdate};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{LogNotifier, MemoryNotifier, NotificationKind, Notifier, NullNotifier};
pub use recovery::{ReconcileAction, ReconcileReport, RecoveryPolicy};
pub use ringing::{Domain, RingingSet};
pub use section::Section;
pub use sound::{SoundBank, SoundPlayer, SoundRef, FALLBACK_SOUND_ID};
pub use stopwatch::Stopwatch;
pub use storage::{Config, Database, Gateway, MemoryGateway};
pub use store::EntityStore;
pub use timer::{Timer, TimerKind};
