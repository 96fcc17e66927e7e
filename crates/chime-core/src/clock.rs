//! Wall-clock facade.
//!
//! Every time read in the core goes through [`Clock`], so countdown and
//! recovery logic can be driven by a settable clock in tests instead of
//! real sleeps. Public types carry `DateTime<Utc>`; the arithmetic-heavy
//! paths work in epoch milliseconds.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> u64 {
        datetime_to_ms(self.now())
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and embedding hosts that drive time themselves.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(epoch_ms: u64) -> Self {
        Self {
            epoch_ms: AtomicU64::new(epoch_ms),
        }
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::new(datetime_to_ms(instant))
    }

    pub fn set_ms(&self, epoch_ms: u64) {
        self.epoch_ms.store(epoch_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.epoch_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ms_to_datetime(self.epoch_ms.load(Ordering::SeqCst))
    }

    fn now_ms(&self) -> u64 {
        self.epoch_ms.load(Ordering::SeqCst)
    }
}

/// Convert epoch milliseconds to `DateTime<Utc>`.
pub fn ms_to_datetime(ms: u64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Convert `DateTime<Utc>` to epoch milliseconds, clamping pre-epoch
/// instants to zero.
pub fn datetime_to_ms(instant: DateTime<Utc>) -> u64 {
    instant.timestamp_millis().max(0) as u64
}
