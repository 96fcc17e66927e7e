//! Per-domain ringing bookkeeping.
//!
//! Each domain (alarms, timers) owns one [`RingingSet`]: the entities that
//! completed and are currently demanding user attention. The set stores
//! only back-references (entity ids) -- the entity record in the store
//! stays authoritative. While a set is non-empty the domain is *locked*:
//! mutating operations on any other entity of that domain are rejected
//! until the ringing entity is dismissed.
//!
//! Multiple entities may ring at once (stacked completions); the entry
//! with the newest firing timestamp is the one presented as active.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The alarm subsystem or the timer subsystem. Ringing exclusivity is
/// scoped per domain -- a ringing alarm does not block timer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Alarm,
    Timer,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Alarm => "alarm",
            Domain::Timer => "timer",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ringing entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingingEntry {
    /// Resolved sound id playing for this entity.
    pub sound: String,
    /// When the entity fired (epoch milliseconds).
    pub fired_at_ms: u64,
}

/// The set of currently-ringing entities in one domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RingingSet {
    entries: HashMap<String, RingingEntry>,
}

impl RingingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, sound: impl Into<String>, fired_at_ms: u64) {
        self.entries.insert(
            id.into(),
            RingingEntry {
                sound: sound.into(),
                fired_at_ms,
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> Option<RingingEntry> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while any entity rings; mutations of other entities in this
    /// domain must be rejected.
    pub fn locked(&self) -> bool {
        !self.entries.is_empty()
    }

    /// The most recently fired entry. Ties break on id so the result is
    /// deterministic.
    pub fn active(&self) -> Option<(&str, &RingingEntry)> {
        self.entries
            .iter()
            .max_by(|(a_id, a), (b_id, b)| {
                a.fired_at_ms
                    .cmp(&b.fired_at_ms)
                    .then_with(|| a_id.cmp(b_id))
            })
            .map(|(id, entry)| (id.as_str(), entry))
    }

    /// All ringing ids, newest first. Drives the secondary list view where
    /// stacked completions stay individually dismissible.
    pub fn ids_newest_first(&self) -> Vec<String> {
        let mut ids: Vec<(&String, &RingingEntry)> = self.entries.iter().collect();
        ids.sort_by(|(a_id, a), (b_id, b)| {
            b.fired_at_ms
                .cmp(&a.fired_at_ms)
                .then_with(|| b_id.cmp(a_id))
        });
        ids.into_iter().map(|(id, _)| id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_unlocked() {
        let set = RingingSet::new();
        assert!(!set.locked());
        assert!(set.active().is_none());
    }

    #[test]
    fn active_is_newest() {
        let mut set = RingingSet::new();
        set.insert("a", "bell", 1_000);
        set.insert("b", "bell", 3_000);
        set.insert("c", "bell", 2_000);

        let (id, entry) = set.active().unwrap();
        assert_eq!(id, "b");
        assert_eq!(entry.fired_at_ms, 3_000);
        assert_eq!(set.ids_newest_first(), vec!["b", "c", "a"]);
    }

    #[test]
    fn remove_unlocks_when_last() {
        let mut set = RingingSet::new();
        set.insert("a", "bell", 1_000);
        assert!(set.locked());
        assert!(set.remove("a").is_some());
        assert!(!set.locked());
        assert!(set.remove("a").is_none());
    }

    #[test]
    fn tie_on_fired_at_is_deterministic() {
        let mut set = RingingSet::new();
        set.insert("x", "bell", 1_000);
        set.insert("y", "bell", 1_000);
        assert_eq!(set.active().unwrap().0, "y");
    }
}
