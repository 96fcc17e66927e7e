//! Elapsed-time stopwatch.
//!
//! Elapsed time is derived from an anchor timestamp plus an accumulator,
//! never advanced by tick deltas, so it stays correct across suspension
//! without any reconciliation step.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stopwatch {
    #[serde(default)]
    pub is_running: bool,
    /// Anchor timestamp of the current running span.
    #[serde(default)]
    pub started_ms: Option<u64>,
    /// Elapsed time accumulated before the current anchor.
    #[serde(default)]
    pub accumulated_ms: u64,
    #[serde(default)]
    pub laps_ms: Vec<u64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self, now_ms: u64) -> u64 {
        let running = self
            .started_ms
            .map(|start| now_ms.saturating_sub(start))
            .unwrap_or(0);
        self.accumulated_ms.saturating_add(running)
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        self.started_ms = Some(now_ms);
    }

    pub fn pause(&mut self, now_ms: u64) {
        if !self.is_running {
            return;
        }
        self.accumulated_ms = self.elapsed(now_ms);
        self.started_ms = None;
        self.is_running = false;
    }

    /// Record the current elapsed value as a lap and return it.
    pub fn lap(&mut self, now_ms: u64) -> u64 {
        let elapsed = self.elapsed(now_ms);
        self.laps_ms.push(elapsed);
        elapsed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_spans_pause_and_resume() {
        let mut sw = Stopwatch::new();
        sw.start(1_000);
        assert_eq!(sw.elapsed(4_000), 3_000);
        sw.pause(4_000);
        // Time passing while paused does not count.
        assert_eq!(sw.elapsed(10_000), 3_000);
        sw.start(10_000);
        assert_eq!(sw.elapsed(12_000), 5_000);
    }

    #[test]
    fn double_start_keeps_anchor() {
        let mut sw = Stopwatch::new();
        sw.start(1_000);
        sw.start(2_000);
        assert_eq!(sw.elapsed(3_000), 2_000);
    }

    #[test]
    fn laps_capture_elapsed() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        assert_eq!(sw.lap(1_500), 1_500);
        assert_eq!(sw.lap(4_000), 4_000);
        assert_eq!(sw.laps_ms, vec![1_500, 4_000]);
        sw.reset();
        assert_eq!(sw, Stopwatch::default());
    }
}
