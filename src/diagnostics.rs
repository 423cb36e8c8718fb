//! Runtime diagnostics for the sampling path.
//!
//! Counts the outcome of every sampling period so a flaky bus shows up in
//! the logs long before the display goes stale. Counters are lock-free so
//! any activity can take a snapshot.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::SensorError;

/// Sample outcome counters.
#[derive(Debug, Default)]
pub struct SampleStats {
    ok: AtomicU32,
    not_ready: AtomicU32,
    faults: AtomicU32,
    consecutive_faults: AtomicU32,
}

impl SampleStats {
    pub const fn new() -> Self {
        Self {
            ok: AtomicU32::new(0),
            not_ready: AtomicU32::new(0),
            faults: AtomicU32::new(0),
            consecutive_faults: AtomicU32::new(0),
        }
    }

    pub fn record_ok(&self) {
        self.ok.fetch_add(1, Ordering::Relaxed);
        self.consecutive_faults.store(0, Ordering::Relaxed);
    }

    /// Record a failed read. Returns the length of the current fault run
    /// (0 for `NotReady`, which does not break or extend a run).
    pub fn record_error(&self, err: SensorError) -> u32 {
        if err.is_fault() {
            self.faults.fetch_add(1, Ordering::Relaxed);
            self.consecutive_faults.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.not_ready.fetch_add(1, Ordering::Relaxed);
            0
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ok: self.ok.load(Ordering::Relaxed),
            not_ready: self.not_ready.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            consecutive_faults: self.consecutive_faults.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`SampleStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ok: u32,
    pub not_ready: u32,
    pub faults: u32,
    pub consecutive_faults: u32,
}

impl StatsSnapshot {
    pub fn total(&self) -> u32 {
        self.ok
            .saturating_add(self.not_ready)
            .saturating_add(self.faults)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ok={} not_ready={} faults={} (run={})",
            self.ok, self.not_ready, self.faults, self.consecutive_faults
        )
    }
}
