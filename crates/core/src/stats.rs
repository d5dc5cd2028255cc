//! Shared progress counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::action::Outcome;

/// Process-wide counters shared by every worker and the progress monitor.
///
/// `total_processed` is always incremented before the outcome counter, and
/// snapshots load the outcome counters before `total_processed`, so every
/// snapshot satisfies `succeeded + failed <= total_processed`.
#[derive(Debug)]
pub struct Statistics {
    started_at: Instant,
    total_processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Create a new counter set with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_processed: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Count one completed action.
    pub fn record(&self, outcome: &Outcome) {
        self.total_processed.fetch_add(1, Ordering::SeqCst);
        match outcome {
            Outcome::Success(_) => self.succeeded.fetch_add(1, Ordering::SeqCst),
            Outcome::Failure(_) => self.failed.fetch_add(1, Ordering::SeqCst),
        };
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed.load(Ordering::SeqCst)
    }

    /// Read a consistent view of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let succeeded = self.succeeded.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);
        let total_processed = self.total_processed.load(Ordering::SeqCst);

        StatsSnapshot {
            total_processed,
            succeeded,
            failed,
            elapsed: self.started_at.elapsed(),
        }
    }
}

/// Point-in-time copy of [`Statistics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total_processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    /// Records per second since start, rounded to the nearest integer.
    pub fn throughput(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0;
        }
        (self.total_processed as f64 / secs).round() as u64
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean velocity: {} rec/s -- Index: {} records -- Success: {} records -- Failed: {} records",
            self.throughput(),
            self.total_processed,
            self.succeeded,
            self.failed
        )
    }
}
