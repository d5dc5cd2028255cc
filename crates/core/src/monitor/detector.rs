//! Idle detection state machine and the periodic monitor task.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::config::MonitorConfig;
use crate::stats::Statistics;

/// Monitor state. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Running,
    Done,
}

/// Compares the processed count between consecutive ticks.
#[derive(Debug)]
pub struct IdleDetector {
    last_observed: u64,
    state: MonitorState,
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleDetector {
    pub fn new() -> Self {
        Self {
            last_observed: 0,
            state: MonitorState::Running,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Feed the processed count seen at one tick.
    pub fn observe(&mut self, total_processed: u64) -> MonitorState {
        if self.state == MonitorState::Done {
            return MonitorState::Done;
        }

        if total_processed == self.last_observed {
            self.state = MonitorState::Done;
        } else {
            self.last_observed = total_processed;
        }
        self.state
    }
}

/// Why the monitor task returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// A full interval passed with no completed record.
    Idle,
    /// The shutdown signal fired first.
    Stopped,
}

/// Periodic task that logs progress and detects idleness.
pub struct ProgressMonitor {
    config: MonitorConfig,
    stats: Arc<Statistics>,
}

impl ProgressMonitor {
    pub fn new(config: MonitorConfig, stats: Arc<Statistics>) -> Self {
        Self { config, stats }
    }

    /// Tick until idle or shut down.
    ///
    /// The first tick happens one full interval after start.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> MonitorExit {
        let period = self.config.interval();
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // Skip first immediate tick

        let mut detector = IdleDetector::new();
        debug!("Progress monitor started ({:?} interval)", period);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Progress monitor received shutdown signal");
                    return MonitorExit::Stopped;
                }
                _ = ticker.tick() => {
                    let snapshot = self.stats.snapshot();
                    if !self.config.idle_detection {
                        info!("{}", snapshot);
                        continue;
                    }

                    match detector.observe(snapshot.total_processed) {
                        MonitorState::Running => info!("{}", snapshot),
                        MonitorState::Done => {
                            warn!(
                                "No record completed in the last {:?}, assuming the input is exhausted",
                                period
                            );
                            info!("{}", snapshot);
                            return MonitorExit::Idle;
                        }
                    }
                }
            }
        }
    }
}
