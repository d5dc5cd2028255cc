//! Worker pool configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent workers. Must be positive.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Delay between consecutive worker starts (milliseconds).
    /// Worker N begins consuming N delays after the pool is created, which
    /// spreads the first requests against a rate-limited downstream.
    #[serde(default = "default_spawn_delay")]
    pub spawn_delay_ms: u64,
}

fn default_count() -> usize {
    4
}

fn default_spawn_delay() -> u64 {
    1000 // 1 second
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            spawn_delay_ms: default_spawn_delay(),
        }
    }
}

impl WorkerConfig {
    pub fn spawn_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_delay_ms)
    }

    /// How long worker `index` (0-based) waits before it starts.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn start_delay(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.spawn_delay().saturating_mul(index)
    }
}
