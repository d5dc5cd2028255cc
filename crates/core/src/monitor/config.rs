//! Progress monitor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the progress monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tick interval in seconds. Also the idle window.
    #[serde(default = "default_idle_interval")]
    pub idle_interval_secs: u64,

    /// End the run when a tick sees no progress.
    /// When disabled, the monitor only logs and the run ends at end of input.
    #[serde(default = "default_idle_detection")]
    pub idle_detection: bool,
}

fn default_idle_interval() -> u64 {
    5
}

fn default_idle_detection() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            idle_interval_secs: default_idle_interval(),
            idle_detection: default_idle_detection(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }
}
