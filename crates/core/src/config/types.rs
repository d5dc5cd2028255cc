use serde::{Deserialize, Serialize};

use crate::action::CommandConfig;
use crate::monitor::MonitorConfig;
use crate::sink::SinkConfig;
use crate::source::SourceConfig;
use crate::worker::WorkerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: SourceConfig,
    pub output: SinkConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// External program run per record. Only the command-line wrapper uses it;
    /// library callers supply their own action.
    #[serde(default)]
    pub action: Option<CommandConfig>,
}
