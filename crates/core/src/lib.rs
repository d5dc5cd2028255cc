pub mod action;
pub mod config;
pub mod monitor;
pub mod orchestrator;
pub mod record;
pub mod sink;
pub mod source;
pub mod stats;
pub mod testing;
pub mod worker;

pub use action::{Action, ActionError, CommandAction, CommandConfig, FnAction, Outcome};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CONFIG_PATH_ENV,
    ENV_PREFIX,
};
pub use monitor::{IdleDetector, MonitorConfig, MonitorExit, MonitorState, ProgressMonitor};
pub use orchestrator::{Completion, Orchestrator, OrchestratorError, RunSummary};
pub use record::Record;
pub use sink::{
    create_result_sink, FailedRow, OutputMode, SinkConfig, SinkError, SinkHandle, SinkWriter,
};
pub use source::{RecordSource, SourceConfig, SourceError};
pub use stats::{Statistics, StatsSnapshot};
pub use worker::{dispatch_conduit, RecordReceiver, RecordSender, WorkerConfig, WorkerPool};
