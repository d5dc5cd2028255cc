//! Types for the batch run orchestrator.

use std::fmt;

use thiserror::Error;

use crate::stats::StatsSnapshot;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Input could not be opened or read.
    #[error("input error: {0}")]
    Source(#[from] crate::source::SourceError),

    /// Output could not be opened or written.
    #[error("output error: {0}")]
    Sink(#[from] crate::sink::SinkError),

    /// A background task panicked or was cancelled.
    #[error("{task} task failed: {reason}")]
    TaskFailed { task: &'static str, reason: String },
}

/// How the run decided it was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The input ended and every worker drained the conduit.
    Drained,
    /// The progress monitor saw no completed record for a full interval.
    Idle,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Drained => write!(f, "input drained"),
            Completion::Idle => write!(f, "idle timeout"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Final counters, taken after every worker exited.
    pub stats: StatsSnapshot,
    pub completion: Completion,
    /// Records the source pushed into the conduit.
    pub records_read: u64,
    /// Rows written to the result sink.
    pub rows_written: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}; {} records read, {} rows written)",
            self.stats, self.completion, self.records_read, self.rows_written
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::from(ConfigError::ValidationError(
            "workers.count cannot be 0".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "invalid configuration: Configuration validation failed: workers.count cannot be 0"
        );

        let err = OrchestratorError::TaskFailed {
            task: "record source",
            reason: "panicked".to_string(),
        };
        assert_eq!(err.to_string(), "record source task failed: panicked");
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            stats: StatsSnapshot {
                total_processed: 4,
                succeeded: 3,
                failed: 1,
                elapsed: Duration::from_secs(2),
            },
            completion: Completion::Drained,
            records_read: 4,
            rows_written: 1,
        };
        assert_eq!(
            summary.to_string(),
            "Mean velocity: 2 rec/s -- Index: 4 records -- Success: 3 records -- Failed: 1 records \
             (input drained; 4 records read, 1 rows written)"
        );
    }
}
