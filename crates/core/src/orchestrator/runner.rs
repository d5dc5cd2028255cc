//! Batch run orchestrator implementation.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::action::Action;
use crate::config::{validate_config, Config, ConfigError};
use crate::monitor::{MonitorExit, ProgressMonitor};
use crate::sink::create_result_sink;
use crate::source::RecordSource;
use crate::stats::Statistics;
use crate::worker::{dispatch_conduit, WorkerPool};

use super::types::{Completion, OrchestratorError, RunSummary};

/// Runs one batch: every record of the input through the action.
pub struct Orchestrator {
    config: Config,
    action: Arc<dyn Action>,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(config: Config, action: Arc<dyn Action>) -> Self {
        Self { config, action }
    }

    /// Run to completion.
    ///
    /// Returns once the input is drained or the monitor declares the run
    /// idle, and every worker has acknowledged shutdown. Fatal input/output
    /// errors abort the run; the output file is left as written so far.
    pub async fn run(self) -> Result<RunSummary, OrchestratorError> {
        validate_config(&self.config)?;
        let delimiter = self.config.input.separator_byte().ok_or_else(|| {
            ConfigError::ValidationError("input.separator must be one ASCII character".to_string())
        })?;

        let (sink, sink_writer) =
            create_result_sink(&self.config.output, delimiter, self.config.workers.count)?;
        let source = RecordSource::open(&self.config.input).await?;

        info!(
            "Processing {} -> {} with {} workers",
            self.config.input.path.display(),
            self.config.output.path.display(),
            self.config.workers.count
        );

        let mut writer_task = tokio::spawn(sink_writer.run());
        let stats = Arc::new(Statistics::new());
        let (shutdown_tx, _) = broadcast::channel(1);
        let (record_tx, record_rx) = dispatch_conduit();

        let pool = WorkerPool::spawn(
            &self.config.workers,
            Arc::clone(&self.action),
            record_rx,
            Arc::clone(&stats),
            sink,
            &shutdown_tx,
        );

        let mut source_task = tokio::spawn(source.run(record_tx, shutdown_tx.subscribe()));

        let monitor = ProgressMonitor::new(self.config.monitor.clone(), Arc::clone(&stats));
        let mut monitor_task = tokio::spawn(monitor.run(shutdown_tx.subscribe()));

        let pool_done = pool.join();
        tokio::pin!(pool_done);

        let mut source_result: Option<Result<u64, OrchestratorError>> = None;
        let mut monitor_finished = false;
        let mut pool_total: Option<u64> = None;
        let mut writer_result: Option<Result<u64, OrchestratorError>> = None;

        let completion = loop {
            tokio::select! {
                res = &mut source_task, if source_result.is_none() => {
                    let res = joined("record source", res);
                    let failed = res.is_err();
                    source_result = Some(res);
                    if failed {
                        break None;
                    }
                }
                res = &mut writer_task, if writer_result.is_none() => {
                    let res = joined("result sink", res);
                    let failed = res.is_err();
                    writer_result = Some(res);
                    if failed {
                        error!("Result sink stopped, aborting the run");
                        break None;
                    }
                }
                total = &mut pool_done => {
                    pool_total = Some(total);
                    break Some(Completion::Drained);
                }
                exit = &mut monitor_task, if !monitor_finished => {
                    monitor_finished = true;
                    match exit {
                        Ok(MonitorExit::Idle) => break Some(Completion::Idle),
                        Ok(MonitorExit::Stopped) => warn!("Progress monitor stopped early"),
                        Err(e) => error!("Progress monitor task failed: {}", e),
                    }
                }
            }
        };

        if completion == Some(Completion::Idle) {
            warn!("Stopping on idle timeout; in-flight records will finish, undispatched records are skipped");
        }

        info!("Shutting down workers");
        let _ = shutdown_tx.send(());

        let processed = match pool_total {
            Some(total) => total,
            None => pool_done.await,
        };
        let source_result = match source_result {
            Some(res) => res,
            None => joined("record source", source_task.await),
        };
        if !monitor_finished {
            if let Err(e) = monitor_task.await {
                error!("Progress monitor task failed: {}", e);
            }
        }

        // Workers held the only sink handles; the writer drains and closes now.
        let writer_result = match writer_result {
            Some(res) => res,
            None => joined("result sink", writer_task.await),
        };

        let records_read = source_result?;
        let rows_written = writer_result?;
        let snapshot = stats.snapshot();

        let summary = RunSummary {
            stats: snapshot,
            completion: completion.unwrap_or(Completion::Drained),
            records_read,
            rows_written,
        };

        info!("{}", summary.stats);
        info!(
            "Run finished ({}): {} records read, {} processed, {} rows written",
            summary.completion, records_read, processed, rows_written
        );

        Ok(summary)
    }
}

/// Flatten a task's join result and its own error.
fn joined<T, E>(
    task: &'static str,
    result: Result<Result<T, E>, JoinError>,
) -> Result<T, OrchestratorError>
where
    E: Into<OrchestratorError>,
{
    match result {
        Ok(inner) => inner.map_err(Into::into),
        Err(e) => Err(OrchestratorError::TaskFailed {
            task,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::monitor::MonitorConfig;
    use crate::sink::{SinkConfig, SinkError};
    use crate::source::{SourceConfig, SourceError};
    use crate::testing::MockAction;
    use crate::worker::WorkerConfig;

    fn config_in(dir: &TempDir, input: &str) -> Config {
        let input_path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&input_path).unwrap();
        file.write_all(input.as_bytes()).unwrap();

        Config {
            input: SourceConfig::new(input_path),
            output: SinkConfig::new(dir.path().join("failed.csv")),
            workers: WorkerConfig {
                count: 2,
                spawn_delay_ms: 0,
            },
            monitor: MonitorConfig {
                idle_interval_secs: 5,
                idle_detection: true,
            },
            action: None,
        }
    }

    #[tokio::test]
    async fn test_run_drains_input() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "a,1\nb,2\nc,3\n");
        let action = Arc::new(MockAction::succeeding());

        let summary = Orchestrator::new(config, action.clone()).run().await.unwrap();

        assert_eq!(summary.completion, Completion::Drained);
        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.rows_written, 0);
        assert_eq!(summary.stats.total_processed, 3);
        assert_eq!(action.call_count(), 3);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, "a\n");
        config.workers.count = 0;

        let result = Orchestrator::new(config, Arc::new(MockAction::succeeding()))
            .run()
            .await;
        assert!(matches!(result, Err(OrchestratorError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_missing_input_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, "");
        config.input.path = dir.path().join("missing.csv");

        let result = Orchestrator::new(config, Arc::new(MockAction::succeeding()))
            .run()
            .await;
        assert!(matches!(
            result,
            Err(OrchestratorError::Source(SourceError::Open { .. }))
        ));
    }

    #[tokio::test]
    async fn test_run_uncreatable_output_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, "a\n");
        config.output.path = dir.path().join("no/such/dir/failed.csv");

        let result = Orchestrator::new(config, Arc::new(MockAction::succeeding()))
            .run()
            .await;
        assert!(matches!(result, Err(OrchestratorError::Sink(_))));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_run_stops_when_output_cannot_be_written() {
        let dir = TempDir::new().unwrap();
        let input: String = (1..=20).map(|i| format!("user{},x\n", i)).collect();
        let mut config = config_in(&dir, &input);
        config.workers.count = 1;
        config.output.path = "/dev/full".into();

        let action = Arc::new(MockAction::failing("E").with_delay(Duration::from_millis(20)));
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            Orchestrator::new(config, action.clone()).run(),
        )
        .await
        .expect("a dead sink should end the run");

        assert!(matches!(
            result,
            Err(OrchestratorError::Sink(SinkError::Write { line: 1, .. }))
        ));
        assert!(action.call_count() < 5, "ran {} actions", action.call_count());
    }

    #[tokio::test]
    async fn test_run_empty_input_drains_immediately() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, "\n\n");

        let summary = tokio::time::timeout(
            Duration::from_secs(2),
            Orchestrator::new(config, Arc::new(MockAction::succeeding())).run(),
        )
        .await
        .expect("empty input should not wait for the idle timeout")
        .unwrap();

        assert_eq!(summary.completion, Completion::Drained);
        assert_eq!(summary.records_read, 0);
        assert_eq!(summary.stats.total_processed, 0);
    }
}
