//! Fixed-size pool of record workers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::conduit::RecordReceiver;
use super::config::WorkerConfig;
use crate::action::{Action, Outcome};
use crate::record::Record;
use crate::sink::{FailedRow, SinkError, SinkHandle};
use crate::stats::Statistics;

/// Everything a worker shares with its siblings.
#[derive(Clone)]
struct WorkerContext {
    action: Arc<dyn Action>,
    conduit: RecordReceiver,
    stats: Arc<Statistics>,
    sink: SinkHandle,
}

/// A running set of workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl WorkerPool {
    /// Spawn `config.count` workers consuming from `conduit`.
    ///
    /// Every worker subscribes to `shutdown_tx` before this returns, so a
    /// signal sent at any later point reaches all of them.
    pub fn spawn(
        config: &WorkerConfig,
        action: Arc<dyn Action>,
        conduit: RecordReceiver,
        stats: Arc<Statistics>,
        sink: SinkHandle,
        shutdown_tx: &broadcast::Sender<()>,
    ) -> Self {
        let ctx = WorkerContext {
            action,
            conduit,
            stats,
            sink,
        };

        info!(
            "Starting {} workers ({}ms apart) for action {}",
            config.count,
            config.spawn_delay_ms,
            ctx.action.name()
        );

        let handles = (0..config.count)
            .map(|id| {
                let ctx = ctx.clone();
                let start_delay = config.start_delay(id);
                let shutdown_rx = shutdown_tx.subscribe();
                tokio::spawn(run_worker(id, start_delay, ctx, shutdown_rx))
            })
            .collect();

        Self {
            handles,
            shutdown_tx: shutdown_tx.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ask every worker to stop after its current record.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Wait for every worker to exit. Returns the number of records they
    /// processed in total.
    pub async fn join(self) -> u64 {
        let mut total = 0;
        for (id, result) in join_all(self.handles).await.into_iter().enumerate() {
            match result {
                Ok(processed) => total += processed,
                Err(e) => error!("Worker {} terminated abnormally: {}", id, e),
            }
        }
        total
    }
}

async fn run_worker(
    id: usize,
    start_delay: Duration,
    ctx: WorkerContext,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> u64 {
    if !start_delay.is_zero() {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("Worker {} cancelled before start", id);
                return 0;
            }
            _ = tokio::time::sleep(start_delay) => {}
        }
    }

    debug!("Worker {} started", id);
    let mut processed: u64 = 0;

    loop {
        let record = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                debug!("Worker {} received shutdown signal", id);
                break;
            }
            next = ctx.conduit.recv() => match next {
                Ok(record) => record,
                Err(_) => {
                    debug!("Worker {} found the conduit drained", id);
                    break;
                }
            },
        };

        let persisted = process_record(id, &ctx, record).await;
        processed += 1;
        if let Err(e) = persisted {
            error!("Worker {} stopping: {}", id, e);
            break;
        }
    }

    debug!("Worker {} stopped after {} records", id, processed);
    processed
}

/// Run the action on one record and persist it if it failed.
///
/// An error means the sink writer is gone; no later failure could be stored.
async fn process_record(id: usize, ctx: &WorkerContext, record: Record) -> Result<(), SinkError> {
    let line = record.line();
    let outcome = Outcome::from(ctx.action.execute(&record).await);
    ctx.stats.record(&outcome);

    let persisted = match outcome {
        Outcome::Success(message) => {
            info!("Worker {} line {}: response: {}", id, line, message);
            Ok(())
        }
        Outcome::Failure(err) => {
            warn!("Worker {} line {}: action error: {}", id, line, err);
            ctx.sink.submit(FailedRow::new(record, err.message())).await
        }
    };

    info!("{}", ctx.stats.snapshot());
    persisted
}
