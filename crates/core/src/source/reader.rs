//! Line reader feeding the dispatch conduit.

use std::path::PathBuf;

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::config::SourceConfig;
use crate::record::Record;
use crate::worker::RecordSender;

/// Fatal input errors. Either one aborts the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open input {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read input {} after line {line}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: u64,
        source: std::io::Error,
    },
}

/// A lazy, finite, non-restartable stream of records from one file.
pub struct RecordSource {
    path: PathBuf,
    separator: String,
    reader: BufReader<File>,
}

impl RecordSource {
    /// Open the input file.
    pub async fn open(config: &SourceConfig) -> Result<Self, SourceError> {
        let file = File::open(&config.path)
            .await
            .map_err(|source| SourceError::Open {
                path: config.path.clone(),
                source,
            })?;

        Ok(Self {
            path: config.path.clone(),
            separator: config.separator.clone(),
            reader: BufReader::new(file),
        })
    }

    /// Push every non-empty line onto the conduit, one at a time.
    ///
    /// Each send waits until a worker has room to take the record. The
    /// conduit is closed when this returns, because `tx` is dropped; that is
    /// the end-of-stream signal for the workers. Returns the number of
    /// records dispatched.
    pub async fn run(
        self,
        tx: RecordSender,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<u64, SourceError> {
        info!("Reading records from {}", self.path.display());

        let mut lines = self.reader.lines();
        let mut line_no: u64 = 0;
        let mut dispatched: u64 = 0;

        loop {
            let text = match lines.next_line().await {
                Ok(Some(text)) => text,
                Ok(None) => break,
                Err(source) => {
                    return Err(SourceError::Read {
                        path: self.path,
                        line: line_no,
                        source,
                    })
                }
            };
            line_no += 1;

            let Some(record) = Record::parse(line_no, &text, &self.separator) else {
                debug!("Skipping empty line {}", line_no);
                continue;
            };

            // str::split always yields at least one field, so this never fires.
            if record.is_empty() {
                warn!("Ignored record without fields at line {}: {:?}", line_no, text);
                continue;
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Record source received shutdown signal at line {}", line_no);
                    break;
                }
                sent = tx.send(record) => {
                    if sent.is_err() {
                        warn!("Dispatch conduit closed, stopping at line {}", line_no);
                        break;
                    }
                    dispatched += 1;
                }
            }
        }

        info!(
            "Finished reading {}: {} records dispatched",
            self.path.display(),
            dispatched
        );
        Ok(dispatched)
    }
}
