use tokio::sync::mpsc;

use super::writer::SinkError;
use crate::record::Record;

/// A failed record ready to be written: its fields plus the error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRow {
    /// Input line the record came from.
    pub line: u64,
    pub fields: Vec<String>,
}

impl FailedRow {
    /// Build the output row for `record`, appending `error` as the last field.
    pub fn new(record: Record, error: impl Into<String>) -> Self {
        let line = record.line();
        Self {
            line,
            fields: record.into_failed_row(error),
        }
    }
}

/// Handle for submitting failed rows to the sink writer.
///
/// This is cheaply cloneable and can be shared across workers.
/// The writer keeps running until every clone has been dropped.
#[derive(Clone)]
pub struct SinkHandle {
    tx: mpsc::Sender<FailedRow>,
}

impl SinkHandle {
    /// Create a new sink handle from a channel sender
    pub fn new(tx: mpsc::Sender<FailedRow>) -> Self {
        Self { tx }
    }

    /// Submit a row, waiting if the channel is full.
    ///
    /// Fails only if the writer has stopped.
    pub async fn submit(&self, row: FailedRow) -> Result<(), SinkError> {
        self.tx.send(row).await.map_err(|e| SinkError::Closed {
            line: e.0.line,
        })
    }
}
