use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;

use super::config::{OutputMode, SinkConfig};
use super::handle::{FailedRow, SinkHandle};

/// Errors from the result sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The output file could not be created or opened.
    #[error("failed to open output {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A row could not be written or flushed.
    #[error("failed to write output {} at input line {line}: {source}", path.display())]
    Write {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },

    /// The writer stopped before this row could be submitted.
    #[error("result sink is closed, row from input line {line} was not written")]
    Closed { line: u64 },
}

/// Background task that owns the output file and writes failed rows to it.
pub struct SinkWriter {
    rx: mpsc::Receiver<FailedRow>,
    writer: csv::Writer<File>,
    path: PathBuf,
    flush_every: usize,
}

impl SinkWriter {
    /// Create a new sink writer over an opened output file
    pub fn new(
        rx: mpsc::Receiver<FailedRow>,
        file: File,
        path: PathBuf,
        delimiter: u8,
        flush_every: usize,
    ) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        Self {
            rx,
            writer,
            path,
            flush_every: flush_every.max(1),
        }
    }

    /// Run the writer, consuming rows until every handle is dropped
    ///
    /// This should be spawned as a background task. Returns the number of
    /// rows written. The file is flushed and closed on return.
    pub async fn run(mut self) -> Result<u64, SinkError> {
        tracing::info!("Result sink writing to {}", self.path.display());

        let mut written: u64 = 0;
        let mut unflushed: usize = 0;
        let mut last_line: u64 = 0;

        while let Some(row) = self.rx.recv().await {
            last_line = row.line;
            self.writer
                .write_record(&row.fields)
                .map_err(|source| SinkError::Write {
                    path: self.path.clone(),
                    line: row.line,
                    source,
                })?;
            written += 1;
            unflushed += 1;

            if unflushed >= self.flush_every {
                self.flush(row.line)?;
                unflushed = 0;
            }
        }

        self.flush(last_line)?;
        tracing::info!(
            "Result sink closed {}: {} rows written",
            self.path.display(),
            written
        );
        Ok(written)
    }

    fn flush(&mut self, line: u64) -> Result<(), SinkError> {
        self.writer.flush().map_err(|e| SinkError::Write {
            path: self.path.clone(),
            line,
            source: e.into(),
        })
    }
}

fn open_output(path: &Path, mode: OutputMode) -> Result<File, SinkError> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        OutputMode::Truncate => options.write(true).truncate(true),
        OutputMode::Append => options.append(true),
        OutputMode::Overwrite => options.write(true).truncate(false),
    };

    options.open(path).map_err(|source| SinkError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Open the output file and create a complete result sink
///
/// Returns:
/// - `SinkHandle` - for submitting rows (clone this to share across workers)
/// - `SinkWriter` - spawn this as a background task with `tokio::spawn(writer.run())`
///
/// # Arguments
/// * `config` - Output path, open mode and flush policy
/// * `delimiter` - Field delimiter, the same one the input uses
/// * `buffer_size` - Size of the channel buffer (submits wait if full)
pub fn create_result_sink(
    config: &SinkConfig,
    delimiter: u8,
    buffer_size: usize,
) -> Result<(SinkHandle, SinkWriter), SinkError> {
    let file = open_output(&config.path, config.mode)?;
    let (tx, rx) = mpsc::channel(buffer_size.max(1));
    let handle = SinkHandle::new(tx);
    let writer = SinkWriter::new(
        rx,
        file,
        config.path.clone(),
        delimiter,
        config.flush_every,
    );
    Ok((handle, writer))
}
