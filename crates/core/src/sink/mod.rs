//! Result sink for failed records.
//!
//! All writes go through one [`SinkWriter`] task that owns the output file.
//! Workers hold cloned [`SinkHandle`]s and submit [`FailedRow`]s over a
//! channel, so rows are never interleaved. The writer flushes and closes
//! the file once every handle has been dropped.

mod config;
mod handle;
mod writer;

pub use config::{OutputMode, SinkConfig};
pub use handle::{FailedRow, SinkHandle};
pub use writer::{create_result_sink, SinkError, SinkWriter};
