//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use batchflow_core::testing::MockAction;
//!
//! let action = Arc::new(MockAction::failing_when(|r| r.fields()[0] == "bad", "rejected"));
//! let summary = Orchestrator::new(config, action.clone()).run().await?;
//!
//! assert_eq!(action.call_count(), 3);
//! assert!(action.peak_concurrency() <= 2);
//! ```

mod mock_action;

pub use mock_action::MockAction;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::config::Config;
    use crate::monitor::MonitorConfig;
    use crate::sink::SinkConfig;
    use crate::source::SourceConfig;
    use crate::worker::WorkerConfig;

    /// Write `lines` to `dir/name`, one per line, and return the path.
    pub fn input_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut contents = lines.join("\n");
        contents.push('\n');
        std::fs::write(&path, contents).expect("write input fixture");
        path
    }

    /// A config suitable for fast tests: no spawn delay, 1 second idle window.
    pub fn config(input: impl Into<PathBuf>, output: impl Into<PathBuf>, workers: usize) -> Config {
        Config {
            input: SourceConfig::new(input),
            output: SinkConfig::new(output),
            workers: WorkerConfig {
                count: workers,
                spawn_delay_ms: 0,
            },
            monitor: MonitorConfig {
                idle_interval_secs: 1,
                idle_detection: true,
            },
            action: None,
        }
    }

    /// Read a result sink file back as rows of fields.
    pub fn read_rows(path: &Path, delimiter: u8) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .expect("open result file");
        reader
            .records()
            .map(|r| {
                r.expect("parse result row")
                    .iter()
                    .map(String::from)
                    .collect()
            })
            .collect()
    }
}
