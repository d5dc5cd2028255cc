//! Result sink configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How an existing output file is treated when the sink opens it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Create the file or truncate it to zero length.
    #[default]
    Truncate,
    /// Create the file or append after its existing content.
    Append,
    /// Create the file or write from offset 0 without truncating.
    ///
    /// If the previous content was longer than what this run writes, its
    /// trailing bytes remain in the file.
    Overwrite,
}

/// Configuration for the failed-record output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Output file for failed records.
    pub path: PathBuf,

    /// Open mode for an existing file.
    #[serde(default)]
    pub mode: OutputMode,

    /// Flush after this many rows. 1 flushes after every row.
    #[serde(default = "default_flush_every")]
    pub flush_every: usize,
}

fn default_flush_every() -> usize {
    1
}

impl SinkConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: OutputMode::default(),
            flush_every: default_flush_every(),
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SinkConfig::new("out.csv");
        assert_eq!(config.mode, OutputMode::Truncate);
        assert_eq!(config.flush_every, 1);
    }

    #[test]
    fn test_deserialize_modes() {
        for (raw, mode) in [
            ("truncate", OutputMode::Truncate),
            ("append", OutputMode::Append),
            ("overwrite", OutputMode::Overwrite),
        ] {
            let toml = format!("path = \"out.csv\"\nmode = \"{}\"", raw);
            let config: SinkConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.mode, mode);
        }
    }
}
