//! Record source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Newline-delimited input file.
    pub path: PathBuf,

    /// Field separator. Must be a single ASCII character.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    ",".to_string()
}

impl SourceConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: default_separator(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The separator as a byte, if it is exactly one ASCII character.
    pub fn separator_byte(&self) -> Option<u8> {
        match self.separator.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}
