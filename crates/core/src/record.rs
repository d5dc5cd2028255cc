//! Records parsed from delimited input lines.

use std::fmt;

/// One unit of work: the fields of a single non-empty input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: u64,
    fields: Vec<String>,
}

impl Record {
    /// Create a record from already-split fields.
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Split `text` on `separator`.
    ///
    /// Returns `None` for an empty line. No quoting or escaping is applied.
    pub fn parse(line: u64, text: &str, separator: &str) -> Option<Self> {
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text.is_empty() {
            return None;
        }
        let fields = text.split(separator).map(String::from).collect();
        Some(Self { line, fields })
    }

    /// 1-based line number in the input file.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the record, appending `error` as a trailing field.
    pub fn into_failed_row(self, error: impl Into<String>) -> Vec<String> {
        let mut row = self.fields;
        row.push(error.into());
        row
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{}]", self.line, self.fields.join(", "))
    }
}
