//! Record source: streams delimited lines from a file into the dispatch conduit.

mod config;
mod reader;

pub use config::SourceConfig;
pub use reader::{RecordSource, SourceError};
