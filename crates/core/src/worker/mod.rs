//! Worker pool and the dispatch conduit that feeds it.
//!
//! The record source pushes into a single-slot conduit; every worker pulls
//! from a clone of the same receiver, so whichever worker is free takes the
//! next record. Workers stop when the conduit is closed and drained, or when
//! the shutdown signal fires between two records.

mod conduit;
mod config;
mod pool;

pub use conduit::{dispatch_conduit, RecordReceiver, RecordSender, CONDUIT_CAPACITY};
pub use config::WorkerConfig;
pub use pool::WorkerPool;
