//! Batch run orchestrator.
//!
//! Wires the pipeline together and blocks until the run completes:
//! - **Result sink**: opened first, single writer task
//! - **Worker pool**: `workers.count` workers, staggered start
//! - **Record source**: reads the input into the single-slot conduit
//! - **Progress monitor**: periodic progress lines and idle detection
//!
//! A run completes when the workers drain the closed conduit, or when the
//! monitor sees a full idle interval. Either way every task is then shut
//! down cooperatively and joined before [`Orchestrator::run`] returns.

mod runner;
mod types;

pub use runner::Orchestrator;
pub use types::{Completion, OrchestratorError, RunSummary};
