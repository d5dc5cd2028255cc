//! Trait definitions for the action module.

use async_trait::async_trait;

use super::error::ActionError;
use crate::record::Record;

/// A caller-supplied operation applied to every record.
#[async_trait]
pub trait Action: Send + Sync {
    /// Returns the name of this action, used in log lines.
    fn name(&self) -> &str;

    /// Executes the action on one record.
    ///
    /// Invoked exactly once per record. The harness applies no timeout and
    /// never retries.
    async fn execute(&self, record: &Record) -> Result<String, ActionError>;
}

/// Classified result of one action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(ActionError),
}

impl From<Result<String, ActionError>> for Outcome {
    fn from(result: Result<String, ActionError>) -> Self {
        match result {
            Ok(message) => Outcome::Success(message),
            Err(error) => Outcome::Failure(error),
        }
    }
}
