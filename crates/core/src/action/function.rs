//! Closure-backed action.

use std::future::Future;

use async_trait::async_trait;

use super::error::ActionError;
use super::traits::Action;
use crate::record::Record;

/// Adapts an async closure into an [`Action`].
///
/// The closure receives an owned copy of the record so the returned future
/// can be `'static`.
///
/// ```ignore
/// let action = FnAction::new("upper", |record| async move {
///     Ok(record.fields().join(" ").to_uppercase())
/// });
/// ```
pub struct FnAction<F> {
    name: String,
    func: F,
}

impl<F, Fut> FnAction<F>
where
    F: Fn(Record) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ActionError>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

#[async_trait]
impl<F, Fut> Action for FnAction<F>
where
    F: Fn(Record) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ActionError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, record: &Record) -> Result<String, ActionError> {
        (self.func)(record.clone()).await
    }
}
