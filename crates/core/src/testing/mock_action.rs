//! Mock action for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::action::{Action, ActionError};
use crate::record::Record;

type FailPredicate = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// Mock implementation of the Action trait.
///
/// Provides controllable behavior for testing:
/// - Succeed, fail, or fail only for matching records
/// - Simulate latency, globally or for one input line
/// - Track calls, start times and peak concurrency for assertions
pub struct MockAction {
    fail_when: FailPredicate,
    error: String,
    delay: Duration,
    line_delays: HashMap<u64, Duration>,
    seen: Mutex<Vec<Record>>,
    start_times: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockAction {
    fn with_predicate(fail_when: FailPredicate, error: impl Into<String>) -> Self {
        Self {
            fail_when,
            error: error.into(),
            delay: Duration::ZERO,
            line_delays: HashMap::new(),
            seen: Mutex::new(Vec::new()),
            start_times: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// An action that succeeds for every record.
    pub fn succeeding() -> Self {
        Self::with_predicate(Box::new(|_| false), "")
    }

    /// An action that fails for every record with `error`.
    pub fn failing(error: impl Into<String>) -> Self {
        Self::with_predicate(Box::new(|_| true), error)
    }

    /// An action that fails with `error` for records matching `predicate`.
    pub fn failing_when<F>(predicate: F, error: impl Into<String>) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self::with_predicate(Box::new(predicate), error)
    }

    /// Sleep this long in every invocation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sleep this long when processing the record from input `line`.
    pub fn with_line_delay(mut self, line: u64, delay: Duration) -> Self {
        self.line_delays.insert(line, delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Records received so far, in invocation order.
    pub fn seen_records(&self) -> Vec<Record> {
        self.seen.lock().unwrap().clone()
    }

    /// When each invocation started, in invocation order.
    pub fn start_times(&self) -> Vec<Instant> {
        self.start_times.lock().unwrap().clone()
    }

    /// Highest number of simultaneous invocations observed.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Action for MockAction {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, record: &Record) -> Result<String, ActionError> {
        self.start_times.lock().unwrap().push(Instant::now());
        self.seen.lock().unwrap().push(record.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .line_delays
            .get(&record.line())
            .copied()
            .unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if (self.fail_when)(record) {
            Err(ActionError::new(self.error.clone()))
        } else {
            Ok(format!("processed line {}", record.line()))
        }
    }
}
