//! Test registry - every test case created, in creation order

use crate::test_case::TestCase;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// Append-only ordered collection of test cases.
///
/// Entries are never removed; the aggregate summary reads them back in the
/// order they were registered.
#[derive(Debug, Default)]
pub struct Registry {
    cases: Mutex<Vec<Arc<TestCase>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`crate::Harness::global`]
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    pub fn register(&self, case: Arc<TestCase>) {
        let mut cases = self.cases.lock();
        tracing::debug!(test = case.name(), position = cases.len(), "registered test case");
        cases.push(case);
    }

    /// All registered cases in creation order
    pub fn get_all(&self) -> Vec<Arc<TestCase>> {
        self.cases.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.cases.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.lock().is_empty()
    }
}
