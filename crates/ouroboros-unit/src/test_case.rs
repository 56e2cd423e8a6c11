//! Test case records and the handle passed to test bodies

use crate::console::Console;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pass/fail counters of a test case at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Assertions that passed
    pub passed: u32,
    /// Assertions that failed
    pub failed: u32,
}

impl Counts {
    pub fn new(passed: u32, failed: u32) -> Self {
        Self { passed, failed }
    }

    /// Number of assertions evaluated
    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Percentage of assertions passing, 100 when nothing has failed
    pub fn percent_passing(&self) -> f64 {
        if self.failed == 0 {
            return 100.0;
        }
        // multiply first so 9/10 lands on exactly 90.0
        f64::from(self.passed) * 100.0 / f64::from(self.total())
    }
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            passed: self.passed + rhs.passed,
            failed: self.failed + rhs.failed,
        }
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), |acc, c| acc + c)
    }
}

/// A named pass/fail counter record
#[derive(Debug)]
pub struct TestCase {
    name: String,
    counts: Mutex<Counts>,
}

impl TestCase {
    /// Create a test case with zeroed counters.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "test case name must not be empty");
        Self {
            name,
            counts: Mutex::new(Counts::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the counters
    pub fn counts(&self) -> Counts {
        *self.counts.lock()
    }

    pub fn passed(&self) -> u32 {
        self.counts.lock().passed
    }

    pub fn failed(&self) -> u32 {
        self.counts.lock().failed
    }

    /// Apply one assertion outcome, returning its 0-based sequence index
    pub(crate) fn record(&self, passed: bool) -> u32 {
        let mut counts = self.counts.lock();
        let index = counts.total();
        if passed {
            counts.passed += 1;
        } else {
            counts.failed += 1;
        }
        index
    }
}

/// Handle to a registered test case, bound to the console it reports to.
///
/// Cloning is cheap; all clones refer to the same counters.
#[derive(Debug, Clone)]
pub struct TestHandle {
    pub(crate) case: Arc<TestCase>,
    pub(crate) console: Arc<Console>,
}

impl TestHandle {
    pub(crate) fn new(case: Arc<TestCase>, console: Arc<Console>) -> Self {
        Self { case, console }
    }

    pub fn name(&self) -> &str {
        self.case.name()
    }

    pub fn counts(&self) -> Counts {
        self.case.counts()
    }

    pub fn test_case(&self) -> &Arc<TestCase> {
        &self.case
    }

    pub fn console(&self) -> &Console {
        &self.console
    }
}
