//! Test harness - creates test cases, runs bodies, prints summaries
//!
//! A [`Harness`] owns one registry and one console. Most programs use the
//! process-wide [`Harness::global`]; tests build their own over a
//! [`SharedBuffer`](crate::console::SharedBuffer) to inspect the output.

use crate::config::UnitConfig;
use crate::console::Console;
use crate::error::Result;
use crate::registry::Registry;
use crate::reporter::{AggregateSummary, ReportFormat, Reporter};
use crate::test_case::{TestCase, TestHandle};
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL: Lazy<Harness> = Lazy::new(|| {
    let config = UnitConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid test output configuration");
        UnitConfig::default()
    });
    Harness::with_parts(Registry::global(), Arc::new(Console::stdout(&config)))
});

/// Replacement for the default per-test summary
pub trait SummaryPrinter {
    fn print_summary(&self, test: &TestHandle);
}

impl<F: Fn(&TestHandle)> SummaryPrinter for F {
    fn print_summary(&self, test: &TestHandle) {
        self(test)
    }
}

impl TestHandle {
    /// Print the per-test banner
    pub fn print_header(&self) {
        let reporter = Reporter::new(self.console.palette());
        self.console.emit(&reporter.header(self.name()));
    }

    /// Print the per-test summary box for the current counters
    pub fn print_summary(&self) {
        let reporter = Reporter::new(self.console.palette());
        self.console.emit(&reporter.summary_box(self.name(), self.counts()));
    }
}

/// Registry plus console: the state every test case reports into
#[derive(Debug)]
pub struct Harness {
    registry: Arc<Registry>,
    console: Arc<Console>,
}

impl Harness {
    /// Harness on stdout with a fresh registry
    pub fn new(config: &UnitConfig) -> Self {
        Self::with_console(Console::stdout(config))
    }

    /// Harness over the given console with a fresh registry
    pub fn with_console(console: Console) -> Self {
        Self::with_parts(Arc::new(Registry::new()), Arc::new(console))
    }

    pub fn with_parts(registry: Arc<Registry>, console: Arc<Console>) -> Self {
        Self { registry, console }
    }

    /// Process-wide harness: global registry, stdout, config from the environment
    pub fn global() -> &'static Harness {
        &GLOBAL
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Create a test case with zeroed counters and append it to the registry.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn begin(&self, name: impl Into<String>) -> TestHandle {
        let case = Arc::new(TestCase::new(name));
        self.registry.register(Arc::clone(&case));
        TestHandle::new(case, Arc::clone(&self.console))
    }

    /// Print the header, run `body`, then print the default or custom summary
    pub fn run<F>(&self, handle: &TestHandle, body: F, summary: Option<&dyn SummaryPrinter>)
    where
        F: FnOnce(&TestHandle),
    {
        let span = tracing::debug_span!("test_case", test = handle.name());
        let _enter = span.enter();

        tracing::debug!("running test body");
        handle.print_header();
        body(handle);

        match summary {
            Some(printer) => printer.print_summary(handle),
            None => handle.print_summary(),
        }

        let counts = handle.counts();
        tracing::debug!(passed = counts.passed, failed = counts.failed, "test body finished");
    }

    /// Print the aggregate summary of every registered test case and return it
    pub fn print_total_summary(&self) -> AggregateSummary {
        let summary = AggregateSummary::from_registry(&self.registry);
        let reporter = Reporter::new(self.console.palette());
        self.console.emit(&reporter.aggregate(&summary));
        tracing::debug!(
            tests = summary.tests.len(),
            passed = summary.passed,
            failed = summary.failed,
            "printed total summary"
        );
        summary
    }

    /// Render the aggregate summary without printing it
    pub fn report(&self, format: ReportFormat) -> Result<String> {
        let summary = AggregateSummary::from_registry(&self.registry);
        Reporter::new(self.console.palette())
            .with_format(format)
            .generate(&summary)
    }
}
