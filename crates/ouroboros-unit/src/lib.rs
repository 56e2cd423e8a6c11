//! ouroboros-unit: assertion-counting unit test framework
//!
//! Register named test cases, run typed equality and array assertions
//! against them, and print colour-coded per-test and aggregate summaries:
//! - Scalar equality for `i32`, `i64`, `f32`, `f64` and `char` (exact, no tolerance)
//! - Reference identity
//! - Array equality with first-mismatch diagnostics
//! - Per-test summary boxes and a process-wide total summary
//!
//! # Example
//!
//! ```no_run
//! let test = ouroboros_unit::begin("Arithmetic");
//! ouroboros_unit::run(
//!     &test,
//!     |t| {
//!         t.int_equals(4, 2 + 2);
//!         t.int_array_equals(&[1, 2, 3], &[1, 2, 3]);
//!     },
//!     None,
//! );
//! ouroboros_unit::print_total_summary();
//! ```

pub mod assertions;
pub mod config;
pub mod console;
pub mod error;
pub mod harness;
pub mod operand;
pub mod registry;
pub mod reporter;
pub mod test_case;

// Re-export main types
pub use assertions::{
    compare_slices, AssertionKind, Comparison, Detail, Diagnostic, Outcome, SourceLocation,
};
pub use config::{ColorMode, UnitConfig};
pub use console::{Console, Palette, SharedBuffer, Style};
pub use error::{Result, UnitError};
pub use harness::{Harness, SummaryPrinter};
pub use operand::{Domain, Operand};
pub use registry::Registry;
pub use reporter::{
    AggregateSummary, OverallStatus, PercentBand, ReportFormat, Reporter, TestTotals,
};
pub use test_case::{Counts, TestCase, TestHandle};

/// Create a test case in the process-wide harness
pub fn begin(name: impl Into<String>) -> TestHandle {
    Harness::global().begin(name)
}

/// Run a test body in the process-wide harness
pub fn run<F>(handle: &TestHandle, body: F, summary: Option<&dyn SummaryPrinter>)
where
    F: FnOnce(&TestHandle),
{
    Harness::global().run(handle, body, summary)
}

/// Print the aggregate summary of every test case created through [`begin`]
pub fn print_total_summary() -> AggregateSummary {
    Harness::global().print_total_summary()
}
