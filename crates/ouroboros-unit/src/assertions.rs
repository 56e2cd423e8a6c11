//! Assertion engine - typed equality, identity and array checks
//!
//! Every assertion evaluates once, bumps the test case's counters, and writes
//! a result line (plus an "Expanded Information" block on failure) to the
//! console. Failures are outcomes, never errors: nothing here returns `Err`
//! or panics on a mismatch.

use crate::operand::{render_slice, Domain, Operand};
use crate::reporter::Reporter;
use crate::test_case::TestHandle;
use serde::{Deserialize, Serialize};

/// Source position an assertion was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the outermost `#[track_caller]` frame
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line())
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Build a [`SourceLocation`] for the current file and line
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new(file!(), line!())
    };
}

/// Which assertion produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionKind {
    /// Scalar equality within a domain
    Equals(Domain),
    /// Element-wise equality of two arrays of a domain
    ArrayEquals(Domain),
    /// Reference identity
    SameAddress,
}

impl AssertionKind {
    /// Label shown in result lines, e.g. "Assert Integer Array Equals"
    pub fn label(&self) -> String {
        match self {
            AssertionKind::Equals(domain) => format!("Assert {} Equals", domain.title()),
            AssertionKind::ArrayEquals(domain) => {
                format!("Assert {} Array Equals", domain.title())
            }
            AssertionKind::SameAddress => "Assert Same Address".to_string(),
        }
    }
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of comparing two slices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    UnevenLength { expected_len: usize, actual_len: usize },
    Mismatch { index: usize },
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }
}

/// Compare `expected` and `actual`: lengths first, then the first differing index
pub fn compare_slices<T: PartialEq>(expected: &[T], actual: &[T]) -> Comparison {
    if expected.len() != actual.len() {
        return Comparison::UnevenLength {
            expected_len: expected.len(),
            actual_len: actual.len(),
        };
    }

    match expected.iter().zip(actual).position(|(a, b)| a != b) {
        Some(index) => Comparison::Mismatch { index },
        None => Comparison::Equal,
    }
}

/// Failure payload, specific to the shape of the assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Detail {
    /// Scalar or identity mismatch
    Values { expected: String, actual: String },
    /// Arrays of different lengths; rendered in full
    UnevenLength {
        expected_len: usize,
        actual_len: usize,
        expected: String,
        actual: String,
    },
    /// Same-length arrays differing first at `index`; `actual` carries the highlight
    Mismatch {
        index: usize,
        expected: String,
        actual: String,
    },
}

impl Detail {
    pub fn mismatch_index(&self) -> Option<usize> {
        match self {
            Detail::Mismatch { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Expanded information attached to a failed assertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: AssertionKind,
    pub file: String,
    pub line: u32,
    pub detail: Detail,
}

/// What a single assertion evaluated to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// 0-based ordinal of this assertion within its test case
    pub index: u32,
    pub test_name: String,
    pub kind: AssertionKind,
    /// Operand description as printed in the result line (uncoloured)
    pub description: String,
    pub passed: bool,
    pub diagnostic: Option<Diagnostic>,
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn mismatch_index(&self) -> Option<usize> {
        self.diagnostic.as_ref().and_then(|d| d.detail.mismatch_index())
    }
}

// =====================
// Scalar Assertions
// =====================

impl TestHandle {
    /// Assert two values of the same domain are equal (`expected` first)
    #[track_caller]
    pub fn assert_equals<T: Operand>(&self, expected: T, actual: T) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    pub fn assert_equals_at<T: Operand>(
        &self,
        location: SourceLocation,
        expected: T,
        actual: T,
    ) -> Outcome {
        let operands = [expected.render(), actual.render()];
        let detail = (expected != actual).then(|| Detail::Values {
            expected: operands[0].clone(),
            actual: operands[1].clone(),
        });

        self.conclude(
            AssertionKind::Equals(T::DOMAIN),
            location,
            &format!("between {}", T::DOMAIN.plural()),
            operands,
            detail,
        )
    }

    /// Assert `a` and `b` are the same object in memory
    #[track_caller]
    pub fn assert_same<T: ?Sized>(&self, a: &T, b: &T) -> Outcome {
        self.assert_same_at(SourceLocation::caller(), a, b)
    }

    pub fn assert_same_at<T: ?Sized>(&self, location: SourceLocation, a: &T, b: &T) -> Outcome {
        let operands = [format!("{:p}", a), format!("{:p}", b)];
        let detail = (!std::ptr::eq(a, b)).then(|| Detail::Values {
            expected: operands[0].clone(),
            actual: operands[1].clone(),
        });

        self.conclude(AssertionKind::SameAddress, location, "on addresses", operands, detail)
    }

    #[track_caller]
    pub fn int_equals(&self, expected: i32, actual: i32) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn long_equals(&self, expected: i64, actual: i64) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn float_equals(&self, expected: f32, actual: f32) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn double_equals(&self, expected: f64, actual: f64) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn char_equals(&self, expected: char, actual: char) -> Outcome {
        self.assert_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn same_address<T: ?Sized>(&self, a: &T, b: &T) -> Outcome {
        self.assert_same_at(SourceLocation::caller(), a, b)
    }
}

// =====================
// Array Assertions
// =====================

impl TestHandle {
    /// Assert two arrays have the same length and equal elements
    #[track_caller]
    pub fn assert_array_equals<T: Operand>(&self, expected: &[T], actual: &[T]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }

    pub fn assert_array_equals_at<T: Operand>(
        &self,
        location: SourceLocation,
        expected: &[T],
        actual: &[T],
    ) -> Outcome {
        let palette = self.console.palette();
        let mark: &dyn Fn(String) -> String = &|s: String| palette.highlight(s);

        let detail = match compare_slices(expected, actual) {
            Comparison::Equal => None,
            Comparison::UnevenLength {
                expected_len,
                actual_len,
            } => Some(Detail::UnevenLength {
                expected_len,
                actual_len,
                expected: render_slice(expected, None),
                actual: render_slice(actual, None),
            }),
            Comparison::Mismatch { index } => Some(Detail::Mismatch {
                index,
                expected: render_slice(expected, None),
                actual: render_slice(actual, Some((index, mark))),
            }),
        };

        self.conclude(
            AssertionKind::ArrayEquals(T::DOMAIN),
            location,
            &format!("between {} arrays of length", T::DOMAIN.singular()),
            [expected.len().to_string(), actual.len().to_string()],
            detail,
        )
    }

    #[track_caller]
    pub fn int_array_equals(&self, expected: &[i32], actual: &[i32]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn long_array_equals(&self, expected: &[i64], actual: &[i64]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn float_array_equals(&self, expected: &[f32], actual: &[f32]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn double_array_equals(&self, expected: &[f64], actual: &[f64]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }

    #[track_caller]
    pub fn char_array_equals(&self, expected: &[char], actual: &[char]) -> Outcome {
        self.assert_array_equals_at(SourceLocation::caller(), expected, actual)
    }
}

// =====================
// Shared Bookkeeping
// =====================

impl TestHandle {
    /// Record the outcome, then print the result line and any diagnostic as one message.
    ///
    /// `detail` is `None` exactly when the assertion passed.
    fn conclude(
        &self,
        kind: AssertionKind,
        location: SourceLocation,
        phrase: &str,
        operands: [String; 2],
        detail: Option<Detail>,
    ) -> Outcome {
        let passed = detail.is_none();
        let index = self.case.record(passed);
        let diagnostic = detail.map(|detail| Diagnostic {
            kind,
            file: location.file.to_string(),
            line: location.line,
            detail,
        });

        tracing::trace!(
            test = self.name(),
            index,
            kind = %kind,
            passed,
            location = %location,
            "assertion evaluated"
        );

        let reporter = Reporter::new(self.console.palette());
        let mut message = reporter.result_line(index, self.name(), kind, phrase, &operands, passed);
        if let Some(ref diagnostic) = diagnostic {
            message.push_str(&reporter.diagnostic_block(diagnostic));
        }
        self.console.emit(&message);

        let [a, b] = operands;
        Outcome {
            index,
            test_name: self.name().to_string(),
            kind,
            description: format!("{} {} and {}", phrase, a, b),
            passed,
            diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Console, Palette, SharedBuffer};
    use crate::test_case::{Counts, TestCase};
    use std::sync::Arc;

    fn handle(name: &str) -> (TestHandle, SharedBuffer) {
        let (console, buffer) = Console::buffered(Palette::plain());
        let handle = TestHandle::new(Arc::new(TestCase::new(name)), Arc::new(console));
        (handle, buffer)
    }

    #[test]
    fn test_compare_slices() {
        assert_eq!(compare_slices::<i32>(&[], &[]), Comparison::Equal);
        assert_eq!(compare_slices(&[1], &[1]), Comparison::Equal);
        assert_eq!(compare_slices(&[1], &[2]), Comparison::Mismatch { index: 0 });
        assert_eq!(
            compare_slices(&[1, 2, 3], &[1, 5, 9]),
            Comparison::Mismatch { index: 1 }
        );
        assert_eq!(
            compare_slices(&[1, 2, 3], &[1, 2]),
            Comparison::UnevenLength {
                expected_len: 3,
                actual_len: 2
            }
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            AssertionKind::Equals(Domain::Integer).label(),
            "Assert Integer Equals"
        );
        assert_eq!(
            AssertionKind::ArrayEquals(Domain::Char).label(),
            "Assert Char Array Equals"
        );
        assert_eq!(AssertionKind::SameAddress.label(), "Assert Same Address");
    }

    #[test]
    fn test_scalar_pass_and_fail_update_counts() {
        let (t, _buffer) = handle("T");

        let first = t.int_equals(1, 1);
        let second = t.int_equals(2, 3);

        assert!(first.is_passed());
        assert_eq!(first.index, 0);
        assert!(first.diagnostic.is_none());

        assert!(!second.is_passed());
        assert_eq!(second.index, 1);
        assert_eq!(t.counts(), Counts::new(1, 1));

        let diagnostic = second.diagnostic.unwrap();
        assert_eq!(
            diagnostic.detail,
            Detail::Values {
                expected: "2".to_string(),
                actual: "3".to_string()
            }
        );
        assert!(diagnostic.file.ends_with("assertions.rs"));
    }

    #[test]
    fn test_track_caller_reports_call_site() {
        let (t, _buffer) = handle("T");
        let line = line!() + 1;
        let outcome = t.long_equals(1, 2);
        assert_eq!(outcome.diagnostic.unwrap().line, line);
    }

    #[test]
    fn test_explicit_location() {
        let (t, _buffer) = handle("T");
        let outcome = t.assert_equals_at(SourceLocation::new("fake.rs", 77), 'a', 'b');
        let diagnostic = outcome.diagnostic.unwrap();
        assert_eq!(diagnostic.file, "fake.rs");
        assert_eq!(diagnostic.line, 77);
    }

    #[test]
    fn test_every_scalar_domain() {
        let (t, _buffer) = handle("domains");
        assert!(t.int_equals(7, 7).is_passed());
        assert!(t.long_equals(100, 100).is_passed());
        assert!(t.float_equals(1.0, 1.0).is_passed());
        assert!(t.double_equals(1.0, 1.0).is_passed());
        assert!(t.char_equals('a', 'a').is_passed());
        assert!(!t.float_equals(f32::NAN, f32::NAN).is_passed());
        assert!(!t.double_equals(0.1 + 0.2, 0.3).is_passed());
        assert_eq!(t.counts(), Counts::new(5, 2));
    }

    #[test]
    fn test_same_address() {
        let (t, _buffer) = handle("identity");
        let a = 1;
        let b = 1;
        assert!(t.same_address(&a, &a).is_passed());
        assert!(!t.same_address(&a, &b).is_passed());
        assert_eq!(t.counts(), Counts::new(1, 1));
    }

    #[test]
    fn test_array_mismatch_reports_first_index() {
        let (t, _buffer) = handle("arrays");
        let outcome = t.int_array_equals(&[1, 2, 3, 4], &[1, 5, 3, 9]);

        assert!(!outcome.is_passed());
        assert_eq!(outcome.mismatch_index(), Some(1));
        match outcome.diagnostic.unwrap().detail {
            Detail::Mismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, "[1, 2, 3, 4]");
                assert_eq!(actual, "[1, >>5<<, 3, 9]");
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_array_uneven_length_has_no_index() {
        let (t, _buffer) = handle("arrays");
        let outcome = t.int_array_equals(&[1, 2, 3], &[1, 2]);

        assert!(!outcome.is_passed());
        assert_eq!(outcome.mismatch_index(), None);
        assert_eq!(
            outcome.diagnostic.unwrap().detail,
            Detail::UnevenLength {
                expected_len: 3,
                actual_len: 2,
                expected: "[1, 2, 3]".to_string(),
                actual: "[1, 2]".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_arrays_are_equal() {
        let (t, _buffer) = handle("arrays");
        assert!(t.double_array_equals(&[], &[]).is_passed());
        assert!(t.char_array_equals(&['x'], &['x']).is_passed());
        assert!(!t.char_array_equals(&['x'], &['y']).is_passed());
        assert!(t.float_array_equals(&[0.0, 0.0], &[0.0, 0.0]).is_passed());
        assert!(t.long_array_equals(&[0, 0], &[0, 0]).is_passed());
        assert_eq!(t.counts(), Counts::new(4, 1));
    }

    #[test]
    fn test_result_line_is_written_per_assertion() {
        let (t, buffer) = handle("T");
        t.int_equals(1, 1);
        t.int_equals(2, 3);

        let output = buffer.contents();
        assert!(output.contains("0 - T: Assert Integer Equals between integers 1 and 1: PASSED"));
        assert!(output.contains("1 - T: Assert Integer Equals between integers 2 and 3: FAILED"));
        assert!(output.contains("Expected 2 but got 3"));
    }
}
