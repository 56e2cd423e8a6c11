//! Reporter - result lines, diagnostics, per-test and aggregate summaries
//!
//! All formatting lives here and returns strings; the console decides where
//! they go. Widths are computed on the uncoloured text so escape codes never
//! disturb alignment.

use crate::assertions::{AssertionKind, Detail, Diagnostic};
use crate::console::{Palette, Style};
use crate::error::Result;
use crate::registry::Registry;
use crate::test_case::Counts;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

/// Width of the `=` runs on each side of the per-test header banner
const HEADER_RULE: usize = 40;
/// Width of the `=` runs on each side of a summary title
const TITLE_RULE: usize = 10;
/// Box width beyond the test name: two rules, two spaces, " Summary"
const BOX_EXTRA: usize = 2 * TITLE_RULE + 2 + " Summary".len();

/// Aggregate output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum ReportFormat {
    /// Console format (colored terminal output)
    #[default]
    Console,
    /// JSON format (machine-parseable)
    Json,
    /// YAML format (human-readable, machine-parseable)
    Yaml,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Console => write!(f, "console"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Colour band for a percent-passing value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentBand {
    /// 90% and above
    Good,
    /// Above 50% and below 90%
    Warning,
    /// 50% and below
    Bad,
}

impl PercentBand {
    pub fn classify(percent: f64) -> Self {
        if percent >= 90.0 {
            PercentBand::Good
        } else if percent > 50.0 {
            PercentBand::Warning
        } else {
            PercentBand::Bad
        }
    }

    pub fn style(&self) -> Style {
        match self {
            PercentBand::Good => Style::Good,
            PercentBand::Warning => Style::Warning,
            PercentBand::Bad => Style::Bad,
        }
    }
}

/// Overall verdict of an aggregate summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallStatus {
    Passing,
    Failing,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Passing => write!(f, "PASSING"),
            OverallStatus::Failing => write!(f, "FAILING"),
        }
    }
}

/// One row of the aggregate summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTotals {
    pub name: String,
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
}

/// Totals across every test case in a registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Report generation timestamp
    pub generated_at: String,
    /// Per-test rows in creation order
    pub tests: Vec<TestTotals>,
    /// Assertions passing across all tests
    pub passed: u32,
    /// Assertions failing across all tests
    pub failed: u32,
    pub status: OverallStatus,
}

impl AggregateSummary {
    /// Snapshot a registry's current counters
    pub fn from_registry(registry: &Registry) -> Self {
        // one counter read per case, so rows and totals always agree
        let snapshot: Vec<(String, Counts)> = registry
            .get_all()
            .iter()
            .map(|case| (case.name().to_string(), case.counts()))
            .collect();
        let totals: Counts = snapshot.iter().map(|(_, counts)| *counts).sum();

        let tests = snapshot
            .into_iter()
            .map(|(name, counts)| TestTotals {
                name,
                passed: counts.passed,
                failed: counts.failed,
                total: counts.total(),
            })
            .collect();

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            tests,
            passed: totals.passed,
            failed: totals.failed,
            status: if totals.all_passed() {
                OverallStatus::Passing
            } else {
                OverallStatus::Failing
            },
        }
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.status == OverallStatus::Passing
    }
}

/// Formats every piece of framework output
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    palette: Palette,
    format: ReportFormat,
}

impl Reporter {
    /// Create a console reporter
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            format: ReportFormat::Console,
        }
    }

    /// Set the format used by [`Reporter::generate`]
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Banner printed once when a test case starts
    pub fn header(&self, name: &str) -> String {
        let rule = "=".repeat(HEADER_RULE);
        format!("\n{} {} Results {}\n\n", rule, name, rule)
    }

    /// `<index> - <name>: <Kind> <phrase> <a> and <b>: <PASSED|FAILED>`
    pub fn result_line(
        &self,
        index: u32,
        name: &str,
        kind: AssertionKind,
        phrase: &str,
        operands: &[String; 2],
        passed: bool,
    ) -> String {
        let p = &self.palette;
        let marker = if passed {
            p.paint(Style::Good, "PASSED")
        } else {
            p.paint(Style::Bad, "FAILED")
        };

        format!(
            "{} - {} {} {} and {}: {}\n",
            index,
            p.paint(Style::Label, format!("{}:", name)),
            p.paint(Style::Kind, kind.label()),
            phrase_with(p, phrase, &operands[0]),
            p.paint(Style::Operand, &operands[1]),
            marker
        )
    }

    /// "Expanded Information" block printed under a failed result line
    pub fn diagnostic_block(&self, diagnostic: &Diagnostic) -> String {
        let p = &self.palette;
        let mut output = String::new();

        writeln!(output, "    {}", p.paint(Style::Label, "Expanded Information:")).unwrap();
        writeln!(output, "        Assertion: {}", p.paint(Style::Kind, diagnostic.kind.label()))
            .unwrap();
        writeln!(output, "        File: {}", diagnostic.file).unwrap();
        writeln!(output, "        Line: {}", diagnostic.line).unwrap();

        match &diagnostic.detail {
            Detail::Values { expected, actual } => {
                writeln!(
                    output,
                    "        Expected {} but got {}",
                    p.paint(Style::Operand, expected),
                    p.paint(Style::Bad, actual)
                )
                .unwrap();
            }
            Detail::UnevenLength {
                expected_len,
                actual_len,
                expected,
                actual,
            } => {
                writeln!(output, "        Arrays are of uneven length.").unwrap();
                writeln!(output, "        Expected (length {}): {}", expected_len, expected)
                    .unwrap();
                writeln!(output, "        Actual   (length {}): {}", actual_len, actual).unwrap();
            }
            Detail::Mismatch {
                index,
                expected,
                actual,
            } => {
                writeln!(output, "        First mismatch at index {}", index).unwrap();
                writeln!(output, "        Expected: {}", expected).unwrap();
                writeln!(output, "        Actual:   {}", actual).unwrap();
            }
        }

        output
    }

    /// Per-test summary box.
    ///
    /// Every line is `name_width + BOX_EXTRA` characters wide, so the right
    /// edge stays aligned and the closing rule matches the title. Widths count
    /// `char`s, not terminal cells: a name made of double-width characters
    /// (CJK, most emoji) keeps the lines equal in length but draws the title
    /// wider on screen than the rows below it.
    pub fn summary_box(&self, name: &str, counts: Counts) -> String {
        let p = &self.palette;
        let width = name.chars().count() + BOX_EXTRA;
        let percent = counts.percent_passing();
        let band = PercentBand::classify(percent);
        let rule = "=".repeat(TITLE_RULE);
        let mut output = String::new();

        writeln!(output).unwrap();
        writeln!(
            output,
            "{}",
            p.paint(Style::Label, format!("{} {} Summary {}", rule, name, rule))
        )
        .unwrap();
        writeln!(output, "{}", row(p, "Total Tests:", counts.total(), Style::Label, width))
            .unwrap();
        writeln!(output, "{}", row(p, "Tests Passed:", counts.passed, Style::Good, width))
            .unwrap();
        writeln!(output, "{}", row(p, "Tests Failed:", counts.failed, Style::Bad, width))
            .unwrap();
        writeln!(
            output,
            "{}",
            row(p, "Percent Passing:", format!("{:.2}%", percent), band.style(), width)
        )
        .unwrap();
        writeln!(output, "{}", p.paint(Style::Label, "=".repeat(width))).unwrap();

        output
    }

    /// Render an aggregate summary in this reporter's format
    pub fn generate(&self, summary: &AggregateSummary) -> Result<String> {
        match self.format {
            ReportFormat::Console => Ok(self.aggregate(summary)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            ReportFormat::Yaml => Ok(serde_yaml::to_string(summary)?),
        }
    }

    /// Aggregate summary as a right-aligned `name: passed/total` column
    pub fn aggregate(&self, summary: &AggregateSummary) -> String {
        let p = &self.palette;
        let name_width = summary
            .tests
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0);
        let title = "Total Summary";
        let rule = "=".repeat(TITLE_RULE);
        let width = (title.len() + 2 + 2 * TITLE_RULE).max(name_width + 2);
        let mut output = String::new();

        writeln!(output).unwrap();
        writeln!(output, "{}", p.paint(Style::Label, format!("{} {} {}", rule, title, rule)))
            .unwrap();

        for test in &summary.tests {
            let style = if test.failed == 0 { Style::Good } else { Style::Bad };
            writeln!(
                output,
                "{} {}",
                p.paint(Style::Label, format!("{:>width$}:", test.name, width = name_width)),
                p.paint(style, format!("{}/{}", test.passed, test.total))
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        writeln!(
            output,
            "{} {}",
            p.paint(Style::Label, "Assertions Passing:"),
            p.paint(Style::Good, summary.passed)
        )
        .unwrap();
        writeln!(
            output,
            "{} {}",
            p.paint(Style::Label, "Assertions Failing:"),
            p.paint(Style::Bad, summary.failed)
        )
        .unwrap();

        let status_style = if summary.all_passed() { Style::Good } else { Style::Bad };
        writeln!(
            output,
            "{} {}",
            p.paint(Style::Label, "Status:"),
            p.paint(status_style, summary.status)
        )
        .unwrap();
        writeln!(output, "{}", p.paint(Style::Label, "=".repeat(width))).unwrap();

        output
    }
}

/// `phrase a`, with the first operand coloured
fn phrase_with(p: &Palette, phrase: &str, operand: &str) -> String {
    format!("{} {}", phrase, p.paint(Style::Operand, operand))
}

/// Caption followed by a value right-aligned to `width` total columns
fn row(
    p: &Palette,
    caption: &str,
    value: impl std::fmt::Display,
    style: Style,
    width: usize,
) -> String {
    let value_width = width.saturating_sub(caption.len() + 1);
    format!(
        "{} {}",
        p.paint(Style::Label, caption),
        p.paint(style, format!("{:>value_width$}", value.to_string()))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::Domain;
    use crate::test_case::TestCase;
    use std::sync::Arc;

    fn plain() -> Reporter {
        Reporter::new(Palette::plain())
    }

    #[test]
    fn test_percent_band_boundaries() {
        assert_eq!(PercentBand::classify(100.0), PercentBand::Good);
        assert_eq!(PercentBand::classify(90.0), PercentBand::Good);
        assert_eq!(PercentBand::classify(89.99), PercentBand::Warning);
        assert_eq!(PercentBand::classify(50.01), PercentBand::Warning);
        assert_eq!(PercentBand::classify(50.0), PercentBand::Bad);
        assert_eq!(PercentBand::classify(0.0), PercentBand::Bad);

        assert_eq!(
            PercentBand::classify(Counts::new(9, 1).percent_passing()),
            PercentBand::Good
        );
        assert_eq!(
            PercentBand::classify(Counts::new(1, 1).percent_passing()),
            PercentBand::Bad
        );
    }

    #[test]
    fn test_header() {
        let header = plain().header("T");
        let rule = "=".repeat(40);
        assert_eq!(header, format!("\n{} T Results {}\n\n", rule, rule));
    }

    #[test]
    fn test_result_line_plain() {
        let line = plain().result_line(
            3,
            "Math",
            AssertionKind::Equals(Domain::Double),
            "between doubles",
            &["1.000000".to_string(), "2.000000".to_string()],
            false,
        );
        assert_eq!(
            line,
            "3 - Math: Assert Double Equals between doubles 1.000000 and 2.000000: FAILED\n"
        );
    }

    #[test]
    fn test_result_line_colored() {
        let line = Reporter::new(Palette::ansi()).result_line(
            0,
            "T",
            AssertionKind::Equals(Domain::Integer),
            "between integers",
            &["1".to_string(), "1".to_string()],
            true,
        );
        assert!(line.contains("\x1b[1;36mAssert Integer Equals\x1b[0m"));
        assert!(line.contains("\x1b[1;32mPASSED\x1b[0m"));
    }

    #[test]
    fn test_diagnostic_block_for_values() {
        let block = plain().diagnostic_block(&Diagnostic {
            kind: AssertionKind::Equals(Domain::Integer),
            file: "tests/math.rs".to_string(),
            line: 12,
            detail: Detail::Values {
                expected: "2".to_string(),
                actual: "3".to_string(),
            },
        });

        assert!(block.contains("Expanded Information:"));
        assert!(block.contains("Assertion: Assert Integer Equals"));
        assert!(block.contains("File: tests/math.rs"));
        assert!(block.contains("Line: 12"));
        assert!(block.contains("Expected 2 but got 3"));
    }

    #[test]
    fn test_diagnostic_block_for_uneven_arrays() {
        let block = plain().diagnostic_block(&Diagnostic {
            kind: AssertionKind::ArrayEquals(Domain::Integer),
            file: "a.rs".to_string(),
            line: 1,
            detail: Detail::UnevenLength {
                expected_len: 3,
                actual_len: 2,
                expected: "[1, 2, 3]".to_string(),
                actual: "[1, 2]".to_string(),
            },
        });

        assert!(block.contains("Arrays are of uneven length."));
        assert!(block.contains("Expected (length 3): [1, 2, 3]"));
        assert!(block.contains("Actual   (length 2): [1, 2]"));
        assert!(!block.contains("index"));
    }

    #[test]
    fn test_summary_box_is_rectangular() {
        for name in ["T", "A much longer test name"] {
            let summary = plain().summary_box(name, Counts::new(1, 1));
            let lines: Vec<&str> = summary.lines().filter(|l| !l.is_empty()).collect();
            let width = name.len() + BOX_EXTRA;

            assert_eq!(lines.len(), 6);
            for line in &lines {
                assert_eq!(line.chars().count(), width, "line {:?}", line);
            }
        }
    }

    #[test]
    fn test_summary_box_counts_chars_not_bytes() {
        let name = "名前テスト";
        let summary = plain().summary_box(name, Counts::new(2, 0));
        let lines: Vec<&str> = summary.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 6);
        for line in &lines {
            assert_eq!(line.chars().count(), 5 + BOX_EXTRA, "line {:?}", line);
        }
        assert_eq!(lines[5], "=".repeat(35));
    }

    #[test]
    fn test_summary_box_values() {
        let summary = plain().summary_box("T", Counts::new(1, 1));
        assert!(summary.contains("========== T Summary =========="));
        assert!(summary.contains("Total Tests:"));
        assert!(summary
            .trim_end()
            .lines()
            .any(|l| l.starts_with("Total Tests:") && l.ends_with(" 2")));
        assert!(summary.contains("50.00%"));
    }

    #[test]
    fn test_summary_box_is_idempotent() {
        let reporter = Reporter::new(Palette::ansi());
        let counts = Counts::new(9, 1);
        assert_eq!(reporter.summary_box("T", counts), reporter.summary_box("T", counts));
        assert!(reporter.summary_box("T", counts).contains("\x1b[1;32m"));
    }

    #[test]
    fn test_summary_box_warning_color() {
        let summary = Reporter::new(Palette::ansi()).summary_box("T", Counts::new(3, 1));
        assert!(summary.contains("\x1b[1;33m"));
    }

    fn registry_with(rows: &[(&str, u32, u32)]) -> Registry {
        let registry = Registry::new();
        for (name, passed, failed) in rows {
            let case = Arc::new(TestCase::new(*name));
            for _ in 0..*passed {
                case.record(true);
            }
            for _ in 0..*failed {
                case.record(false);
            }
            registry.register(case);
        }
        registry
    }

    #[test]
    fn test_aggregate_totals() {
        let registry = registry_with(&[("short", 3, 0), ("a longer name", 1, 2)]);
        let summary = AggregateSummary::from_registry(&registry);

        assert_eq!(summary.passed, 4);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.total(), summary.tests.iter().map(|t| t.total).sum::<u32>());
        assert_eq!(summary.passed, summary.tests.iter().map(|t| t.passed).sum::<u32>());
        assert_eq!(summary.failed, summary.tests.iter().map(|t| t.failed).sum::<u32>());
        assert_eq!(summary.status, OverallStatus::Failing);
    }

    #[test]
    fn test_aggregate_passing_when_nothing_failed() {
        let registry = registry_with(&[("one", 2, 0), ("two", 0, 0)]);
        let summary = AggregateSummary::from_registry(&registry);
        assert_eq!(summary.status, OverallStatus::Passing);
        assert!(plain().generate(&summary).unwrap().contains("Status: PASSING"));
    }

    #[test]
    fn test_aggregate_console_aligns_numbers() {
        let registry = registry_with(&[("short", 3, 0), ("a longer name", 1, 2)]);
        let summary = AggregateSummary::from_registry(&registry);
        let output = plain().generate(&summary).unwrap();

        let short = output.lines().find(|l| l.contains("short:")).unwrap();
        let long = output.lines().find(|l| l.contains("a longer name:")).unwrap();
        assert_eq!(short.find(':'), long.find(':'));
        assert!(short.ends_with("3/3"));
        assert!(long.ends_with("1/3"));
        assert!(output.contains("Assertions Passing: 4"));
        assert!(output.contains("Assertions Failing: 2"));
        assert!(output.contains("Status: FAILING"));
    }

    #[test]
    fn test_aggregate_json_and_yaml() {
        let registry = registry_with(&[("json", 1, 1)]);
        let summary = AggregateSummary::from_registry(&registry);

        let json = plain().with_format(ReportFormat::Json).generate(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["status"], "Failing");
        assert_eq!(value["tests"][0]["name"], "json");

        let yaml = plain().with_format(ReportFormat::Yaml).generate(&summary).unwrap();
        assert!(yaml.contains("name: json"));
        assert!(yaml.contains("status: Failing"));
    }
}
