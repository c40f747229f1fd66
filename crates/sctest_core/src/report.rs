//! Run-level accumulation of verdicts.
//!
//! [`RunReport`] is an explicit accumulator threaded through the sequential harness loop. It is never reset and
//! is rendered once, after the last test.

use std::fmt;

use crate::verdict::Verdict;

/// Pass/fail counts and the ordered failure messages of one harness run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    passed: usize,
    failed: usize,
    failures: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one test's verdict.
    ///
    /// ## Parameters
    /// - `test`: the test's display name (its path), included in the failure message.
    /// - `verdict`: the judgment for that test.
    pub fn record(&mut self, test: impl fmt::Display, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail(reason) => {
                self.failed += 1;
                self.failures.push(format!("ERROR at {}: {}", test, reason));
            }
        }
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Failure messages in test execution order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn passed_line(&self) -> String {
        format!("{} passed", self.passed)
    }

    pub fn failed_line(&self) -> String {
        format!("{} failed", self.failed)
    }
}

/// Plain-text summary: the two count lines followed by each failure message.
impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.passed_line())?;
        writeln!(f, "{}", self.failed_line())?;
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = RunReport::new();
        report.record("tests/basic/add.sc", Verdict::Pass);
        report.record("tests/basic/sub.sc", Verdict::fail("expected 1, got 2"));
        report.record("tests/basic/mul.sc", Verdict::Pass);

        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_success());
        assert_eq!(report.failures(), ["ERROR at tests/basic/sub.sc: expected 1, got 2"]);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = RunReport::new();
        assert!(report.is_success());
        assert_eq!(report.total(), 0);
    }

    #[test]
    fn test_render() {
        let mut report = RunReport::new();
        report.record("tests/errors/bad.sc", Verdict::fail("expected failure, got none"));
        report.record("tests/basic/add.sc", Verdict::Pass);
        report.record("tests/basic/sub.sc", Verdict::fail("expected 1, got no output"));

        insta::assert_snapshot!(report.to_string(), @r"
        1 passed
        2 failed
        ERROR at tests/errors/bad.sc: expected failure, got none
        ERROR at tests/basic/sub.sc: expected 1, got no output
        ");
    }
}
