//! The sequential harness loop.
//!
//! For each test the harness walks one path through this state machine:
//!
//! ```text
//! read header ─► compile ─► classify ─┬─ ERROR <code> ─► compare codes                      ─► verdict
//!                                     └─ <value> ─┬─ compiler failed ─────────────────────► Fail
//!                                                 └─ compiler ok ─► build ─► run ─► last line ─► verdict
//! ```
//!
//! Build and run are never attempted for error expectations, nor after a reported compile failure, so a stale
//! executable from an earlier test is never run. Any error while evaluating one test becomes that test's `Fail`
//! verdict and the loop moves on.

use sctest_core::{CompileOutcome, Expectation, RunReport, Verdict, classify};

use crate::corpus::{Suite, TestCase};
use crate::error::HarnessResult;
use crate::expectation::read_expectation;
use crate::toolchain::Toolchain;

/// Evaluates test cases one at a time against a [`Toolchain`].
pub struct Harness<T> {
    toolchain: T,
}

impl<T: Toolchain> Harness<T> {
    pub fn new(toolchain: T) -> Self {
        Self { toolchain }
    }

    /// Evaluate every test of every suite in order and accumulate the verdicts.
    pub fn run(&mut self, suites: &[Suite]) -> RunReport {
        let mut report = RunReport::new();
        for suite in suites {
            for case in suite.cases() {
                let verdict = self.evaluate(case);
                report.record(case.path().display(), verdict);
            }
        }
        report
    }

    /// Evaluate a single test case to its verdict.
    #[tracing::instrument(skip_all, fields(test = %case.path().display()))]
    pub fn evaluate(&mut self, case: &TestCase) -> Verdict {
        tracing::info!(suite = case.suite(), "running test");
        let verdict = self.try_evaluate(case).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "test could not be evaluated");
            Verdict::fail(e.to_string())
        });
        tracing::debug!(%verdict, "evaluated");
        verdict
    }

    fn try_evaluate(&mut self, case: &TestCase) -> HarnessResult<Verdict> {
        let expectation = read_expectation(case.path())?;
        let compiled = self.toolchain.compile(case.path())?;
        let outcome = classify(&compiled.lines)?;

        match expectation {
            Expectation::Error { code } => Ok(Verdict::for_error(&code, &outcome)),
            Expectation::Value { text } => {
                if let CompileOutcome::Failure { code } = outcome {
                    return Ok(Verdict::unexpected_compile_failure(&code));
                }
                let artifact = self.toolchain.build()?;
                let output = self.toolchain.execute(artifact)?;
                Ok(Verdict::for_value(&text, &output.lines))
            }
        }
    }
}
