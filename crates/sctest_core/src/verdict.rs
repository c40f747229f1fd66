//! Per-test verdicts and the two comparison policies.
//!
//! The harness drives the toolchain stages; these functions only decide, given what a stage produced, whether the
//! expectation holds.

use std::fmt;

use crate::signal::CompileOutcome;

/// The harness's judgment on one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Decide an error expectation from the compile stage's outcome.
    ///
    /// ## Parameters
    /// - `expected`: the failure code the header declared.
    /// - `outcome`: what the compile stage reported.
    pub fn for_error(expected: &str, outcome: &CompileOutcome) -> Self {
        match outcome {
            CompileOutcome::Success => Self::fail("expected failure, got none"),
            CompileOutcome::Failure { code } if code == expected => Self::Pass,
            CompileOutcome::Failure { code } => {
                Self::fail(format!("error code mismatch: expected {}, got {}", expected, code))
            }
        }
    }

    /// Decide a value expectation from the run stage's output lines.
    ///
    /// Only the last line is load-bearing; test programs may print diagnostics before it.
    ///
    /// ## Parameters
    /// - `expected`: the value the header declared.
    /// - `lines`: trimmed, non-empty stdout lines of the run invocation.
    pub fn for_value<S: AsRef<str>>(expected: &str, lines: &[S]) -> Self {
        let Some(last) = lines.last() else {
            return Self::fail(format!("expected {}, got no output", expected));
        };

        let actual = last.as_ref().trim_end();
        if actual == expected {
            Self::Pass
        } else {
            Self::fail(format!("expected {}, got {}", expected, actual))
        }
    }

    /// The verdict for a value expectation whose compile stage already reported failure.
    pub fn unexpected_compile_failure(code: &str) -> Self {
        Self::fail(format!("expected success, got compiler failure {}", code))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail(reason) => write!(f, "fail: {}", reason),
        }
    }
}
