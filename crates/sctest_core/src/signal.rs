//! Compile-stage outcome classification.
//!
//! The toolchain reports failure on stdout (`FAILED <code> ...`) rather than through its exit status, so the
//! classifier looks only at captured text.

use thiserror::Error;

/// Leading token of a failure-signal line.
pub const FAILURE_TOKEN: &str = "FAILED";

/// What the compile stage reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success,
    Failure { code: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("malformed failure signal `{line}`: no failure code follows FAILED")]
    MalformedFailureSignal { line: String },
}

/// Classify the compile stage's captured output lines.
///
/// ## Parameters
/// - `lines`: trimmed, non-empty stdout lines of the compile invocation.
///
/// ## Returns
/// - (`CompileOutcome`): `Failure` carrying the second token of the *first* line whose first token is `FAILED`,
///   or `Success` when no such line exists.
///
/// ## Errors
/// - [`SignalError::MalformedFailureSignal`] when the first failure line carries no code.
pub fn classify<S: AsRef<str>>(lines: &[S]) -> Result<CompileOutcome, SignalError> {
    let Some(line) = lines.iter().map(AsRef::as_ref).find(|line| is_failure_line(line)) else {
        return Ok(CompileOutcome::Success);
    };

    match line.split_whitespace().nth(1) {
        Some(code) => Ok(CompileOutcome::Failure { code: code.to_string() }),
        None => Err(SignalError::MalformedFailureSignal { line: line.to_string() }),
    }
}

fn is_failure_line(line: &str) -> bool {
    line.split_whitespace().next() == Some(FAILURE_TOKEN)
}
