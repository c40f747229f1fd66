//! Harness error taxonomy.
//!
//! Only [`HarnessError::Discovery`] aborts a run. Every other variant is raised while evaluating a single test and
//! is turned into that test's `Fail` verdict by the harness loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use sctest_core::SignalError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("cannot read test directory '{}': {source}", .path.display())]
    #[diagnostic(
        code(sctest::discovery),
        help("pass the corpus root as TESTS_DIR or set SCTEST_DIR")
    )]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed expectation in '{}': {reason}", .path.display())]
    #[diagnostic(
        code(sctest::expectation),
        help("the first line must be a comment such as `// 42;` or `// ERROR CODE;`")
    )]
    MalformedExpectation { path: PathBuf, reason: String },

    #[error("could not run `{command}`: {source}")]
    #[diagnostic(code(sctest::invocation))]
    Invocation {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` did not finish within {}s", .timeout.as_secs())]
    #[diagnostic(code(sctest::timeout))]
    InvocationTimeout { command: String, timeout: Duration },

    #[error("{0}")]
    #[diagnostic(code(sctest::signal))]
    MalformedFailureSignal(#[from] SignalError),

    #[error("build did not produce an executable at '{}'", .path.display())]
    #[diagnostic(code(sctest::artifact))]
    MissingArtifact { path: PathBuf },

    #[error("cannot remove stale artifact '{}': {source}", .path.display())]
    #[diagnostic(code(sctest::artifact))]
    ArtifactCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HarnessError {
    /// Whether this error ends the whole run rather than a single test.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Discovery { .. })
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
