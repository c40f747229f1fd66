#![forbid(unsafe_code)]
//! Differential test harness for the toolchain's compiler.
//!
//! Each test is a source file whose first line declares the expected outcome, either a value the compiled program
//! prints last (`// 42;`) or a compiler failure code (`// ERROR TYPE_MISMATCH;`). The harness discovers the corpus,
//! drives the compile, build and run stages for every test, and compares what happened with what was declared.
//!
//! Pure parsing and comparison rules live in [`sctest_core`]; this crate owns filesystem access, process
//! invocation, and the CLI.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod expectation;
pub mod harness;
pub mod toolchain;

#[cfg(test)]
mod testing;

pub use config::HarnessConfig;
pub use corpus::{Suite, TestCase, discover};
pub use error::{HarnessError, HarnessResult};
pub use harness::Harness;
pub use sctest_core::{CompileOutcome, Expectation, RunReport, Verdict};
pub use toolchain::{Artifact, CommandLine, ProcessResult, ProcessToolchain, Toolchain};

/// Discover the configured corpus and evaluate every test with the real toolchain.
///
/// ## Errors
///
/// Only [`HarnessError::Discovery`] is returned; per-test problems are recorded as failures in the report.
pub fn run_harness(config: &HarnessConfig) -> HarnessResult<RunReport> {
    let suites = discover(&config.tests_dir, &config.extension)?;
    let mut harness = Harness::new(ProcessToolchain::new(config));
    Ok(harness.run(&suites))
}
