//! Provide the pure semantics of the sctest differential harness.
//!
//! This crate decides *what* a test expects and *whether* an observed toolchain outcome satisfies it. It never
//! touches the filesystem or spawns processes; the `sctest` crate feeds it captured text.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no logging.
//! - Current scope: header parsing ([`expectation`]), failure-signal classification ([`signal`]), comparison
//!   policies ([`verdict`]) and run accumulation ([`report`]).

pub mod expectation;
pub mod report;
pub mod signal;
pub mod verdict;

pub use expectation::{Expectation, HeaderError, parse_header};
pub use report::RunReport;
pub use signal::{CompileOutcome, SignalError, classify};
pub use verdict::Verdict;

/// Split captured process output into trimmed, non-empty lines, preserving order.
///
/// ## Parameters
/// - `raw`: the full text a process wrote to stdout.
///
/// ## Returns
/// - (`Vec<String>`): one entry per line that is non-empty after trimming.
pub fn output_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
