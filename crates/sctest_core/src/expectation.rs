//! Test header expectations.
//!
//! Every test file declares its required outcome on its first line, as a comment:
//!
//! ```text
//! // ERROR TYPE_MISMATCH;
//! // 42;
//! ```
//!
//! The first form requires compilation to fail with the given code; the second requires the compiled program's
//! last output line to equal the text.

use std::fmt;

use thiserror::Error;

/// Line-comment prefix of the toolchain's input language.
pub const COMMENT_PREFIX: &str = "//";

/// Statement terminator, removed wherever it appears in a header.
pub const TERMINATOR: char = ';';

/// Leading token that marks an error expectation.
pub const ERROR_TOKEN: &str = "ERROR";

/// The declared outcome of a single test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Compilation must fail, reporting this failure code.
    Error { code: String },
    /// The program must run and print this as its last non-empty line.
    Value { text: String },
}

impl Expectation {
    pub fn error(code: impl Into<String>) -> Self {
        Self::Error { code: code.into() }
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self::Value { text: text.into() }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { code } => write!(f, "{} {}", ERROR_TOKEN, code),
            Self::Value { text } => write!(f, "{}", text),
        }
    }
}

/// Errors raised while interpreting a header line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header is empty after removing comment markers")]
    Empty,
}

/// Parse the first line of a test file into an [`Expectation`].
///
/// ## Parameters
/// - `line`: the raw first line, with or without its trailing newline.
///
/// ## Returns
/// - (`Expectation`): `Error` when the first token is `ERROR` and a code follows, otherwise `Value` holding the
///   whole cleaned text.
///
/// ## Errors
/// - [`HeaderError::Empty`] when nothing remains after stripping the comment prefix and terminators.
///
/// ## Examples
/// ```rust
/// use sctest_core::{parse_header, Expectation};
/// assert_eq!(parse_header("// ERROR CODE123;").unwrap(), Expectation::error("CODE123"));
/// assert_eq!(parse_header("// 5 10;").unwrap(), Expectation::value("5 10"));
/// ```
pub fn parse_header(line: &str) -> Result<Expectation, HeaderError> {
    let text = clean_header(line);
    if text.is_empty() {
        return Err(HeaderError::Empty);
    }

    let mut tokens = text.split_whitespace();
    if tokens.next() == Some(ERROR_TOKEN) {
        if let Some(code) = tokens.next() {
            return Ok(Expectation::error(code));
        }
    }

    Ok(Expectation::value(text))
}

fn clean_header(line: &str) -> String {
    let line = line.trim_start();
    let line = line.strip_prefix(COMMENT_PREFIX).unwrap_or(line);
    line.replace(TERMINATOR, "").trim().to_string()
}
