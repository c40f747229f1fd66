//! Reading a test's declared expectation from disk.
//!
//! Only the first line of the file is read; the rest belongs to the toolchain.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sctest_core::{Expectation, parse_header};

use crate::error::{HarnessError, HarnessResult};

/// Read the raw first line of a test file, without its line terminator.
///
/// Returns `Ok(None)` for an empty file.
pub fn read_annotation(path: &Path) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = BufReader::new(File::open(path)?).read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Read and parse the expectation declared on the first line of `path`.
///
/// ## Errors
///
/// [`HarnessError::MalformedExpectation`] when the file cannot be read, is empty, or its header is blank.
pub fn read_expectation(path: &Path) -> HarnessResult<Expectation> {
    let malformed = |reason: String| HarnessError::MalformedExpectation {
        path: path.to_path_buf(),
        reason,
    };

    let annotation = read_annotation(path)
        .map_err(|e| malformed(format!("cannot read file: {}", e)))?
        .ok_or_else(|| malformed("file is empty".to_string()))?;

    parse_header(&annotation).map_err(|e| malformed(e.to_string()))
}
