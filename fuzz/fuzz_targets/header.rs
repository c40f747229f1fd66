#![no_main]

use libfuzzer_sys::fuzz_target;
use sctest_core::{CompileOutcome, Expectation, classify, output_lines, parse_header};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Header parsing never panics and never yields an empty expectation
    if let Ok(expectation) = parse_header(s) {
        match expectation {
            Expectation::Error { code } => assert!(!code.is_empty()),
            Expectation::Value { text } => assert!(!text.is_empty()),
        }
    }

    // Treat the same input as captured compiler output
    if let Ok(CompileOutcome::Failure { code }) = classify(&output_lines(s)) {
        assert!(!code.is_empty());
    }
});
