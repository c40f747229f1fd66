//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use crate::corpus::{Suite, discover};
use crate::error::HarnessError;
use crate::expectation::read_expectation;
use crate::run_harness;

use super::output::{ReportRenderer, renderer};
use super::{CliError, CliResult, CorpusArgs, ExitCode, RunArgs};

/// Run the whole corpus and print the report.
///
/// Exits 0 when every test passed and 1 otherwise.
pub fn run_tests(args: &RunArgs) -> CliResult<ExitCode> {
    let config = args.to_config();
    tracing::debug!(?config, "starting harness run");

    let report = run_harness(&config).map_err(harness_error)?;
    print!("{}", renderer(args.format, args.color).render(&report));

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Print every discovered test with its parsed expectation.
///
/// Nothing is compiled or run. Exits 1 when any header is malformed.
pub fn list_tests(args: &CorpusArgs) -> CliResult<ExitCode> {
    let extension = args.extension.trim_start_matches('.');
    let suites = discover(&args.tests_dir, extension).map_err(harness_error)?;

    let listing = Listing::of(&suites);
    for line in &listing.lines {
        println!("{}", line);
    }

    if listing.malformed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Rendered dry-run listing of a corpus.
struct Listing {
    lines: Vec<String>,
    malformed: usize,
}

impl Listing {
    fn of(suites: &[Suite]) -> Self {
        let mut lines = Vec::new();
        let mut malformed = 0;
        for suite in suites {
            lines.push(format!("{} ({} tests)", suite.name(), suite.cases().len()));
            for case in suite.cases() {
                match read_expectation(case.path()) {
                    Ok(expectation) => lines.push(format!("  {}: {}", case.path().display(), expectation)),
                    Err(e) => {
                        malformed += 1;
                        lines.push(format!("  {}: <{}>", case.path().display(), e));
                    }
                }
            }
        }
        Self { lines, malformed }
    }
}

/// Render a harness error as a diagnostic; discovery failures get their own exit code.
fn harness_error(error: HarnessError) -> CliError {
    let exit_code = if error.is_fatal() {
        ExitCode::DISCOVERY
    } else {
        ExitCode::FAILURE
    };
    CliError::new(format!("{:?}", miette::Report::new(error)), exit_code)
}
