//! CLI module for the sctest harness
//!
//! ## Commands
//!
//! - `sctest [TESTS_DIR]` - Run every test in the corpus (default action)
//! - `sctest list [TESTS_DIR]` - Show discovered tests and their expectations without running anything
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `output` - Report rendering (plain text with optional colour, or JSON)
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod output;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{
    DEFAULT_BUILD, DEFAULT_COMPILER, DEFAULT_EXECUTABLE, DEFAULT_EXTENSION, DEFAULT_TESTS_DIR, DEFAULT_TIMEOUT_SECS,
    HarnessConfig,
};
use crate::toolchain::CommandLine;
use output::{ColorMode, ReportFormat};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one test failed.
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The corpus could not be read; no tests ran.
    pub const DISCOVERY: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Differential test harness for the sc compiler toolchain
#[derive(Parser, Debug)]
#[command(name = "sctest")]
#[command(version = VERSION)]
#[command(about = "Differential test harness for the sc compiler toolchain", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Run options (default action when no subcommand given)
    #[command(flatten)]
    pub run: RunArgs,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List discovered tests and their expectations without invoking the toolchain
    List(CorpusArgs),
}

/// Where the corpus lives and which files belong to it.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Corpus root; each subdirectory is a suite
    #[arg(value_name = "TESTS_DIR", env = "SCTEST_DIR", default_value = DEFAULT_TESTS_DIR)]
    pub tests_dir: PathBuf,

    /// Test-source file extension
    #[arg(long, value_name = "EXT", env = "SCTEST_EXTENSION", default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Compiler command; the test path is appended
    #[arg(long, value_name = "COMMAND", env = "SCTEST_COMPILER", default_value = DEFAULT_COMPILER)]
    pub compiler: CommandLine,

    /// Build command that turns compiler output into an executable
    #[arg(long, value_name = "COMMAND", env = "SCTEST_BUILD", default_value = DEFAULT_BUILD)]
    pub build: CommandLine,

    /// Path the build step writes the executable to
    #[arg(long, value_name = "PATH", env = "SCTEST_EXECUTABLE", default_value = DEFAULT_EXECUTABLE)]
    pub executable: PathBuf,

    /// Seconds each compile, build or run may take (0 waits forever)
    #[arg(long, value_name = "SECS", env = "SCTEST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Colour the summary lines
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

impl RunArgs {
    pub fn to_config(&self) -> HarnessConfig {
        HarnessConfig::new()
            .with_tests_dir(&self.corpus.tests_dir)
            .with_extension(&self.corpus.extension)
            .with_compiler(self.compiler.clone())
            .with_build(self.build.clone())
            .with_executable(&self.executable)
            .with_timeout_secs(self.timeout)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// Apart from the interrupt handler, this is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    install_interrupt_handler();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::List(corpus)) => commands::list_tests(&corpus),
        None => commands::run_tests(&cli.run),
    }
}

/// Stages run in their own process groups, so a terminal interrupt does not reach them; kill them here.
fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        crate::toolchain::process::terminate_running();
        eprintln!("interrupted");
        process::exit(130);
    });
    if let Err(e) = installed {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }
}

/// Install the stderr log subscriber; stdout carries only the report.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

// ============================================================================
// Tests
// ============================================================================
