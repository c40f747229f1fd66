//! Harness configuration.
//!
//! Defaults reproduce the layout the toolchain repository uses: tests under `tests/<suite>/*.sc`, compiled with
//! `cargo run <file>`, assembled by `./build.sh` into `./a.out`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::toolchain::CommandLine;

pub const DEFAULT_TESTS_DIR: &str = "tests";
pub const DEFAULT_EXTENSION: &str = "sc";
pub const DEFAULT_COMPILER: &str = "cargo run";
pub const DEFAULT_BUILD: &str = "./build.sh";
pub const DEFAULT_EXECUTABLE: &str = "./a.out";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Everything a harness run needs to know about the corpus and the toolchain.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Corpus root; each subdirectory is a suite
    pub tests_dir: PathBuf,
    /// Recognized test-source extension, without the dot
    pub extension: String,
    /// Compiler command; the test path is appended as its last argument
    pub compiler: CommandLine,
    /// Build command, run with no extra arguments
    pub build: CommandLine,
    /// Fixed path the build step writes the executable to
    pub executable: PathBuf,
    /// Per-invocation limit; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from(DEFAULT_TESTS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            compiler: CommandLine::new("cargo", ["run"]),
            build: CommandLine::new(DEFAULT_BUILD, Vec::<String>::new()),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl HarnessConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tests_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.tests_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the test-source extension; a leading dot is ignored
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_compiler(mut self, compiler: CommandLine) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_build(mut self, build: CommandLine) -> Self {
        self.build = build;
        self
    }

    pub fn with_executable(mut self, path: impl AsRef<Path>) -> Self {
        self.executable = path.as_ref().to_path_buf();
        self
    }

    /// Set the per-invocation timeout in seconds; `0` disables it
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_toolchain_layout() {
        let config = HarnessConfig::default();
        assert_eq!(config.tests_dir, PathBuf::from("tests"));
        assert_eq!(config.extension, "sc");
        assert_eq!(config.compiler, DEFAULT_COMPILER.parse::<CommandLine>().unwrap());
        assert_eq!(config.build.to_string(), DEFAULT_BUILD);
        assert_eq!(config.executable, PathBuf::from("./a.out"));
        assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_builder() {
        let config = HarnessConfig::new()
            .with_tests_dir("corpus")
            .with_extension(".sc2")
            .with_timeout_secs(0);
        assert_eq!(config.tests_dir, PathBuf::from("corpus"));
        assert_eq!(config.extension, "sc2");
        assert_eq!(config.timeout, None);
    }
}
