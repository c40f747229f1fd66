//! Toolchain invocation boundary.
//!
//! The compiler, build step and compiled program are opaque external collaborators. The harness sees them only
//! through [`Toolchain`], so the comparison logic can be driven by a scripted fake in tests and by
//! [`ProcessToolchain`] in real runs.
//!
//! ## Stage ordering
//!
//! Build and run share one on-disk artifact. Every method takes `&mut self`, so stages never overlap, and
//! [`Toolchain::execute`] consumes the [`Artifact`] that [`Toolchain::build`] handed out. An artifact built for
//! one test therefore cannot be executed on behalf of another.

pub mod command;
pub mod process;

#[cfg(test)]
pub(crate) mod scripted;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::HarnessResult;

pub use command::CommandLine;
pub use process::ProcessToolchain;

/// Captured output of one external invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Trimmed, non-empty stdout lines in order.
    pub lines: Vec<String>,
    /// Exit code, when the process exited normally. Informational only; classification reads `lines`.
    pub status: Option<i32>,
}

impl ProcessResult {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            status: Some(0),
        }
    }
}

/// The three external stages the harness drives.
pub trait Toolchain {
    /// Compile one test source, capturing stdout.
    fn compile(&mut self, source: &Path) -> HarnessResult<ProcessResult>;

    /// Build the compiler's output into an executable and hand out the resulting artifact.
    fn build(&mut self) -> HarnessResult<Artifact>;

    /// Run a freshly built artifact with no arguments, capturing stdout.
    fn execute(&mut self, artifact: Artifact) -> HarnessResult<ProcessResult>;
}

impl<T: Toolchain + ?Sized> Toolchain for &mut T {
    fn compile(&mut self, source: &Path) -> HarnessResult<ProcessResult> {
        (**self).compile(source)
    }

    fn build(&mut self) -> HarnessResult<Artifact> {
        (**self).build()
    }

    fn execute(&mut self, artifact: Artifact) -> HarnessResult<ProcessResult> {
        (**self).execute(artifact)
    }
}

/// Handle to the executable produced by one build.
///
/// An owned artifact deletes its file when dropped, so the next test can never observe it.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    owned: bool,
}

impl Artifact {
    /// An artifact whose file is removed on drop.
    pub fn owned(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: true,
        }
    }

    /// An artifact that leaves its file in place on drop.
    pub fn borrowed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(artifact = %self.path.display(), "released artifact"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(artifact = %self.path.display(), error = %e, "could not release artifact"),
        }
    }
}
