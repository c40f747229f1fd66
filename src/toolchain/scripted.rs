//! Scripted in-memory toolchain for harness tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use super::{Artifact, ProcessResult, Toolchain};
use crate::error::{HarnessError, HarnessResult};

/// A toolchain call, as observed by [`ScriptedToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Compile(PathBuf),
    Build,
    Execute,
}

/// Replays canned compile/run output per source path and records every call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedToolchain {
    compile_output: HashMap<PathBuf, Vec<String>>,
    run_output: HashMap<PathBuf, Vec<String>>,
    missing_compiler: bool,
    last_compiled: Option<PathBuf>,
    pub(crate) calls: Vec<Call>,
}

impl ScriptedToolchain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn compiles<I, S>(mut self, source: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compile_output
            .insert(source.into(), lines.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn prints<I, S>(mut self, source: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_output
            .insert(source.into(), lines.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn without_compiler(mut self) -> Self {
        self.missing_compiler = true;
        self
    }

    pub(crate) fn stages_for(&self, source: &Path) -> Vec<Call> {
        let Some(start) = self
            .calls
            .iter()
            .position(|call| *call == Call::Compile(source.to_path_buf()))
        else {
            return Vec::new();
        };
        let end = self.calls[start + 1..]
            .iter()
            .position(|call| matches!(call, Call::Compile(_)))
            .map_or(self.calls.len(), |offset| start + 1 + offset);
        self.calls[start..end].to_vec()
    }
}

impl Toolchain for ScriptedToolchain {
    fn compile(&mut self, source: &Path) -> HarnessResult<ProcessResult> {
        if self.missing_compiler {
            return Err(HarnessError::Invocation {
                command: "scripted-compiler".to_string(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        self.calls.push(Call::Compile(source.to_path_buf()));
        self.last_compiled = Some(source.to_path_buf());
        let lines = self.compile_output.get(source).cloned().unwrap_or_default();
        Ok(ProcessResult::from_lines(lines))
    }

    fn build(&mut self) -> HarnessResult<Artifact> {
        self.calls.push(Call::Build);
        let source = self.last_compiled.clone().unwrap_or_default();
        Ok(Artifact::borrowed(source))
    }

    fn execute(&mut self, artifact: Artifact) -> HarnessResult<ProcessResult> {
        self.calls.push(Call::Execute);
        let lines = self.run_output.get(artifact.path()).cloned().unwrap_or_default();
        Ok(ProcessResult::from_lines(lines))
    }
}
