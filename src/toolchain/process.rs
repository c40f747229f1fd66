//! Process-backed toolchain.
//!
//! Each stage is a blocking child process: stdout and stderr are drained on reader threads while the harness
//! polls for exit against an optional deadline. The deadline covers the whole invocation, including reading the
//! pipes, so a descendant that keeps them open cannot stall the run.
//!
//! On unix every stage gets its own process group. A [`ChildGuard`] kills that group and reaps the child on every
//! exit path, so an early return, a timeout or an unwinding panic never leaves a compiler, linker or program from
//! one test running into the next. [`terminate_running`] does the same for every live stage when the harness is
//! interrupted.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use sctest_core::output_lines;

use super::{Artifact, CommandLine, ProcessResult, Toolchain};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};

/// How often a running child is polled for exit while a deadline is active.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The stage a child process belongs to (for logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Build,
    Run,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Build => "build",
            Stage::Run => "run",
        }
    }
}

/// Drives the configured compiler, build step and executable as child processes.
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    compiler: CommandLine,
    build: CommandLine,
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessToolchain {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            build: config.build.clone(),
            executable: runnable_path(&config.executable),
            timeout: config.timeout,
        }
    }

    fn remove_stale_artifact(&self) -> HarnessResult<()> {
        match fs::remove_file(&self.executable) {
            Ok(()) => {
                tracing::debug!(artifact = %self.executable.display(), "removed stale artifact");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(HarnessError::ArtifactCleanup {
                path: self.executable.clone(),
                source,
            }),
        }
    }
}

impl Toolchain for ProcessToolchain {
    fn compile(&mut self, source: &Path) -> HarnessResult<ProcessResult> {
        let mut command = self.compiler.to_command();
        command.arg(source);
        let label = format!("{} {}", self.compiler, source.display());
        run_captured(Stage::Compile, &label, command, self.timeout)
    }

    fn build(&mut self) -> HarnessResult<Artifact> {
        self.remove_stale_artifact()?;

        let label = self.build.to_string();
        let result = run_captured(Stage::Build, &label, self.build.to_command(), self.timeout)?;
        if result.status != Some(0) {
            tracing::warn!(command = %label, status = ?result.status, "build step exited unsuccessfully");
        }

        if !self.executable.is_file() {
            return Err(HarnessError::MissingArtifact {
                path: self.executable.clone(),
            });
        }
        Ok(Artifact::owned(&self.executable))
    }

    fn execute(&mut self, artifact: Artifact) -> HarnessResult<ProcessResult> {
        let label = artifact.to_string();
        run_captured(Stage::Run, &label, Command::new(artifact.path()), self.timeout)
    }
}

/// A bare file name would be looked up on `PATH`; anchor it to the working directory instead.
fn runnable_path(path: &Path) -> PathBuf {
    if path.parent() == Some(Path::new("")) {
        Path::new(".").join(path)
    } else {
        path.to_path_buf()
    }
}

// ============================================================================
// Child process plumbing
// ============================================================================

/// Process ids of stages currently running; each is also the id of the stage's process group.
static RUNNING: Mutex<Vec<u32>> = Mutex::new(Vec::new());

/// Kill every running stage and all of its descendants.
///
/// Meant for an interrupt handler: the harness is about to exit without unwinding, so guards will not run.
pub fn terminate_running() {
    let running = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
    for &pid in running.iter() {
        kill_process_group(pid);
    }
}

/// Owns a running child and terminates it, with its whole process group, when dropped.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn spawn(command: &mut Command) -> io::Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let child = command.spawn()?;
        RUNNING
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(child.id());
        Ok(Self { child, reaped: false })
    }

    /// Wait for exit, giving up at `deadline`.
    ///
    /// Returns `Ok(None)` on timeout; the child is still running and will be killed on drop.
    fn wait(&mut self, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
        let Some(deadline) = deadline else {
            let status = self.child.wait()?;
            self.reaped = true;
            return Ok(Some(status));
        };

        loop {
            if let Some(status) = self.child.try_wait()? {
                self.reaped = true;
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let pid = self.child.id();
        // Descendants may outlive a child that already exited; the group outlives it with them.
        kill_process_group(pid);
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        RUNNING
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|&running| running != pid);
    }
}

#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(pid) else {
        return;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::debug!(pgid = pid, error = %e, "could not kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Collect a drained pipe, or `None` if `deadline` passes first.
fn collect(pipe: Option<Receiver<String>>, deadline: Option<Instant>) -> Option<String> {
    let Some(pipe) = pipe else {
        return Some(String::new());
    };
    let received = match deadline {
        Some(deadline) => pipe.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => pipe.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(text) => Some(text),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}

/// Spawn `command`, wait for it to finish, and capture its output.
#[tracing::instrument(skip_all, fields(stage = stage.as_str(), command = %label))]
fn run_captured(
    stage: Stage,
    label: &str,
    mut command: Command,
    timeout: Option<Duration>,
) -> HarnessResult<ProcessResult> {
    let invocation_error = |source: io::Error| HarnessError::Invocation {
        command: label.to_string(),
        source,
    };

    command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    tracing::debug!("spawning");
    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    let mut guard = ChildGuard::spawn(&mut command).map_err(invocation_error)?;

    let stdout = guard.child.stdout.take().map(drain);
    let stderr = guard.child.stderr.take().map(drain);

    let finished = match guard.wait(deadline).map_err(invocation_error)? {
        Some(status) => collect(stdout, deadline)
            .zip(collect(stderr, deadline))
            .map(|(stdout, stderr)| (status, stdout, stderr)),
        None => None,
    };
    // Killing the group also closes any pipe a descendant still holds, which ends the reader threads.
    drop(guard);

    let Some((status, stdout, stderr)) = finished else {
        let timeout = timeout.unwrap_or_default();
        tracing::warn!(timeout_secs = timeout.as_secs(), "invocation timed out");
        return Err(HarnessError::InvocationTimeout {
            command: label.to_string(),
            timeout,
        });
    };

    let lines = output_lines(&stdout);
    if !stderr.trim().is_empty() {
        tracing::debug!(stderr = %stderr.trim_end(), "captured stderr");
    }
    tracing::debug!(status = ?status.code(), lines = lines.len(), "finished");

    Ok(ProcessResult {
        lines,
        status: status.code(),
    })
}
