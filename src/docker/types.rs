use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};

/// Cooperative cancellation token backed by an `AtomicBool`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

const MANAGEMENT_GROUPS: [&str; 4] = ["image", "container", "system", "volume"];

/// Program invoked when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "docker";

/// A single engine CLI invocation. `args` excludes the program itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCommand {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl DockerCommand {
    pub fn new(args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args,
            timeout,
        }
    }

    /// Run a docker-compatible CLI (e.g. `podman`) instead of `docker`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Subcommand name used in log lines and error messages, e.g. `"image ls"`.
    pub fn name(&self) -> String {
        match self.args.as_slice() {
            [group, sub, ..] if MANAGEMENT_GROUPS.contains(&group.as_str()) => {
                format!("{group} {sub}")
            }
            [first, ..] => first.clone(),
            [] => String::new(),
        }
    }
}

/// Outcome of a finished `docker` process.
#[derive(Debug, Default)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub cancelled: bool,
    pub timed_out: bool,
}

impl CommandResult {
    /// Return stdout on success, otherwise an error carrying the daemon's message.
    pub fn into_stdout(self, name: &str) -> Result<String> {
        if self.success {
            return Ok(self.stdout);
        }
        if self.cancelled {
            bail!("docker {name} was cancelled");
        }
        if self.timed_out {
            bail!("docker {name} timed out");
        }
        let stderr = self.stderr.trim();
        match (self.exit_code, stderr.is_empty()) {
            (Some(code), false) => bail!("docker {name} exited with {code}: {stderr}"),
            (Some(code), true) => bail!("docker {name} exited with {code}"),
            (None, false) => bail!("docker {name} terminated abnormally: {stderr}"),
            (None, true) => bail!("docker {name} terminated abnormally"),
        }
    }
}

/// Streamed output from a running `docker` process.
#[derive(Debug)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
    Done(CommandResult),
}
