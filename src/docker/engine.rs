use std::time::Duration;

use anyhow::{Context, Result, bail};

use super::run::{spawn, wait};
use super::types::{CancelToken, DockerCommand};

const VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Verify that the daemon behind `program` is reachable and return its server version.
pub fn ensure_available(program: &str) -> Result<String> {
    let cmd = DockerCommand::new(
        vec!["version".into(), "--format".into(), "{{.Server.Version}}".into()],
        VERSION_TIMEOUT,
    )
    .with_program(program);
    let version = capture_command(cmd).context("docker daemon is not reachable")?;
    let version = version.trim();
    if version.is_empty() {
        bail!("docker daemon did not report a server version");
    }
    Ok(version.to_string())
}

/// Run `docker` to completion and return its stdout.
///
/// A non-zero exit turns into an error carrying the daemon's stderr.
pub fn capture<S: AsRef<str>>(args: &[S], timeout: Duration) -> Result<String> {
    let cmd = DockerCommand::new(args.iter().map(|a| a.as_ref().to_string()).collect(), timeout);
    capture_command(cmd)
}

/// [`capture`] for a prepared command, honouring its program and timeout.
pub fn capture_command(cmd: DockerCommand) -> Result<String> {
    let name = cmd.name();
    let rx = spawn(cmd, CancelToken::new())?;
    wait(rx).into_stdout(&name)
}
