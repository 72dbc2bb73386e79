use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::types::{CancelToken, CommandResult, DockerCommand, OutputLine};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn `docker` and return a channel that streams its output.
///
/// The caller receives [`OutputLine::Stdout`]/[`OutputLine::Stderr`] as they
/// arrive, followed by exactly one [`OutputLine::Done`] carrying the final result.
pub fn spawn(cmd: DockerCommand, cancel: CancelToken) -> Result<Receiver<OutputLine>> {
    debug!(program = %cmd.program, args = ?cmd.args, "spawning docker");

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| {
            format!(
                "failed to spawn `{}`. Is it installed and on PATH?",
                cmd.program
            )
        })?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let (tx, rx) = mpsc::channel();
    let name = cmd.name();

    std::thread::spawn(move || {
        orchestrate(child, stdout, stderr, tx, cancel, cmd.timeout, name);
    });

    Ok(rx)
}

/// Forward lines from one pipe into the channel while keeping a copy.
fn pump<R, F>(pipe: R, buf: Arc<Mutex<String>>, tx: Sender<OutputLine>, wrap: F) -> JoinHandle<()>
where
    R: Read + Send + 'static,
    F: Fn(String) -> OutputLine + Send + 'static,
{
    std::thread::spawn(move || {
        let reader = BufReader::new(pipe);
        for line in reader.lines() {
            let Ok(l) = line else { break };
            if let Ok(mut buf) = buf.lock() {
                buf.push_str(&l);
                buf.push('\n');
            }
            // Receiver may be gone once the UI has moved on.
            let _ = tx.send(wrap(l));
        }
    })
}

fn orchestrate(
    mut child: Child,
    stdout: std::process::ChildStdout,
    stderr: std::process::ChildStderr,
    tx: Sender<OutputLine>,
    cancel: CancelToken,
    timeout: Duration,
    name: String,
) {
    let out_buf = Arc::new(Mutex::new(String::new()));
    let err_buf = Arc::new(Mutex::new(String::new()));

    let stdout_handle = pump(stdout, out_buf.clone(), tx.clone(), OutputLine::Stdout);
    let stderr_handle = pump(stderr, err_buf.clone(), tx.clone(), OutputLine::Stderr);

    let start = Instant::now();
    let mut cancelled = false;
    let mut timed_out = false;

    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                warn!(command = %name, error = %e, "failed to poll docker process");
                break None;
            }
        }

        if cancel.is_cancelled() {
            cancelled = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        if start.elapsed() > timeout {
            timed_out = true;
            warn!(command = %name, ?timeout, "docker timed out, killing");
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        std::thread::sleep(POLL_INTERVAL);
    };

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let exit_code = exit_status.and_then(|s| s.code());
    let take = |buf: &Arc<Mutex<String>>| buf.lock().map(|b| b.clone()).unwrap_or_default();

    debug!(command = %name, ?exit_code, cancelled, timed_out, "docker finished");

    let _ = tx.send(OutputLine::Done(CommandResult {
        success: exit_code == Some(0),
        exit_code,
        stdout: take(&out_buf),
        stderr: take(&err_buf),
        cancelled,
        timed_out,
    }));
}

/// Drain a stream until its final result, discarding intermediate lines.
pub(crate) fn wait(rx: Receiver<OutputLine>) -> CommandResult {
    for line in rx {
        if let OutputLine::Done(result) = line {
            return result;
        }
    }
    CommandResult::default()
}
