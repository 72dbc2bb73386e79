use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use tracing::{error, info};

use crate::config::Config;
use crate::docker::{self, CancelToken, DockerCommand, OutputLine};

use super::commands::{
    build_command, create_vm_command, list_containers_command, list_images_command, pull_command,
    search_hub_command, stop_command,
};
use super::dockerfile::write_dockerfile;
use super::format::{
    container_lines, filter_images, group_images, image_lines, parse_rows, search_lines,
};
use super::types::{ActionEvent, ActionRequest, ContainerRow, ImageRow, Outcome, SearchHit};

/// Run `request` on a background thread.
///
/// Returns a receiver streaming [`ActionEvent::Log`] lines followed by exactly
/// one [`ActionEvent::Finished`].
pub fn run_action(request: ActionRequest, cfg: Config, cancel: CancelToken) -> Receiver<ActionEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let log_tx = tx.clone();
        let outcome = execute(&request, &cfg, &cancel, |line| {
            let _ = log_tx.send(ActionEvent::Log(line.to_string()));
        });
        let _ = tx.send(ActionEvent::Finished(outcome));
    });
    rx
}

/// Run `request` to completion on the current thread, reporting progress through `on_line`.
pub fn execute<F>(request: &ActionRequest, cfg: &Config, cancel: &CancelToken, mut on_line: F) -> Outcome
where
    F: FnMut(&str),
{
    let title = request.action().label();
    info!(action = title, "starting");

    let outcome = match request {
        ActionRequest::CreateVm { memory_mb, disk_gb } => {
            let cmd = create_vm_command(cfg, *memory_mb, *disk_gb);
            match docker_output(cmd, cancel, false, &mut on_line) {
                Ok(out) if out.trim().is_empty() => Outcome::error(
                    title,
                    "Failed to create VM: docker run printed no container ID",
                ),
                Ok(out) => Outcome::info(title, format!("VM created with ID: {}", out.trim())),
                Err(e) => Outcome::error(title, format!("Failed to create VM: {e:#}")),
            }
        }
        ActionRequest::CreateDockerfile { dir, contents } => match write_dockerfile(dir, contents) {
            Ok(path) => {
                on_line(&format!("wrote {}", path.display()));
                Outcome::info(title, format!("Dockerfile created at path: {}", path.display()))
            }
            Err(e) => Outcome::error(title, format!("Failed to create Dockerfile: {e:#}")),
        },
        ActionRequest::BuildImage { context, tag } => {
            let cmd = build_command(cfg, context, tag);
            match docker_output(cmd, cancel, true, &mut on_line) {
                Ok(_) => Outcome::info(title, "Docker image built successfully."),
                Err(e) => Outcome::error(title, format!("Failed to build image: {e:#}")),
            }
        }
        ActionRequest::ListImages => {
            let cmd = list_images_command(cfg);
            listing(title, "Failed to list images", cmd, cancel, &mut on_line, |out| {
                Ok(image_lines(&group_images(parse_rows::<ImageRow>(out)?)))
            })
        }
        ActionRequest::ListContainers => {
            let cmd = list_containers_command(cfg);
            listing(title, "Failed to list containers", cmd, cancel, &mut on_line, |out| {
                Ok(container_lines(&parse_rows::<ContainerRow>(out)?))
            })
        }
        ActionRequest::StopContainer { id } => {
            match docker_output(stop_command(cfg, id), cancel, false, &mut on_line) {
                Ok(_) => Outcome::info(title, format!("Container {id} stopped successfully.")),
                Err(e) => Outcome::error(title, format!("Failed to stop container: {e:#}")),
            }
        }
        ActionRequest::SearchLocal { term } => {
            let cmd = list_images_command(cfg);
            listing(title, "Failed to search images", cmd, cancel, &mut on_line, |out| {
                let rows = filter_images(parse_rows::<ImageRow>(out)?, term);
                Ok(image_lines(&group_images(rows)))
            })
        }
        ActionRequest::SearchHub { term } => {
            let cmd = search_hub_command(cfg, term);
            listing(title, "Failed to search Docker Hub", cmd, cancel, &mut on_line, |out| {
                Ok(search_lines(&parse_rows::<SearchHit>(out)?))
            })
        }
        ActionRequest::PullImage { reference } => {
            match docker_output(pull_command(cfg, reference), cancel, true, &mut on_line) {
                Ok(_) => Outcome::info(title, format!("Image {reference} pulled successfully.")),
                Err(e) => Outcome::error(title, format!("Failed to pull image: {e:#}")),
            }
        }
    };

    if outcome.is_error() {
        error!(action = title, detail = %outcome.message, "failed");
    } else {
        info!(action = title, "finished");
    }
    outcome
}

/// Run a listing command and turn its stdout into message-box lines.
fn listing<F, P>(
    title: &str,
    failure: &str,
    cmd: DockerCommand,
    cancel: &CancelToken,
    on_line: &mut F,
    present: P,
) -> Outcome
where
    F: FnMut(&str),
    P: FnOnce(&str) -> Result<Vec<String>>,
{
    match docker_output(cmd, cancel, false, on_line).and_then(|out| present(&out)) {
        Ok(lines) => {
            // Keep the result reachable after the message box is closed.
            for line in &lines {
                on_line(line);
            }
            Outcome::info(title, lines.join("\n"))
        }
        Err(e) => Outcome::error(title, format!("{failure}: {e:#}")),
    }
}

/// Run one `docker` command. With `stream`, every output line is forwarded;
/// otherwise only stderr is (stdout is the structured result).
fn docker_output<F>(cmd: DockerCommand, cancel: &CancelToken, stream: bool, on_line: &mut F) -> Result<String>
where
    F: FnMut(&str),
{
    on_line(&format!("$ {} {}", cmd.program, cmd.args.join(" ")));
    let name = cmd.name();
    let rx = docker::spawn(cmd, cancel.clone())?;

    for line in rx {
        match line {
            OutputLine::Stdout(l) if stream => on_line(&l),
            OutputLine::Stdout(_) => {}
            OutputLine::Stderr(l) => on_line(&l),
            OutputLine::Done(result) => return result.into_stdout(&name),
        }
    }
    anyhow::bail!("docker {name} ended without reporting a result")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dockerfile_request_writes_without_docker() {
        let dir = tempfile::tempdir().unwrap();
        let request = ActionRequest::CreateDockerfile {
            dir: dir.path().to_path_buf(),
            contents: "FROM alpine\n".into(),
        };

        let mut lines = Vec::new();
        let outcome = execute(&request, &Config::default(), &CancelToken::new(), |l| {
            lines.push(l.to_string())
        });

        assert!(!outcome.is_error(), "{outcome:?}");
        assert_eq!(outcome.title, "Create Dockerfile");
        assert_eq!(
            outcome.message,
            format!(
                "Dockerfile created at path: {}",
                dir.path().join("Dockerfile").display()
            )
        );
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn dockerfile_failure_becomes_error_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let request = ActionRequest::CreateDockerfile {
            dir: dir.path().join("gone"),
            contents: "FROM alpine\n".into(),
        };
        let outcome = execute(&request, &Config::default(), &CancelToken::new(), |_| {});
        assert!(outcome.is_error());
        assert!(outcome.message.starts_with("Failed to create Dockerfile: Directory not found"));
    }

    #[test]
    fn run_action_ends_with_exactly_one_finished() {
        let dir = tempfile::tempdir().unwrap();
        let request = ActionRequest::CreateDockerfile {
            dir: dir.path().to_path_buf(),
            contents: "FROM alpine\n".into(),
        };
        let rx = run_action(request, Config::default(), CancelToken::new());
        let events: Vec<ActionEvent> = rx.iter().collect();

        let finished = events
            .iter()
            .filter(|e| matches!(e, ActionEvent::Finished(_)))
            .count();
        assert_eq!(finished, 1);
        assert!(matches!(events.last(), Some(ActionEvent::Finished(_))));
    }

    #[test]
    fn engine_failure_is_reported_not_panicked() {
        // With or without docker installed, stopping a nonsense ID must fail cleanly.
        let request = ActionRequest::StopContainer {
            id: "cloudman-test-no-such-container-7f3e".into(),
        };
        let cfg = Config {
            docker_timeout: 30,
            ..Config::default()
        };
        let outcome = execute(&request, &cfg, &CancelToken::new(), |_| {});
        assert!(outcome.is_error());
        assert!(outcome.message.starts_with("Failed to stop container: "));
    }

    #[cfg(unix)]
    fn with_binary(program: &str) -> Config {
        Config {
            docker_binary: program.into(),
            docker_timeout: 30,
            ..Config::default()
        }
    }

    #[cfg(unix)]
    #[test]
    fn success_messages() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = with_binary("true");
        let cases = [
            (
                ActionRequest::BuildImage {
                    context: dir.path().to_path_buf(),
                    tag: "myapp:1.0".into(),
                },
                "Docker image built successfully.",
            ),
            (
                ActionRequest::StopContainer { id: "web".into() },
                "Container web stopped successfully.",
            ),
            (
                ActionRequest::PullImage {
                    reference: "alpine:3.20".into(),
                },
                "Image alpine:3.20 pulled successfully.",
            ),
            (ActionRequest::ListImages, "No images found."),
            (ActionRequest::ListContainers, "No running containers."),
            (
                ActionRequest::SearchLocal {
                    term: "redis".into(),
                },
                "No images found.",
            ),
            (
                ActionRequest::SearchHub {
                    term: "redis".into(),
                },
                "No matching images.",
            ),
        ];

        for (request, expected) in cases {
            let outcome = execute(&request, &cfg, &CancelToken::new(), |_| {});
            assert!(!outcome.is_error(), "{request:?}: {outcome:?}");
            assert_eq!(outcome.message, expected, "{request:?}");
            assert_eq!(outcome.title, request.action().label());
        }
    }

    #[cfg(unix)]
    #[test]
    fn create_vm_reports_printed_id() {
        // `echo` prints its arguments, standing in for the container ID.
        let request = ActionRequest::CreateVm {
            memory_mb: 64,
            disk_gb: 1,
        };
        let outcome = execute(&request, &with_binary("echo"), &CancelToken::new(), |_| {});
        assert!(!outcome.is_error(), "{outcome:?}");
        assert!(outcome.message.starts_with("VM created with ID: run --detach"));

        let outcome = execute(&request, &with_binary("true"), &CancelToken::new(), |_| {});
        assert_eq!(
            outcome,
            Outcome::error(
                "Create Virtual Machine",
                "Failed to create VM: docker run printed no container ID"
            )
        );
    }

    #[cfg(unix)]
    #[test]
    fn failure_messages() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = with_binary("false");
        let cases = [
            (
                ActionRequest::CreateVm {
                    memory_mb: 64,
                    disk_gb: 1,
                },
                "Failed to create VM: docker run exited with 1",
            ),
            (
                ActionRequest::BuildImage {
                    context: dir.path().to_path_buf(),
                    tag: "myapp:1.0".into(),
                },
                "Failed to build image: docker build exited with 1",
            ),
            (
                ActionRequest::ListImages,
                "Failed to list images: docker image ls exited with 1",
            ),
            (
                ActionRequest::ListContainers,
                "Failed to list containers: docker ps exited with 1",
            ),
            (
                ActionRequest::StopContainer { id: "web".into() },
                "Failed to stop container: docker stop exited with 1",
            ),
            (
                ActionRequest::SearchLocal {
                    term: "redis".into(),
                },
                "Failed to search images: docker image ls exited with 1",
            ),
            (
                ActionRequest::SearchHub {
                    term: "redis".into(),
                },
                "Failed to search Docker Hub: docker search exited with 1",
            ),
            (
                ActionRequest::PullImage {
                    reference: "alpine".into(),
                },
                "Failed to pull image: docker pull exited with 1",
            ),
        ];

        for (request, expected) in cases {
            let outcome = execute(&request, &cfg, &CancelToken::new(), |_| {});
            assert!(outcome.is_error(), "{request:?}: {outcome:?}");
            assert_eq!(outcome.message, expected, "{request:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn listing_results_are_also_logged() {
        let mut lines = Vec::new();
        let outcome = execute(
            &ActionRequest::ListImages,
            &with_binary("true"),
            &CancelToken::new(),
            |l| lines.push(l.to_string()),
        );
        assert_eq!(outcome.message, "No images found.");
        assert_eq!(
            lines.first().map(String::as_str),
            Some("$ true image ls --no-trunc --format {{json .}}")
        );
        assert_eq!(lines.last().map(String::as_str), Some("No images found."));
    }
}
