//! Integration tests against a live Docker daemon.
//!
//! These require a running daemon (and network access for pulls) and are
//! marked `#[ignore]`. Run with: `cargo test -- --ignored`

use std::sync::mpsc;

use cloudman::config::Config;
use cloudman::docker::CancelToken;
use cloudman::ops::{ActionEvent, ActionRequest, Outcome, execute, run_action};

const SMALL_IMAGE: &str = "busybox:1.36";

fn cfg() -> Config {
    Config {
        vm_image: SMALL_IMAGE.into(),
        docker_timeout: 300,
        search_limit: 5,
        ..Config::default()
    }
}

fn run(request: ActionRequest) -> Outcome {
    execute(&request, &cfg(), &CancelToken::new(), |_| {})
}

/// Collect events until the terminal `Finished`.
fn collect(rx: mpsc::Receiver<ActionEvent>) -> (Vec<String>, Outcome) {
    let mut logs = Vec::new();
    for ev in rx {
        match ev {
            ActionEvent::Log(line) => logs.push(line),
            ActionEvent::Finished(outcome) => return (logs, outcome),
        }
    }
    panic!("action ended without a Finished event");
}

#[test]
#[ignore]
fn pull_then_list_shows_image() {
    let rx = run_action(
        ActionRequest::PullImage {
            reference: SMALL_IMAGE.into(),
        },
        cfg(),
        CancelToken::new(),
    );
    let (logs, outcome) = collect(rx);
    assert!(!outcome.is_error(), "{outcome:?}");
    assert_eq!(
        outcome.message,
        format!("Image {SMALL_IMAGE} pulled successfully.")
    );
    assert!(logs[0].starts_with("$ docker pull"));

    let listing = run(ActionRequest::ListImages);
    assert!(!listing.is_error(), "{listing:?}");
    assert!(
        listing.message.contains(SMALL_IMAGE),
        "image list should mention {SMALL_IMAGE}:\n{}",
        listing.message
    );

    let local = run(ActionRequest::SearchLocal {
        term: "busybox".into(),
    });
    assert!(local.message.contains("busybox"), "{}", local.message);
}

#[test]
#[ignore]
fn create_vm_list_and_stop() {
    let created = run(ActionRequest::CreateVm {
        memory_mb: 64,
        disk_gb: 1,
    });
    assert!(!created.is_error(), "{created:?}");
    let id = created
        .message
        .strip_prefix("VM created with ID: ")
        .expect("message should carry the container ID")
        .to_string();
    assert_eq!(id.len(), 64);

    let listing = run(ActionRequest::ListContainers);
    assert!(listing.message.contains(&id), "{}", listing.message);

    let stopped = run(ActionRequest::StopContainer { id: id.clone() });
    assert!(!stopped.is_error(), "{stopped:?}");
    assert_eq!(stopped.message, format!("Container {id} stopped successfully."));

    // Clean up the stopped container.
    let _ = cloudman::docker::capture(&["rm", id.as_str()], std::time::Duration::from_secs(30));
}

#[test]
#[ignore]
fn build_from_written_dockerfile() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");

    let written = run(ActionRequest::CreateDockerfile {
        dir: dir.path().to_path_buf(),
        contents: format!("FROM {SMALL_IMAGE}\nCMD [\"true\"]\n"),
    });
    assert!(!written.is_error(), "{written:?}");

    let built = run(ActionRequest::BuildImage {
        context: dir.path().to_path_buf(),
        tag: "cloudman-test:latest".into(),
    });
    assert!(!built.is_error(), "{built:?}");

    let _ = cloudman::docker::capture(
        &["image", "rm", "cloudman-test:latest"],
        std::time::Duration::from_secs(30),
    );
}

#[test]
#[ignore]
fn hub_search_returns_official_image() {
    let outcome = run(ActionRequest::SearchHub {
        term: "alpine".into(),
    });
    assert!(!outcome.is_error(), "{outcome:?}");
    assert!(outcome.message.contains("Image Name: alpine [official]"));
    assert!(outcome.message.lines().count() <= 5);
}

#[test]
#[ignore]
fn stopping_unknown_container_reports_daemon_error() {
    let outcome = run(ActionRequest::StopContainer {
        id: "cloudman-no-such-container".into(),
    });
    assert!(outcome.is_error());
    assert!(outcome.message.contains("No such container"), "{}", outcome.message);
}

#[test]
#[ignore]
fn cancelled_pull_is_reported_as_failure() {
    let cancel = CancelToken::new();
    let rx = run_action(
        ActionRequest::PullImage {
            reference: "ubuntu:24.04".into(),
        },
        cfg(),
        cancel.clone(),
    );
    cancel.cancel();
    let (_, outcome) = collect(rx);
    // The pull may already be cached and finish before cancellation is observed.
    if outcome.is_error() {
        assert!(outcome.message.starts_with("Failed to pull image:"));
    }
}
