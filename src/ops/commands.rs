use std::path::Path;

use crate::config::Config;
use crate::docker::DockerCommand;

/// Labels attached to containers started by "Create VM".
pub const LABEL_MEMORY: &str = "cloudman.memory_mb";
pub const LABEL_DISK: &str = "cloudman.disk_gb";

fn json_format() -> [String; 2] {
    ["--format".into(), "{{json .}}".into()]
}

fn command(cfg: &Config, args: Vec<String>) -> DockerCommand {
    DockerCommand::new(args, cfg.timeout()).with_program(&cfg.docker_binary)
}

/// `docker run` for a detached, tty-attached "VM" container with a memory limit.
///
/// The engine has no portable per-container disk quota, so the disk size is
/// recorded as a label alongside the memory size.
pub fn create_vm_command(cfg: &Config, memory_mb: u64, disk_gb: u64) -> DockerCommand {
    let args = vec![
        "run".into(),
        "--detach".into(),
        "--tty".into(),
        "--memory".into(),
        format!("{memory_mb}m"),
        "--label".into(),
        format!("{LABEL_MEMORY}={memory_mb}"),
        "--label".into(),
        format!("{LABEL_DISK}={disk_gb}"),
        cfg.vm_image.clone(),
    ];
    command(cfg, args)
}

pub fn build_command(cfg: &Config, context: &Path, tag: &str) -> DockerCommand {
    let args = vec![
        "build".into(),
        "--tag".into(),
        tag.to_string(),
        context.display().to_string(),
    ];
    command(cfg, args)
}

pub fn list_images_command(cfg: &Config) -> DockerCommand {
    let mut args = vec!["image".into(), "ls".into(), "--no-trunc".into()];
    args.extend(json_format());
    command(cfg, args)
}

/// Running containers only, like `docker ps` without `--all`.
pub fn list_containers_command(cfg: &Config) -> DockerCommand {
    let mut args = vec!["ps".into(), "--no-trunc".into()];
    args.extend(json_format());
    command(cfg, args)
}

pub fn stop_command(cfg: &Config, id: &str) -> DockerCommand {
    command(cfg, vec!["stop".into(), id.to_string()])
}

pub fn search_hub_command(cfg: &Config, term: &str) -> DockerCommand {
    let mut args = vec![
        "search".into(),
        "--no-trunc".into(),
        "--limit".into(),
        cfg.search_limit.to_string(),
    ];
    args.extend(json_format());
    args.push(term.to_string());
    command(cfg, args)
}

pub fn pull_command(cfg: &Config, reference: &str) -> DockerCommand {
    command(cfg, vec!["pull".into(), reference.to_string()])
}
