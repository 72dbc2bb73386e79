use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;

use crate::config::{self, Config};
use crate::ops::{ActionRequest, validate};

/// Cloud Management System: a terminal UI for Docker containers and images.
#[derive(Debug, Parser)]
#[command(name = "cloudman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Memory size for a VM container (MB). Requires --disk; skips the UI.
    #[arg(long, value_name = "MB")]
    pub memory: Option<String>,

    /// Disk size for a VM container (GB). Requires --memory; skips the UI.
    #[arg(long, value_name = "GB")]
    pub disk: Option<String>,

    /// Path to a YAML config file (default: ./.cloudman.yaml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve the config: an explicit `--config` must exist, otherwise look in `cwd`.
    pub fn load_config(&self, cwd: &Path) -> Result<Config> {
        match &self.config {
            Some(path) => config::load_from(path),
            None => config::load(cwd),
        }
    }

    /// The headless "create VM" request, if `--memory`/`--disk` were given.
    pub fn headless_request(&self) -> Result<Option<ActionRequest>> {
        match (&self.memory, &self.disk) {
            (None, None) => Ok(None),
            (Some(memory), Some(disk)) => Ok(Some(ActionRequest::CreateVm {
                memory_mb: validate::positive_int(memory)?,
                disk_gb: validate::positive_int(disk)?,
            })),
            _ => bail!("--memory and --disk must be given together"),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "cloudman=debug"
        } else {
            "cloudman=info"
        }
    }
}
