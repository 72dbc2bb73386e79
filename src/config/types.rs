use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Docker-compatible CLI to invoke.
    pub docker_binary: String,
    /// Image started by "Create VM".
    pub vm_image: String,
    /// Per-operation timeout in seconds.
    pub docker_timeout: u64,
    /// Maximum number of Docker Hub search results.
    pub search_limit: u32,
    pub dockerfile_search_depth: usize,
    pub default_memory_mb: Option<u64>,
    pub default_disk_gb: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.docker_timeout)
    }

    /// Resolved log destination. Falls back to the system temp dir.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("cloudman.log"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docker_binary: crate::docker::DEFAULT_PROGRAM.to_string(),
            vm_image: "cloud-management-system:latest".to_string(),
            docker_timeout: 120,
            search_limit: 25,
            dockerfile_search_depth: 3,
            default_memory_mb: None,
            default_disk_gb: None,
            log_file: None,
        }
    }
}
