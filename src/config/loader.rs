use std::path::Path;

use anyhow::{Context, Result, bail};

use super::types::Config;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".cloudman.yaml";

/// Load `.cloudman.yaml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from(&path)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.is_file() {
        bail!("Config file not found: {}", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).with_context(|| format!("invalid config in {}", path.display()))
}
