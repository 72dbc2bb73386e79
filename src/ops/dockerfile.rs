use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::{DirEntry, WalkDir};

pub const DOCKERFILE: &str = "Dockerfile";

/// Write `contents` to `<dir>/Dockerfile`, replacing any existing file.
pub fn write_dockerfile(dir: &Path, contents: &str) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!("Directory not found: {}", dir.display());
    }
    let path = dir.join(DOCKERFILE);
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Walk the tree under `root` for directories holding a `Dockerfile`.
/// Returns relative directory paths, sorted, with `root` itself first when it qualifies.
pub fn discover_dockerfiles(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut matches: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !should_skip(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == DOCKERFILE)
        .filter_map(|e| {
            let parent = e.path().parent()?;
            parent.strip_prefix(root).ok().map(Path::to_path_buf)
        })
        .collect();

    // Empty path (the root) sorts first.
    matches.sort();
    matches
}

fn should_skip(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || matches!(name.as_ref(), "target" | "node_modules" | "vendor")
}
