use code_runner_core::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};

const WORKSPACE_MARKERS: &[&str] = &[".git", ".vscode", CONFIG_FILE_NAME];

/// The nearest ancestor of `start` (inclusive) that looks like a workspace folder
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| WORKSPACE_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .map(Path::to_path_buf)
}
