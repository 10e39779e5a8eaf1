use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::host::{find_workspace_root, CliHost};

/// List every language id with a configured executor
pub fn languages_command(workspace: Option<&Path>) -> Result<()> {
    let workspace = match workspace {
        Some(dir) => Some(PathBuf::from(dir)),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            find_workspace_root(&cwd).or(Some(cwd))
        }
    };

    let host = CliHost::new(None, workspace, serde_json::json!({}))?;
    for language in host.config().languages() {
        println!("{}", language);
    }
    Ok(())
}
