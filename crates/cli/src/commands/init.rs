use anyhow::{Context, Result};
use code_runner_core::config::CONFIG_FILE_NAME;
use serde_json::json;
use std::{env, fs, path::PathBuf};
use tracing::info;

/// Starter project config: a few commonly tweaked settings and an example executor
fn starter_config() -> serde_json::Value {
    json!({
        "executorMap": {
            "python": "python -u",
            "javascript": "node"
        },
        "executorMapByGlob": {},
        "fileDirectoryAsCwd": false,
        "runInTerminal": false,
        "clearPreviousOutput": false,
        "showExecutionMessage": true,
        "customCommand": ""
    })
}

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    let project_root = if let Some(cwd) = cwd {
        PathBuf::from(cwd)
    } else {
        env::current_dir().context("Failed to get current directory")?
    };

    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let contents = serde_json::to_string_pretty(&starter_config())?;
    fs::write(&config_path, contents)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Wrote {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Settings in this file override your user config for files under");
    println!("   {}", project_root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_runner_core::Config;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        init_command(Some(dir), false).unwrap();
        let config = Config::load_from_file(&temp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.executor_map.get("python").map(String::as_str), Some("python -u"));
        // Keys the starter does not name keep their defaults
        assert!(config.executor_map.contains_key("ruby"));
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{\"runInTerminal\": true}").unwrap();
        let dir = temp.path().to_str().unwrap();

        init_command(Some(dir), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"runInTerminal\": true}");

        init_command(Some(dir), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("executorMap"));
    }
}
