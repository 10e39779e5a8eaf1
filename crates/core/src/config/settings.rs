use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::defaults;

/// Key prefix used by editor-style settings files
pub const SETTINGS_PREFIX: &str = "code-runner.";

/// A read-only snapshot of the layered settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Explicit working directory, empty for automatic selection
    pub cwd: String,
    pub file_directory_as_cwd: bool,
    pub ignore_selection: bool,
    pub save_all_files_before_run: bool,
    pub save_file_before_run: bool,
    pub respect_shebang: bool,

    /// Language id -> command template
    pub executor_map: IndexMap<String, String>,
    /// File name glob -> command template, checked in order before `executor_map`
    pub executor_map_by_glob: IndexMap<String, String>,
    /// File extension (with dot) -> command template
    pub executor_map_by_file_extension: IndexMap<String, String>,
    pub default_language: String,
    pub custom_command: String,
    pub language_id_to_file_extension_map: IndexMap<String, String>,
    pub temporary_file_name: String,

    pub run_in_terminal: bool,
    pub preserve_focus: bool,
    pub clear_previous_output: bool,
    pub show_execution_message: bool,
    pub terminal_root: String,

    /// Legacy interpreter setting consulted when no environment is active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_path: Option<String>,
    /// Stand-in for the host's default Windows terminal profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_terminal_profile: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: String::new(),
            file_directory_as_cwd: false,
            ignore_selection: false,
            save_all_files_before_run: false,
            save_file_before_run: false,
            respect_shebang: true,
            executor_map: defaults::executor_map(),
            executor_map_by_glob: defaults::executor_map_by_glob(),
            executor_map_by_file_extension: defaults::executor_map_by_file_extension(),
            default_language: String::new(),
            custom_command: String::new(),
            language_id_to_file_extension_map: defaults::language_id_to_file_extension_map(),
            temporary_file_name: defaults::TEMPORARY_FILE_NAME.to_string(),
            run_in_terminal: false,
            preserve_focus: true,
            clear_previous_output: false,
            show_execution_message: true,
            terminal_root: String::new(),
            python_path: None,
            default_terminal_profile: None,
        }
    }
}

impl Config {
    /// Read one settings layer as raw JSON, with any `code-runner.` key prefix removed
    pub fn load_layer(path: &Path) -> Result<Value> {
        let contents = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse config {}: {e}", path.display()))
        })?;
        match value {
            Value::Object(map) => Ok(Value::Object(
                map.into_iter()
                    .map(|(key, value)| match key.strip_prefix(SETTINGS_PREFIX) {
                        Some(stripped) => (stripped.to_string(), value),
                        None => (key, value),
                    })
                    .collect(),
            )),
            _ => Err(Error::ConfigError(format!(
                "Config {} must contain a JSON object",
                path.display()
            ))),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let layer = Self::load_layer(path)?;
        Self::from_layers([layer])
    }

    /// Build a config by merging layers over the built-in defaults
    pub fn from_layers(layers: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        for layer in layers {
            super::merge::merge_values(&mut merged, layer);
        }
        serde_json::from_value(merged)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Configured language keys, in map order
    pub fn languages(&self) -> Vec<String> {
        self.executor_map.keys().cloned().collect()
    }

    /// Configured working directory, if any
    pub fn explicit_cwd(&self) -> Option<&str> {
        Some(self.cwd.trim()).filter(|cwd| !cwd.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.respect_shebang);
        assert!(config.show_execution_message);
        assert!(!config.run_in_terminal);
        assert_eq!(config.executor_map.get("python"), Some(&"python -u".to_string()));
        assert_eq!(config.temporary_file_name, "tempCodeRunnerFile");
        assert_eq!(config.explicit_cwd(), None);
    }

    #[test]
    fn test_layer_overrides_scalars_and_merges_maps() {
        let config = Config::from_layers([json!({
            "runInTerminal": true,
            "executorMap": { "python": "python3", "brainfuck": "bf" }
        })])
        .unwrap();

        assert!(config.run_in_terminal);
        assert_eq!(config.executor_map.get("python"), Some(&"python3".to_string()));
        assert_eq!(config.executor_map.get("brainfuck"), Some(&"bf".to_string()));
        // Untouched defaults survive the merge
        assert_eq!(config.executor_map.get("ruby"), Some(&"ruby".to_string()));
    }

    #[test]
    fn test_load_layer_strips_settings_prefix() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "code-runner.runInTerminal": true, "code-runner.cwd": "/srv" }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert!(config.run_in_terminal);
        assert_eq!(config.explicit_cwd(), Some("/srv"));
    }

    #[test]
    fn test_non_object_layer_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            Config::load_layer(&path),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".code-runner.json");
        let mut config = Config::default();
        config.custom_command = "make run".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
