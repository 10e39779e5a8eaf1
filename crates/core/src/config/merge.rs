//! Configuration layering for code-runner
//!
//! Implements the merging hierarchy: defaults -> user -> workspace root -> ... -> document directory.
//! Objects merge key-wise so a layer only needs to name the executors it changes;
//! every other value is replaced by the later layer.

use super::Config;
use crate::error::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name searched for in the workspace and document directories
pub const CONFIG_FILE_NAME: &str = ".code-runner.json";

/// Deep-merge `overlay` into `base`
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_values(existing, value)
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    overrides: Vec<Value>,
    loaded_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// A loader that reads the per-user file from the platform config directory
    pub fn new() -> Self {
        Self {
            user_config_path: Self::default_user_config_path(),
            ..Default::default()
        }
    }

    /// A loader that only reads project files, for embedding and tests
    pub fn without_user_config() -> Self {
        Self::default()
    }

    pub fn with_user_config(mut self, path: PathBuf) -> Self {
        self.user_config_path = Some(path);
        self
    }

    /// Add a final layer that wins over every file, e.g. command line flags
    pub fn with_override(mut self, layer: Value) -> Self {
        self.overrides.push(layer);
        self
    }

    pub fn default_user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("code-runner").join("config.json"))
    }

    /// Config files that contributed to the last `load`, outermost first
    pub fn loaded_paths(&self) -> &[PathBuf] {
        &self.loaded_paths
    }

    /// Load the snapshot that applies to a document in `start_dir`
    pub fn load(&mut self, start_dir: Option<&Path>, workspace_root: Option<&Path>) -> Result<Config> {
        debug!(
            "Loading config for dir: {:?}, workspace: {:?}",
            start_dir, workspace_root
        );
        self.loaded_paths.clear();

        let mut paths = Vec::new();
        if let Some(user) = self.user_config_path.as_ref().filter(|p| p.is_file()) {
            paths.push(user.clone());
        }
        paths.extend(Self::find_project_configs(start_dir, workspace_root));

        let mut layers = Vec::with_capacity(paths.len() + self.overrides.len());
        for path in &paths {
            debug!("Found config at: {:?}", path);
            layers.push(Config::load_layer(path)?);
        }
        layers.extend(self.overrides.iter().cloned());

        self.loaded_paths = paths;
        Config::from_layers(layers)
    }

    /// Collect `.code-runner.json` files from `start_dir` up to `stop_at`
    /// (inclusive), returned outermost first. Without a stop directory only the
    /// nearest file is used.
    pub fn find_project_configs(start_dir: Option<&Path>, stop_at: Option<&Path>) -> Vec<PathBuf> {
        let mut found = Vec::new();

        let start = match (start_dir, stop_at) {
            (Some(dir), _) => dir,
            (None, Some(root)) => root,
            (None, None) => return found,
        };

        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                found.push(candidate);
                if stop_at.is_none() {
                    break;
                }
            }
            if stop_at.is_some_and(|root| dir == root) {
                break;
            }
            current = dir.parent();
        }

        // A stop directory that is not an ancestor falls back to nearest-only
        if stop_at.is_some_and(|root| !start.starts_with(root)) {
            found.truncate(1);
        }

        found.reverse();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_merge_values_deep() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": true });
        merge_values(&mut base, json!({ "a": { "y": 3, "z": 4 }, "b": false }));
        assert_eq!(base, json!({ "a": { "x": 1, "y": 3, "z": 4 }, "b": false }));
    }

    #[test]
    fn test_merge_keeps_glob_order() {
        let mut base = json!({ "executorMapByGlob": { "pom.xml": "mvn" } });
        merge_values(
            &mut base,
            json!({ "executorMapByGlob": { "*.test.js": "jest", "pom.xml": "mvn -q" } }),
        );
        let keys: Vec<_> = base["executorMapByGlob"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["pom.xml", "*.test.js"]);
        assert_eq!(base["executorMapByGlob"]["pom.xml"], "mvn -q");
    }

    #[test]
    fn test_config_hierarchy_merging() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let nested = root.join("app").join("scripts");
        fs::create_dir_all(&nested).unwrap();

        fs::write(
            root.join(CONFIG_FILE_NAME),
            json!({ "runInTerminal": true, "executorMap": { "python": "python3" } }).to_string(),
        )
        .unwrap();
        fs::write(
            nested.join(CONFIG_FILE_NAME),
            json!({ "executorMap": { "ruby": "ruby -w" }, "cwd": "/srv" }).to_string(),
        )
        .unwrap();

        let mut loader = ConfigLoader::without_user_config();
        let config = loader.load(Some(&nested), Some(root)).unwrap();

        assert_eq!(loader.loaded_paths().len(), 2);
        assert_eq!(loader.loaded_paths()[0], root.join(CONFIG_FILE_NAME));
        assert!(config.run_in_terminal);
        assert_eq!(config.executor_map["python"], "python3");
        assert_eq!(config.executor_map["ruby"], "ruby -w");
        assert_eq!(config.explicit_cwd(), Some("/srv"));
    }

    #[test]
    fn test_nearest_only_without_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let nested = root.join("inner");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "{}").unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = ConfigLoader::find_project_configs(Some(&nested), None);
        assert_eq!(found, vec![nested.join(CONFIG_FILE_NAME)]);
    }

    #[test]
    fn test_user_config_and_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let user = temp_dir.path().join("user.json");
        fs::write(&user, json!({ "code-runner.clearPreviousOutput": true, "runInTerminal": true }).to_string())
            .unwrap();

        let mut loader = ConfigLoader::without_user_config()
            .with_user_config(user.clone())
            .with_override(json!({ "runInTerminal": false }));
        let config = loader.load(None, None).unwrap();

        assert_eq!(loader.loaded_paths(), &[user]);
        assert!(config.clear_previous_output);
        assert!(!config.run_in_terminal);
    }
}
