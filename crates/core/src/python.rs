//! Python interpreter lookup for the `$pythonPath` placeholder

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Interpreter used when no environment can answer
pub const DEFAULT_PYTHON: &str = "python";

/// Structured answer from a Python environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionDetails {
    pub exec_command: Option<Vec<String>>,
}

/// Source of the interpreter command for a document
pub trait PythonEnvironment {
    /// Structured accessor; `None` when the environment does not provide one
    fn execution_details(&self, _document: Option<&Path>) -> Option<Result<ExecutionDetails>> {
        None
    }

    /// Legacy accessor consulted when there is no structured one
    fn execution_command(&self, document: Option<&Path>) -> Result<Option<Vec<String>>>;
}

/// Resolve the interpreter command, joining its tokens with single spaces.
/// Absence or any failure yields [`DEFAULT_PYTHON`].
pub fn resolve_python_path(env: Option<&dyn PythonEnvironment>, document: Option<&Path>) -> String {
    let Some(env) = env else {
        return DEFAULT_PYTHON.to_string();
    };

    let command = match env.execution_details(document) {
        Some(details) => details.map(|d| d.exec_command),
        None => env.execution_command(document),
    };

    match command {
        Ok(Some(tokens)) if !tokens.is_empty() => tokens.join(" "),
        Ok(_) => DEFAULT_PYTHON.to_string(),
        Err(e) => {
            debug!("Python path lookup failed, using '{}': {}", DEFAULT_PYTHON, e);
            DEFAULT_PYTHON.to_string()
        }
    }
}

/// Environment backed by an activated virtualenv/conda env, then a configured path
#[derive(Debug, Clone, Default)]
pub struct VirtualEnvPython {
    active_env: Option<PathBuf>,
    configured: Option<String>,
}

impl VirtualEnvPython {
    /// Read the active environment from `VIRTUAL_ENV` or `CONDA_PREFIX`
    pub fn from_env(configured: Option<String>) -> Self {
        let active_env = std::env::var_os("VIRTUAL_ENV")
            .or_else(|| std::env::var_os("CONDA_PREFIX"))
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty());
        Self {
            active_env,
            configured: configured.filter(|p| !p.trim().is_empty()),
        }
    }

    pub fn new(active_env: Option<PathBuf>, configured: Option<String>) -> Self {
        Self {
            active_env,
            configured,
        }
    }

    fn interpreter_in(env: &Path) -> PathBuf {
        if cfg!(windows) {
            let scripts = env.join("Scripts").join("python.exe");
            if scripts.exists() {
                return scripts;
            }
            env.join("python.exe")
        } else {
            env.join("bin").join("python")
        }
    }
}

impl PythonEnvironment for VirtualEnvPython {
    fn execution_details(&self, _document: Option<&Path>) -> Option<Result<ExecutionDetails>> {
        let env = self.active_env.as_ref()?;
        let interpreter = Self::interpreter_in(env);
        Some(Ok(ExecutionDetails {
            exec_command: Some(vec![interpreter.display().to_string()]),
        }))
    }

    fn execution_command(&self, _document: Option<&Path>) -> Result<Option<Vec<String>>> {
        Ok(self.configured.clone().map(|p| vec![p]))
    }
}
