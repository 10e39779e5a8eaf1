use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An executor template together with the language id it was resolved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub template: String,
    pub language_id: String,
}

impl ResolvedCommand {
    pub fn new(template: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            language_id: language_id.into(),
        }
    }
}

/// The file that is actually handed to the shell
#[derive(Debug, PartialEq, Eq)]
pub struct ExecutionTarget {
    path: PathBuf,
    temporary: bool,
}

impl ExecutionTarget {
    /// The document's own file, left untouched after the run
    pub fn in_place(path: PathBuf) -> Self {
        Self {
            path,
            temporary: false,
        }
    }

    /// A scratch file owned by the run that created it
    pub fn temporary(path: PathBuf) -> Self {
        Self {
            path,
            temporary: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Delete the scratch file. Consumes the target so it can only happen once;
    /// failures are logged and swallowed.
    pub fn cleanup(self) {
        if !self.temporary {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temporary file: {:?}", self.path),
            Err(e) => warn!("Failed to remove temporary file {:?}: {}", self.path, e),
        }
    }
}
