//! Collaborators supplied by the editor (or CLI) embedding the runner

use crate::{
    config::Config,
    error::Result,
    python::PythonEnvironment,
    shell::ShellInfo,
    types::Document,
};
use std::path::{Path, PathBuf};

/// Name given to the output surface and the terminal
pub const CHANNEL_NAME: &str = "Code";

/// Context key toggled while a captured run is in flight
pub const RUNNING_CONTEXT_KEY: &str = "code-runner.codeRunning";

/// Line-buffered text sink for captured output
pub trait OutputChannel {
    fn append(&mut self, text: &str);

    fn append_line(&mut self, line: &str) {
        self.append(line);
        self.append("\n");
    }

    fn clear(&mut self);

    fn show(&mut self, preserve_focus: bool);
}

/// Interactive terminal commands are typed into
pub trait Terminal {
    fn show(&mut self, preserve_focus: bool);

    fn clear(&mut self) -> Result<()>;

    /// Send one line of input
    fn send_text(&mut self, text: &str) -> Result<()>;
}

/// Persisting dirty buffers before an in-place run
pub trait DocumentStore {
    fn save_all(&mut self) -> Result<()>;

    fn save_document(&mut self, document: &Document) -> Result<()>;
}

/// Everything the session controller needs from its host
pub trait EditorHost: DocumentStore {
    /// Document in the focused editor, with its current selection
    fn active_document(&self) -> Option<Document>;

    /// Open a document by path, e.g. for an explorer invocation
    fn open_document(&self, path: &Path) -> Result<Document>;

    /// Root of the workspace folder containing `document`, or of the first
    /// workspace folder; `None` when no folder is open
    fn workspace_folder(&self, document: Option<&Document>) -> Option<PathBuf>;

    /// Settings snapshot for a run of `document`
    fn configuration(&self, document: Option<&Document>) -> Result<Config>;

    fn show_information(&mut self, message: &str);

    /// Observable run-state signal for the host UI
    fn set_running_context(&mut self, running: bool);

    fn output(&mut self) -> &mut dyn OutputChannel;

    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn Terminal>>;

    /// Let the user pick one of `languages`; `None` when dismissed
    fn pick_language(&mut self, languages: &[String]) -> Option<String>;

    fn shell_info(&self, config: &Config) -> ShellInfo {
        ShellInfo::from_env(config.default_terminal_profile.clone())
    }

    fn python_environment(&self) -> Option<&dyn PythonEnvironment> {
        None
    }
}

/// In-memory output surface
#[derive(Debug, Default, Clone)]
pub struct BufferOutput {
    pub text: String,
    pub cleared: usize,
    pub shown: usize,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }
}

impl OutputChannel for BufferOutput {
    fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cleared += 1;
    }

    fn show(&mut self, _preserve_focus: bool) {
        self.shown += 1;
    }
}
