//! Editor host backed by the filesystem and the controlling terminal

mod console;
mod terminal;
mod workspace;

pub use console::ConsoleOutput;
pub use terminal::ShellTerminal;
pub use workspace::find_workspace_root;

use code_runner_core::{
    config::ConfigLoader,
    host::DocumentStore,
    python::{PythonEnvironment, VirtualEnvPython},
    Config, Document, EditorHost, OutputChannel, Result, Terminal,
};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CliHost {
    document: Option<Document>,
    workspace: Option<PathBuf>,
    config: Config,
    output: ConsoleOutput,
    python: VirtualEnvPython,
}

impl CliHost {
    /// Load the configuration that applies to `document` and build a host around it.
    /// `overrides` is merged last, over every config file.
    pub fn new(document: Option<Document>, workspace: Option<PathBuf>, overrides: Value) -> Result<Self> {
        let start_dir = document
            .as_ref()
            .and_then(|d| d.path.as_deref())
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| workspace.clone());

        let mut loader = ConfigLoader::new().with_override(overrides);
        let config = loader.load(start_dir.as_deref(), workspace.as_deref())?;
        for path in loader.loaded_paths() {
            debug!("Using config file: {}", path.display());
        }

        let python = VirtualEnvPython::from_env(config.python_path.clone());
        Ok(Self {
            document,
            workspace,
            config,
            output: ConsoleOutput::new(),
            python,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }
}

impl DocumentStore for CliHost {
    // Files on disk are always saved
    fn save_all(&mut self) -> Result<()> {
        debug!("save_all: nothing to save");
        Ok(())
    }

    fn save_document(&mut self, document: &Document) -> Result<()> {
        debug!("save_document: {} is already on disk", document.file_name());
        Ok(())
    }
}

impl EditorHost for CliHost {
    fn active_document(&self) -> Option<Document> {
        self.document.clone()
    }

    fn open_document(&self, path: &Path) -> Result<Document> {
        Document::from_file(path)
    }

    fn workspace_folder(&self, _document: Option<&Document>) -> Option<PathBuf> {
        self.workspace.clone()
    }

    fn configuration(&self, _document: Option<&Document>) -> Result<Config> {
        Ok(self.config.clone())
    }

    fn show_information(&mut self, message: &str) {
        eprintln!("[code-runner] {}", message);
    }

    fn set_running_context(&mut self, running: bool) {
        debug!("Running context: {}", running);
    }

    fn output(&mut self) -> &mut dyn OutputChannel {
        &mut self.output
    }

    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn Terminal>> {
        Ok(Box::new(ShellTerminal::spawn(name)?))
    }

    fn pick_language(&mut self, languages: &[String]) -> Option<String> {
        if languages.is_empty() {
            return None;
        }
        let mut stderr = io::stderr();
        for (index, language) in languages.iter().enumerate() {
            let _ = writeln!(stderr, "{:>3}. {}", index + 1, language);
        }
        let _ = write!(stderr, "Language: ");
        let _ = stderr.flush();

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).ok()?;
        pick_from_answer(languages, answer.trim())
    }

    fn python_environment(&self) -> Option<&dyn PythonEnvironment> {
        Some(&self.python)
    }
}

/// Match the picker answer as a 1-based index or a language id
fn pick_from_answer(languages: &[String], answer: &str) -> Option<String> {
    if answer.is_empty() {
        return None;
    }
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| languages.get(i))
            .cloned();
    }
    languages.iter().find(|l| l.as_str() == answer).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_from_answer() {
        let languages = vec!["python".to_string(), "ruby".to_string()];
        assert_eq!(pick_from_answer(&languages, "2"), Some("ruby".to_string()));
        assert_eq!(pick_from_answer(&languages, "python"), Some("python".to_string()));
        assert_eq!(pick_from_answer(&languages, "0"), None);
        assert_eq!(pick_from_answer(&languages, "3"), None);
        assert_eq!(pick_from_answer(&languages, "perl"), None);
        assert_eq!(pick_from_answer(&languages, ""), None);
    }
}
