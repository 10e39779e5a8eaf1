//! Recording host used by the cross-crate integration tests

use code_runner_core::{
    host::{BufferOutput, DocumentStore},
    Config, Document, EditorHost, Error, OutputChannel, Result, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything typed into the terminals a host created
#[derive(Debug, Default)]
pub struct TerminalLog {
    pub created: usize,
    pub lines: Vec<String>,
    pub clears: usize,
    /// Reject input as a terminal whose shell exited would
    pub refuse_input: bool,
}

pub struct RecordingTerminal {
    log: Rc<RefCell<TerminalLog>>,
}

impl Terminal for RecordingTerminal {
    fn show(&mut self, _preserve_focus: bool) {}

    fn clear(&mut self) -> Result<()> {
        self.log.borrow_mut().clears += 1;
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.refuse_input {
            return Err(Error::IoError(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        log.lines.push(text.to_string());
        Ok(())
    }
}

/// Host that records every interaction instead of showing it
#[derive(Default)]
pub struct RecordingHost {
    pub document: Option<Document>,
    pub workspace: Option<PathBuf>,
    pub config: Config,
    pub output: BufferOutput,
    pub messages: Vec<String>,
    pub running_context: Vec<bool>,
    pub terminal: Rc<RefCell<TerminalLog>>,
    /// Answer given to the language picker
    pub pick: Option<String>,
    pub offered_languages: Vec<String>,
    pub saves: usize,
}

impl RecordingHost {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn terminal_lines(&self) -> Vec<String> {
        self.terminal.borrow().lines.clone()
    }
}

impl DocumentStore for RecordingHost {
    fn save_all(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }

    fn save_document(&mut self, _document: &Document) -> Result<()> {
        self.saves += 1;
        Ok(())
    }
}

impl EditorHost for RecordingHost {
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
        self.messages.push(message.to_string());
    }

    fn set_running_context(&mut self, running: bool) {
        self.running_context.push(running);
    }

    fn output(&mut self) -> &mut dyn OutputChannel {
        &mut self.output
    }

    fn create_terminal(&mut self, _name: &str) -> Result<Box<dyn Terminal>> {
        self.terminal.borrow_mut().created += 1;
        Ok(Box::new(RecordingTerminal {
            log: self.terminal.clone(),
        }))
    }

    fn pick_language(&mut self, languages: &[String]) -> Option<String> {
        self.offered_languages = languages.to_vec();
        self.pick.clone()
    }
}
