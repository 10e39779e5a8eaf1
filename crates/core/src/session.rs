//! Session controller: single-flight orchestration of runs
//!
//! One `RunSession` exists per host. It owns the run state (running flag,
//! tracked subprocess, terminal, working directory, last language id), and
//! every operation reports problems to the user instead of failing.

use crate::{
    config::Config,
    error::Result,
    host::{EditorHost, Terminal, CHANNEL_NAME},
    materializer::materialize,
    python::resolve_python_path,
    resolver::{resolve_executor, ResolveInput},
    runner::{final_command, run_in_terminal, ActiveRun, ProcessEvent, TerminalRun},
    shell::{Platform, ShellAdapter},
    types::{Document, ExecutionTarget, RunRequest, TriggerMode},
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

pub const MSG_ALREADY_RUNNING: &str = "Code is already running!";
pub const MSG_NO_CODE: &str = "No code found or selected.";
pub const MSG_UNSUPPORTED: &str = "Code language not supported or defined.";
pub const MSG_NO_CUSTOM_COMMAND: &str = "No custom command is configured.";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a run request turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A captured run is in flight; nothing was done
    AlreadyRunning,
    /// No active or explorer document
    NoDocument,
    /// No executor resolved, or no custom command configured
    Unsupported,
    /// The language picker was dismissed
    Cancelled,
    /// The command was sent to the terminal
    Terminal,
    /// A captured-output subprocess was started
    Started,
    Failed(String),
}

pub struct RunSession<H: EditorHost> {
    host: H,
    is_running: bool,
    active: Option<ActiveRun>,
    /// Runs killed by `stop` whose exit has not been handled yet
    stopping: Vec<ActiveRun>,
    terminal: Option<Box<dyn Terminal>>,
    cwd: Option<PathBuf>,
    workspace_folder: Option<PathBuf>,
    language_id: Option<String>,
    last_exit_code: Option<i32>,
    platform: Platform,
}

impl<H: EditorHost> RunSession<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            is_running: false,
            active: None,
            stopping: Vec::new(),
            terminal: None,
            cwd: None,
            workspace_folder: None,
            language_id: None,
            last_exit_code: None,
            platform: Platform::current(),
        }
    }

    /// Pretend to run on another platform, for shell adaptation
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Working directory of the latest run
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Language id the latest run resolved under
    pub fn language_id(&self) -> Option<&str> {
        self.language_id.as_deref()
    }

    /// Exit code of the most recently finished captured run
    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Run the active document, or `explorer_path` when it names another file
    pub fn run(&mut self, language_override: Option<&str>, explorer_path: Option<&Path>) -> RunOutcome {
        self.run_with_trigger(language_override, explorer_path, TriggerMode::ActiveEditor)
    }

    /// Run the configured `customCommand` against the active document, or bare
    /// when there is none
    pub fn run_custom_command(&mut self) -> RunOutcome {
        if self.is_running {
            self.host.show_information(MSG_ALREADY_RUNNING);
            return RunOutcome::AlreadyRunning;
        }
        let result = self.try_run_custom_command();
        self.report(result)
    }

    /// Ask the host to pick a configured language, then run under it
    pub fn run_by_language(&mut self) -> RunOutcome {
        let document = self.host.active_document();
        let config = match self.host.configuration(document.as_ref()) {
            Ok(config) => config,
            Err(e) => return self.report(Err(e)),
        };
        let languages = config.languages();
        match self.host.pick_language(&languages) {
            Some(language) => self.run_with_trigger(Some(&language), None, TriggerMode::ByLanguage),
            None => RunOutcome::Cancelled,
        }
    }

    /// Terminate the tracked subprocess tree. A no-op when nothing is running.
    pub fn stop(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        self.host.set_running_context(false);

        if let Some(mut active) = self.active.take() {
            info!("Stopping pid {}", active.pid());
            active.kill_tree();
            // The next run may reuse the scratch file name
            if let Some(target) = active.take_target() {
                target.cleanup();
            }
            self.stopping.push(active);
        }
    }

    /// The host closed our terminal; the next terminal run opens a new one
    pub fn on_terminal_closed(&mut self) {
        self.terminal = None;
    }

    /// Teardown: stop any run and release handles
    pub fn shutdown(&mut self) {
        self.stop();
        self.terminal = None;
        self.cwd = None;
        self.workspace_folder = None;
    }

    /// Deliver pending subprocess events to the output surface, waiting up to
    /// `timeout` for the first one. Returns whether any run is still pending.
    pub fn poll(&mut self, timeout: Duration) -> bool {
        let stopping_wait = if self.active.is_none() {
            timeout
        } else {
            Duration::ZERO
        };
        self.drain_stopping(stopping_wait);

        let mut wait = timeout;
        loop {
            let Some(active) = self.active.as_ref() else {
                break;
            };
            match active.next_event(wait) {
                Some(ProcessEvent::Output { text, .. }) => self.host.output().append(&text),
                Some(ProcessEvent::Exit(code)) => {
                    if let Some(active) = self.active.take() {
                        self.last_exit_code = code;
                        self.is_running = false;
                        self.host.set_running_context(false);
                        active.finish(code, self.host.output());
                    }
                    break;
                }
                None => break,
            }
            wait = Duration::ZERO;
        }

        self.active.is_some() || !self.stopping.is_empty()
    }

    /// Block until every run finished. `interrupted` is checked between polls
    /// and triggers `stop` when it returns true.
    pub fn wait_until_idle(&mut self, mut interrupted: impl FnMut() -> bool) {
        loop {
            if interrupted() {
                self.stop();
            }
            if !self.poll(POLL_INTERVAL) {
                break;
            }
        }
    }

    /// Handle events of stopped runs, waiting up to `timeout` for the first one
    fn drain_stopping(&mut self, timeout: Duration) {
        let mut wait = timeout;
        let mut index = 0;
        while index < self.stopping.len() {
            let mut finished = None;
            while let Some(event) = self.stopping[index].next_event(wait) {
                wait = Duration::ZERO;
                match event {
                    ProcessEvent::Output { text, .. } => self.host.output().append(&text),
                    ProcessEvent::Exit(code) => {
                        finished = Some(code);
                        break;
                    }
                }
            }
            wait = Duration::ZERO;
            match finished {
                Some(code) => {
                    self.last_exit_code = code;
                    let run = self.stopping.swap_remove(index);
                    run.finish(code, self.host.output());
                }
                None => index += 1,
            }
        }
    }

    fn report(&mut self, result: Result<RunOutcome>) -> RunOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Run failed: {}", e);
                let message = e.to_string();
                self.host.show_information(&message);
                RunOutcome::Failed(message)
            }
        }
    }

    fn run_with_trigger(
        &mut self,
        language_override: Option<&str>,
        explorer_path: Option<&Path>,
        trigger: TriggerMode,
    ) -> RunOutcome {
        if self.is_running {
            self.host.show_information(MSG_ALREADY_RUNNING);
            return RunOutcome::AlreadyRunning;
        }
        let result = self.try_run(language_override, explorer_path, trigger);
        self.report(result)
    }

    fn try_run(
        &mut self,
        language_override: Option<&str>,
        explorer_path: Option<&Path>,
        trigger: TriggerMode,
    ) -> Result<RunOutcome> {
        let active = self.host.active_document();
        let active_path = active.as_ref().and_then(|d| d.path.as_deref());

        let (document, trigger) = match explorer_path {
            Some(path) if active_path != Some(path) => {
                (self.host.open_document(path)?, TriggerMode::Explorer)
            }
            _ => match active {
                Some(document) => (document, trigger),
                None => {
                    self.host.show_information(MSG_NO_CODE);
                    return Ok(RunOutcome::NoDocument);
                }
            },
        };

        let config = self.host.configuration(Some(&document))?;
        self.initialize(&config, Some(&document));

        let extension = document.extension();
        let input = ResolveInput::for_document(&document, language_override).with_extension(&extension);
        let Some(resolved) = resolve_executor(&input, &config) else {
            self.host.show_information(MSG_UNSUPPORTED);
            return Ok(RunOutcome::Unsupported);
        };
        debug!(
            "Resolved executor '{}' for language '{}'",
            resolved.template, resolved.language_id
        );
        self.language_id = Some(resolved.language_id.clone());

        let request = RunRequest::new(document, trigger)
            .with_language_override(language_override.map(str::to_string));
        self.execute_document(&request, &resolved.template, &resolved.language_id, &config, true)
    }

    fn try_run_custom_command(&mut self) -> Result<RunOutcome> {
        let document = self.host.active_document();
        let config = self.host.configuration(document.as_ref())?;
        self.initialize(&config, document.as_ref());

        let executor = config.custom_command.clone();
        if executor.trim().is_empty() {
            self.host.show_information(MSG_NO_CUSTOM_COMMAND);
            return Ok(RunOutcome::Unsupported);
        }

        match document {
            Some(document) => {
                let language_id = document.language_id.clone();
                self.language_id = Some(language_id.clone());
                let request = RunRequest::new(document, TriggerMode::CustomCommand);
                self.execute_document(&request, &executor, &language_id, &config, false)
            }
            None => self.execute_command(&executor, None, &config, false),
        }
    }

    /// Pick the working directory and remember the workspace for this run
    fn initialize(&mut self, config: &Config, document: Option<&Document>) {
        let workspace = self.host.workspace_folder(document);
        let cwd = working_directory(config, workspace.as_deref(), document);
        debug!("Working directory: {:?}", cwd);
        self.cwd = Some(cwd);
        self.workspace_folder = workspace;
    }

    fn execute_document(
        &mut self,
        request: &RunRequest,
        executor: &str,
        language_id: &str,
        config: &Config,
        append_file: bool,
    ) -> Result<RunOutcome> {
        let cwd = self.current_cwd();
        let target = materialize(request, language_id, config, &cwd, &mut self.host)?;
        self.execute_command(executor, Some(target), config, append_file)
    }

    fn execute_command(
        &mut self,
        executor: &str,
        target: Option<ExecutionTarget>,
        config: &Config,
        append_file: bool,
    ) -> Result<RunOutcome> {
        if config.run_in_terminal {
            self.execute_in_terminal(executor, target.as_ref(), config, append_file)?;
            Ok(RunOutcome::Terminal)
        } else {
            self.execute_captured(executor, target, config, append_file)?;
            Ok(RunOutcome::Started)
        }
    }

    fn execute_in_terminal(
        &mut self,
        executor: &str,
        target: Option<&ExecutionTarget>,
        config: &Config,
        append_file: bool,
    ) -> Result<()> {
        let is_new = self.terminal.is_none();
        if is_new {
            self.terminal = Some(self.host.create_terminal(CHANNEL_NAME)?);
        }

        let cwd = self.current_cwd();
        let shell = self.host.shell_info(config);
        let adapter = ShellAdapter::new(self.platform, &shell, &config.terminal_root);
        let target_path = target.map(ExecutionTarget::path);
        let run = TerminalRun {
            executor,
            target: target_path,
            workspace_root: self.workspace_folder.as_deref(),
            cwd: &cwd,
            append_file,
        };

        let host = &self.host;
        let python = || resolve_python_path(host.python_environment(), target_path);
        let result = match self.terminal.as_deref_mut() {
            Some(terminal) => run_in_terminal(terminal, is_new, run, config, &adapter, python),
            None => Ok(()),
        };
        if result.is_err() {
            // A terminal that refused input is gone; open a fresh one next time
            self.terminal = None;
        }
        result
    }

    fn execute_captured(
        &mut self,
        executor: &str,
        target: Option<ExecutionTarget>,
        config: &Config,
        append_file: bool,
    ) -> Result<()> {
        self.is_running = true;
        self.host.set_running_context(true);

        if config.clear_previous_output {
            self.host.output().clear();
        }
        self.host.output().show(config.preserve_focus);

        let target_path = target.as_ref().map(|t| t.path().to_path_buf());
        let command = {
            let host = &self.host;
            final_command(
                executor,
                target_path.as_deref(),
                self.workspace_folder.as_deref(),
                || resolve_python_path(host.python_environment(), target_path.as_deref()),
                append_file,
            )
        };

        let cwd = self.current_cwd();
        match ActiveRun::start(&command, &cwd, target, config.show_execution_message, self.host.output()) {
            Ok(active) => {
                self.active = Some(active);
                Ok(())
            }
            Err(e) => {
                self.is_running = false;
                self.host.set_running_context(false);
                Err(e)
            }
        }
    }

    fn current_cwd(&self) -> PathBuf {
        self.cwd.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Working directory for a run: configured `cwd`, then the document's own
/// directory (when `fileDirectoryAsCwd` is set or no workspace is open), then
/// the workspace root, then the system temp directory
pub fn working_directory(config: &Config, workspace: Option<&Path>, document: Option<&Document>) -> PathBuf {
    if let Some(cwd) = config.explicit_cwd() {
        return PathBuf::from(cwd);
    }

    let document_dir = document
        .and_then(|d| d.path.as_deref())
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty());

    if config.file_directory_as_cwd || workspace.is_none() {
        if let Some(dir) = document_dir {
            return dir.to_path_buf();
        }
    }

    match workspace {
        Some(root) => root.to_path_buf(),
        None => std::env::temp_dir(),
    }
}
