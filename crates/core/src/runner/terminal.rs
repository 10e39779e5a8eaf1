//! Terminal sink: commands typed into an interactive terminal, not tracked

use super::final_command;
use crate::{
    config::Config,
    error::Result,
    host::Terminal,
    shell::ShellAdapter,
};
use std::path::Path;
use tracing::debug;

/// Everything the terminal sink needs besides the terminal itself
#[derive(Debug, Clone, Copy)]
pub struct TerminalRun<'a> {
    pub executor: &'a str,
    pub target: Option<&'a Path>,
    pub workspace_root: Option<&'a Path>,
    pub cwd: &'a Path,
    pub append_file: bool,
}

/// Send a run to `terminal`. `is_new` suppresses clearing a terminal that has
/// nothing to clear yet.
pub fn run_in_terminal(
    terminal: &mut dyn Terminal,
    is_new: bool,
    run: TerminalRun<'_>,
    config: &Config,
    adapter: &ShellAdapter<'_>,
    python_path: impl FnOnce() -> String,
) -> Result<()> {
    terminal.show(config.preserve_focus);

    let executor = adapter.adapt_for_powershell(run.executor);
    let command = final_command(
        &executor,
        run.target,
        run.workspace_root,
        python_path,
        run.append_file,
    );
    let command = adapter.adapt_paths(&command);

    if config.clear_previous_output && !is_new {
        terminal.clear()?;
    }

    if config.file_directory_as_cwd {
        let cwd = adapter.adapt_paths(&run.cwd.display().to_string());
        terminal.send_text(&format!("cd \"{cwd}\""))?;
    }

    debug!("Sending to terminal: {}", command);
    terminal.send_text(&command)
}
