use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    by_language_command, custom_command, init_command, languages_command, resolve_command,
    run_command,
};

#[derive(Parser, Debug)]
#[command(name = "code-runner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that executes code
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// File to run, optionally with a line range (e.g., main.py:3 or main.py:3-8)
    pub filepath: Option<String>,

    /// Run under this language id instead of the file's own
    #[arg(short, long)]
    pub language: Option<String>,

    /// Only run these lines, 1-based and inclusive (e.g., 3:8)
    #[arg(long, value_name = "A:B")]
    pub lines: Option<String>,

    /// Read an untitled buffer from stdin instead of a file
    #[arg(long, conflicts_with = "filepath")]
    pub stdin: bool,

    /// Send the command to an interactive shell instead of capturing output
    #[arg(short, long)]
    pub terminal: bool,

    /// Working directory for the command
    #[arg(long)]
    pub cwd: Option<String>,

    /// Run the whole file even when a line range is given
    #[arg(long)]
    pub ignore_selection: bool,

    /// Workspace root (defaults to the nearest folder with .git, .vscode or .code-runner.json)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a file or a range of its lines
    #[command(visible_alias = "r")]
    Run(RunOptions),
    /// Run the configured customCommand
    Custom(RunOptions),
    /// Pick a configured language, then run under it
    ByLanguage(RunOptions),
    /// Print the executor a file resolves to, without running it
    Resolve {
        /// File to resolve
        filepath: String,

        /// Resolve under this language id instead of the file's own
        #[arg(short, long)]
        language: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the configured language ids
    Languages {
        /// Workspace whose configuration is listed
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Write a starter .code-runner.json
    Init {
        /// Directory to write the config into
        #[arg(short, long)]
        cwd: Option<String>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command, returning the process exit code
    pub fn execute(self) -> Result<i32> {
        match self {
            Commands::Run(options) => run_command(&options),
            Commands::Custom(options) => custom_command(&options),
            Commands::ByLanguage(options) => by_language_command(&options),
            Commands::Resolve {
                filepath,
                language,
                json,
            } => resolve_command(&filepath, language.as_deref(), json).map(|()| 0),
            Commands::Languages { workspace } => languages_command(workspace.as_deref()).map(|()| 0),
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force).map(|()| 0),
        }
    }
}
