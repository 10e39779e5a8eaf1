//! Rewrites applied to commands sent to an interactive terminal

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;

static DRIVE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]):\\").expect("valid drive prefix regex"));

const POWERSHELL_STATUS_CHECK: &str = "; if ($?) {";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// What the host knows about the shell its terminals run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellInfo {
    /// Configured default terminal profile name (e.g. `PowerShell`, `Command Prompt`)
    pub default_profile: Option<String>,
    /// Default shell program path
    pub shell: Option<String>,
}

impl ShellInfo {
    /// Detect the shell from the process environment
    pub fn from_env(default_profile: Option<String>) -> Self {
        let shell = if cfg!(windows) {
            std::env::var("ComSpec").ok()
        } else {
            std::env::var("SHELL").ok()
        };
        Self {
            default_profile: default_profile.filter(|p| !p.is_empty()),
            shell: shell.filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellAdapter<'a> {
    platform: Platform,
    shell: &'a ShellInfo,
    terminal_root: &'a str,
}

impl<'a> ShellAdapter<'a> {
    pub fn new(platform: Platform, shell: &'a ShellInfo, terminal_root: &'a str) -> Self {
        Self {
            platform,
            shell,
            terminal_root,
        }
    }

    fn shell_lowercase(&self) -> Option<String> {
        self.shell.shell.as_deref().map(str::to_lowercase)
    }

    pub fn is_powershell(&self) -> bool {
        if self.platform != Platform::Windows {
            return false;
        }
        if let Some(profile) = self.shell.default_profile.as_deref() {
            if profile.to_lowercase().contains("powershell") {
                return true;
            }
            if profile == "Command Prompt" {
                return false;
            }
        }
        self.shell_lowercase()
            .is_some_and(|shell| shell.contains("powershell"))
    }

    /// Turn `a && b && c` into `a ; if ($?) {b} ; if ($?) {c }` for PowerShell.
    /// Applied to the executor template, before placeholder expansion.
    pub fn adapt_for_powershell(&self, executor: &str) -> String {
        if !executor.contains(" && ") || !self.is_powershell() {
            return executor.to_string();
        }
        debug!("Rewriting executor for PowerShell: {}", executor);

        let chained = format!("}} {POWERSHELL_STATUS_CHECK}");
        let executor = executor.replacen("&&", POWERSHELL_STATUS_CHECK, 1);
        let executor = executor.replace("&&", &chained);
        let executor = executor.replace("$dir$fileNameWithoutExt", r".\$fileNameWithoutExt");
        format!("{executor} }}")
    }

    /// Translate `X:\` paths for POSIX shells hosted on Windows. Applied to the
    /// fully expanded command.
    pub fn adapt_paths(&self, command: &str) -> String {
        if self.platform != Platform::Windows {
            return command.to_string();
        }
        let Some(shell) = self.shell_lowercase() else {
            return command.to_string();
        };

        let root = if !self.terminal_root.is_empty() {
            self.terminal_root.to_string()
        } else if shell.contains("bash") && shell.contains("windows") {
            "/mnt/".to_string()
        } else {
            return command.to_string();
        };

        DRIVE_PREFIX
            .replace_all(command, |caps: &Captures<'_>| {
                format!("{root}{}/", caps[1].to_lowercase())
            })
            .replace('\\', "/")
    }
}
