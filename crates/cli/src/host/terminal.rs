use code_runner_core::{Error, Terminal};
use std::io::{self, IsTerminal, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use tracing::{debug, warn};

/// Interactive shell fed one line at a time through its stdin
pub struct ShellTerminal {
    name: String,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl ShellTerminal {
    pub fn spawn(name: &str) -> code_runner_core::Result<Self> {
        let shell = default_shell();
        debug!("Opening terminal '{}' with shell '{}'", name, shell);

        let mut child = Command::new(&shell)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| Error::SpawnError {
                command: shell.clone(),
                source,
            })?;
        let stdin = child.stdin.take();

        Ok(Self {
            name: name.to_string(),
            child,
            stdin,
        })
    }
}

#[cfg(unix)]
fn default_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "sh".to_string())
}

#[cfg(windows)]
fn default_shell() -> String {
    std::env::var("ComSpec")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "cmd.exe".to_string())
}

impl Terminal for ShellTerminal {
    fn show(&mut self, _preserve_focus: bool) {}

    fn clear(&mut self) -> code_runner_core::Result<()> {
        let stdout = io::stdout();
        if stdout.is_terminal() {
            let mut stdout = stdout.lock();
            stdout.write_all(b"\x1b[2J\x1b[H")?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> code_runner_core::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::HostError(format!("Terminal '{}' is closed", self.name)))?;
        writeln!(stdin, "{}", text)?;
        stdin.flush()?;
        Ok(())
    }
}

impl Drop for ShellTerminal {
    fn drop(&mut self) {
        // Closing stdin lets the shell finish what it was sent, then exit
        self.stdin.take();
        match self.child.wait() {
            Ok(status) => debug!("Terminal '{}' exited: {}", self.name, status),
            Err(e) => warn!("Failed to wait for terminal '{}': {}", self.name, e),
        }
    }
}
