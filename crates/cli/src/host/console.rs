use code_runner_core::OutputChannel;
use std::io::{self, IsTerminal, Write};

/// Captured output printed straight to stdout
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputChannel for ConsoleOutput {
    fn append(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout must not take the run down with it
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn clear(&mut self) {
        let stdout = io::stdout();
        if stdout.is_terminal() {
            let mut stdout = stdout.lock();
            let _ = stdout.write_all(b"\x1b[2J\x1b[H");
            let _ = stdout.flush();
        }
    }

    fn show(&mut self, _preserve_focus: bool) {}
}
