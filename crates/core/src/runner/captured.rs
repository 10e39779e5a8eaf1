//! Captured-output sink: a tracked subprocess streaming into the output surface

use super::process::{CapturedProcess, ProcessEvent};
use crate::{error::Result, host::OutputChannel, types::ExecutionTarget};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// A captured run from spawn until its exit event has been handled
#[derive(Debug)]
pub struct ActiveRun {
    process: CapturedProcess,
    target: Option<ExecutionTarget>,
    started: Instant,
    show_message: bool,
}

impl ActiveRun {
    /// Spawn `command`, announcing it on `output` when messages are enabled
    pub fn start(
        command: &str,
        cwd: &Path,
        target: Option<ExecutionTarget>,
        show_message: bool,
        output: &mut dyn OutputChannel,
    ) -> Result<Self> {
        if show_message {
            output.append_line(&format!("[Running] {command}"));
        }
        info!("Running: {}", command);

        let started = Instant::now();
        match CapturedProcess::spawn(command, cwd) {
            Ok(process) => Ok(Self {
                process,
                target,
                started,
                show_message,
            }),
            Err(e) => {
                if let Some(target) = target {
                    target.cleanup();
                }
                Err(e)
            }
        }
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    /// Detach the scratch file so it can be removed before the process exits
    pub fn take_target(&mut self) -> Option<ExecutionTarget> {
        self.target.take()
    }

    pub fn kill_tree(&self) {
        self.process.kill_tree();
    }

    pub fn next_event(&self, timeout: Duration) -> Option<ProcessEvent> {
        self.process.next_event(timeout)
    }

    /// Write the completion summary and remove the scratch file. Consumes the
    /// run, so this happens once per run.
    pub fn finish(self, code: Option<i32>, output: &mut dyn OutputChannel) {
        let elapsed = self.started.elapsed();
        info!("Process {} exited with {:?} after {:?}", self.pid(), code, elapsed);

        output.append_line("");
        if self.show_message {
            output.append_line(&done_message(code, elapsed));
            output.append_line("");
        }
        if let Some(target) = self.target {
            target.cleanup();
        }
    }
}

/// `[Done] exited with code=0 in 0.123 seconds`
pub fn done_message(code: Option<i32>, elapsed: Duration) -> String {
    let code = code.map_or_else(|| "null".to_string(), |c| c.to_string());
    format!(
        "[Done] exited with code={code} in {} seconds",
        elapsed_seconds(elapsed)
    )
}

/// Wall-clock seconds with millisecond precision, trailing zeros dropped
pub fn elapsed_seconds(elapsed: Duration) -> String {
    let seconds = elapsed.as_millis() as f64 / 1000.0;
    seconds.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_message() {
        assert_eq!(
            done_message(Some(0), Duration::from_millis(1234)),
            "[Done] exited with code=0 in 1.234 seconds"
        );
        assert_eq!(
            done_message(None, Duration::from_millis(50)),
            "[Done] exited with code=null in 0.05 seconds"
        );
        assert_eq!(elapsed_seconds(Duration::from_secs(2)), "2");
    }
}
