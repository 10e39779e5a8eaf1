//! Shell subprocess with streamed output, for the captured-output sink

use crate::error::{Error, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

const READ_CHUNK: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A chunk of output, in arrival order across both streams
    Output { stream: Stream, text: String },
    /// Both streams closed and the child was reaped; `None` when killed by a signal
    Exit(Option<i32>),
}

/// A running shell command whose output arrives over a channel
#[derive(Debug)]
pub struct CapturedProcess {
    pid: u32,
    events: Receiver<ProcessEvent>,
}

impl CapturedProcess {
    /// Spawn `command` through the platform shell in `cwd`
    pub fn spawn(command: &str, cwd: &Path) -> Result<Self> {
        let mut cmd = shell_command(command);
        cmd.current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so the whole tree can be signalled
            cmd.process_group(0);
        }

        let mut child = cmd.spawn().map_err(|source| Error::SpawnError {
            command: command.to_string(),
            source,
        })?;
        let pid = child.id();
        debug!("Spawned pid {} for: {}", pid, command);

        let (tx, events) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, Stream::Stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, Stream::Stderr, tx.clone()));
        }
        thread::spawn(move || wait_for_exit(child, readers, tx));

        Ok(Self { pid, events })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Next event, waiting at most `timeout`; `None` when nothing arrived.
    /// A vanished monitor thread is reported as an exit without a code.
    pub fn next_event(&self, timeout: Duration) -> Option<ProcessEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Process monitor for pid {} disconnected", self.pid);
                Some(ProcessEvent::Exit(None))
            }
        }
    }

    /// Terminate the process and its descendants without waiting
    pub fn kill_tree(&self) {
        kill_tree(self.pid);
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;
    let shell = std::env::var("ComSpec").unwrap_or_else(|_| "cmd.exe".to_string());
    let mut cmd = Command::new(shell);
    cmd.raw_arg(format!("/d /s /c \"{command}\""));
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn spawn_reader<R>(mut reader: R, stream: Stream, tx: Sender<ProcessEvent>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        let mut decoder = Utf8Decoder::default();
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let text = decoder.decode(&buf[..n]);
                    if text.is_empty() {
                        continue;
                    }
                    if tx.send(ProcessEvent::Output { stream, text }).is_err() {
                        return;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("Failed to read {:?}: {}", stream, e);
                    break;
                }
            }
        }
        let tail = decoder.finish();
        if !tail.is_empty() {
            let _ = tx.send(ProcessEvent::Output { stream, text: tail });
        }
    })
}

/// Incremental UTF-8 decoding that holds back a character split across reads
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut text = String::with_capacity(self.pending.len());
        let mut rest = self.pending.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: wait for more bytes
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = rest.to_vec();
        text
    }

    /// Whatever is still held back at end of stream
    fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

fn wait_for_exit(mut child: Child, readers: Vec<JoinHandle<()>>, tx: Sender<ProcessEvent>) {
    for reader in readers {
        let _ = reader.join();
    }
    let code = match child.wait() {
        Ok(status) => status.code(),
        Err(e) => {
            warn!("Failed to wait for child: {}", e);
            None
        }
    };
    let _ = tx.send(ProcessEvent::Exit(code));
}

/// Send a termination signal to `pid` and every process below it
pub fn kill_tree(pid: u32) {
    debug!("Killing process tree of pid {}", pid);

    #[cfg(unix)]
    {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        let Ok(pgid) = i32::try_from(pid) else {
            return;
        };
        // The child leads its own process group, created at spawn
        if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
            debug!("killpg({}) failed: {}", pgid, e);
        }
    }

    #[cfg(windows)]
    {
        let result = Command::new("taskkill")
            .args(["/pid", &pid.to_string(), "/T", "/F"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = result {
            warn!("taskkill for pid {} failed: {}", pid, e);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn collect(process: &CapturedProcess) -> (String, Option<i32>) {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut output = String::new();
        while Instant::now() < deadline {
            match process.next_event(Duration::from_millis(100)) {
                Some(ProcessEvent::Output { text, .. }) => output.push_str(&text),
                Some(ProcessEvent::Exit(code)) => return (output, code),
                None => {}
            }
        }
        panic!("process did not exit in time");
    }

    #[test]
    fn test_decoder_keeps_split_characters() {
        let bytes = "añé".as_bytes();
        let mut decoder = Utf8Decoder::default();
        let mut text = decoder.decode(&bytes[..2]);
        assert_eq!(text, "a");
        text.push_str(&decoder.decode(&bytes[2..4]));
        text.push_str(&decoder.decode(&bytes[4..]));
        assert_eq!(text, "añé");
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8Decoder::default();
        assert_eq!(decoder.decode(b"ok\xffok"), "ok\u{FFFD}ok");
        assert_eq!(decoder.decode(b"\xc3"), "");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_multibyte_character_across_read_boundary() {
        let dir = tempfile::TempDir::new().unwrap();
        let command = format!("printf '%s\\303\\251' {}", "a".repeat(READ_CHUNK - 1));
        let process = CapturedProcess::spawn(&command, dir.path()).unwrap();
        let (output, code) = collect(&process);
        assert_eq!(code, Some(0));
        assert!(output.ends_with('é'));
        assert!(!output.contains(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn test_streams_stdout_and_stderr() {
        let dir = tempfile::TempDir::new().unwrap();
        let process = CapturedProcess::spawn("echo out; echo err 1>&2; exit 3", dir.path()).unwrap();
        let (output, code) = collect(&process);
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
        assert_eq!(code, Some(3));
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let process = CapturedProcess::spawn("cat marker.txt", dir.path()).unwrap();
        let (output, code) = collect(&process);
        assert_eq!(output, "here");
        assert_eq!(code, Some(0));
    }

    #[test]
    fn test_kill_tree_terminates_children() {
        let dir = tempfile::TempDir::new().unwrap();
        let process = CapturedProcess::spawn("sleep 30 & sleep 30; wait", dir.path()).unwrap();
        std::thread::sleep(Duration::from_millis(200));
        process.kill_tree();
        let (_, code) = collect(&process);
        assert_eq!(code, None);
    }
}
