//! The two sinks a resolved command can be sent to

pub mod captured;
pub mod process;
pub mod terminal;

pub use captured::ActiveRun;
pub use process::{CapturedProcess, ProcessEvent, Stream};
pub use terminal::{run_in_terminal, TerminalRun};

use crate::placeholder::{expand, PlaceholderContext};
use std::path::Path;

/// Expand an executor against the execution target. Without a target (a custom
/// command run with no document) the executor is used as-is.
pub fn final_command(
    executor: &str,
    target: Option<&Path>,
    workspace_root: Option<&Path>,
    python_path: impl FnOnce() -> String,
    append_file: bool,
) -> String {
    match target {
        Some(target) => expand(
            executor,
            &PlaceholderContext::new(target, workspace_root),
            python_path,
            append_file,
        ),
        None => executor.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_command_without_target() {
        let command = final_command("make $fileName", None, None, String::new, true);
        assert_eq!(command, "make $fileName");
    }

    #[test]
    fn test_final_command_with_target() {
        let command = final_command(
            "node",
            Some(Path::new("/app/index.js")),
            Some(Path::new("/app")),
            String::new,
            true,
        );
        assert_eq!(command, r#"node "/app/index.js""#);
    }
}
