//! code-runner - Run a source file or a selected snippet through its language's executor
//!
//! This crate provides functionality to:
//! - Resolve the shell command for a document from layered executor maps
//! - Materialize snippets and unsaved buffers into scratch files
//! - Expand `$placeholder` tokens and adapt commands for the host shell
//! - Execute in an interactive terminal or stream captured output, one run at a time
pub mod config;
pub mod error;
pub mod host;
pub mod language;
pub mod materializer;
pub mod placeholder;
pub mod python;
pub mod resolver;
pub mod runner;
pub mod session;
pub mod shell;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use config::Config;
pub use host::{EditorHost, OutputChannel, Terminal};
pub use resolver::resolve_executor;
pub use session::{RunOutcome, RunSession};
