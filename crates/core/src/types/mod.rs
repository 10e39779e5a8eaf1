pub mod command;
pub mod document;
pub mod request;

// Re-export commonly used types
pub use command::{ExecutionTarget, ResolvedCommand};
pub use document::{Document, Selection};
pub use request::{RunRequest, TriggerMode};
