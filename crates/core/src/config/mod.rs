//! Configuration management for code-runner

mod defaults;
pub mod merge;
mod settings;

// Re-export main types
pub use merge::{ConfigLoader, CONFIG_FILE_NAME};
pub use settings::{Config, SETTINGS_PREFIX};
