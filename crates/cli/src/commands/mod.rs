pub mod by_language;
pub mod custom;
pub mod init;
pub mod languages;
pub mod resolve;
pub mod run;
mod session;

pub use by_language::by_language_command;
pub use custom::custom_command;
pub use init::init_command;
pub use languages::languages_command;
pub use resolve::resolve_command;
pub use run::run_command;
