use anyhow::Result;
use code_runner_core::RunSession;

use super::session::{drive, prepare};
use crate::cli::RunOptions;

/// Run under a language picked from the configured executors.
/// `--language` answers the picker up front.
pub fn by_language_command(options: &RunOptions) -> Result<i32> {
    let prepared = prepare(options)?;
    match prepared.language_override {
        Some(language) => drive(RunSession::new(prepared.host), |session| {
            session.run(Some(&language), None)
        }),
        None => drive(RunSession::new(prepared.host), |session| session.run_by_language()),
    }
}
