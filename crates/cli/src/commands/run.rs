use anyhow::Result;
use code_runner_core::RunSession;
use tracing::debug;

use super::session::{drive, prepare};
use crate::cli::RunOptions;

pub fn run_command(options: &RunOptions) -> Result<i32> {
    debug!("Run options: {:?}", options);
    let prepared = prepare(options)?;
    let language = prepared.language_override;
    drive(RunSession::new(prepared.host), |session| {
        session.run(language.as_deref(), None)
    })
}
