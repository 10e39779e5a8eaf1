use anyhow::Result;
use code_runner_core::RunSession;

use super::session::{drive, prepare};
use crate::cli::RunOptions;

pub fn custom_command(options: &RunOptions) -> Result<i32> {
    let prepared = prepare(options)?;
    drive(RunSession::new(prepared.host), |session| session.run_custom_command())
}
