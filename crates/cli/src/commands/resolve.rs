use anyhow::{bail, Result};
use code_runner_core::{
    python::resolve_python_path,
    resolver::{resolve_executor, ResolveInput},
    runner::final_command,
    session::MSG_UNSUPPORTED,
    EditorHost,
};
use serde_json::json;

use super::session::prepare;
use crate::cli::RunOptions;

/// Print the executor `filepath` resolves to and the command it would run in place
pub fn resolve_command(filepath: &str, language: Option<&str>, as_json: bool) -> Result<()> {
    let options = RunOptions {
        filepath: Some(filepath.to_string()),
        language: language.map(str::to_string),
        ..RunOptions::default()
    };
    let prepared = prepare(&options)?;
    let host = prepared.host;
    let Some(document) = host.document() else {
        bail!("No document to resolve");
    };

    let extension = document.extension();
    let input = ResolveInput::for_document(document, prepared.language_override.as_deref())
        .with_extension(&extension);
    let Some(resolved) = resolve_executor(&input, host.config()) else {
        bail!("{}", MSG_UNSUPPORTED);
    };

    let target = document.path.as_deref();
    let workspace = host.workspace_folder(Some(document));
    let command = final_command(
        &resolved.template,
        target,
        workspace.as_deref(),
        || resolve_python_path(host.python_environment(), target),
        true,
    );

    if as_json {
        let value = json!({
            "languageId": resolved.language_id,
            "template": resolved.template,
            "command": command,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("🔍 Language: {}", resolved.language_id);
        println!("📋 Executor: {}", resolved.template);
        println!("🚀 Command:  {}", command);
    }
    Ok(())
}
