//! Deciding what file a run executes, and writing scratch files for snippets

use crate::{
    config::Config,
    error::Result,
    host::DocumentStore,
    types::{ExecutionTarget, RunRequest},
};
use rand::Rng;
use std::path::Path;
use tracing::debug;

const PHP_OPEN_TAG: &str = "<?php";
const RANDOM_NAME_LEN: usize = 10;

/// Produce the execution target for a run. Saves buffers first when an
/// in-place run is configured to; otherwise writes a scratch file.
pub fn materialize(
    request: &RunRequest,
    language_id: &str,
    config: &Config,
    cwd: &Path,
    store: &mut dyn DocumentStore,
) -> Result<ExecutionTarget> {
    let document = &request.document;

    if request.runs_in_place(config.ignore_selection) {
        if let Some(path) = &document.path {
            if config.save_all_files_before_run {
                store.save_all()?;
            } else if config.save_file_before_run {
                store.save_document(document)?;
            }
            return Ok(ExecutionTarget::in_place(path.clone()));
        }
    }

    let text = if request.uses_whole_document(config.ignore_selection) {
        document.text.as_str()
    } else {
        document.selected_text().unwrap_or(&document.text)
    };
    let text = prepare_snippet(text, language_id);

    let folder = match document.path.as_deref().and_then(Path::parent) {
        Some(dir) if !document.is_untitled() => dir,
        _ => cwd,
    };
    let file_name = format!(
        "{}{}",
        temporary_base_name(config),
        temporary_extension(config, language_id, &document.extension())
    );
    let path = folder.join(file_name);

    std::fs::write(&path, text)?;
    debug!("Wrote temporary file: {:?}", path);
    Ok(ExecutionTarget::temporary(path))
}

/// Language-specific fixups applied to snippet text
pub fn prepare_snippet(text: &str, language_id: &str) -> String {
    if language_id == "php" {
        let trimmed = text.trim();
        if trimmed.starts_with(PHP_OPEN_TAG) {
            trimmed.to_string()
        } else {
            format!("{PHP_OPEN_TAG}\r\n{trimmed}")
        }
    } else {
        text.to_string()
    }
}

fn temporary_base_name(config: &Config) -> String {
    if config.temporary_file_name.is_empty() {
        format!("temp{}", random_name())
    } else {
        config.temporary_file_name.clone()
    }
}

/// Extension for a scratch file: per-language override, then the document's
/// own extension, then `.<languageId>`
pub fn temporary_extension(config: &Config, language_id: &str, document_extension: &str) -> String {
    match config
        .language_id_to_file_extension_map
        .get(language_id)
        .filter(|ext| !ext.is_empty())
    {
        Some(ext) => ext.clone(),
        None if !document_extension.is_empty() => document_extension.to_string(),
        None => format!(".{language_id}"),
    }
}

/// Up to ten lowercase letters taken from the base-36 digits of a random fraction
pub fn random_name() -> String {
    let mut fraction: f64 = rand::thread_rng().r#gen();
    let mut name = String::with_capacity(RANDOM_NAME_LEN);

    for _ in 0..20 {
        if fraction == 0.0 || name.len() == RANDOM_NAME_LEN {
            break;
        }
        fraction *= 36.0;
        let digit = fraction.trunc() as u32;
        fraction = fraction.fract();
        if let Some(ch) = char::from_digit(digit, 36).filter(char::is_ascii_lowercase) {
            name.push(ch);
        }
    }

    name
}
