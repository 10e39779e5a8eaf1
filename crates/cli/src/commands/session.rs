use anyhow::{bail, Context, Result};
use code_runner_core::{Document, RunOutcome, RunSession, Selection};
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::cli::RunOptions;
use crate::host::{find_workspace_root, CliHost};
use crate::utils::{parse_filepath_with_lines, parse_line_range};

/// A host ready to run, plus the language the user asked for on a saved file
pub(crate) struct Prepared {
    pub host: CliHost,
    pub language_override: Option<String>,
}

/// Build the document, workspace and configuration described by `options`
pub(crate) fn prepare(options: &RunOptions) -> Result<Prepared> {
    let (document, language_override) = load_document(options)?;

    let workspace = match &options.workspace {
        Some(dir) => Some(std::path::absolute(dir).context("Failed to resolve workspace path")?),
        None => {
            let start = match document.as_ref().and_then(|d| d.path.as_deref()).and_then(Path::parent) {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            find_workspace_root(&start)
        }
    };
    debug!("Workspace: {:?}", workspace);

    let host = CliHost::new(document, workspace, overrides(options))?;
    Ok(Prepared {
        host,
        language_override,
    })
}

fn load_document(options: &RunOptions) -> Result<(Option<Document>, Option<String>)> {
    if options.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| code_runner_core::language::PLAIN_TEXT.to_string());
        let mut document = Document::untitled(language, text);
        if let Some((start, end)) = line_range(options, None)? {
            let selection = Selection::lines(&document.text, start, end);
            document = document.with_selection(selection);
        }
        return Ok((Some(document), None));
    }

    let Some(filepath_arg) = options.filepath.as_deref() else {
        return Ok((None, None));
    };
    let (filepath, lines) = parse_filepath_with_lines(filepath_arg);
    let path = PathBuf::from(&filepath);
    let mut document =
        Document::from_file(&path).with_context(|| format!("Failed to read {}", filepath))?;
    if let Some((start, end)) = line_range(options, lines)? {
        debug!("Selecting lines {}-{} of {}", start, end, filepath);
        let selection = Selection::lines(&document.text, start, end);
        document = document.with_selection(selection);
    }
    Ok((Some(document), options.language.clone()))
}

/// `--lines` wins over a range given on the path
fn line_range(options: &RunOptions, from_path: Option<(usize, usize)>) -> Result<Option<(usize, usize)>> {
    match options.lines.as_deref() {
        Some(value) => match parse_line_range(value) {
            Some(range) => Ok(Some(range)),
            None => bail!("Invalid line range '{}', expected A:B", value),
        },
        None => Ok(from_path),
    }
}

/// Config layer made of the flags that were actually given
fn overrides(options: &RunOptions) -> Value {
    let mut layer = Map::new();
    if let Some(cwd) = &options.cwd {
        layer.insert("cwd".to_string(), json!(cwd));
    }
    if options.terminal {
        layer.insert("runInTerminal".to_string(), json!(true));
    }
    if options.ignore_selection {
        layer.insert("ignoreSelection".to_string(), json!(true));
    }
    Value::Object(layer)
}

/// Ctrl+C flag; the session turns a set flag into `stop`
fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl+C handler")?;
    Ok(flag)
}

/// Drive a started run to completion and map the outcome to an exit code
pub(crate) fn drive(
    mut session: RunSession<CliHost>,
    start: impl FnOnce(&mut RunSession<CliHost>) -> RunOutcome,
) -> Result<i32> {
    let interrupted = interrupt_flag()?;
    let outcome = start(&mut session);
    debug!("Run outcome: {:?}", outcome);

    let code = match outcome {
        RunOutcome::Started => {
            session.wait_until_idle(|| interrupted.swap(false, Ordering::SeqCst));
            session.last_exit_code().unwrap_or(1)
        }
        RunOutcome::Terminal | RunOutcome::Cancelled => 0,
        RunOutcome::AlreadyRunning
        | RunOutcome::NoDocument
        | RunOutcome::Unsupported
        | RunOutcome::Failed(_) => 1,
    };

    session.shutdown();
    Ok(code)
}
