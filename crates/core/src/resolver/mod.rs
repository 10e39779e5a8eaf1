//! Executor resolution: which command template runs a document
//!
//! First match wins:
//! 1. the shebang line, when no language was forced and `respectShebang` is set
//! 2. `executorMapByGlob`, in map order, against the file's base name
//! 3. `executorMap` under the language id
//! 4. `executorMapByFileExtension`, reassigning the language id to the extension
//! 5. `executorMap` under `defaultLanguage`

pub mod pattern;

pub use pattern::FileGlob;

use crate::{
    config::Config,
    types::{Document, ResolvedCommand},
};
use tracing::{debug, warn};

/// What the resolver needs to know about a document
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    /// Language explicitly requested by the user, disables shebang detection
    pub language_override: Option<&'a str>,
    /// The document's own language id
    pub document_language: &'a str,
    /// Base name matched against glob keys
    pub file_name: &'a str,
    /// Extension including the dot, empty when unknown
    pub file_extension: &'a str,
    pub first_line: &'a str,
}

impl<'a> ResolveInput<'a> {
    pub fn for_document(document: &'a Document, language_override: Option<&'a str>) -> Self {
        let file_name = document
            .path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("untitled");
        Self {
            language_override,
            document_language: &document.language_id,
            file_name,
            file_extension: "",
            first_line: document.first_line(),
        }
    }

    pub fn with_extension(mut self, file_extension: &'a str) -> Self {
        self.file_extension = file_extension;
        self
    }
}

/// Interpreter named by a shebang line, `None` for `#![...]` attributes and plain lines
pub fn shebang_command(first_line: &str) -> Option<&str> {
    let rest = first_line.strip_prefix("#!")?;
    if rest.starts_with('[') {
        return None;
    }
    Some(rest)
}

/// Resolve the executor for a document, `None` when no step matched
pub fn resolve_executor(input: &ResolveInput<'_>, config: &Config) -> Option<ResolvedCommand> {
    let language_id = input.language_override.unwrap_or(input.document_language);

    if input.language_override.is_none() && config.respect_shebang {
        if let Some(command) = shebang_command(input.first_line) {
            debug!("Using shebang executor: {}", command);
            return Some(ResolvedCommand::new(command, input.document_language));
        }
    }

    if let Some(template) = match_glob(input.file_name, config) {
        return Some(ResolvedCommand::new(template, language_id));
    }

    if let Some(template) = config.executor_map.get(language_id) {
        debug!("Using executor for language '{}'", language_id);
        return Some(ResolvedCommand::new(template.clone(), language_id));
    }

    if !input.file_extension.is_empty() {
        if let Some(template) = config.executor_map_by_file_extension.get(input.file_extension) {
            debug!("Using executor for extension '{}'", input.file_extension);
            return Some(ResolvedCommand::new(template.clone(), input.file_extension));
        }
    }

    let default_language = config.default_language.as_str();
    if let Some(template) = config.executor_map.get(default_language) {
        debug!("Using executor for default language '{}'", default_language);
        return Some(ResolvedCommand::new(template.clone(), default_language));
    }

    debug!(
        "No executor for language '{}' / extension '{}'",
        language_id, input.file_extension
    );
    None
}

fn match_glob<'c>(file_name: &str, config: &'c Config) -> Option<&'c str> {
    for (glob, template) in &config.executor_map_by_glob {
        match FileGlob::new(glob) {
            Ok(pattern) if pattern.is_match(file_name) => {
                debug!("File '{}' matched glob '{}'", file_name, glob);
                return Some(template);
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping executorMapByGlob entry: {}", e),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn config() -> Config {
        Config {
            executor_map: IndexMap::from([
                ("python".to_string(), "python -u".to_string()),
                ("ruby".to_string(), "ruby".to_string()),
            ]),
            executor_map_by_glob: IndexMap::new(),
            executor_map_by_file_extension: IndexMap::from([(
                ".exs".to_string(),
                "elixir".to_string(),
            )]),
            ..Config::default()
        }
    }

    fn input<'a>(language: &'a str, file_name: &'a str, ext: &'a str, first_line: &'a str) -> ResolveInput<'a> {
        ResolveInput {
            language_override: None,
            document_language: language,
            file_name,
            file_extension: ext,
            first_line,
        }
    }

    #[test]
    fn test_shebang_wins_over_maps() {
        let resolved =
            resolve_executor(&input("python", "run.py", ".py", "#!/usr/bin/env bash"), &config()).unwrap();
        assert_eq!(resolved.template, "/usr/bin/env bash");
        assert_eq!(resolved.language_id, "python");
    }

    #[test]
    fn test_rust_attribute_is_not_a_shebang() {
        assert_eq!(shebang_command("#![allow(dead_code)]"), None);
        assert_eq!(shebang_command("#!/bin/sh"), Some("/bin/sh"));
        assert_eq!(shebang_command("# comment"), None);

        let mut cfg = config();
        cfg.executor_map.insert("rust".to_string(), "rustc".to_string());
        let resolved =
            resolve_executor(&input("rust", "main.rs", ".rs", "#![allow(dead_code)]"), &cfg).unwrap();
        assert_eq!(resolved.template, "rustc");
    }

    #[test]
    fn test_shebang_ignored_with_override_or_disabled() {
        let mut with_override = input("python", "run.py", ".py", "#!/bin/bash");
        with_override.language_override = Some("ruby");
        let resolved = resolve_executor(&with_override, &config()).unwrap();
        assert_eq!(resolved, ResolvedCommand::new("ruby", "ruby"));

        let mut cfg = config();
        cfg.respect_shebang = false;
        let resolved = resolve_executor(&input("python", "run.py", ".py", "#!/bin/bash"), &cfg).unwrap();
        assert_eq!(resolved.template, "python -u");
    }

    #[test]
    fn test_glob_checked_in_order_before_language() {
        let mut cfg = config();
        cfg.executor_map_by_glob.insert("test_*.py".to_string(), "pytest".to_string());
        cfg.executor_map_by_glob.insert("*.py".to_string(), "python3".to_string());

        let resolved = resolve_executor(&input("python", "test_app.py", ".py", ""), &cfg).unwrap();
        assert_eq!(resolved, ResolvedCommand::new("pytest", "python"));

        let resolved = resolve_executor(&input("python", "app.py", ".py", ""), &cfg).unwrap();
        assert_eq!(resolved.template, "python3");
    }

    #[test]
    fn test_invalid_glob_is_skipped() {
        let mut cfg = config();
        cfg.executor_map_by_glob.insert("[".to_string(), "broken".to_string());
        let resolved = resolve_executor(&input("python", "app.py", ".py", ""), &cfg).unwrap();
        assert_eq!(resolved.template, "python -u");
    }

    #[test]
    fn test_extension_map_reassigns_language_id() {
        for (ext, template) in &config().executor_map_by_file_extension {
            let resolved =
                resolve_executor(&input("elixir", "mix_task", ext, ""), &config()).unwrap();
            assert_eq!(&resolved.template, template);
            assert_eq!(&resolved.language_id, ext);
        }
    }

    #[test]
    fn test_default_language_fallback() {
        let mut cfg = config();
        cfg.default_language = "ruby".to_string();
        let resolved = resolve_executor(&input("plaintext", "notes.txt", ".txt", ""), &cfg).unwrap();
        assert_eq!(resolved, ResolvedCommand::new("ruby", "ruby"));
    }

    #[test]
    fn test_unresolved_is_none() {
        assert_eq!(
            resolve_executor(&input("plaintext", "notes.txt", ".txt", ""), &config()),
            None
        );
    }

    #[test]
    fn test_for_document_untitled() {
        let doc = Document::untitled("python", "#!/bin/sh\necho hi\n");
        let resolve_input = ResolveInput::for_document(&doc, None);
        assert_eq!(resolve_input.file_name, "untitled");
        assert_eq!(resolve_input.first_line, "#!/bin/sh");
    }
}
