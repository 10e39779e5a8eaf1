use serde::{Deserialize, Serialize};

use super::Document;

/// How a run was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// A file picked from the explorer that is not the active editor
    Explorer,
    ActiveEditor,
    CustomCommand,
    ByLanguage,
}

/// Everything a single run needs to know about what to execute
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub document: Document,
    pub language_override: Option<String>,
    pub trigger: TriggerMode,
}

impl RunRequest {
    pub fn new(document: Document, trigger: TriggerMode) -> Self {
        Self {
            document,
            language_override: None,
            trigger,
        }
    }

    pub fn with_language_override(mut self, language_id: Option<String>) -> Self {
        self.language_override = language_id;
        self
    }

    pub fn is_from_explorer(&self) -> bool {
        self.trigger == TriggerMode::Explorer
    }

    /// Whether the whole document text is used rather than its selection
    pub fn uses_whole_document(&self, ignore_selection: bool) -> bool {
        self.is_from_explorer() || ignore_selection || !self.document.has_selection()
    }

    /// Whether the original file can be executed without a scratch copy
    pub fn runs_in_place(&self, ignore_selection: bool) -> bool {
        self.uses_whole_document(ignore_selection) && !self.document.is_untitled()
    }

    /// The language the document would resolve under before any reassignment
    pub fn language_id(&self) -> &str {
        self.language_override
            .as_deref()
            .unwrap_or(&self.document.language_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Selection;
    use std::path::PathBuf;

    fn saved(text: &str) -> Document {
        Document {
            path: Some(PathBuf::from("/work/main.py")),
            language_id: "python".to_string(),
            text: text.to_string(),
            selection: None,
        }
    }

    #[test]
    fn test_runs_in_place_without_selection() {
        let request = RunRequest::new(saved("print(1)"), TriggerMode::ActiveEditor);
        assert!(request.runs_in_place(false));
    }

    #[test]
    fn test_selection_forces_scratch_file() {
        let doc = saved("print(1)\nprint(2)").with_selection(Selection::new(0, 8));
        let request = RunRequest::new(doc.clone(), TriggerMode::ActiveEditor);
        assert!(!request.runs_in_place(false));
        assert!(request.runs_in_place(true));

        let explorer = RunRequest::new(doc, TriggerMode::Explorer);
        assert!(explorer.runs_in_place(false));
    }

    #[test]
    fn test_untitled_never_runs_in_place() {
        let request = RunRequest::new(Document::untitled("python", "x"), TriggerMode::ActiveEditor);
        assert!(!request.runs_in_place(true));
        assert!(request.uses_whole_document(false));
    }

    #[test]
    fn test_language_override() {
        let request = RunRequest::new(saved(""), TriggerMode::ByLanguage)
            .with_language_override(Some("ruby".to_string()));
        assert_eq!(request.language_id(), "ruby");
    }
}
