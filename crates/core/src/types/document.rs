use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{error::Result, language::language_id_for_path};

/// A byte range into a document's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Select whole lines `start_line..=end_line` (1-based), including the
    /// trailing line break of the last line when present.
    pub fn lines(text: &str, start_line: usize, end_line: usize) -> Self {
        let (first, last) = if start_line <= end_line {
            (start_line.max(1), end_line.max(1))
        } else {
            (end_line.max(1), start_line.max(1))
        };

        let mut offset = 0;
        let mut start = text.len();
        let mut end = text.len();
        for (index, line) in text.split_inclusive('\n').enumerate() {
            let number = index + 1;
            if number == first {
                start = offset;
            }
            offset += line.len();
            if number == last {
                end = offset;
                break;
            }
        }

        Self::new(start.min(end), end)
    }
}

/// A text buffer the user asked to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Absolute path on disk, `None` for an untitled buffer
    pub path: Option<PathBuf>,
    pub language_id: String,
    pub text: String,
    pub selection: Option<Selection>,
}

impl Document {
    /// Load a saved document, detecting its language from the path
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let path = std::path::absolute(path)?;
        Ok(Self {
            language_id: language_id_for_path(&path).to_string(),
            path: Some(path),
            text,
            selection: None,
        })
    }

    pub fn untitled(language_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: None,
            language_id: language_id.into(),
            text: text.into(),
            selection: None,
        }
    }

    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn is_untitled(&self) -> bool {
        self.path.is_none()
    }

    /// Path for display, `untitled` for unsaved buffers
    pub fn file_name(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// File extension including the leading dot, empty when there is none
    pub fn extension(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }

    pub fn first_line(&self) -> &str {
        let line = self.text.lines().next().unwrap_or("");
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// Whether the document has a non-empty selection
    pub fn has_selection(&self) -> bool {
        self.selection.is_some_and(|s| !s.is_empty())
    }

    /// Text covered by the selection, `None` when nothing meaningful is selected
    pub fn selected_text(&self) -> Option<&str> {
        let selection = self.selection.filter(|s| !s.is_empty())?;
        self.text.get(selection.start..selection.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_lines() {
        let text = "one\ntwo\nthree\n";
        let selection = Selection::lines(text, 2, 3);
        assert_eq!(&text[selection.start..selection.end], "two\nthree\n");

        let selection = Selection::lines(text, 1, 1);
        assert_eq!(&text[selection.start..selection.end], "one\n");
    }

    #[test]
    fn test_selection_past_end_is_empty() {
        let text = "one\n";
        let selection = Selection::lines(text, 5, 7);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_extension_and_first_line() {
        let doc = Document {
            path: Some(PathBuf::from("/tmp/script.py")),
            language_id: "python".to_string(),
            text: "#!/usr/bin/env python3\r\nprint(1)\n".to_string(),
            selection: None,
        };
        assert_eq!(doc.extension(), ".py");
        assert_eq!(doc.first_line(), "#!/usr/bin/env python3");

        let untitled = Document::untitled("python", "");
        assert_eq!(untitled.extension(), "");
        assert_eq!(untitled.first_line(), "");
        assert_eq!(untitled.file_name(), "untitled");
    }

    #[test]
    fn test_selected_text() {
        let doc = Document::untitled("python", "print(1)\nprint(2)\n")
            .with_selection(Selection::new(9, 17));
        assert_eq!(doc.selected_text(), Some("print(2)"));

        let empty = Document::untitled("python", "x").with_selection(Selection::new(1, 1));
        assert!(!empty.has_selection());
        assert_eq!(empty.selected_text(), None);
    }
}
