//! `$token` expansion for executor templates

use std::path::{Path, MAIN_SEPARATOR};

/// Tokens in matching order; a longer token precedes any token it starts with
const TOKENS: &[Token] = &[
    Token::WorkspaceRoot,
    Token::FileNameWithoutExt,
    Token::FullFileName,
    Token::FileName,
    Token::DriveLetter,
    Token::DirWithoutTrailingSlash,
    Token::Dir,
    Token::PythonPath,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    WorkspaceRoot,
    FileNameWithoutExt,
    FullFileName,
    FileName,
    DriveLetter,
    DirWithoutTrailingSlash,
    Dir,
    PythonPath,
}

impl Token {
    fn text(self) -> &'static str {
        match self {
            Token::WorkspaceRoot => "$workspaceRoot",
            Token::FileNameWithoutExt => "$fileNameWithoutExt",
            Token::FullFileName => "$fullFileName",
            Token::FileName => "$fileName",
            Token::DriveLetter => "$driveLetter",
            Token::DirWithoutTrailingSlash => "$dirWithoutTrailingSlash",
            Token::Dir => "$dir",
            Token::PythonPath => "$pythonPath",
        }
    }
}

/// The file a template is expanded against
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderContext<'a> {
    pub target: &'a Path,
    pub workspace_root: Option<&'a Path>,
}

impl<'a> PlaceholderContext<'a> {
    pub fn new(target: &'a Path, workspace_root: Option<&'a Path>) -> Self {
        Self {
            target,
            workspace_root,
        }
    }

    fn target_string(&self) -> String {
        self.target.display().to_string()
    }

    /// Directory of the target with a trailing separator
    pub fn dir(&self) -> String {
        match self.target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                let dir = parent.display().to_string();
                if dir.ends_with(['/', '\\']) {
                    dir
                } else {
                    format!("{dir}{MAIN_SEPARATOR}")
                }
            }
            None => self.target_string(),
        }
    }

    pub fn dir_without_trailing_slash(&self) -> String {
        let dir = self.dir();
        match dir.strip_suffix(['/', '\\']) {
            Some(stripped) => stripped.to_string(),
            None => dir,
        }
    }

    pub fn file_name(&self) -> String {
        self.target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.target_string())
    }

    pub fn file_name_without_ext(&self) -> String {
        self.target
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.target_string())
    }

    /// `X:` for Windows-style paths, otherwise the literal token
    pub fn drive_letter(&self) -> String {
        let target = self.target_string();
        let mut chars = target.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => format!("{letter}:"),
            _ => Token::DriveLetter.text().to_string(),
        }
    }

    pub fn workspace_root(&self) -> String {
        match self.workspace_root {
            Some(root) if self.target.starts_with(root) => root.display().to_string(),
            _ => self.dir(),
        }
    }
}

pub fn quote(path: &str) -> String {
    format!("\"{path}\"")
}

/// Substitute every token in `template`. `python_path` is only called when
/// `$pythonPath` occurs. When nothing was substituted and `append_file` is set,
/// the quoted target path is appended.
pub fn expand(
    template: &str,
    context: &PlaceholderContext<'_>,
    python_path: impl FnOnce() -> String,
    append_file: bool,
) -> String {
    let mut python_path = Some(python_path);
    let mut python_value: Option<String> = None;
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        output.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let Some(token) = TOKENS.iter().copied().find(|t| candidate.starts_with(t.text())) else {
            output.push('$');
            rest = &candidate[1..];
            continue;
        };

        let value = match token {
            Token::WorkspaceRoot => context.workspace_root(),
            Token::FileNameWithoutExt => context.file_name_without_ext(),
            Token::FullFileName => quote(&context.target_string()),
            Token::FileName => context.file_name(),
            Token::DriveLetter => context.drive_letter(),
            Token::DirWithoutTrailingSlash => quote(&context.dir_without_trailing_slash()),
            Token::Dir => quote(&context.dir()),
            Token::PythonPath => python_value
                .get_or_insert_with(|| python_path.take().map(|f| f()).unwrap_or_default())
                .clone(),
        };
        output.push_str(&value);
        rest = &candidate[token.text().len()..];
    }
    output.push_str(rest);

    if output == template && append_file {
        format!("{template} {}", quote(&context.target_string()))
    } else {
        output
    }
}
