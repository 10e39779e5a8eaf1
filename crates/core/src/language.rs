//! Language identifier detection from file paths

use std::path::Path;

/// Identifier used for files nothing else matches
pub const PLAIN_TEXT: &str = "plaintext";

const FILE_NAMES: &[(&str, &str)] = &[
    ("Makefile", "makefile"),
    ("makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("Dockerfile", "dockerfile"),
    ("Rakefile", "ruby"),
    ("Gemfile", "ruby"),
    ("Jenkinsfile", "groovy"),
    (".bashrc", "shellscript"),
    (".bash_profile", "shellscript"),
    (".zshrc", "shellscript"),
    (".profile", "shellscript"),
];

const EXTENSIONS: &[(&str, &str)] = &[
    ("py", "python"),
    ("pyw", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("ts", "typescript"),
    ("mts", "typescript"),
    ("rs", "rust"),
    ("go", "go"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("m", "objective-c"),
    ("java", "java"),
    ("rb", "ruby"),
    ("php", "php"),
    ("pl", "perl"),
    ("pm", "perl"),
    ("p6", "perl6"),
    ("raku", "perl6"),
    ("lua", "lua"),
    ("groovy", "groovy"),
    ("gvy", "groovy"),
    ("ps1", "powershell"),
    ("psm1", "powershell"),
    ("bat", "bat"),
    ("cmd", "bat"),
    ("sh", "shellscript"),
    ("bash", "shellscript"),
    ("zsh", "shellscript"),
    ("fs", "fsharp"),
    ("fsx", "fsharp"),
    ("cs", "csharp"),
    ("csx", "csharp"),
    ("vbs", "vbscript"),
    ("coffee", "coffeescript"),
    ("scala", "scala"),
    ("swift", "swift"),
    ("jl", "julia"),
    ("cr", "crystal"),
    ("ml", "ocaml"),
    ("r", "r"),
    ("applescript", "applescript"),
    ("scpt", "applescript"),
    ("clj", "clojure"),
    ("hx", "haxe"),
    ("rkt", "racket"),
    ("scm", "scheme"),
    ("ahk", "ahk"),
    ("au3", "autoit"),
    ("dart", "dart"),
    ("pas", "pascal"),
    ("d", "d"),
    ("hs", "haskell"),
    ("nim", "nim"),
    ("lisp", "lisp"),
    ("kit", "kit"),
    ("v", "v"),
    ("sass", "sass"),
    ("scss", "scss"),
    ("less", "less"),
    ("f90", "FortranFreeForm"),
    ("f95", "FortranFreeForm"),
    ("f", "fortran"),
    ("for", "fortran"),
    ("zig", "zig"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("erl", "erlang"),
    ("json", "json"),
    ("md", "markdown"),
    ("txt", PLAIN_TEXT),
];

/// Map a path to the editor's language identifier for it
pub fn language_id_for_path(path: &Path) -> &'static str {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if let Some((_, id)) = FILE_NAMES.iter().find(|(name, _)| *name == file_name) {
        return id;
    }

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return PLAIN_TEXT;
    };
    let ext = ext.to_ascii_lowercase();

    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, id)| *id)
        .unwrap_or(PLAIN_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_id_for_path() {
        assert_eq!(language_id_for_path(&PathBuf::from("/src/main.py")), "python");
        assert_eq!(language_id_for_path(&PathBuf::from("lib.rs")), "rust");
        assert_eq!(language_id_for_path(&PathBuf::from("deploy.sh")), "shellscript");
        assert_eq!(language_id_for_path(&PathBuf::from("Main.CPP")), "cpp");
        assert_eq!(language_id_for_path(&PathBuf::from("Makefile")), "makefile");
    }

    #[test]
    fn test_unknown_is_plain_text() {
        assert_eq!(language_id_for_path(&PathBuf::from("notes")), PLAIN_TEXT);
        assert_eq!(language_id_for_path(&PathBuf::from("data.xyz")), PLAIN_TEXT);
    }
}
