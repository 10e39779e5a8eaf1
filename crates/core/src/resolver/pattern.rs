//! Shell-style file name globs for `executorMapByGlob`
//!
//! Supports `*`, `**`, `?`, bracket classes (`[abc]`, `[!abc]`, `[^abc]`),
//! brace alternation (`{a,b}`, nested) and a leading `!` for negation.

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

#[derive(Debug, Clone)]
pub struct FileGlob {
    alternatives: Vec<Pattern>,
    negated: bool,
}

impl FileGlob {
    pub fn new(pattern: &str) -> Result<Self> {
        let (negated, body) = match pattern.strip_prefix('!') {
            Some(rest) if !rest.starts_with('(') => (true, rest),
            _ => (false, pattern),
        };

        let alternatives = expand_braces(body)
            .into_iter()
            .map(|alt| {
                Pattern::new(&normalize(&alt)).map_err(|e| Error::GlobError {
                    pattern: pattern.to_string(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            alternatives,
            negated,
        })
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        let matched = self
            .alternatives
            .iter()
            .any(|p| p.matches_with(file_name, MATCH_OPTIONS));
        matched != self.negated
    }
}

/// Rewrite syntax the `glob` crate does not accept into its equivalent
fn normalize(pattern: &str) -> String {
    let pattern = pattern.replace("[^", "[!");
    pattern
        .split('/')
        .map(|segment| {
            if segment == "**" || !segment.contains("**") {
                segment.to_string()
            } else {
                let mut collapsed = String::with_capacity(segment.len());
                for ch in segment.chars() {
                    if ch == '*' && collapsed.ends_with('*') {
                        continue;
                    }
                    collapsed.push(ch);
                }
                collapsed
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Expand the first top-level `{a,b}` group, recursing into the results
fn expand_braces(pattern: &str) -> Vec<String> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut open = None;
    let mut commas = Vec::new();
    let mut in_class = false;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            b'{' if !in_class => {
                if depth == 0 {
                    open = Some(i);
                    commas.clear();
                }
                depth += 1;
            }
            b',' if !in_class && depth == 1 => commas.push(i),
            b'}' if !in_class && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let start = open.unwrap_or(0);
                    if commas.is_empty() {
                        // `{x}` is not an alternation; keep scanning after it
                        open = None;
                        continue;
                    }
                    let prefix = &pattern[..start];
                    let suffix = &pattern[i + 1..];
                    let mut bounds = vec![start];
                    bounds.extend(&commas);
                    bounds.push(i);

                    return bounds
                        .windows(2)
                        .flat_map(|w| {
                            let option = &pattern[w[0] + 1..w[1]];
                            expand_braces(&format!("{prefix}{option}{suffix}"))
                        })
                        .collect();
                }
            }
            _ => {}
        }
    }

    vec![pattern.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, name: &str) -> bool {
        FileGlob::new(pattern).unwrap().is_match(name)
    }

    #[test]
    fn test_star_and_question() {
        assert!(matches("*.test.js", "app.test.js"));
        assert!(!matches("*.test.js", "app.js"));
        assert!(matches("main.?s", "main.ts"));
        assert!(matches("pom.xml", "pom.xml"));
    }

    #[test]
    fn test_globstar() {
        assert!(matches("**/*.py", "main.py"));
        assert!(matches("**.py", "main.py"));
        assert!(matches("**", "anything.txt"));
    }

    #[test]
    fn test_braces() {
        assert!(matches("*.{js,ts}", "index.ts"));
        assert!(matches("*.{js,ts}", "index.js"));
        assert!(!matches("*.{js,ts}", "index.py"));
        assert!(matches("{a,b{c,d}}.txt", "bd.txt"));
        assert!(matches("{single}.txt", "{single}.txt"));
    }

    #[test]
    fn test_brackets() {
        assert!(matches("test[0-9].py", "test3.py"));
        assert!(!matches("test[!0-9].py", "test3.py"));
        assert!(matches("test[^0-9].py", "testx.py"));
    }

    #[test]
    fn test_negation() {
        assert!(matches("!*.py", "main.rs"));
        assert!(!matches("!*.py", "main.py"));
    }

    #[test]
    fn test_dotfiles_need_literal_dot() {
        assert!(!matches("*rc", ".bashrc"));
        assert!(matches(".*rc", ".bashrc"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            FileGlob::new("a[.txt"),
            Err(Error::GlobError { .. })
        ));
    }
}
