/// Split `path:A` or `path:A-B` into the path and a 1-based inclusive line range.
/// Anything after the last colon that is not a range stays part of the path.
pub fn parse_filepath_with_lines(filepath_arg: &str) -> (String, Option<(usize, usize)>) {
    if let Some(colon_pos) = filepath_arg.rfind(':') {
        let path_part = &filepath_arg[..colon_pos];
        let line_part = &filepath_arg[colon_pos + 1..];

        match parse_range(line_part, '-') {
            Some(range) if !path_part.is_empty() => (path_part.to_string(), Some(range)),
            // Not a valid line range, treat the whole thing as a path
            _ => (filepath_arg.to_string(), None),
        }
    } else {
        (filepath_arg.to_string(), None)
    }
}

/// Parse the `--lines` value: `A:B`, `A-B` or a single line `A`
pub fn parse_line_range(value: &str) -> Option<(usize, usize)> {
    let separator = if value.contains(':') { ':' } else { '-' };
    parse_range(value, separator)
}

fn parse_range(value: &str, separator: char) -> Option<(usize, usize)> {
    let (start, end) = match value.split_once(separator) {
        Some((start, end)) => (start.trim().parse().ok()?, end.trim().parse().ok()?),
        None => {
            let line = value.trim().parse().ok()?;
            (line, line)
        }
    };
    if start == 0 || end == 0 {
        return None;
    }
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filepath_with_single_line() {
        assert_eq!(
            parse_filepath_with_lines("src/main.py:3"),
            ("src/main.py".to_string(), Some((3, 3)))
        );
    }

    #[test]
    fn test_filepath_with_range() {
        assert_eq!(
            parse_filepath_with_lines("src/main.py:3-8"),
            ("src/main.py".to_string(), Some((3, 8)))
        );
    }

    #[test]
    fn test_filepath_without_lines() {
        assert_eq!(parse_filepath_with_lines("main.py"), ("main.py".to_string(), None));
        assert_eq!(
            parse_filepath_with_lines("C:\\code\\main.py"),
            ("C:\\code\\main.py".to_string(), None)
        );
        assert_eq!(parse_filepath_with_lines("main.py:abc"), ("main.py:abc".to_string(), None));
    }

    #[test]
    fn test_line_range_forms() {
        assert_eq!(parse_line_range("3:8"), Some((3, 8)));
        assert_eq!(parse_line_range("3-8"), Some((3, 8)));
        assert_eq!(parse_line_range("5"), Some((5, 5)));
        assert_eq!(parse_line_range("0:2"), None);
        assert_eq!(parse_line_range("x:2"), None);
    }
}
