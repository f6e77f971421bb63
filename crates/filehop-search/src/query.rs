//! Query tokenizer.

/// Flag that makes a bare pattern case-insensitive.
const CASE_INSENSITIVE: &str = "-i";

/// Split a typed query into an argument vector for the search tool.
///
/// A token starting with `-` or `--` followed by a letter is a flag. It
/// takes every following non-flag token as one argument, joined by single
/// spaces with surrounding quotes stripped. Leading non-flag tokens form
/// the pattern and get an implicit `-i`.
///
/// ```
/// use filehop_search::tokenize;
///
/// assert_eq!(tokenize("foo bar"), vec!["-i", "foo bar"]);
/// assert_eq!(tokenize("-w foo -g *.rs"), vec!["-w", "foo", "-g", "*.rs"]);
/// ```
pub fn tokenize(query: &str) -> Vec<String> {
    let mut argv = Vec::new();
    let mut words: Vec<&str> = Vec::new();
    let mut flagged = false;

    for token in query.split_whitespace() {
        if is_flag(token) {
            flush(&mut words, flagged, &mut argv);
            argv.push(token.to_string());
            flagged = true;
        } else {
            words.push(token);
        }
    }
    flush(&mut words, flagged, &mut argv);
    argv
}

/// Whether `argv` holds anything besides flags. A flags-only query
/// leaves the tool without a pattern.
pub fn has_pattern(argv: &[String]) -> bool {
    argv.iter().any(|arg| !is_flag(arg))
}

/// Emit the pending words as one argument.
fn flush(words: &mut Vec<&str>, flagged: bool, argv: &mut Vec<String>) {
    if words.is_empty() {
        return;
    }
    if !flagged {
        argv.push(CASE_INSENSITIVE.to_string());
    }
    argv.push(strip_quotes(&words.join(" ")).to_string());
    words.clear();
}

fn is_flag(token: &str) -> bool {
    let rest = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or("");
    rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_pattern_is_case_insensitive() {
        assert_eq!(tokenize("needle"), vec!["-i", "needle"]);
        assert_eq!(tokenize("  two   words "), vec!["-i", "two words"]);
    }

    #[test]
    fn test_flag_consumes_following_words() {
        assert_eq!(tokenize("-i foo bar"), vec!["-i", "foo bar"]);
        assert_eq!(tokenize("--glob \"*.rs\""), vec!["--glob", "*.rs"]);
        assert_eq!(tokenize("-F 'a b'"), vec!["-F", "a b"]);
    }

    #[test]
    fn test_pattern_then_flags() {
        assert_eq!(tokenize("todo -g *.rs"), vec!["-i", "todo", "-g", "*.rs"]);
    }

    #[test]
    fn test_flag_without_argument() {
        assert_eq!(tokenize("--hidden"), vec!["--hidden"]);
        assert_eq!(tokenize("-w -s Foo"), vec!["-w", "-s", "Foo"]);
    }

    #[test]
    fn test_dash_number_is_not_a_flag() {
        assert_eq!(tokenize("-1"), vec!["-i", "-1"]);
    }

    #[test]
    fn test_has_pattern() {
        assert!(has_pattern(&tokenize("needle")));
        assert!(has_pattern(&tokenize("-w -s Foo")));
        assert!(has_pattern(&tokenize("-1")));
        assert!(!has_pattern(&tokenize("--hidden")));
        assert!(!has_pattern(&tokenize("-w -s")));
        assert!(!has_pattern(&[]));
    }

    #[test]
    fn test_empty_query() {
        assert!(tokenize("   ").is_empty());
    }
}
