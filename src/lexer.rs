//! Splits a raw input line into words, resolving quoting and escapes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    SingleQuote,
    DoubleQuote,
    /// Backslash seen; holds the state to return to after the next character.
    Escape(Resume),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Normal,
    DoubleQuote,
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Normal => State::Normal,
            Resume::DoubleQuote => State::DoubleQuote,
        }
    }
}

/// Tokenize a line into shell words.
///
/// Quotes are removed, escapes resolved, and spaces or tabs outside quotes separate
/// words. Empty words are never produced. An unterminated quote at the end of the
/// line is accepted and whatever was collected is kept.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Normal;

    for c in line.chars() {
        state = match state {
            State::Normal => match c {
                '\\' => State::Escape(Resume::Normal),
                '\'' => State::SingleQuote,
                '"' => State::DoubleQuote,
                ' ' | '\t' => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    State::Normal
                }
                c => {
                    current.push(c);
                    State::Normal
                }
            },
            State::SingleQuote => {
                if c == '\'' {
                    State::Normal
                } else {
                    current.push(c);
                    State::SingleQuote
                }
            }
            State::DoubleQuote => match c {
                '"' => State::Normal,
                '\\' => State::Escape(Resume::DoubleQuote),
                c => {
                    current.push(c);
                    State::DoubleQuote
                }
            },
            State::Escape(resume) => {
                // Inside double quotes only a few characters are escapable.
                if resume == Resume::DoubleQuote && !matches!(c, '"' | '\\' | ' ') {
                    current.push('\\');
                }
                current.push(c);
                resume.into()
            }
        };
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_command() {
        assert_eq!(tokenize("echo hello"), vec!["echo", "hello"]);
        assert_eq!(tokenize("  ls   -la\t/tmp  "), vec!["ls", "-la", "/tmp"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(tokenize("echo 'a b' c"), vec!["echo", "a b", "c"]);
        assert_eq!(tokenize(r"echo 'a\nb'"), vec!["echo", r"a\nb"]);
        assert_eq!(tokenize("echo 'x''y'"), vec!["echo", "xy"]);
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(tokenize("echo \"a\\\"b\""), vec!["echo", "a\"b"]);
        assert_eq!(tokenize(r#"echo "a\\b""#), vec!["echo", r"a\b"]);
        assert_eq!(tokenize(r#"echo "it's""#), vec!["echo", "it's"]);
        // Backslash before an ordinary character is kept verbatim.
        assert_eq!(tokenize(r#"echo "a\nb""#), vec!["echo", r"a\nb"]);
    }

    #[test]
    fn test_backslash_outside_quotes() {
        assert_eq!(tokenize("echo a\\ b"), vec!["echo", "a b"]);
        assert_eq!(tokenize(r"echo \'x\'"), vec!["echo", "'x'"]);
        assert_eq!(tokenize(r"echo \n"), vec!["echo", "n"]);
    }

    #[test]
    fn test_adjacent_quoted_parts_join() {
        assert_eq!(tokenize(r#"cat "/tmp/a b"'/c'd"#), vec!["cat", "/tmp/a b/cd"]);
    }

    #[test]
    fn test_empty_quotes_produce_no_token() {
        assert_eq!(tokenize("echo '' \"\""), vec!["echo"]);
    }

    #[test]
    fn test_unterminated_quote_flushes() {
        assert_eq!(tokenize("echo 'abc"), vec!["echo", "abc"]);
        assert_eq!(tokenize("echo \"a b"), vec!["echo", "a b"]);
        assert_eq!(tokenize("echo x\\"), vec!["echo", "x"]);
    }

    #[test]
    fn test_operators_are_plain_words() {
        assert_eq!(
            tokenize("ls | grep x > out 2>> err"),
            vec!["ls", "|", "grep", "x", ">", "out", "2>>", "err"]
        );
    }

    #[test]
    fn test_whitespace_normalization_is_idempotent() {
        for line in ["a  b\tc", " ls -l | wc -c ", "echo one two   three", "x"] {
            let tokens = tokenize(line);
            assert_eq!(tokenize(&tokens.join(" ")), tokens);
        }
    }

    #[test]
    fn test_only_spaces_and_tabs_separate_words() {
        assert_eq!(tokenize("a\tb"), vec!["a", "b"]);
        assert_eq!(tokenize("a\u{a0}b c"), vec!["a\u{a0}b", "c"]);
        assert_eq!(tokenize("x\ry"), vec!["x\ry"]);
    }
}
