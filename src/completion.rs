use crate::commands::PathResolver;
use std::collections::BTreeSet;

/// What pressing Tab should do to the current token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matches.
    NoMatch,
    /// Exactly one candidate; the text to append to finish it.
    Unique(String),
    /// Several candidates sharing more than what was typed; the text to append.
    Extend(String),
    /// Several candidates and nothing more to add; sorted for listing.
    Ambiguous(Vec<String>),
}

/// Completes command names from builtins first, then executables on the path.
#[derive(Debug, Clone)]
pub struct ShellCompleter {
    builtins: Vec<String>,
    path: PathResolver,
}

/// The word being completed: everything after the last space.
pub fn active_token(line: &str) -> &str {
    line.rsplit_once(' ').map_or(line, |(_, token)| token)
}

/// Longest string that prefixes every candidate.
pub fn longest_common_prefix<S: AsRef<str>>(candidates: &[S]) -> &str {
    let Some((first, rest)) = candidates.split_first() else {
        return "";
    };
    let mut prefix = first.as_ref();
    for candidate in rest {
        let candidate = candidate.as_ref();
        let shared = prefix
            .char_indices()
            .zip(candidate.chars())
            .find(|((_, a), b)| a != b)
            .map_or(prefix.len().min(candidate.len()), |((i, _), _)| i);
        prefix = &prefix[..shared];
    }
    prefix
}

impl ShellCompleter {
    pub fn new<S: Into<String>>(builtins: impl IntoIterator<Item = S>, path: PathResolver) -> Self {
        Self {
            builtins: builtins.into_iter().map(Into::into).collect(),
            path,
        }
    }

    /// Every candidate starting with `token`, sorted and deduplicated.
    ///
    /// Executables are only consulted when no builtin matches.
    pub fn candidates(&self, token: &str) -> Vec<String> {
        let builtins: BTreeSet<String> = self
            .builtins
            .iter()
            .filter(|name| name.starts_with(token))
            .cloned()
            .collect();
        if !builtins.is_empty() {
            return builtins.into_iter().collect();
        }

        self.path
            .executable_names()
            .into_iter()
            .filter(|name| name.starts_with(token))
            .collect()
    }

    /// Decide how to complete `token`.
    pub fn complete(&self, token: &str) -> Completion {
        let matches = self.candidates(token);
        match matches.len() {
            0 => Completion::NoMatch,
            1 => Completion::Unique(matches[0][token.len()..].to_string()),
            _ => {
                let lcp = longest_common_prefix(matches.as_slice());
                if lcp.len() > token.len() {
                    Completion::Extend(lcp[token.len()..].to_string())
                } else {
                    Completion::Ambiguous(matches)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::external::tests::write_script;

    fn completer(builtins: &[&str], dirs: &[&std::path::Path]) -> ShellCompleter {
        ShellCompleter::new(
            builtins.iter().copied(),
            PathResolver::with_dirs(dirs.iter().map(|d| d.to_path_buf()).collect()),
        )
    }

    #[test]
    fn test_active_token() {
        assert_eq!(active_token("ec"), "ec");
        assert_eq!(active_token("echo hel"), "hel");
        assert_eq!(active_token("echo "), "");
    }

    #[test]
    fn test_longest_common_prefix() {
        assert_eq!(longest_common_prefix(&["echo", "exit"]), "e");
        assert_eq!(longest_common_prefix(&["xyz_foo", "xyz_foo_bar", "xyz_foo_bar_baz"]), "xyz_foo");
        assert_eq!(longest_common_prefix(&["abc"]), "abc");
        assert_eq!(longest_common_prefix(&["abc", "xyz"]), "");
        assert_eq!(longest_common_prefix::<&str>(&[]), "");
    }

    #[test]
    fn test_unique_builtin() {
        let c = completer(&["echo", "exit", "type"], &[]);
        assert_eq!(c.complete("ec"), Completion::Unique("ho".into()));
        assert_eq!(c.complete("echo"), Completion::Unique("".into()));
    }

    #[test]
    fn test_ambiguous_builtins() {
        let c = completer(&["exit", "echo"], &[]);
        assert_eq!(
            c.complete("e"),
            Completion::Ambiguous(vec!["echo".into(), "exit".into()])
        );
    }

    #[test]
    fn test_builtins_shadow_executables() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "echo_helper", "true");
        let c = completer(&["echo"], &[dir.path()]);
        assert_eq!(c.candidates("ec"), vec!["echo"]);
    }

    #[test]
    fn test_falls_back_to_executables() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "xyz_foo", "true");
        write_script(dir.path(), "xyz_foo_bar", "true");
        write_script(dir.path(), "xyz_foo_bar_baz", "true");
        let c = completer(&["echo"], &[dir.path()]);

        assert_eq!(c.complete("xyz_"), Completion::Extend("foo".into()));
        assert_eq!(
            c.complete("xyz_foo"),
            Completion::Ambiguous(vec![
                "xyz_foo".into(),
                "xyz_foo_bar".into(),
                "xyz_foo_bar_baz".into()
            ])
        );
        assert_eq!(c.complete("xyz_foo_bar_"), Completion::Unique("baz".into()));
    }

    #[test]
    fn test_no_match() {
        let c = completer(&["echo"], &[]);
        assert_eq!(c.complete("zz"), Completion::NoMatch);
    }
}
