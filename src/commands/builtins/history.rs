use crate::commands::cli::HistoryArgs;
use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::history::{self, SharedHistory};
use crate::io_context::IoContext;
use std::io::Write;

pub struct HistoryCommand {
    store: SharedHistory,
}

impl HistoryCommand {
    pub fn new(store: SharedHistory) -> Self {
        Self { store }
    }
}

impl BuiltinCommand for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn description(&self) -> &'static str {
        "Display or manage command history"
    }

    fn execute(
        &self,
        ctx: &ExecContext<'_>,
        args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        let args = match HistoryArgs::parse_args(args) {
            Ok(args) => args,
            Err(e) => {
                write!(io.stderr, "{}", e.render())?;
                return Ok(BuiltinStatus::Error);
            }
        };

        let mut store = history::lock(&self.store);
        let (path, result) = if let Some(path) = &args.read {
            (path, store.extend_from(path).map(drop))
        } else if let Some(path) = &args.write {
            (path, store.write_to(path))
        } else if let Some(path) = &args.append {
            (path, store.append_to(path))
        } else {
            let entries = store.list();
            drop(store);
            let start = args
                .limit
                .map_or(0, |limit| entries.len().saturating_sub(limit));
            for (i, entry) in entries.iter().enumerate().skip(start) {
                if ctx.cancel.is_cancelled() {
                    return Ok(BuiltinStatus::Error);
                }
                writeln!(io.stdout, "{:>5}  {}", i + 1, entry)?;
            }
            return Ok(BuiltinStatus::Ok);
        };

        if let Err(e) = result {
            writeln!(io.stderr, "history: {}: {}", path.display(), e)?;
            return Ok(BuiltinStatus::Error);
        }
        Ok(BuiltinStatus::Ok)
    }
}

#[cfg(test)]
mod tests {
    use crate::cancel::CancelToken;
    use crate::commands::builtins::test_support::{run_in, run_with_cancel};
    use crate::commands::external::PathResolver;
    use crate::commands::registry::{BuiltinRegistry, BuiltinStatus, CommandTable};
    use crate::history::{self, HistoryStore, SharedHistory};
    use std::fs;

    fn setup(lines: &[&str]) -> (SharedHistory, CommandTable) {
        let mut store = HistoryStore::new();
        for line in lines {
            store.add(line);
        }
        let shared = store.shared();
        let commands = CommandTable::new(
            BuiltinRegistry::with_defaults(shared.clone()),
            PathResolver::with_dirs(vec![]),
        );
        (shared, commands)
    }

    #[test]
    fn test_lists_numbered_entries() {
        let (_, commands) = setup(&["echo a", "pwd", "history"]);
        let out = run_in(&commands, "history", &[]);
        assert_eq!(out.stdout, "    1  echo a\n    2  pwd\n    3  history\n");
    }

    #[test]
    fn test_limit_keeps_numbering() {
        let (_, commands) = setup(&["a", "b", "c"]);
        let out = run_in(&commands, "history", &["2"]);
        assert_eq!(out.stdout, "    2  b\n    3  c\n");

        let out = run_in(&commands, "history", &["10"]);
        assert_eq!(out.stdout.lines().count(), 3);
    }

    #[test]
    fn test_read_write_append_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        fs::write(&source, "ls\ncat x\n").unwrap();

        let (shared, commands) = setup(&["history -r source"]);
        let out = run_in(&commands, "history", &["-r", source.to_str().unwrap()]);
        assert_eq!(out.status, BuiltinStatus::Ok);
        assert_eq!(history::lock(&shared).list(), vec!["history -r source", "ls", "cat x"]);

        run_in(&commands, "history", &["-w", target.to_str().unwrap()]);
        assert_eq!(fs::read_to_string(&target).unwrap(), "history -r source\nls\ncat x\n");

        history::lock(&shared).add("echo new");
        run_in(&commands, "history", &["-a", target.to_str().unwrap()]);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "history -r source\nls\ncat x\necho new\n"
        );
    }

    #[test]
    fn test_bad_arguments_report_error() {
        let (_, commands) = setup(&[]);
        let out = run_in(&commands, "history", &["-r"]);
        assert_eq!(out.status, BuiltinStatus::Error);
        assert!(!out.stderr.is_empty());

        let out = run_in(&commands, "history", &["-r", "/nonexistent/file"]);
        assert_eq!(out.status, BuiltinStatus::Error);
        assert!(out.stderr.starts_with("history: /nonexistent/file: "));
    }

    #[test]
    fn test_cancelled_listing_stops_early() {
        let (_, commands) = setup(&["one", "two", "three"]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let out = run_with_cancel(&commands, &cancel, "history", &[]);
        assert_eq!(out.status, BuiltinStatus::Error);
        assert_eq!(out.stdout, "");
    }
}
