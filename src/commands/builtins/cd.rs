use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::io_context::IoContext;
use std::env;
use std::io::Write;

pub struct CdCommand;

/// Work out the directory to change to, expanding a leading `~`.
fn target_dir(path: Option<&str>, home: Option<String>) -> Option<String> {
    match path {
        Some(p) if p.starts_with('~') => home.map(|home| p.replacen('~', &home, 1)),
        Some(p) => Some(p.to_string()),
        // No argument provided - go to HOME directory
        None => home,
    }
}

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn description(&self) -> &'static str {
        "Change current working directory"
    }

    fn execute(
        &self,
        _ctx: &ExecContext<'_>,
        args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        let path = args.first().map(|s| s.as_str());

        let Some(target) = target_dir(path, env::var("HOME").ok()) else {
            writeln!(io.stderr, "cd: HOME not set")?;
            return Ok(BuiltinStatus::Error);
        };

        if env::set_current_dir(&target).is_err() {
            writeln!(io.stderr, "cd: {}: No such file or directory", target)?;
            return Ok(BuiltinStatus::Error);
        }
        Ok(BuiltinStatus::Ok)
    }
}
