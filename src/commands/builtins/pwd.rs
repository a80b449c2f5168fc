use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::io_context::IoContext;
use std::env;
use std::io::Write;

pub struct PwdCommand;

impl BuiltinCommand for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn description(&self) -> &'static str {
        "Print current working directory"
    }

    fn execute(
        &self,
        _ctx: &ExecContext<'_>,
        _args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        let current_dir = env::current_dir()?;
        writeln!(io.stdout, "{}", current_dir.display())?;
        Ok(BuiltinStatus::Ok)
    }
}
