use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::io_context::IoContext;

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn description(&self) -> &'static str {
        "Exit the shell"
    }

    fn execute(
        &self,
        _ctx: &ExecContext<'_>,
        args: &[String],
        _io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        let code = args.first().and_then(|s| s.parse().ok()).unwrap_or(0);
        Ok(BuiltinStatus::Exit(code))
    }
}
