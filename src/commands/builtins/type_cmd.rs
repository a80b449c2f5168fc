use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::io_context::IoContext;
use std::io::Write;

pub struct TypeCommand;

impl BuiltinCommand for TypeCommand {
    fn name(&self) -> &'static str {
        "type"
    }

    fn description(&self) -> &'static str {
        "Print the type of a command"
    }

    fn execute(
        &self,
        ctx: &ExecContext<'_>,
        args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        for name in args {
            if ctx.commands.is_builtin(name) {
                writeln!(io.stdout, "{} is a shell builtin", name)?;
            } else if let Some(path) = ctx.commands.resolve_executable(name) {
                writeln!(io.stdout, "{} is {}", name, path.display())?;
            } else {
                writeln!(io.stdout, "{}: not found", name)?;
            }
        }
        Ok(BuiltinStatus::Ok)
    }
}
