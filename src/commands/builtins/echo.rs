use crate::commands::registry::{BuiltinCommand, BuiltinStatus, ExecContext};
use crate::errors::ShellResult;
use crate::io_context::IoContext;
use std::io::Write;

pub struct EchoCommand;

impl BuiltinCommand for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Echo arguments to stdout"
    }

    fn execute(
        &self,
        _ctx: &ExecContext<'_>,
        args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus> {
        writeln!(io.stdout, "{}", args.join(" "))?;
        Ok(BuiltinStatus::Ok)
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::builtins::test_support::run;
    use crate::commands::registry::BuiltinStatus;

    #[test]
    fn test_joins_args_with_single_spaces() {
        let out = run("echo", &["hello", "big  world"]);
        assert_eq!(out.status, BuiltinStatus::Ok);
        assert_eq!(out.stdout, "hello big  world\n");
    }

    #[test]
    fn test_no_args_prints_empty_line() {
        assert_eq!(run("echo", &[]).stdout, "\n");
    }
}
