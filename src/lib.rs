pub mod cancel;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod editor;
pub mod errors;
pub mod history;
pub mod io_context;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod redirection;
pub mod repl;

pub use cli::ShellArgs;
pub use errors::{ShellError, ShellResult};
pub use repl::Shell;

/// Main entry point for the shell REPL
pub fn run_shell(args: &ShellArgs) -> ShellResult<i32> {
    Shell::new(args).run()
}
