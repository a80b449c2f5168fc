use clap::Parser;
use codecrafters_shell::{run_shell, ShellArgs};
use std::process;

fn main() {
    let args = ShellArgs::parse();
    args.init_logging();

    match run_shell(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("shell: {}", e);
            process::exit(1);
        }
    }
}
