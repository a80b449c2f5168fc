use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shell command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "shell", version)]
#[command(about = "A simple POSIX-style shell", long_about = None)]
pub struct ShellArgs {
    /// Prompt printed before each line
    #[arg(long, default_value = "$ ")]
    pub prompt: String,

    /// History file loaded at startup; new entries are appended on exit
    #[arg(long, env = "HISTFILE", value_name = "PATH")]
    pub histfile: Option<PathBuf>,

    /// Log filter such as `debug` or `codecrafters_shell=trace`
    #[arg(long, env = "SHELL_LOG", default_value = "off")]
    pub log_level: String,
}

impl Default for ShellArgs {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            histfile: None,
            log_level: "off".to_string(),
        }
    }
}

impl ShellArgs {
    /// Install the global tracing subscriber, logging to stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("off"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ShellArgs::try_parse_from(["shell"]).unwrap();
        assert_eq!(args.prompt, "$ ");
        assert_eq!(args.log_level, ShellArgs::default().log_level);
    }

    #[test]
    fn test_explicit_flags() {
        let args = ShellArgs::try_parse_from([
            "shell",
            "--prompt",
            "> ",
            "--histfile",
            "/tmp/h",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.prompt, "> ");
        assert_eq!(args.histfile, Some(PathBuf::from("/tmp/h")));
        assert_eq!(args.log_level, "debug");
    }
}
