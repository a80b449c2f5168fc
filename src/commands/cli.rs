use clap::Parser;
use std::path::PathBuf;

/// Arguments of the `history` builtin
#[derive(Parser, Debug)]
#[command(name = "history", disable_help_flag = true, disable_version_flag = true)]
pub struct HistoryArgs {
    /// Append the lines of FILE to the history
    #[arg(short = 'r', value_name = "FILE", conflicts_with_all = ["write", "append"])]
    pub read: Option<PathBuf>,

    /// Write the whole history to FILE
    #[arg(short = 'w', value_name = "FILE", conflicts_with = "append")]
    pub write: Option<PathBuf>,

    /// Append entries not yet saved to FILE
    #[arg(short = 'a', value_name = "FILE")]
    pub append: Option<PathBuf>,

    /// Only list the last N entries
    pub limit: Option<usize>,
}

impl HistoryArgs {
    pub fn parse_args(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(std::iter::once("history").chain(args.iter().map(String::as_str)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_limit_and_flags() {
        let parsed = HistoryArgs::parse_args(&args(&["3"])).unwrap();
        assert_eq!(parsed.limit, Some(3));
        assert!(parsed.read.is_none());

        let parsed = HistoryArgs::parse_args(&args(&["-w", "/tmp/h"])).unwrap();
        assert_eq!(parsed.write, Some(PathBuf::from("/tmp/h")));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(HistoryArgs::parse_args(&args(&["abc"])).is_err());
        assert!(HistoryArgs::parse_args(&args(&["-r"])).is_err());
        assert!(HistoryArgs::parse_args(&args(&["-r", "a", "-w", "b"])).is_err());
    }
}
