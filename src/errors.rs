use std::io;
use thiserror::Error;

/// Comprehensive error type for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("syntax error near {0}")]
    Syntax(String),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("{path}: {source}")]
    Redirection {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("terminal setup failed: {0}")]
    TerminalSetup(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("end of input")]
    Eof,
}

impl ShellError {
    /// Whether the error is a write into a pipe whose reader has gone away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, ShellError::IoError(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

impl From<nix::Error> for ShellError {
    fn from(errno: nix::Error) -> Self {
        ShellError::IoError(io::Error::from(errno))
    }
}

pub type ShellResult<T> = Result<T, ShellError>;
