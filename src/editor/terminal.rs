use crate::errors::{ShellError, ShellResult};
use nix::sys::termios::{cfmakeraw, tcgetattr, tcsetattr, SetArg, Termios};
use std::io::{self, Stdin};
use tracing::warn;

/// Puts the terminal on stdin into raw mode until dropped.
///
/// The original mode is restored on every exit path, including unwinding.
pub struct RawMode {
    stdin: Stdin,
    original: Termios,
}

impl RawMode {
    pub fn enter() -> ShellResult<Self> {
        let stdin = io::stdin();
        let original = tcgetattr(&stdin)
            .map_err(|e| ShellError::TerminalSetup(format!("cannot read terminal mode: {e}")))?;

        let mut raw = original.clone();
        cfmakeraw(&mut raw);
        tcsetattr(&stdin, SetArg::TCSANOW, &raw)
            .map_err(|e| ShellError::TerminalSetup(format!("cannot enter raw mode: {e}")))?;

        Ok(Self { stdin, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = tcsetattr(&self.stdin, SetArg::TCSANOW, &self.original) {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}
