use crate::errors::{ShellError, ShellResult};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

/// Redirection mode (overwrite or append)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectionMode {
    Overwrite,
    Append,
}

/// A single file target for one output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub file: String,
    pub mode: RedirectionMode,
}

impl Redirection {
    pub fn overwrite(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            mode: RedirectionMode::Overwrite,
        }
    }

    pub fn append(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            mode: RedirectionMode::Append,
        }
    }

    /// Open the target for writing, creating it if needed.
    pub fn open(&self) -> ShellResult<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(self.mode == RedirectionMode::Overwrite)
            .append(self.mode == RedirectionMode::Append)
            .mode(0o644)
            .open(&self.file)
            .map_err(|source| ShellError::Redirection {
                path: self.file.clone(),
                source,
            })
    }
}

/// Per-stage redirect spec. `None` means the stream keeps whatever the
/// pipeline assigned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    pub stdout: Option<Redirection>,
    pub stderr: Option<Redirection>,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn operator(token: &str) -> Option<(Stream, RedirectionMode)> {
    match token {
        ">" | "1>" => Some((Stream::Stdout, RedirectionMode::Overwrite)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectionMode::Append)),
        "2>" => Some((Stream::Stderr, RedirectionMode::Overwrite)),
        "2>>" => Some((Stream::Stderr, RedirectionMode::Append)),
        _ => None,
    }
}

/// Split one stage's tokens into command name, arguments and redirect spec.
///
/// The first token is the command name. Every redirect operator after it
/// consumes the following token as its path; a later operator for the same
/// stream replaces an earlier one.
pub fn parse_redirect(tokens: &[String]) -> ShellResult<(String, Vec<String>, Redirect)> {
    let Some((name, rest)) = tokens.split_first() else {
        return Ok((String::new(), Vec::new(), Redirect::default()));
    };

    let mut args = Vec::new();
    let mut redirect = Redirect::default();
    let mut iter = rest.iter();

    while let Some(token) = iter.next() {
        let Some((stream, mode)) = operator(token) else {
            args.push(token.clone());
            continue;
        };

        let file = iter
            .next()
            .ok_or_else(|| ShellError::Syntax(token.clone()))?
            .clone();
        let target = Some(Redirection { file, mode });
        match stream {
            Stream::Stdout => redirect.stdout = target,
            Stream::Stderr => redirect.stderr = target,
        }
    }

    Ok((name.clone(), args, redirect))
}
