//! Per-stage standard streams and the redirect files a stage owns.

use crate::errors::ShellResult;
use crate::redirection::Redirect;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, OwnedFd};
use std::process::Stdio;

/// The shell's standard input as a file with no read-ahead buffer.
///
/// Every read consumes exactly the bytes it returns, so a child started later
/// sees the input from where the shell stopped.
pub fn unbuffered_stdin() -> io::Result<File> {
    Ok(File::from(io::stdin().as_fd().try_clone_to_owned()?))
}

/// Where a stage reads from.
#[derive(Debug)]
pub enum Source {
    /// The shell's own standard input.
    Stdin,
    /// A pipe read end or other owned file.
    File(File),
    Closed,
}

impl Source {
    /// Duplicate the source so a new pipeline can read from it.
    pub fn try_clone(&self) -> io::Result<Source> {
        Ok(match self {
            Source::Stdin => Source::Stdin,
            Source::File(file) => Source::File(file.try_clone()?),
            Source::Closed => Source::Closed,
        })
    }

    pub fn into_stdio(self) -> Stdio {
        match self {
            Source::Stdin => Stdio::inherit(),
            Source::File(file) => Stdio::from(file),
            Source::Closed => Stdio::null(),
        }
    }
}

impl From<OwnedFd> for Source {
    fn from(fd: OwnedFd) -> Self {
        Source::File(File::from(fd))
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Stdin => unbuffered_stdin()?.read(buf),
            Source::File(file) => file.read(buf),
            Source::Closed => Ok(0),
        }
    }
}

/// Where a stage writes one of its output streams.
#[derive(Debug)]
pub enum Sink {
    Stdout,
    Stderr,
    /// A pipe write end or a redirect target.
    File(File),
    Closed,
}

impl Sink {
    pub fn into_stdio(self) -> Stdio {
        match self {
            Sink::Stdout | Sink::Stderr => Stdio::inherit(),
            Sink::File(file) => Stdio::from(file),
            Sink::Closed => Stdio::null(),
        }
    }

    /// Duplicate the sink so another stage can write to the same place.
    pub fn try_clone(&self) -> io::Result<Sink> {
        Ok(match self {
            Sink::Stdout => Sink::Stdout,
            Sink::Stderr => Sink::Stderr,
            Sink::File(file) => Sink::File(file.try_clone()?),
            Sink::Closed => Sink::Closed,
        })
    }
}

impl From<OwnedFd> for Sink {
    fn from(fd: OwnedFd) -> Self {
        Sink::File(File::from(fd))
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(buf),
            Sink::Stderr => io::stderr().write(buf),
            Sink::File(file) => file.write(buf),
            Sink::Closed => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::File(file) => file.flush(),
            Sink::Closed => Ok(()),
        }
    }
}

/// The effective streams of one pipeline stage.
///
/// Owns every handle it holds: pipe ends handed over by the engine and files
/// opened by [`IoContext::apply`]. Handles are released by [`IoContext::close`],
/// which also runs on drop.
#[derive(Debug)]
pub struct IoContext {
    pub stdin: Source,
    pub stdout: Sink,
    pub stderr: Sink,
}

impl IoContext {
    pub fn new(stdin: Source, stdout: Sink, stderr: Sink) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }

    /// Context wired to the shell's own standard streams.
    pub fn inherit() -> Self {
        Self::new(Source::Stdin, Sink::Stdout, Sink::Stderr)
    }

    /// Open the redirect targets and make them the effective streams.
    ///
    /// A redirect always replaces whatever stream the pipeline assigned, and
    /// the replaced handle is closed. On failure every handle the context holds
    /// is released before the error is returned.
    pub fn apply(&mut self, redirect: &Redirect) -> ShellResult<()> {
        if let Some(target) = &redirect.stdout {
            match target.open() {
                Ok(file) => self.stdout = Sink::File(file),
                Err(e) => {
                    self.close();
                    return Err(e);
                }
            }
        }

        if let Some(target) = &redirect.stderr {
            match target.open() {
                Ok(file) => self.stderr = Sink::File(file),
                Err(e) => {
                    self.close();
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Hand the streams over as child process stdio, leaving the context empty.
    pub fn take_stdio(&mut self) -> (Stdio, Stdio, Stdio) {
        (
            std::mem::replace(&mut self.stdin, Source::Closed).into_stdio(),
            std::mem::replace(&mut self.stdout, Sink::Closed).into_stdio(),
            std::mem::replace(&mut self.stderr, Sink::Closed).into_stdio(),
        )
    }

    /// Flush and release every handle. Safe to call any number of times.
    pub fn close(&mut self) {
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();
        self.stdin = Source::Closed;
        self.stdout = Sink::Closed;
        self.stderr = Sink::Closed;
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        matches!(
            (&self.stdin, &self.stdout, &self.stderr),
            (Source::Closed, Sink::Closed, Sink::Closed)
        )
    }
}

impl Drop for IoContext {
    fn drop(&mut self) {
        self.close();
    }
}
