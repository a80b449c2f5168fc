use crate::cancel::{self, CancelToken};
use crate::commands::{BuiltinCommand, BuiltinStatus, CommandTable, ExecContext, Resolved};
use crate::errors::{ShellError, ShellResult};
use crate::io_context::{IoContext, Sink, Source};
use crate::parser::CommandStage;
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command};
use std::thread::{self, Scope, ScopedJoinHandle};
use tracing::{debug, error, warn};

/// What the read loop should do after a pipeline ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

impl Flow {
    pub fn should_exit(&self) -> bool {
        matches!(self, Flow::Exit(_))
    }
}

/// The streams a pipeline starts from and ends in.
#[derive(Debug)]
pub struct ShellStreams {
    pub stdin: Source,
    pub stdout: Sink,
    pub stderr: Sink,
}

impl ShellStreams {
    pub fn inherit() -> Self {
        Self {
            stdin: Source::Stdin,
            stdout: Sink::Stdout,
            stderr: Sink::Stderr,
        }
    }
}

/// A stage with its command resolved and its streams set up, not yet running.
struct PreparedStage<'a> {
    stage: &'a CommandStage,
    target: Resolved<'a>,
    io: IoContext,
}

enum Running<'scope> {
    Builtin {
        name: &'scope str,
        handle: ScopedJoinHandle<'scope, BuiltinStatus>,
    },
    External {
        name: &'scope str,
        child: Child,
    },
}

/// Runs parsed pipelines, wiring stages together with pipes.
pub struct PipelineExecutor<'a> {
    commands: &'a CommandTable,
    streams: ShellStreams,
}

impl<'a> PipelineExecutor<'a> {
    pub fn new(commands: &'a CommandTable) -> Self {
        Self::with_streams(commands, ShellStreams::inherit())
    }

    pub fn with_streams(commands: &'a CommandTable, streams: ShellStreams) -> Self {
        Self { commands, streams }
    }

    /// Execute a pipeline and wait for every stage to finish.
    ///
    /// Every stage is resolved and has its redirects opened before anything
    /// starts; a missing command or unopenable target aborts the whole line.
    /// Failures of a running stage only show up on its own error stream.
    pub fn execute(&self, stages: &[CommandStage]) -> ShellResult<Flow> {
        if stages.is_empty() {
            return Ok(Flow::Continue);
        }

        let prepared = self.prepare(stages)?;
        debug!(stages = prepared.len(), "launching pipeline");

        cancel::clear_interrupt();
        let cancel = CancelToken::new();
        let ctx = ExecContext {
            cancel: &cancel,
            commands: self.commands,
        };

        thread::scope(|scope| {
            let mut running = Vec::with_capacity(prepared.len());
            let mut launch_error = None;

            let mut pending = prepared.into_iter();
            for stage in pending.by_ref() {
                match launch(scope, &ctx, stage) {
                    Ok(stage) => running.push(stage),
                    Err(e) => {
                        launch_error = Some(e);
                        break;
                    }
                }
            }

            if launch_error.is_some() {
                // Release the unlaunched stages' pipe ends so running stages see EOF.
                drop(pending);
                cancel.cancel();
            }

            let flow = wait_all(running);
            match launch_error {
                Some(e) => Err(e),
                None => Ok(flow),
            }
        })
    }

    fn prepare<'s>(&'s self, stages: &'s [CommandStage]) -> ShellResult<Vec<PreparedStage<'s>>> {
        let mut prepared = Vec::with_capacity(stages.len());
        let mut next_stdin = self.streams.stdin.try_clone()?;

        for (i, stage) in stages.iter().enumerate() {
            let stdin = std::mem::replace(&mut next_stdin, Source::Closed);
            let stdout = if i + 1 < stages.len() {
                let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC)?;
                next_stdin = Source::from(read_end);
                Sink::from(write_end)
            } else {
                self.streams.stdout.try_clone()?
            };

            let mut io = IoContext::new(stdin, stdout, self.streams.stderr.try_clone()?);
            io.apply(&stage.redirect)?;

            let target = self
                .commands
                .resolve(&stage.name)
                .ok_or_else(|| ShellError::CommandNotFound(stage.name.clone()))?;

            prepared.push(PreparedStage { stage, target, io });
        }

        Ok(prepared)
    }
}

fn launch<'scope>(
    scope: &'scope Scope<'scope, '_>,
    ctx: &'scope ExecContext<'scope>,
    prepared: PreparedStage<'scope>,
) -> ShellResult<Running<'scope>> {
    let PreparedStage { stage, target, mut io } = prepared;

    match target {
        Resolved::Builtin(builtin) => {
            debug!(builtin = %stage.name, about = builtin.description(), "starting builtin stage");
            let handle = thread::Builder::new()
                .name(format!("builtin-{}", stage.name))
                .spawn_scoped(scope, move || run_builtin(builtin, ctx, &stage.args, io))
                .map_err(|source| ShellError::Spawn {
                    name: stage.name.clone(),
                    source,
                })?;
            Ok(Running::Builtin {
                name: &stage.name,
                handle,
            })
        }
        Resolved::External(path) => {
            debug!(command = %stage.name, path = %path.display(), "spawning external stage");
            let (stdin, stdout, stderr) = io.take_stdio();
            // The Command holds the parent's copies of the stage's handles and is
            // dropped right after spawning.
            let child = Command::new(&path)
                .arg0(&stage.name)
                .args(&stage.args)
                .stdin(stdin)
                .stdout(stdout)
                .stderr(stderr)
                .spawn()
                .map_err(|source| ShellError::Spawn {
                    name: stage.name.clone(),
                    source,
                })?;
            io.close();
            Ok(Running::External {
                name: &stage.name,
                child,
            })
        }
    }
}

fn run_builtin(
    builtin: &dyn BuiltinCommand,
    ctx: &ExecContext<'_>,
    args: &[String],
    mut io: IoContext,
) -> BuiltinStatus {
    let status = match builtin.execute(ctx, args, &mut io) {
        Ok(status) => status,
        Err(e) if e.is_broken_pipe() => BuiltinStatus::Error,
        Err(e) => {
            let _ = writeln!(io.stderr, "{}: {}", builtin.name(), e);
            BuiltinStatus::Error
        }
    };
    io.close();
    status
}

fn wait_all(running: Vec<Running<'_>>) -> Flow {
    let mut flow = Flow::Continue;

    for stage in running {
        match stage {
            Running::Builtin { name, handle } => match handle.join() {
                Ok(BuiltinStatus::Exit(code)) if !flow.should_exit() => flow = Flow::Exit(code),
                Ok(status) => debug!(builtin = name, ?status, "builtin stage finished"),
                Err(_) => error!(builtin = name, "builtin stage panicked"),
            },
            Running::External { name, mut child } => match child.wait() {
                Ok(status) => debug!(command = name, %status, "external stage finished"),
                Err(e) => warn!(command = name, error = %e, "failed to wait for stage"),
            },
        }
    }

    flow
}
