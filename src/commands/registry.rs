use crate::cancel::CancelToken;
use crate::commands::external::PathResolver;
use crate::errors::ShellResult;
use crate::history::SharedHistory;
use crate::io_context::IoContext;
use std::path::PathBuf;

/// How a builtin finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinStatus {
    Ok,
    /// The shell should terminate with this code once the pipeline is done.
    Exit(i32),
    /// The builtin failed and already reported why on its error stream.
    Error,
}

/// What a builtin can see of the shell while it runs.
pub struct ExecContext<'a> {
    pub cancel: &'a CancelToken,
    pub commands: &'a CommandTable,
}

/// Trait that all builtin commands must implement
pub trait BuiltinCommand: Send + Sync {
    /// The command name (e.g., "echo", "cd", "pwd")
    fn name(&self) -> &'static str;

    /// Help text / description for the command
    fn description(&self) -> &'static str;

    /// Execute the command. `args` excludes the command name.
    fn execute(
        &self,
        ctx: &ExecContext<'_>,
        args: &[String],
        io: &mut IoContext,
    ) -> ShellResult<BuiltinStatus>;
}

/// Central registry for all builtin commands
#[derive(Default)]
pub struct BuiltinRegistry {
    commands: Vec<Box<dyn BuiltinCommand>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin the shell ships with.
    pub fn with_defaults(history: SharedHistory) -> Self {
        use super::builtins::*;

        let mut registry = Self::new();
        registry.register(EchoCommand);
        registry.register(ExitCommand);
        registry.register(TypeCommand);
        registry.register(PwdCommand);
        registry.register(CdCommand);
        registry.register(HistoryCommand::new(history));
        registry
    }

    pub fn register<C: BuiltinCommand + 'static>(&mut self, cmd: C) {
        self.commands.push(Box::new(cmd));
    }

    /// Check if a command name is a builtin
    pub fn is_builtin(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Get all builtin command names (for completion and type command)
    pub fn builtin_names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name()).collect()
    }
}

/// A command name resolved to what will actually run.
pub enum Resolved<'a> {
    Builtin(&'a dyn BuiltinCommand),
    External(PathBuf),
}

/// Builtins plus the executable search path: everything a name can resolve to.
#[derive(Default)]
pub struct CommandTable {
    pub builtins: BuiltinRegistry,
    pub path: PathResolver,
}

impl CommandTable {
    pub fn new(builtins: BuiltinRegistry, path: PathResolver) -> Self {
        Self { builtins, path }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.is_builtin(name)
    }

    pub fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
        self.path.resolve_executable(name)
    }

    /// Builtins take precedence over executables of the same name.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        if let Some(builtin) = self.builtins.get(name) {
            return Some(Resolved::Builtin(builtin));
        }
        self.resolve_executable(name).map(Resolved::External)
    }
}
