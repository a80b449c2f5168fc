use crate::cancel;
use crate::cli::ShellArgs;
use crate::commands::{BuiltinRegistry, CommandTable, PathResolver};
use crate::completion::ShellCompleter;
use crate::editor::LineEditor;
use crate::errors::{ShellError, ShellResult};
use crate::history::{self, HistoryStore, SharedHistory};
use crate::io_context::unbuffered_stdin;
use crate::lexer::tokenize;
use crate::parser::parse_pipeline;
use crate::pipeline::{Flow, PipelineExecutor};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The read-eval loop tying the editor, parser and executor together.
pub struct Shell {
    commands: CommandTable,
    history: SharedHistory,
    editor: LineEditor,
    histfile: Option<PathBuf>,
}

impl Shell {
    pub fn new(args: &ShellArgs) -> Self {
        let history = HistoryStore::new().shared();
        let builtins = BuiltinRegistry::with_defaults(history.clone());
        let path = PathResolver::from_env();
        let completer = ShellCompleter::new(builtins.builtin_names(), path.clone());

        Self {
            commands: CommandTable::new(builtins, path),
            history,
            editor: LineEditor::new(args.prompt.clone(), completer),
            histfile: args.histfile.clone(),
        }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Parse and run one input line.
    pub fn handle_line(&self, line: &str) -> ShellResult<Flow> {
        let tokens = tokenize(line);
        let stages = parse_pipeline(&tokens)?;
        debug!(?stages, "parsed line");
        PipelineExecutor::new(&self.commands).execute(&stages)
    }

    /// Run until end of input or `exit`, returning the exit code.
    ///
    /// Uses the line editor when stdin is a terminal and plain lines otherwise.
    pub fn run(&self) -> ShellResult<i32> {
        cancel::install_interrupt_handler()?;
        self.load_history();

        let code = if io::stdin().is_terminal() {
            self.run_interactive()
        } else {
            unbuffered_stdin()
                .map_err(ShellError::from)
                .and_then(|stdin| self.run_lines(stdin))
        };

        self.save_history();
        code
    }

    /// Run every line from `input` in order, without prompting.
    ///
    /// Input is consumed one line at a time, leaving the rest for commands
    /// that read the same stream.
    pub fn run_lines<R: Read>(&self, mut input: R) -> ShellResult<i32> {
        while let Some(line) = read_raw_line(&mut input)? {
            if let Some(code) = self.step(&line) {
                return Ok(code);
            }
        }
        Ok(0)
    }

    fn run_interactive(&self) -> ShellResult<i32> {
        loop {
            let entries = history::lock(&self.history).list();
            match self.editor.read_line(&entries) {
                Ok(line) => {
                    if let Some(code) = self.step(&line) {
                        return Ok(code);
                    }
                }
                Err(ShellError::Eof) => return Ok(0),
                Err(e @ ShellError::TerminalSetup(_)) => return Err(e),
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    /// Record and execute a line; `Some(code)` when the shell should exit.
    fn step(&self, line: &str) -> Option<i32> {
        if line.trim().is_empty() {
            return None;
        }
        history::lock(&self.history).add(line);

        match self.handle_line(line) {
            Ok(Flow::Exit(code)) => Some(code),
            Ok(Flow::Continue) => None,
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        }
    }

    fn load_history(&self) {
        let Some(path) = &self.histfile else {
            return;
        };
        match history::lock(&self.history).load_from(path) {
            Ok(()) => info!(path = %path.display(), "loaded history"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to load history"),
        }
    }

    fn save_history(&self) {
        let Some(path) = &self.histfile else {
            return;
        };
        if let Err(e) = history::lock(&self.history).append_to(path) {
            warn!(path = %path.display(), error = %e, "failed to save history");
        }
    }
}

/// Read up to and including the next newline, one byte per read call.
fn read_raw_line<R: Read>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) if line.is_empty() => return Ok(None),
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}
