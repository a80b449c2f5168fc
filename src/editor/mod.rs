//! Interactive line editing: raw keystrokes in, one finished line out.
//!
//! Supports appending and erasing characters, recalling history with the
//! arrow keys and completing command names with Tab.

mod terminal;

pub use terminal::RawMode;

use crate::completion::{active_token, Completion, ShellCompleter};
use crate::errors::{ShellError, ShellResult};
use crate::io_context::unbuffered_stdin;
use std::io::{self, ErrorKind, Read, Write};

const BELL: &[u8] = b"\x07";
const CLEAR_LINE: &[u8] = b"\r\x1b[K";
const ERASE_CHAR: &[u8] = b"\x08 \x08";

const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const BACKSPACE: u8 = 0x08;
const TAB: u8 = b'\t';
const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// Reads lines from a terminal with editing, history recall and completion.
pub struct LineEditor {
    prompt: String,
    completer: ShellCompleter,
}

impl LineEditor {
    pub fn new(prompt: impl Into<String>, completer: ShellCompleter) -> Self {
        Self {
            prompt: prompt.into(),
            completer,
        }
    }

    /// Read one line from the terminal, holding raw mode while doing so.
    ///
    /// `history` is the snapshot available for recall, oldest first.
    pub fn read_line(&self, history: &[String]) -> ShellResult<String> {
        let _raw = RawMode::enter()?;
        let mut stdin = unbuffered_stdin()?;
        let stdout = io::stdout();
        self.edit(history, &mut stdin, &mut stdout.lock())
    }

    /// Run the key loop over arbitrary streams.
    ///
    /// Returns the finished line on Enter, an empty line on Ctrl-C and
    /// [`ShellError::Eof`] on Ctrl-D or end of input with an empty buffer.
    pub fn edit<R: Read, W: Write>(
        &self,
        history: &[String],
        input: &mut R,
        output: &mut W,
    ) -> ShellResult<String> {
        output.write_all(self.prompt.as_bytes())?;
        output.flush()?;

        let mut session = EditSession {
            prompt: &self.prompt,
            completer: &self.completer,
            history,
            out: output,
            buffer: String::new(),
            browse: None,
            draft: String::new(),
            tab_pending: false,
        };

        // A byte read after ESC that did not start an arrow sequence.
        let mut pending = None;
        loop {
            let next = match pending.take() {
                Some(byte) => Some(byte),
                None => next_byte(input)?,
            };
            let Some(byte) = next else {
                return session.finish_at_eof();
            };

            match byte {
                b'\r' | b'\n' => {
                    session.out.write_all(b"\r\n")?;
                    session.out.flush()?;
                    return Ok(session.buffer);
                }
                CTRL_C => {
                    session.out.write_all(b"^C\r\n")?;
                    session.out.flush()?;
                    return Ok(String::new());
                }
                CTRL_D if session.buffer.is_empty() => return session.finish_at_eof(),
                DEL | BACKSPACE => session.backspace()?,
                TAB => session.complete()?,
                ESC => match next_byte(input)? {
                    Some(b'[' | b'O') => match next_byte(input)? {
                        Some(b'A') => session.history_up()?,
                        Some(b'B') => session.history_down()?,
                        Some(_) => {}
                        None => return session.finish_at_eof(),
                    },
                    Some(other) => pending = Some(other),
                    None => return session.finish_at_eof(),
                },
                b if b < 0x20 => {}
                lead => {
                    if let Some(ch) = read_char(lead, input)? {
                        let mut utf8 = [0u8; 4];
                        session.insert(ch.encode_utf8(&mut utf8))?;
                    }
                }
            }
            session.out.flush()?;
        }
    }
}

fn next_byte<R: Read>(input: &mut R) -> ShellResult<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ShellError::Terminal(format!("read failed: {e}"))),
        }
    }
}

/// Decode a UTF-8 character whose first byte is `lead`. Invalid input is dropped.
fn read_char<R: Read>(lead: u8, input: &mut R) -> ShellResult<Option<char>> {
    let len = match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    };
    let mut bytes = vec![lead];
    while bytes.len() < len {
        match next_byte(input)? {
            Some(b) => bytes.push(b),
            None => return Ok(None),
        }
    }
    Ok(std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next()))
}

/// State of a single line read. Dropped when the line is returned.
struct EditSession<'a, W: Write> {
    prompt: &'a str,
    completer: &'a ShellCompleter,
    history: &'a [String],
    out: &'a mut W,
    buffer: String,
    /// Index into `history` while browsing it.
    browse: Option<usize>,
    /// What the user had typed before browsing started.
    draft: String,
    /// Last Tab found several candidates and nothing to add.
    tab_pending: bool,
}

impl<W: Write> EditSession<'_, W> {
    fn finish_at_eof(mut self) -> ShellResult<String> {
        self.out.write_all(b"\r\n")?;
        self.out.flush()?;
        if self.buffer.is_empty() {
            Err(ShellError::Eof)
        } else {
            Ok(self.buffer)
        }
    }

    fn insert(&mut self, text: &str) -> io::Result<()> {
        self.tab_pending = false;
        self.buffer.push_str(text);
        self.out.write_all(text.as_bytes())
    }

    fn backspace(&mut self) -> io::Result<()> {
        self.tab_pending = false;
        if self.buffer.pop().is_some() {
            self.out.write_all(ERASE_CHAR)?;
        }
        Ok(())
    }

    fn redraw(&mut self) -> io::Result<()> {
        self.out.write_all(CLEAR_LINE)?;
        self.out.write_all(self.prompt.as_bytes())?;
        self.out.write_all(self.buffer.as_bytes())
    }

    fn show_entry(&mut self, index: usize) -> io::Result<()> {
        self.browse = Some(index);
        self.buffer = self.history[index].clone();
        self.redraw()
    }

    fn history_up(&mut self) -> io::Result<()> {
        if self.history.is_empty() {
            return Ok(());
        }
        self.tab_pending = false;
        let index = match self.browse {
            None => {
                self.draft = self.buffer.clone();
                self.history.len() - 1
            }
            Some(index) => index.saturating_sub(1),
        };
        self.show_entry(index)
    }

    fn history_down(&mut self) -> io::Result<()> {
        let Some(index) = self.browse else {
            return Ok(());
        };
        self.tab_pending = false;
        if index + 1 < self.history.len() {
            return self.show_entry(index + 1);
        }
        self.browse = None;
        self.buffer = std::mem::take(&mut self.draft);
        self.redraw()
    }

    fn complete(&mut self) -> io::Result<()> {
        let token = active_token(&self.buffer).to_string();
        match self.completer.complete(&token) {
            Completion::NoMatch => {
                self.tab_pending = false;
                self.out.write_all(BELL)
            }
            Completion::Unique(suffix) => {
                self.insert(&suffix)?;
                self.insert(" ")
            }
            Completion::Extend(suffix) => self.insert(&suffix),
            Completion::Ambiguous(matches) if self.tab_pending => {
                self.tab_pending = false;
                self.out.write_all(b"\r\n")?;
                self.out.write_all(matches.join("  ").as_bytes())?;
                self.out.write_all(b"\r\n")?;
                self.out.write_all(self.prompt.as_bytes())?;
                self.out.write_all(self.buffer.as_bytes())
            }
            Completion::Ambiguous(_) => {
                self.tab_pending = true;
                self.out.write_all(BELL)
            }
        }
    }
}
