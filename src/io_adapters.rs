use crate::error::ShellError;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Prompt shown before every interactive read.
pub const PROMPT: &str = "smash> ";

/// Producer of raw input lines, without their line terminator.
///
/// `Ok(None)` means the input is exhausted and the shell should stop.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Interactive terminal input with line editing and history.
pub struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("cannot initialise line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for Prompt {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C asks the shell to stop; the current line is already finished.
            Err(ReadlineError::Interrupted) => {
                log::debug!("interrupted at prompt");
                Ok(None)
            }
            Err(err) => Err(err).context("cannot read from terminal"),
        }
    }
}

/// Lines read from a batch file, each echoed before it is handed out.
pub struct Batch<R, W> {
    reader: R,
    echo: Option<W>,
}

impl<R: BufRead, W: Write> Batch<R, W> {
    /// Read from `reader`; with `echo` set, every line is first copied there verbatim.
    pub fn new(reader: R, echo: Option<W>) -> Self {
        Self { reader, echo }
    }
}

impl<W: Write> Batch<BufReader<File>, W> {
    /// Open the batch file at `path`.
    ///
    /// # Errors
    /// Returns [`ShellError::Usage`] if the file cannot be opened.
    pub fn open(path: &Path, echo: Option<W>) -> Result<Self, ShellError> {
        let file = File::open(path).map_err(|source| {
            ShellError::Usage(format!("cannot open {}: {}", path.display(), source))
        })?;
        Ok(Self::new(BufReader::new(file), echo))
    }
}

impl<R: BufRead, W: Write> LineSource for Batch<R, W> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("cannot read batch file")?;
        if read == 0 {
            return Ok(None);
        }
        if let Some(echo) = self.echo.as_mut() {
            echo.write_all(&buf)?;
            echo.flush()?;
        }
        // Invalid UTF-8 is replaced so the line still runs like any other.
        let line = String::from_utf8_lossy(&buf).into_owned();
        Ok(Some(strip_terminator(line)))
    }
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Lines supplied up front; used when embedding the interpreter.
impl LineSource for std::vec::IntoIter<String> {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.next())
    }
}
