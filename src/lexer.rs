//! Splitting a raw input line into command segments.
//!
//! A line is cut on every `;` and `&`. The separator that ends a segment decides
//! how the scheduler treats it: `;` waits for the command, `&` leaves it running in
//! the background until the whole line has been dispatched.

use crate::error::ShellError;

/// How a segment was terminated on the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `;`, or the implicit end of the line. The command is waited on at once.
    Sequential,
    /// `&`. The command's wait is deferred until the line is drained.
    Background,
}

impl Separator {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            ';' => Some(Separator::Sequential),
            '&' => Some(Separator::Background),
            _ => None,
        }
    }
}

/// One command's text together with the separator that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Text with leading and trailing spaces and tabs removed. Never empty.
    pub text: &'a str,
    pub separator: Separator,
}

pub(crate) fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Split `line` into its non-empty segments, left to right.
///
/// Segments that are blank after trimming are dropped. The input line is left
/// untouched; every segment borrows from it.
///
/// # Errors
/// Returns [`ShellError::Syntax`] if the line holds more than `max_commands`
/// non-empty segments.
pub fn split_line<'a>(line: &'a str, max_commands: usize) -> Result<Vec<Segment<'a>>, ShellError> {
    let mut segments = Vec::new();
    let mut start = 0;

    let mut push = |raw: &'a str, separator: Separator| -> Result<(), ShellError> {
        let text = raw.trim_matches(is_blank);
        if text.is_empty() {
            return Ok(());
        }
        if segments.len() == max_commands {
            return Err(ShellError::Syntax(format!(
                "more than {} commands on one line",
                max_commands
            )));
        }
        segments.push(Segment { text, separator });
        Ok(())
    };

    for (idx, ch) in line.char_indices() {
        if let Some(separator) = Separator::from_char(ch) {
            push(&line[start..idx], separator)?;
            start = idx + ch.len_utf8();
        }
    }
    push(&line[start..], Separator::Sequential)?;

    log::trace!("split {:?} into {} segment(s)", line, segments.len());
    Ok(segments)
}

/// Split a command into its words. No quoting or escaping is recognised.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(is_blank).filter(|word| !word.is_empty()).collect()
}
