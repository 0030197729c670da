use std::io;
use thiserror::Error;

/// The only message a user ever sees when something goes wrong.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Classification of every failure the shell can run into.
///
/// The variant decides how far the failure reaches: usage errors end the process,
/// syntax and redirection errors abandon the rest of the current line, and
/// everything else only fails the segment that caused it.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Bad command-line arguments or an unreadable batch file.
    #[error("usage: {0}")]
    Usage(String),

    /// Malformed redirection, malformed `path` invocation or an oversized line.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The redirection target could not be opened for writing.
    #[error("cannot redirect output to {target}")]
    Redirect {
        target: String,
        #[source]
        source: io::Error,
    },

    /// No directory in the path registry holds an executable with this name.
    #[error("command not found: {0}")]
    NotFound(String),

    /// A built-in rejected its arguments or its side effect failed.
    #[error("{0}")]
    Builtin(String),

    /// The operating system refused to create the child process.
    #[error("failed to spawn {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Whether the remaining segments of the current line must be skipped.
    pub fn aborts_line(&self) -> bool {
        matches!(self, ShellError::Syntax(_) | ShellError::Redirect { .. })
    }
}

/// Finds the [`ShellError`] carried anywhere in an error chain.
pub fn classify(err: &anyhow::Error) -> Option<&ShellError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ShellError>())
}

/// Writes the generic error message; the detailed chain only goes to the log.
pub fn report(err: &anyhow::Error, stderr: &mut dyn io::Write) {
    log::debug!("{:#}", err);
    // Nothing sensible is left to do if stderr itself is broken.
    let _ = stderr.write_all(ERROR_MESSAGE.as_bytes());
    let _ = stderr.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_only_syntax_and_redirect_abort_the_line() {
        assert!(ShellError::Syntax("x".into()).aborts_line());
        assert!(
            ShellError::Redirect {
                target: "out".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }
            .aborts_line()
        );
        assert!(!ShellError::NotFound("ls".into()).aborts_line());
        assert!(!ShellError::Builtin("cd".into()).aborts_line());
    }

    #[test]
    fn test_classify_sees_through_context() {
        let err = Err::<(), _>(ShellError::Syntax("two targets".into()))
            .context("while parsing segment")
            .unwrap_err();
        assert!(matches!(classify(&err), Some(ShellError::Syntax(_))));

        let plain = anyhow::anyhow!("something else");
        assert!(classify(&plain).is_none());
    }

    #[test]
    fn test_report_writes_generic_message() {
        let mut out = Vec::new();
        report(&anyhow::anyhow!("detail that stays private"), &mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "An error has occurred\n");
    }
}
