//! Output redirection (`cmd args > file`) within a single segment.

use crate::error::ShellError;
use crate::lexer::{is_blank, split_words};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// A segment with its redirection, if any, separated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirection<'a> {
    /// The command and its arguments, without the `>` and the target.
    pub command: &'a str,
    /// The file the command's output goes to.
    pub target: Option<&'a str>,
}

/// Split the redirection off a trimmed segment.
///
/// Everything after the first `>` must be exactly one word and may not contain
/// another `>`. The command part must not be empty when a redirection is present.
///
/// # Errors
/// Returns [`ShellError::Syntax`] for a second `>`, a missing or extra target word,
/// or a redirection without a command.
pub fn parse_redirection(segment: &str) -> Result<Redirection<'_>, ShellError> {
    let Some((command, rest)) = segment.split_once('>') else {
        return Ok(Redirection {
            command: segment,
            target: None,
        });
    };

    if rest.contains('>') {
        return Err(ShellError::Syntax(format!(
            "more than one '>' in {:?}",
            segment
        )));
    }

    let target = match split_words(rest).as_slice() {
        [target] => *target,
        [] => return Err(ShellError::Syntax("missing redirection target".to_string())),
        words => {
            return Err(ShellError::Syntax(format!(
                "expected one redirection target, found {}",
                words.len()
            )));
        }
    };

    let command = command.trim_matches(is_blank);
    if command.is_empty() {
        return Err(ShellError::Syntax(format!(
            "redirection to {} without a command",
            target
        )));
    }

    Ok(Redirection {
        command,
        target: Some(target),
    })
}

/// Open (create or truncate) the redirection target for writing.
///
/// Relative targets are anchored at `cwd`, the interpreter's working directory.
pub fn open_target(target: &str, cwd: &Path) -> Result<File, ShellError> {
    let path = cwd.join(target);
    log::debug!("redirecting output to {}", path.display());
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .map_err(|source| ShellError::Redirect {
            target: target.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    fn make_unique_temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "smash_parser_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_no_redirection() {
        let r = parse_redirection("ls -l").unwrap();
        assert_eq!(
            r,
            Redirection {
                command: "ls -l",
                target: None
            }
        );
    }

    #[test]
    fn test_simple_redirection() {
        let r = parse_redirection("ls -l > out.txt").unwrap();
        assert_eq!(r.command, "ls -l");
        assert_eq!(r.target, Some("out.txt"));
    }

    #[test]
    fn test_redirection_without_spaces() {
        let r = parse_redirection("ls>out.txt").unwrap();
        assert_eq!(r.command, "ls");
        assert_eq!(r.target, Some("out.txt"));
    }

    #[test]
    fn test_two_arrows_rejected() {
        assert!(matches!(
            parse_redirection("ls > a > b"),
            Err(ShellError::Syntax(_))
        ));
        assert!(matches!(
            parse_redirection("ls >> a"),
            Err(ShellError::Syntax(_))
        ));
    }

    #[test]
    fn test_two_targets_rejected() {
        assert!(matches!(
            parse_redirection("ls > a b"),
            Err(ShellError::Syntax(_))
        ));
    }

    #[test]
    fn test_missing_target_rejected() {
        assert!(matches!(
            parse_redirection("ls >  \t"),
            Err(ShellError::Syntax(_))
        ));
    }

    #[test]
    fn test_missing_command_rejected() {
        assert!(matches!(
            parse_redirection("> out.txt"),
            Err(ShellError::Syntax(_))
        ));
    }

    #[test]
    fn test_open_target_truncates_existing_file() {
        let dir = make_unique_temp_dir();
        let file = dir.join("out.txt");
        fs::write(&file, "old content that is long").unwrap();

        let mut f = open_target("out.txt", &dir).unwrap();
        f.write_all(b"new").unwrap();
        drop(f);

        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_open_target_in_missing_directory_fails() {
        let dir = make_unique_temp_dir();
        let err = open_target("no/such/dir/out.txt", &dir).unwrap_err();
        assert!(err.aborts_line());
        let _ = fs::remove_dir_all(dir);
    }
}
