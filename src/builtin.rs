use crate::command::{CommandFactory, CommandIo, Dispatch, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process, never in a child. Their side effects are visible to the next segment
/// on the same line.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Reject argument lists that are malformed as a whole, before argh sees them.
    fn validate(_args: &[&str]) -> Result<(), ShellError> {
        Ok(())
    }

    /// Number of leading words that name subcommands rather than operands.
    fn subcommand_depth() -> usize {
        0
    }

    /// Executes the command using the provided output stream and environment.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, io: CommandIo<'_>, env: &mut Environment) -> Result<Dispatch> {
        let code = match io.redirect {
            Some(mut file) => <T as BuiltinCommand>::execute(*self, &mut file, env)?,
            None => <T as BuiltinCommand>::execute(*self, io.stdout, env)?,
        };
        Ok(Dispatch::Finished(code))
    }
}

/// Stand-in for a built-in whose arguments did not parse.
///
/// Help requests carry argh's text and succeed; anything else carries the error.
struct Rejected {
    output: String,
    error: Option<ShellError>,
}

impl ExecutableCommand for Rejected {
    fn execute(self: Box<Self>, io: CommandIo<'_>, _env: &mut Environment) -> Result<Dispatch> {
        if let Some(err) = self.error {
            return Err(err.into());
        }
        match io.redirect {
            Some(mut file) => file.write_all(self.output.as_bytes())?,
            None => io.stdout.write_all(self.output.as_bytes())?,
        }
        Ok(Dispatch::Finished(0))
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        if let Err(err) = T::validate(args) {
            return Some(Box::new(Rejected {
                output: String::new(),
                error: Some(err),
            }));
        }
        let argv = mark_operands(args, T::subcommand_depth());
        Some(match T::from_args(&[name], &argv) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => {
                let error = status
                    .is_err()
                    .then(|| ShellError::Builtin(format!("{}: {}", name, output.trim_end())));
                Box::new(Rejected { output, error })
            }
        })
    }
}

/// Put `--` in front of the operands so argh takes a directory such as `-x` or
/// `help` literally. A lone `--help` still asks for usage.
fn mark_operands<'a>(args: &[&'a str], depth: usize) -> Vec<&'a str> {
    if args.len() <= depth || args[depth..] == ["--help"] {
        return args.to_vec();
    }
    let mut argv = args[..depth].to_vec();
    argv.push("--");
    argv.extend_from_slice(&args[depth..]);
    argv
}

#[derive(FromArgs)]
/// Leave the shell once the jobs already started on this line have finished.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = PathBuf::from(&self.target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .map_err(ShellError::from)
            .with_context(|| format!("cd: can't canonicalize {}", new_dir.display()))?;

        env::set_current_dir(&canonical)
            .map_err(ShellError::from)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the directories searched for executables.
pub struct PathCmd {
    #[argh(subcommand)]
    pub op: PathOp,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum PathOp {
    Add(PathAdd),
    Remove(PathRemove),
    Clear(PathClear),
}

#[derive(FromArgs)]
/// Append a directory to the search path.
#[argh(subcommand, name = "add")]
pub struct PathAdd {
    #[argh(positional)]
    /// directory to append.
    pub dir: Option<String>,
}

#[derive(FromArgs)]
/// Remove a directory from the search path.
#[argh(subcommand, name = "remove")]
pub struct PathRemove {
    #[argh(positional)]
    /// directory to remove; the first matching entry goes.
    pub dir: Option<String>,
}

#[derive(FromArgs)]
/// Empty the search path.
#[argh(subcommand, name = "clear")]
pub struct PathClear {
    #[argh(positional)]
    /// not accepted; present so a stray argument is reported instead of ignored.
    pub stray: Option<String>,
}

impl BuiltinCommand for PathCmd {
    fn name() -> &'static str {
        "path"
    }

    /// `path <op> [arg]` takes at most two words; more is a malformed line.
    fn validate(args: &[&str]) -> Result<(), ShellError> {
        if args.len() > 2 {
            return Err(ShellError::Syntax(format!(
                "path: unexpected argument {:?}",
                args[2]
            )));
        }
        Ok(())
    }

    fn subcommand_depth() -> usize {
        1
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        match self.op {
            PathOp::Add(PathAdd { dir: Some(dir) }) => env.paths.add(&dir)?,
            PathOp::Remove(PathRemove { dir: Some(dir) }) => env.paths.remove(&dir)?,
            PathOp::Clear(PathClear { stray: None }) => env.paths.clear(),
            PathOp::Add(_) | PathOp::Remove(_) => {
                return Err(ShellError::Builtin("path: missing directory".to_string()).into());
            }
            PathOp::Clear(PathClear { stray: Some(arg) }) => {
                return Err(ShellError::Builtin(format!(
                    "path clear: takes no arguments, got {:?}",
                    arg
                ))
                .into());
            }
        }
        log::debug!("path registry is now {:?}", env.paths.dirs());
        Ok(0)
    }
}
