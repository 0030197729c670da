use crate::env::Environment;
use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::process::Child;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// What running a command produced.
#[derive(Debug)]
pub enum Dispatch {
    /// The command ran to completion inside the shell process.
    Finished(ExitCode),
    /// A child process was started and has not been waited on yet.
    Running(Child),
}

/// Output streams handed to a command.
pub struct CommandIo<'a> {
    /// Redirection target, already opened and truncated.
    pub redirect: Option<File>,
    /// Where in-process output goes when there is no redirection.
    pub stdout: &'a mut dyn Write,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command. External commands must not block on the child.
    fn execute(self: Box<Self>, io: CommandIo<'_>, env: &mut Environment) -> Result<Dispatch>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the environment to resolve executables.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
