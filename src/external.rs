use crate::command::{CommandFactory, CommandIo, Dispatch, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

/// Command that is not a builtin: an executable found through the path registry.
#[derive(Debug)]
pub struct ExternalCommand {
    program: PathBuf,
    argv0: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: PathBuf, argv0: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program,
            argv0: argv0.into(),
            args,
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let executable = env.paths.resolve(name, &env.current_dir)?;
        log::debug!("resolved {} to {}", name, executable.display());
        Some(Box::new(ExternalCommand::new(
            executable,
            name,
            args.iter().map(|x| x.to_string()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Starts the child and returns at once; the caller decides when to wait.
    ///
    /// With a redirection both standard output and standard error go to the file.
    fn execute(self: Box<Self>, io: CommandIo<'_>, env: &mut Environment) -> Result<Dispatch> {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args).current_dir(&env.current_dir);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.argv0);
        }

        if let Some(file) = io.redirect {
            let stderr = file.try_clone()?;
            cmd.stdout(Stdio::from(file)).stderr(Stdio::from(stderr));
        }

        let child = cmd.spawn().map_err(|source| ShellError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        log::debug!("spawned {} as pid {}", self.program.display(), child.id());
        Ok(Dispatch::Running(child))
    }
}

/// Shell-style exit code for a finished child.
pub(crate) fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
