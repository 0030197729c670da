use crate::command::{CommandFactory, CommandIo, Dispatch, ExecutableCommand, ExitCode};
use crate::config::Config;
use crate::env::Environment;
use crate::error::{self, ShellError};
use crate::io_adapters::LineSource;
use crate::jobs::PendingJobs;
use crate::lexer::{self, Segment, Separator};
use crate::parser;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: `BuiltinCommand` types and `ExternalCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Cloneable request to stop the read loop before the next line.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one input line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineReport {
    /// Segments that ran a built-in or started a child.
    pub dispatched: usize,
    /// Errors reported while processing the line.
    pub errors: usize,
    /// The remaining segments were skipped after a syntax or redirection error.
    pub aborted: bool,
    /// `(slot, exit code)` for every completed segment, in the order they were collected.
    pub statuses: Vec<(usize, ExitCode)>,
}

/// A line-oriented shell that runs built-in and external commands.
///
/// Each line is split on `;` and `&`. Commands followed by `;` are waited on before
/// the next segment starts; commands followed by `&` run in the background and are
/// all waited on once the line has been dispatched.
///
/// Example
/// ```
/// use smash::Interpreter;
/// let mut sh = Interpreter::default();
/// let report = sh.execute_line("path clear; path add /bin; true & true");
/// assert_eq!(report.errors, 0);
/// assert_eq!(report.dispatched, 4);
/// ```
pub struct Interpreter {
    env: Environment,
    config: Config,
    commands: Vec<Box<dyn CommandFactory>>,
    shutdown: ShutdownHandle,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories.
    ///
    /// Factories are asked in order; the first one recognising a name wins.
    pub fn new(config: Config, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(&config),
            config,
            commands,
            shutdown: ShutdownHandle::default(),
        }
    }

    /// Create an interpreter with the default commands and the given settings.
    pub fn with_config(config: Config) -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(
            config,
            vec![
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<PathCmd>::default()),
                Box::new(Factory::<ExternalCommand>::default()),
            ],
        )
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Read and execute lines until the input ends, `exit` runs or shutdown is requested.
    pub fn run(&mut self, source: &mut dyn LineSource) -> Result<()> {
        self.run_with_output(source, &mut io::stdout(), &mut io::stderr())
    }

    /// Same as [`Interpreter::run`], with built-in output and error messages sent to
    /// the given writers.
    pub fn run_with_output(
        &mut self,
        source: &mut dyn LineSource,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        while !self.env.should_exit && !self.shutdown.is_requested() {
            let Some(line) = source.next_line()? else {
                break;
            };
            self.execute_line_with_output(&line, stdout, stderr);
            stdout.flush().context("cannot flush output")?;
        }
        Ok(())
    }

    /// Execute one raw line against the process stdout and stderr.
    pub fn execute_line(&mut self, line: &str) -> LineReport {
        self.execute_line_with_output(line, &mut io::stdout(), &mut io::stderr())
    }

    /// Execute one raw line.
    ///
    /// Errors are reported to `stderr` as they happen and never escape the line.
    /// Every background child started by the line has been waited on when this
    /// returns, including after `exit` or an aborting error.
    pub fn execute_line_with_output(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> LineReport {
        let mut report = LineReport::default();

        let segments = match lexer::split_line(line, self.config.max_commands) {
            Ok(segments) => segments,
            Err(err) => {
                error::report(&anyhow::Error::from(err), stderr);
                report.errors += 1;
                report.aborted = true;
                return report;
            }
        };

        let mut jobs = PendingJobs::new();
        for (slot, segment) in segments.iter().enumerate() {
            match self.dispatch(segment, stdout) {
                Ok(Dispatch::Finished(code)) => {
                    report.dispatched += 1;
                    report.statuses.push((slot, code));
                }
                Ok(Dispatch::Running(mut child)) => {
                    report.dispatched += 1;
                    match segment.separator {
                        Separator::Background => jobs.push(child, slot),
                        Separator::Sequential => match child.wait() {
                            Ok(status) => {
                                report.statuses.push((slot, crate::external::exit_code(status)))
                            }
                            Err(err) => {
                                error::report(&anyhow::Error::from(err), stderr);
                                report.errors += 1;
                            }
                        },
                    }
                }
                Err(err) => {
                    error::report(&err, stderr);
                    report.errors += 1;
                    if error::classify(&err).is_some_and(ShellError::aborts_line) {
                        log::debug!("abandoning the rest of {:?}", line);
                        report.aborted = true;
                        break;
                    }
                }
            }

            if self.env.should_exit {
                break;
            }
        }

        if !jobs.is_empty() {
            log::debug!("waiting for {} background job(s)", jobs.len());
        }
        report.statuses.extend(jobs.drain());
        report
    }

    /// Run one segment: redirection first, then built-in or external dispatch.
    fn dispatch(&mut self, segment: &Segment<'_>, stdout: &mut dyn Write) -> Result<Dispatch> {
        let redirection = parser::parse_redirection(segment.text)?;
        let redirect = redirection
            .target
            .map(|target| parser::open_target(target, &self.env.current_dir))
            .transpose()?;

        let words = lexer::split_words(redirection.command);
        let Some((name, args)) = words.split_first() else {
            return Err(ShellError::Syntax(format!("empty command in {:?}", segment.text)).into());
        };

        let cmd = self
            .create(name, args)
            .ok_or_else(|| ShellError::NotFound(name.to_string()))?;
        cmd.execute(CommandIo { redirect, stdout }, &mut self.env)
    }

    fn create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        self.commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, args))
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `exit`, `cd`, `path`
    /// - external command launcher, consulted last
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}
