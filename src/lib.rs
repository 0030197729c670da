//! A small line-oriented shell.
//!
//! Input lines are split on `;` (run and wait) and `&` (run in the background),
//! each command may redirect its output with `> file`, and bare command names are
//! resolved against a mutable search path managed by the `path` built-in. The other
//! built-ins are `cd` and `exit`; everything else runs as a child process.
//!
//! The main entry point is [`Interpreter`], which executes single lines or drives a
//! read loop over any [`LineSource`](io_adapters::LineSource). The public modules
//! [`command`] and [`env`] expose the traits and state for plugging in your own
//! commands.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod io_adapters;
mod jobs;
mod lexer;
mod parser;
pub mod path_registry;

/// Just a convenient re-export of the command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, LineReport, ShutdownHandle};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that change the process working directory.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
