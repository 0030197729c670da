use crate::config::Config;
use crate::path_registry::PathRegistry;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable state of a running interpreter.
///
/// The environment contains:
/// - `paths`: the directories searched when resolving a bare command name.
/// - `current_dir`: the working directory new child processes start in. `cd` keeps it
///   in sync with the process working directory.
/// - `should_exit`: set by `exit`; the read loop stops once the current line is done.
#[derive(Debug, Clone)]
pub struct Environment {
    pub paths: PathRegistry,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the process working directory and seed the registry from `config`.
    pub fn new(config: &Config) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            paths: PathRegistry::new(config.default_paths.iter().cloned(), config.max_paths),
            current_dir,
            should_exit: false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
