use crate::error::ShellError;
use argh::FromArgs;
use std::path::PathBuf;

/// Largest number of directories the path registry holds.
pub const MAX_PATHS: usize = 64;

/// Largest number of segments a single input line may contain.
pub const MAX_COMMANDS: usize = 64;

/// Directory searched for executables when the shell starts.
pub const DEFAULT_PATH: &str = "/bin";

/// Start-up settings of an [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial contents of the path registry, in resolution order.
    pub default_paths: Vec<String>,
    /// Capacity of the path registry.
    pub max_paths: usize,
    /// Maximum number of segments accepted on one line.
    pub max_commands: usize,
    /// Echo every line read from a batch file before running it.
    pub echo_batch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_paths: vec![DEFAULT_PATH.to_string()],
            max_paths: MAX_PATHS,
            max_commands: MAX_COMMANDS,
            echo_batch: true,
        }
    }
}

#[derive(FromArgs, Debug)]
/// A small line-oriented shell. Reads commands from the terminal, or from a batch file when one is given.
pub struct Args {
    #[argh(positional)]
    /// file to read commands from instead of the terminal
    pub batch_file: Option<PathBuf>,
}

impl Args {
    /// Parse the process arguments (`argv[0]` included).
    ///
    /// Every argh failure, including help requests and extra positionals, becomes a
    /// usage error so the caller can report it the same way as any other fatal error.
    pub fn parse<S: AsRef<str>>(argv: &[S]) -> Result<Self, ShellError> {
        let argv: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
        let (cmd, rest) = argv
            .split_first()
            .ok_or_else(|| ShellError::Usage("missing program name".to_string()))?;
        Args::from_args(&[*cmd], rest).map_err(|early| ShellError::Usage(early.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_interactive() {
        let args = Args::parse(&["smash"]).unwrap();
        assert!(args.batch_file.is_none());
    }

    #[test]
    fn test_single_argument_is_batch_file() {
        let args = Args::parse(&["smash", "script.txt"]).unwrap();
        assert_eq!(args.batch_file, Some(PathBuf::from("script.txt")));
    }

    #[test]
    fn test_two_arguments_is_usage_error() {
        let err = Args::parse(&["smash", "a.txt", "b.txt"]).unwrap_err();
        assert!(matches!(err, ShellError::Usage(_)));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_paths, vec!["/bin".to_string()]);
        assert_eq!(config.max_paths, 64);
        assert_eq!(config.max_commands, 64);
        assert!(config.echo_batch);
    }
}
