use smash::Interpreter;
use smash::config::{Args, Config};
use smash::error::ERROR_MESSAGE;
use smash::io_adapters::{Batch, LineSource, Prompt};
use std::io::{self, Write};
use std::process::ExitCode;

fn fatal(err: &anyhow::Error) -> ExitCode {
    log::debug!("{:#}", err);
    let _ = io::stderr().write_all(ERROR_MESSAGE.as_bytes());
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match Args::parse(&argv) {
        Ok(args) => args,
        Err(err) => return fatal(&err.into()),
    };

    let config = Config::default();
    let mut source: Box<dyn LineSource> = match &args.batch_file {
        Some(path) => match Batch::open(path, config.echo_batch.then(io::stdout)) {
            Ok(batch) => Box::new(batch),
            Err(err) => return fatal(&err.into()),
        },
        None => match Prompt::new() {
            Ok(prompt) => Box::new(prompt),
            Err(err) => return fatal(&err),
        },
    };

    let mut sh = Interpreter::with_config(config);
    match sh.run(source.as_mut()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fatal(&err),
    }
}
