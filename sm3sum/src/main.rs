use std::io;
use std::process::ExitCode;

use clap::Parser;
use sm3sum::cli::Cli;
use sm3sum::Outcome;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let stderr = io::stderr();
    match sm3sum::run(&cli, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("sm3sum: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
