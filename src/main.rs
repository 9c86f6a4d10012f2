//! gocu - curl reimagined
//!
//! A CLI HTTP client whose URL, body and headers can reference variables
//! saved with `gocu vars add`.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gocu::app::{App, AppError};
use gocu::cli::Cli;

/// Environment variable holding the log filter (e.g. `debug`, `gocu=trace`)
const LOG_ENV: &str = "GOCU_LOG";

/// Sets up logging to stderr, filtered by `GOCU_LOG` (default `info`)
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut app = App::from_cli(&cli);
    let mut stdout = io::stdout().lock();
    app.run(&cli, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
