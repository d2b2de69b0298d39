use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::{CommandContext, CommandError};
use dispatch::{Dispatch, RunCommand};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);
    Dispatch::from_cli(cli).execute(&ctx)
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(cli: &Cli) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| default_log_filter(cli.verbose, cli.quiet).into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color),
        )
        .init();
}

fn default_log_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "filter_query_rs=debug,tlq=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Query(_) => "QUERY_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Query(_) => ExitCode::from(1),
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}
