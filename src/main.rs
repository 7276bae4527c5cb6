// file: src/main.rs
// version: 1.0.1
// guid: 97ebc91e-47fb-480f-9631-a98b4ead91d4

//! aza - main entry point

use aza::{
    cli::{normalize_args, Cli, Dispatcher, OperationRequest},
    config::ConfigLoader,
    error::EXIT_CANCELLED,
    executor::ProcessExecutor,
    logging::logger,
    select::TerminalSelector,
    AzaError, Result,
};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::process::ExitCode;
use tokio::signal;
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }

    // Ctrl+C during a prompt or while a child runs ends the whole program
    let command_future = run(cli);

    tokio::select! {
        result = command_future => match result {
            Ok(code) => code,
            Err(AzaError::Cancelled) => cancelled(),
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                exit_code(e.exit_code())
            }
        },
        _ = signal::ctrl_c() => {
            warn!("Interrupted by user");
            cancelled()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    let loader = match cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    let request = OperationRequest::from(command);
    debug!("Dispatching {:?}", request);

    let executor = ProcessExecutor::new();
    let mut dispatcher = Dispatcher::new(&config, &executor, TerminalSelector::terminal());
    let outcome = dispatcher.dispatch(&request).await?;

    println!("{}", outcome.message());
    Ok(exit_code(outcome.exit_code()))
}

/// Exit immediately: a prompt's pending stdin read would otherwise keep the
/// runtime from shutting down until a line arrives.
fn cancelled() -> ExitCode {
    eprintln!("\nCancelled.");
    std::process::exit(EXIT_CANCELLED)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
