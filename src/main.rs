// ABOUTME: Entry point for the qatunnel CLI application.
// ABOUTME: Parses arguments, sets up logging, and runs the create command.

mod cli;
mod commands;

use clap::{CommandFactory, Parser};
use cli::Cli;
use qatunnel::error::{Error, Result};
use qatunnel::output::{Output, OutputMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output_mode());

    if let Err(e) = run(&cli, &output).await {
        output.error(&e.to_string());
        if matches!(e, Error::MissingToken) && cli.output_mode() != OutputMode::Json {
            let _ = Cli::command().print_help();
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &Cli, output: &Output) -> Result<()> {
    let request = cli.request()?;
    let settings = cli.settings()?;
    commands::create(request, settings, output).await
}
