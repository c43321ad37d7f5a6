use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{self, EnvFilter};

mod cli;
mod dataset;
mod error;
mod loader;
mod query;

use cli::commands::{ColumnsCommand, StatsCommand};
use error::QueryError;

#[derive(Parser)]
#[command(name = "ts-query")]
#[command(about = "Column discovery and descriptive statistics over a time-indexed dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List columns, or fetch raw series for columns matching a prefix
    Columns(ColumnsCommand),
    /// Descriptive statistics over a date-bounded, column-filtered slice
    Stats(StatsCommand),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for response payloads.
    let base_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(base_level)
        .with_env_filter(EnvFilter::new(format!(
            "ts_query={}",
            if cli.verbose { "debug" } else { "info" }
        )))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting ts-query v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Columns(cmd) => cmd.execute(),
        Commands::Stats(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        // Validation failures get the JSON error envelope plus the exit code
        // matching their status family; anything else is a plain failure.
        if let Some(query_err) = err.downcast_ref::<QueryError>() {
            match serde_json::to_string_pretty(&query_err.to_response()) {
                Ok(payload) => println!("{payload}"),
                Err(_) => eprintln!("{query_err}"),
            }
            std::process::exit(query_err.exit_code());
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
