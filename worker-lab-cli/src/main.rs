//! worker-lab: run a background task in an isolated worker and watch it
//! report progress.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod context;
mod logging;
mod output;

use commands::{csv::CsvArgs, primes::PrimesArgs, send::SendArgs};
use context::Context;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "worker-lab", version, about = "Run background tasks with progress reporting")]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file
    #[arg(long, global = true, env = "WORKER_LAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find every prime below a bound
    Primes(PrimesArgs),
    /// Summarise the numeric fields of a CSV document
    Csv(CsvArgs),
    /// Post a raw JSON message to a worker
    Send(SendArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new(&cli)?;

    logging::init_logging(&ctx.config.log, ctx.verbose)?;
    tracing::debug!(output = %ctx.output.format(), "starting worker-lab");

    match cli.command {
        Commands::Primes(args) => commands::primes::execute(&ctx, args).await,
        Commands::Csv(args) => commands::csv::execute(&ctx, args).await,
        Commands::Send(args) => commands::send::execute(&ctx, args).await,
    }
}
