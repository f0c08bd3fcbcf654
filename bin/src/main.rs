//! candlefold CLI - Fold price ticks into OHLC bars.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "candlefold")]
#[command(about = "Fold price ticks into OHLC bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold a tick file into bars
    Fold {
        /// Tick file (.csv as instrument,price,timestamp; anything else as NDJSON)
        ticks: PathBuf,

        /// Instrument to fold. Required when the file holds several.
        #[arg(short, long)]
        instrument: Option<String>,

        /// Bucket width (1m, 1h, 1d, intraday, multi-day, or seconds)
        #[arg(short, long, default_value = "1h")]
        width: String,

        /// Offset applied before bucketing (utc, local, +HH:MM, or seconds)
        #[arg(long, default_value = "utc", allow_hyphen_values = true)]
        offset: String,

        /// JSON file of bars to fold on top of
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Follow NDJSON ticks on stdin and print updated bars
    Follow {
        /// Instruments to chart
        #[arg(required = true)]
        instruments: Vec<String>,

        /// Bucket width (1m, 1h, 1d, intraday, multi-day, or seconds)
        #[arg(short, long, default_value = "1h")]
        width: String,

        /// Offset applied before bucketing (utc, local, +HH:MM, or seconds)
        #[arg(long, default_value = "utc", allow_hyphen_values = true)]
        offset: String,

        /// Base URL of the historical bars endpoint
        #[arg(long, conflicts_with = "seed_dir")]
        seed_url: Option<String>,

        /// Directory of <instrument>-<seconds>.json seed files
        #[arg(long)]
        seed_dir: Option<PathBuf>,
    },

    /// List named bucket widths
    Widths,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fold {
            ticks,
            instrument,
            width,
            offset,
            seed,
            output,
            format,
        } => commands::fold::fold(
            &ticks,
            instrument.as_deref(),
            &width,
            &offset,
            seed.as_deref(),
            output.as_deref(),
            format,
            cli.quiet,
        ),
        Commands::Follow {
            instruments,
            width,
            offset,
            seed_url,
            seed_dir,
        } => {
            commands::follow::follow(
                &instruments,
                &width,
                &offset,
                seed_url.as_deref(),
                seed_dir,
            )
            .await
        }
        Commands::Widths => {
            commands::widths::list_widths();
            Ok(())
        }
    }
}
