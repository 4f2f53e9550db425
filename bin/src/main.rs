//! pricrpt CLI - Trusted DI1 settlement tables from B3 price report archives.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "pricrpt")]
#[command(about = "Trusted DI1 settlement tables from B3 price report archives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build monthly quote, lineage and instrument tables
    Build {
        /// Directory holding the daily price report archives (*.zip)
        #[arg(short, long)]
        archives: PathBuf,

        /// National holidays CSV
        #[arg(long)]
        holidays: PathBuf,

        /// First month to build (YYYY-MM)
        #[arg(short, long)]
        start: String,

        /// Last month to build (YYYY-MM). Defaults to the start month.
        #[arg(short, long)]
        end: Option<String>,

        /// Instrument registry carried between runs. Defaults to <output>/instruments.json
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Output format for the quote and lineage tables
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// JSON build configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Asset family to extract and resolve, overriding the configuration
        #[arg(long)]
        asset: Option<String>,

        /// Bytes of each document head probed for a timestamp, overriding the configuration
        #[arg(long)]
        head_bytes: Option<usize>,
    },

    /// Show the ranked candidate documents of one archive
    Inspect {
        /// Price report archive
        archive: PathBuf,

        /// Bytes of each document head probed for a timestamp
        #[arg(long)]
        head_bytes: Option<usize>,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Build {
            archives,
            holidays,
            start,
            end,
            registry,
            output,
            format,
            config,
            asset,
            head_bytes,
        } => commands::build::build(&commands::build::BuildArgs {
            archives,
            holidays,
            start,
            end,
            registry,
            output,
            format,
            config,
            asset,
            head_bytes,
            quiet: cli.quiet,
        }),
        Commands::Inspect {
            archive,
            head_bytes,
        } => commands::inspect::inspect(&archive, head_bytes),
    }
}
