//! Coursecomb main entry point
//!
//! This is the command-line interface for the Coursecomb course-content
//! crawler.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use coursecomb::config::load_config_with_hash;
use coursecomb::crawler::{load_statistics, print_statistics, Coordinator};
use coursecomb::fetch::Fetcher;
use coursecomb::storage::SqliteStore;

/// Coursecomb: a polite course-content crawler
///
/// Coursecomb walks a level → unit → session → activity course hierarchy,
/// extracts transcripts, vocabulary and audio references, and stores them
/// in a SQLite database. Runs are idempotent and resumable.
#[derive(Parser, Debug)]
#[command(name = "coursecomb")]
#[command(version = "1.0.0")]
#[command(about = "A polite course-content crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Skip downloading audio files
    #[arg(long, global = true)]
    no_audio: bool,

    /// Override the database path from config
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a single unit
    Unit {
        /// Level slug, e.g. "intermediate"
        #[arg(long)]
        level: String,

        /// Unit number within the level
        #[arg(long)]
        unit: u32,
    },

    /// Crawl a range of units within a level
    Level {
        /// Level slug, e.g. "intermediate"
        #[arg(long)]
        level: String,

        /// First unit to crawl (defaults to 1)
        #[arg(long)]
        from: Option<u32>,

        /// Last unit to crawl (defaults to the level's unit count)
        #[arg(long)]
        to: Option<u32>,
    },

    /// Show statistics from the database and exit
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) =
        load_config_with_hash(&cli.config).context("failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(db) = &cli.db {
        tracing::info!("Overriding database path: {}", db);
        config.output.database_path = db.clone();
    }

    match cli.command {
        Command::Stats => handle_stats(&config),
        Command::Unit { level, unit } => {
            let mut coordinator = build_coordinator(config, !cli.no_audio).await?;
            coordinator
                .crawl_unit(&level, unit)
                .await
                .context("unit crawl failed")?;
            coordinator.into_report().print();
            Ok(())
        }
        Command::Level { level, from, to } => {
            let mut coordinator = build_coordinator(config, !cli.no_audio).await?;
            coordinator
                .crawl_level(&level, from, to)
                .await
                .context("level crawl failed")?;
            coordinator.into_report().print();
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("coursecomb=info,warn"),
            1 => EnvFilter::new("coursecomb=debug,info"),
            2 => EnvFilter::new("coursecomb=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens storage, builds the configured fetcher and wires the coordinator
async fn build_coordinator(
    config: coursecomb::Config,
    download_audio: bool,
) -> anyhow::Result<Coordinator<SqliteStore>> {
    let store = SqliteStore::new(Path::new(&config.output.database_path))
        .context("failed to open database")?;

    let fetcher = Fetcher::from_config(&config.crawler, &config.site)
        .await
        .context("failed to build fetcher")?;

    Ok(Coordinator::new(config, store, fetcher, download_audio)?)
}

/// Handles the stats subcommand: shows statistics from the database
fn handle_stats(config: &coursecomb::Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))
        .context("failed to open database")?;

    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}
