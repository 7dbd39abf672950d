//! gazette-scraper main entry point
//!
//! Command-line interface for the daily Official Gazette digest.

use anyhow::Context;
use clap::{Parser, Subcommand};
use gazette_scraper::config::{load_runtime_config, Config};
use gazette_scraper::crawler::Coordinator;
use gazette_scraper::publish::{format_date, parse_date, today, PublishOutcome, Publisher};
use gazette_scraper::server;
use gazette_scraper::storage::{open_store, SnapshotStore};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Storage used by `run` when no connection string is configured
const DEFAULT_SCRIPT_STORE: &str = "./snapshots";

/// gazette-scraper: daily digest of the Official Gazette
///
/// Extracts the day's regulations, communiqués, decisions and notices from
/// the gazette homepage, stores one immutable JSON snapshot per day and
/// serves the latest snapshot over HTTP.
#[derive(Parser, Debug)]
#[command(name = "gazette-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Daily Official Gazette digest", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one extraction pass and publish today's snapshot
    Run {
        /// Print the records instead of writing a snapshot
        #[arg(long)]
        dry_run: bool,

        /// Snapshot date (DD.MM.YYYY), defaults to today in the source timezone
        #[arg(long, value_name = "DD.MM.YYYY")]
        date: Option<String>,
    },

    /// Serve the latest snapshot at GET /scrape
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },

    /// Print the latest snapshot to stdout
    Latest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_runtime_config(cli.config.as_deref()) {
        Ok(config) => {
            match &cli.config {
                Some(path) => tracing::info!("Configuration loaded from {}", path.display()),
                None => tracing::info!("No config file given, using defaults"),
            }
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Run { dry_run, date } => handle_run(&config, dry_run, date.as_deref()).await,
        Command::Serve { bind } => handle_serve(&config, bind).await,
        Command::Latest => handle_latest(&config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gazette_scraper=info,warn"),
            1 => EnvFilter::new("gazette_scraper=debug,tower_http=debug,info"),
            2 => EnvFilter::new("gazette_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles `run`: extract, then publish or print
async fn handle_run(config: &Config, dry_run: bool, date: Option<&str>) -> anyhow::Result<()> {
    let date = match date {
        Some(raw) => parse_date(raw)
            .with_context(|| format!("invalid --date '{}', expected DD.MM.YYYY", raw))?,
        None => today(config.source.utc_offset_hours),
    };
    let date = format_date(date);

    let coordinator = Coordinator::new(config)?;
    let records = coordinator.run(&date).await?;

    if dry_run {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let connection = config
        .storage
        .connection_string
        .clone()
        .unwrap_or_else(|| DEFAULT_SCRIPT_STORE.to_string());
    let publisher = open_publisher(config, &connection).await?;

    let outcome = tokio::task::spawn_blocking(move || publisher.publish(&date, &records)).await??;

    match outcome {
        PublishOutcome::Written {
            key,
            records,
            checksum,
            ..
        } => {
            println!("✓ Published {} ({} records, sha256 {})", key, records, checksum);
        }
        PublishOutcome::AlreadyPublished { key } => {
            println!("✓ {} already published, left unchanged", key);
        }
    }

    Ok(())
}

/// Handles `serve`: start the HTTP server
async fn handle_serve(config: &Config, bind: SocketAddr) -> anyhow::Result<()> {
    let connection = config.connection_string()?.to_string();
    let publisher = open_publisher(config, &connection).await?;

    server::serve(bind, publisher).await?;
    Ok(())
}

/// Handles `latest`: dump the newest snapshot
async fn handle_latest(config: &Config) -> anyhow::Result<()> {
    let connection = config.connection_string()?.to_string();
    let publisher = open_publisher(config, &connection).await?;

    let latest = tokio::task::spawn_blocking(move || publisher.get_latest()).await??;

    match latest {
        Some(payload) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&payload)?;
            stdout.write_all(b"\n")?;
        }
        None => anyhow::bail!("no snapshot has been published yet"),
    }

    Ok(())
}

async fn open_publisher(config: &Config, connection: &str) -> anyhow::Result<Publisher> {
    let connection = connection.to_string();
    let store: Box<dyn SnapshotStore> =
        tokio::task::spawn_blocking(move || open_store(&connection)).await??;

    Ok(Publisher::new(Arc::from(store), &config.storage))
}
