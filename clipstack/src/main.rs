use crate::config::Config;
use crate::db::Db;
use crate::environment::get_data_file;
use crate::persist::SqliteStore;
use crate::service::HistoryService;
use crate::watcher::{ArboardSource, Watcher};
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use clipstack_history::{Entry, EntryId, HistoryStore};
use std::process::ExitCode;
use tracing::debug;

mod config;
mod db;
mod environment;
mod persist;
mod service;
mod watcher;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Clipboard polling interval in seconds
    #[arg(short, long)]
    interval: Option<f64>,

    /// Maximum number of unpinned entries to keep
    #[arg(short, long)]
    max_entries: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the clipboard and record changes until interrupted
    Watch,
    /// Print the history, pinned entries first
    List,
    /// Print entries whose content contains the query (case-insensitive)
    Search { query: String },
    /// Pin or unpin an entry by id
    Pin { id: String },
    /// Delete an entry by id, pinned or not
    Rm { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_to_file = matches!(cli.command, Command::Watch);
    if let Err(err) = init_tracing(log_to_file) {
        eprintln!("Failed to initialize tracing: {err}");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("clipstack: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("clipstack: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if to_file {
        let path = environment::get_state_file("clipstack.log")?;
        let log_file = std::sync::Arc::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?,
        );
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(log_file)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(interval) = cli.interval {
        config.polling_interval_secs = interval;
    }
    if let Some(max_entries) = cli.max_entries {
        config.max_entries = max_entries;
    }

    match cli.command {
        Command::Watch => watch(config).await,
        Command::List => {
            let store = open_store(&config)?;
            print_entries(store.list());
            Ok(())
        }
        Command::Search { query } => {
            let store = open_store(&config)?;
            print_entries(&store.search(&query));
            Ok(())
        }
        Command::Pin { id } => {
            let mut store = open_store(&config)?;
            let id = EntryId::from(id);
            if store.toggle_pin(&id)? {
                println!("toggled pin on {id}");
            } else {
                println!("no entry {id}");
            }
            Ok(())
        }
        Command::Rm { id } => {
            let mut store = open_store(&config)?;
            let id = EntryId::from(id);
            if store.delete(&id)? {
                println!("deleted {id}");
            } else {
                println!("no entry {id}");
            }
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<HistoryStore> {
    let path = get_data_file("clipstack.db")?;
    let db = Db::new(path)?;
    let mut store = HistoryStore::with_durable(Box::new(SqliteStore::new(db)), config.max_entries);
    // Failure here is the one fatal persistence condition
    store.load().context("failed to load clipboard history")?;
    Ok(store)
}

async fn watch(config: Config) -> Result<()> {
    let store = open_store(&config)?;
    debug!("loaded {} entries", store.len());

    let service = HistoryService::spawn(store);
    let source = ArboardSource::new()?;
    let mut watcher = Watcher::spawn(source, config.polling_interval(), service.handle());

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for ctrl-c")?;
    debug!("shutting down");

    watcher.stop().await;
    service.shutdown().await;
    Ok(())
}

fn print_entries(entries: &[Entry]) {
    for entry in entries {
        let marker = if entry.pinned { "*" } else { " " };
        let when = chrono::DateTime::from_timestamp_millis(entry.touched_at)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_default();
        let preview = entry.content.lines().next().unwrap_or("");
        println!("{} {} {}  {}", entry.id, marker, when, preview);
    }
}
