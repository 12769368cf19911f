//! charvault - review and restore character snapshots.
//!
//! This is the main entry point for the charvault CLI.

mod commands;
mod config;
mod render;

use anyhow::Context;
use charvault_util::log::{self, LogConfig, LogLevel};
use clap::{Parser, Subcommand};
use commands::SourceArg;
use config::Config;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "charvault")]
#[command(author, version, about = "Review and restore character snapshots", long_about = None)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding characters and snapshots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a character from a JSON file
    Import {
        /// Character file
        file: PathBuf,
    },
    /// Capture a snapshot of a character
    Capture {
        /// Character ID
        document: String,
        /// Why the snapshot is taken
        #[arg(long, value_enum, default_value = "manual")]
        source: SourceArg,
        /// Free-form label
        #[arg(long)]
        label: Option<String>,
    },
    /// List snapshots of a character, newest first
    List {
        /// Character ID
        document: String,
    },
    /// Compare a snapshot with the live character
    Diff {
        /// Character ID
        document: String,
        /// Snapshot to compare (defaults to the newest)
        #[arg(short, long)]
        snapshot: Option<String>,
        /// Include unchanged sections
        #[arg(long)]
        all: bool,
        /// Show long sections in full
        #[arg(long)]
        expand: bool,
    },
    /// Restore a character, or one section of it, from a snapshot
    Restore {
        /// Character ID
        document: String,
        /// Snapshot ID
        snapshot: String,
        /// Restore only this section
        #[arg(long)]
        section: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().ok();
    let (config, sources) = Config::load(cwd.as_deref()).await?;

    let log_file = init_logging(cli.verbose, &config);
    debug!(?sources, ?log_file, "Configuration loaded");

    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .or_else(charvault_util::path::data_dir)
        .context("Could not determine a data directory; pass --data-dir")?;

    match cli.command {
        Commands::Import { file } => commands::handle_import(&data_dir, &file).await,
        Commands::Capture {
            document,
            source,
            label,
        } => commands::handle_capture(&data_dir, &document, source, label).await,
        Commands::List { document } => commands::handle_list(&data_dir, &document).await,
        Commands::Diff {
            document,
            snapshot,
            all,
            expand,
        } => {
            commands::handle_diff(&data_dir, &document, snapshot, all, expand, &config.review())
                .await
        }
        Commands::Restore {
            document,
            snapshot,
            section,
            yes,
        } => commands::handle_restore(&data_dir, &document, &snapshot, section, yes).await,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!();
            println!("Data directory: {}", data_dir.display());
            if sources.is_empty() {
                println!("No config files found.");
            } else {
                println!("Loaded from:");
                for source in &sources {
                    println!("  {}", source.display());
                }
            }
            Ok(())
        }
    }
}

/// Set up logging. Logs go to a file unless `verbose` is set.
///
/// Returns the log file path, if one is in use.
fn init_logging(verbose: bool, config: &Config) -> Option<PathBuf> {
    let level = if verbose {
        LogLevel::Debug
    } else {
        config
            .log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .unwrap_or_default()
    };

    let file = if verbose {
        None
    } else {
        log::default_log_path()
    };

    let log_config = LogConfig {
        print: verbose,
        level,
        include_location: false,
        file: file.clone(),
    };

    if let Err(e) = log::init(log_config) {
        eprintln!("Warning: Could not open log file: {}", e);
        return None;
    }
    file
}
