//! Query History Command-Line Entry Point
//!
//! Inspects and edits a file-backed query history from the terminal.
//!
//! # Logging
//!
//! Diagnostics go to stderr through `env_logger`; set `RUST_LOG=debug` to see
//! every stored or deleted record. Stdout carries only command output.

use chrono::Utc;
use clap::{Parser, Subcommand};
use query_history::config::{self, HistoryConfig};
use query_history::history::{
    filter_by_file, format_history_details, format_history_entry, format_history_entry_relative,
    format_history_summary, search_history, FileStorage, HistoryRecord, NewHistoryRecord,
    QueryHistory, EMPTY_HISTORY_MESSAGE,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "query-history", version, about = "Review past CSV queries")]
struct Cli {
    /// Directory holding the history file
    #[arg(long, env = "QUERY_HISTORY_DIR")]
    dir: Option<PathBuf>,

    /// JSON settings file with a "query-history" section
    #[arg(long, env = "QUERY_HISTORY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved queries, newest first
    List {
        /// Show responses too
        #[arg(long)]
        details: bool,

        /// Show times relative to now
        #[arg(long, conflicts_with = "details")]
        relative: bool,
    },
    /// Save a query and its response
    Add {
        #[arg(long)]
        file_id: String,
        #[arg(long)]
        file_name: String,
        #[arg(long)]
        query: String,
        #[arg(long)]
        response: String,
        /// Explicit timestamp key (defaults to now)
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Delete the query saved under a timestamp
    Remove { timestamp: String },
    /// Delete all saved queries
    Clear,
    /// Search saved queries by text
    Search {
        text: String,
        /// Only queries against this file
        #[arg(long)]
        file_id: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_settings(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("query-history: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dir = cli
        .dir
        .clone()
        .unwrap_or_else(|| config.resolved_storage_dir());
    log::debug!("Using history directory {}", dir.display());

    let history = QueryHistory::with_config(FileStorage::new(dir), config);
    run(&history, cli.command);

    ExitCode::SUCCESS
}

fn load_settings(path: Option<&PathBuf>) -> Result<HistoryConfig, String> {
    let settings = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            let value = serde_json::from_str(&content)
                .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
            Some(value)
        }
        None => None,
    };

    config::load_config(settings)
}

fn run(history: &QueryHistory<FileStorage>, command: Command) {
    match command {
        Command::List { details, relative } => {
            let records = history.list();
            print_records(&records, details, relative);
        }
        Command::Add {
            file_id,
            file_name,
            query,
            response,
            timestamp,
        } => {
            let mut entry = NewHistoryRecord::new(file_id, file_name, query, response);
            entry.timestamp = timestamp;
            history.record_entry(entry);
            println!("{}", format_history_summary(history.list().len()));
        }
        Command::Remove { timestamp } => {
            history.remove(&timestamp);
            println!("{}", format_history_summary(history.list().len()));
        }
        Command::Clear => {
            history.clear();
            println!("{}", format_history_summary(history.list().len()));
        }
        Command::Search { text, file_id } => {
            let mut records = history.list();
            if let Some(file_id) = file_id {
                records = filter_by_file(&file_id, &records);
            }
            let results = search_history(&text, &records);
            print_records(&results, false, false);
        }
    }
}

fn print_records(records: &[HistoryRecord], details: bool, relative: bool) {
    if records.is_empty() {
        println!("{}", EMPTY_HISTORY_MESSAGE);
        return;
    }

    let now = Utc::now();
    for record in records {
        if details {
            print!("{}", format_history_details(record));
        } else if relative {
            println!("{}", format_history_entry_relative(record, &now));
        } else {
            println!("{}", format_history_entry(record));
        }
    }

    println!("{}", format_history_summary(records.len()));
}
