//! # SDR - Smart Deadline Reminder
//!
//! A terminal task tracker for deadline-bound work. Each task has a title, a
//! deadline, a priority, a completion percentage and notes. The list is kept
//! in a local keyed store and shown next to a summary (task count, average
//! progress), this month's calendar and a motivational quote.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! sdr
//!
//! # Add a task from the command line
//! sdr add "Finish lab report" --deadline "next fri" --priority medium --progress 20
//!
//! # List tasks with their positions
//! sdr list
//!
//! # Update or delete by position
//! sdr edit 0 --progress 60
//! sdr delete 0
//! ```
//!
//! ## Storage
//!
//! Tasks are stored as one JSON array under the key `sd_tasks_v4` in the data
//! directory (`~/.sdr/sd_tasks_v4.json` by default). Use `--data-dir` and
//! `--key` (or `SDR_DATA_DIR` / `SDR_KEY`) to point elsewhere. Unreadable data
//! is treated as an empty list.
//!
//! Tasks are addressed by position. Positions shift after a delete, so run
//! `sdr list` again before the next `edit` or `delete`.

use anyhow::{Context, Result};
use clap::Parser;

pub mod calendar;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod due;
pub mod fields;
pub mod logging;
pub mod quote;
pub mod storage;
pub mod store;
pub mod summary;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use storage::{LocalStorage, LocalStorageAdapter};
use store::TaskStore;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli);
    let command = cli.command.unwrap_or(Commands::Ui);

    // Commands that never touch the store.
    match command {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            return Ok(());
        }
        Commands::Quote => {
            cmd_quote();
            return Ok(());
        }
        Commands::Calendar => {
            cmd_calendar(local_today());
            return Ok(());
        }
        _ => {}
    }

    let fallback = if matches!(command, Commands::Ui) {
        logging::Fallback::Discard
    } else {
        logging::Fallback::Stderr
    };
    logging::init(config.log_file.as_deref(), fallback)?;

    let local = LocalStorage::open(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;
    let adapter = LocalStorageAdapter::new(local, &config.storage_key);
    tracing::debug!(path = %adapter.path().display(), "opening task store");
    let mut store = TaskStore::open(adapter);
    let today = local_today();

    match command {
        Commands::Ui => cmd_ui(store),
        Commands::Add { title, deadline, priority, progress, notes } =>
            cmd_add(&mut store, today, title, deadline, priority, progress, notes),
        Commands::Edit { position, title, deadline, priority, progress, notes } =>
            cmd_edit(&mut store, today, position, title, deadline, priority, progress, notes),
        Commands::Delete { position, yes } =>
            cmd_delete(&mut store, position, yes, confirm_on_terminal),
        Commands::List => {
            cmd_list(&store, today);
            Ok(())
        }
        Commands::Summary => {
            cmd_summary(&store);
            Ok(())
        }
        Commands::Completions { .. } | Commands::Quote | Commands::Calendar => {
            unreachable!("handled before opening the store")
        }
    }
}
