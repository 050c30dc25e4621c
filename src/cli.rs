use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Deadline-bound task tracker with local storage.
/// Tasks live in `<data dir>/<key>.json`; the data dir defaults to ~/.sdr.
#[derive(Parser, Debug)]
#[command(name = "sdr", version, about = "Smart Deadline Reminder")]
pub struct Cli {
    /// Directory holding the local store.
    #[arg(long, global = true, env = "SDR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage key the task list is saved under.
    #[arg(long, global = true, env = "SDR_KEY")]
    pub key: Option<String>,

    /// Append log output to this file (filter with SDR_LOG, e.g. SDR_LOG=debug).
    #[arg(long, global = true, env = "SDR_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Defaults to `ui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
