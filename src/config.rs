//! Runtime configuration.
//!
//! Values come from command-line flags or their environment variables
//! (see `cli::Cli`), falling back to the defaults below.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::storage::STORAGE_KEY;

/// Data directory name under `$HOME`.
pub const DATA_DIR_NAME: &str = ".sdr";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
        let storage_key = cli
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(STORAGE_KEY)
            .to_string();
        Config {
            data_dir,
            storage_key,
            log_file: cli.log_file.clone(),
        }
    }
}

/// `$HOME/.sdr`, or `./.sdr` when `HOME` is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(DATA_DIR_NAME)
}
