//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::store::DEFAULT_STORAGE_KEY;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".book-list-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "books.sqlite";
/// Log file written next to the database; stdout belongs to the TUI.
const LOG_FILE_NAME: &str = "book-list.log";

/// Keep a list of books in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "book-list-manager", version, about, long_about = None)]
pub struct Config {
    /// Directory holding the database and log file [default: ~/.book-list-manager]
    #[arg(long, env = "BOOK_LIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Key of the slot the book list is stored under
    #[arg(long, env = "BOOK_LIST_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Seconds a status message stays on screen
    #[arg(long, env = "BOOK_LIST_STATUS_SECONDS", default_value_t = 3)]
    pub status_seconds: u64,

    /// Tracing filter directive, e.g. `info` or `book_list_manager=debug`
    #[arg(long, env = "BOOK_LIST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// The configured data directory, or `~/.book-list-manager`.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(DB_FILE_NAME))
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(LOG_FILE_NAME))
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_seconds)
    }
}
