//! Runtime settings for the notes binary.
//!
//! The binary takes no flags and reads no environment variables; every
//! path is derived from the working directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "notes.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    WorkingDirectory(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkingDirectory(err) => {
                write!(f, "cannot resolve current working directory: {err}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkingDirectory(err) => Some(err),
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// SQLite database file backing the note store.
    pub db_path: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub log_level: &'static str,
}

impl CliConfig {
    /// Resolves settings relative to the current working directory.
    pub fn resolve() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::WorkingDirectory)?;
        Ok(Self::in_dir(cwd))
    }

    /// Builds settings rooted at `base`.
    pub fn in_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            db_path: base.join(DB_FILE_NAME),
            log_dir: base.join(LOG_DIR_NAME),
            log_level: notes_core::default_log_level(),
        }
    }
}
