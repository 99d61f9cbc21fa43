//! Runtime configuration resolved from flags and environment.
//!
//! # Invariants
//! - Flags win over environment variables (clap `env` fallback).
//! - Logging stays disabled unless a log directory is configured.

use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "contacts.sqlite3";

/// Effective settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl CliConfig {
    /// Fills unset values with defaults.
    ///
    /// - `db_path`: `contacts.sqlite3` under the OS temp directory.
    /// - `log_level`: build-mode default from the core crate.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<String>,
    ) -> Self {
        let db_path = db_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| contacts_core::default_log_level().to_string());
        let log_dir = log_dir
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty());

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}
