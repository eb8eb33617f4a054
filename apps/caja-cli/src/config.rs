//! # Application Configuration
//!
//! Resolved once at startup, read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--db`)
//! 2. Environment variables (`CAJA_*`)
//! 3. Defaults (this file)
//!
//! ## Database Location
//! - **Linux**: `~/.local/share/drawer/caja.db`
//! - **macOS**: `~/Library/Application Support/com.caja.drawer/caja.db`
//! - **Windows**: `%APPDATA%\caja\drawer\data\caja.db`

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Overrides the database file location.
pub const ENV_DB_PATH: &str = "CAJA_DB_PATH";

/// Log filter used when `RUST_LOG` is unset.
pub const ENV_LOG: &str = "CAJA_LOG";

/// Prefix printed before amounts.
pub const ENV_CURRENCY_SYMBOL: &str = "CAJA_CURRENCY_SYMBOL";

/// Default `tracing` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,caja=debug,sqlx=warn";

/// Currency symbol used when `CAJA_CURRENCY_SYMBOL` is unset.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

const DATABASE_FILE: &str = "caja.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// `tracing` filter directives.
    /// Default: `info,caja=debug,sqlx=warn`
    pub log_filter: String,

    /// Currency symbol for display.
    /// Default: `$`
    pub currency_symbol: String,
}

impl AppConfig {
    /// Resolves configuration from the process environment and an optional
    /// `--db` flag.
    pub fn load(db_flag: Option<PathBuf>) -> CliResult<Self> {
        Self::resolve(|key| std::env::var(key).ok(), db_flag)
    }

    /// Resolves configuration from any variable source.
    ///
    /// Empty values count as unset.
    pub fn resolve<F>(lookup: F, db_flag: Option<PathBuf>) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_path = match db_flag.or_else(|| var(ENV_DB_PATH).map(PathBuf::from)) {
            Some(path) => path,
            None => default_database_path()?,
        };

        Ok(AppConfig {
            database_path,
            log_filter: var(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            currency_symbol: var(ENV_CURRENCY_SYMBOL)
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
        })
    }

    /// Creates the directory holding the database file if needed.
    pub fn ensure_data_dir(&self) -> CliResult<()> {
        match self.database_path.parent() {
            Some(dir) if dir != Path::new("") => std::fs::create_dir_all(dir).map_err(|e| {
                CliError::config(format!("Cannot create {}: {}", dir.display(), e))
            }),
            _ => Ok(()),
        }
    }

    /// Formats an amount with the configured symbol.
    pub fn money(&self, amount: i64) -> String {
        if amount < 0 {
            format!("-{}{}", self.currency_symbol, amount.unsigned_abs())
        } else {
            format!("{}{}", self.currency_symbol, amount)
        }
    }
}

/// Platform data directory joined with `caja.db`.
fn default_database_path() -> CliResult<PathBuf> {
    let dirs = ProjectDirs::from("com", "caja", "drawer")
        .ok_or_else(|| CliError::config("Could not determine app data directory"))?;

    Ok(dirs.data_dir().join(DATABASE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_flag_beats_environment() {
        let config = AppConfig::resolve(
            env(&[(ENV_DB_PATH, "/from/env.db")]),
            Some(PathBuf::from("/from/flag.db")),
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/from/flag.db"));
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = AppConfig::resolve(
            env(&[
                (ENV_DB_PATH, "/from/env.db"),
                (ENV_LOG, "warn"),
                (ENV_CURRENCY_SYMBOL, "MXN "),
            ]),
            None,
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/from/env.db"));
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.money(150), "MXN 150");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AppConfig::resolve(
            env(&[(ENV_LOG, "  "), (ENV_CURRENCY_SYMBOL, "")]),
            Some(PathBuf::from("caja.db")),
        )
        .unwrap();

        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
        assert_eq!(config.money(-20), "-$20");
    }

    #[test]
    fn test_bare_file_name_needs_no_directory() {
        let config = AppConfig::resolve(env(&[]), Some(PathBuf::from("caja.db"))).unwrap();
        assert!(config.ensure_data_dir().is_ok());
    }
}
