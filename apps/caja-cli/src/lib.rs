//! # Caja CLI
//!
//! Command-line front end for the cash drawer.
//!
//! ## Module Organization
//! ```text
//! caja_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── config.rs       ◄─── Layered configuration (flags, env, defaults)
//! ├── error.rs        ◄─── CliError, error codes, exit statuses
//! ├── output.rs       ◄─── Text / JSON reports
//! └── commands/
//!     ├── mod.rs      ◄─── Subcommand definitions + argument parsers
//!     ├── movement.rs ◄─── deposit, expense, edit, delete, show, history
//!     └── drawer.rs   ◄─── suggest, inventory, verify, status
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Startup                                   │
//! │                                                                         │
//! │  1. Parse arguments ──────────────────────────────────────────────────► │
//! │     • clap derive, `--db` and `--json` are global                       │
//! │                                                                         │
//! │  2. Resolve Configuration ────────────────────────────────────────────► │
//! │     • --db flag > CAJA_DB_PATH > platform data directory               │
//! │                                                                         │
//! │  3. Initialize Logging ───────────────────────────────────────────────► │
//! │     • RUST_LOG > CAJA_LOG > info,caja=debug,sqlx=warn (stderr)         │
//! │                                                                         │
//! │  4. Open Database ────────────────────────────────────────────────────► │
//! │     • SQLite with WAL mode, pending migrations, inventory rows         │
//! │                                                                         │
//! │  5. Run the subcommand, map any error to an exit status ──────────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use caja_db::{Database, DbConfig};
use commands::{Command, Context};
use config::AppConfig;
use error::CliResult;
use output::Output;

/// Cash drawer ledger.
#[derive(Debug, Parser)]
#[command(
    name = "caja",
    version,
    about = "Cash drawer ledger with per-denomination stock and change suggestions",
    long_about = "Caja tracks the bills and coins in a cash drawer. Every deposit and \
                  expense records exactly which bills moved, so the drawer count per \
                  denomination always matches the movements on record."
)]
pub struct Cli {
    /// Database file (overrides CAJA_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Runs the CLI and returns the process exit status.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.db.clone()) {
        Ok(config) => config,
        Err(err) => {
            Output::new(cli.json, fallback_config()).error(&err);
            return err.exit_code();
        }
    };

    init_tracing(&config.log_filter);

    let out = Output::new(cli.json, config.clone());
    match execute(cli.command, config, out.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.error(&err);
            err.exit_code()
        }
    }
}

async fn execute(command: Command, config: AppConfig, out: Output) -> CliResult<()> {
    let db = open_database(&config).await?;
    let ctx = Context { db, out };

    let result = commands::execute(command, &ctx).await;
    ctx.db.close().await;
    result
}

/// Opens (creating if needed) the configured database.
pub async fn open_database(config: &AppConfig) -> CliResult<Database> {
    config.ensure_data_dir()?;
    info!(path = %config.database_path.display(), "Opening drawer database");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    debug!("Database ready");
    Ok(db)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caja=trace` - Show trace for caja crates only
/// - `CAJA_LOG` - Used when `RUST_LOG` is unset
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Used only to print a configuration error.
fn fallback_config() -> AppConfig {
    AppConfig {
        database_path: PathBuf::new(),
        log_filter: config::DEFAULT_LOG_FILTER.to_string(),
        currency_symbol: config::DEFAULT_CURRENCY_SYMBOL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::MovementKind;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("caja").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let parsed = cli(&["inventory", "--json", "--db", "/tmp/caja-test.db"]);

        assert!(parsed.json);
        assert_eq!(parsed.db, Some(PathBuf::from("/tmp/caja-test.db")));
        assert!(matches!(parsed.command, Command::Inventory));
    }

    #[tokio::test]
    async fn test_open_database_in_temp_dir() {
        let dir = std::env::temp_dir().join(format!("caja-cli-{}", std::process::id()));
        let config = AppConfig {
            database_path: dir.join("nested").join("caja.db"),
            ..fallback_config()
        };

        let db = open_database(&config).await.unwrap();
        let id = db
            .movements()
            .create_deposit(caja_core::BillBundle::from_counts([(100, 1)]).unwrap())
            .await
            .unwrap();
        assert_eq!(db.movements().get(&id).await.unwrap().kind(), MovementKind::Deposit);
        db.close().await;

        let _ = std::fs::remove_dir_all(dir);
    }
}
