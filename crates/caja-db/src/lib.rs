//! # caja-db: Storage Layer for Caja
//!
//! This crate persists the cash drawer: per-denomination inventory and the
//! deposit / expense records that explain it. It uses SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Caja Data Flow                                 │
//! │                                                                         │
//! │  caja-cli subcommand (expense --bill 200=2 ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     caja-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ Movement      │───►│ Inventory     │    │              │  │   │
//! │  │   │   Manager     │    │ Movement      │    │ 001_initial  │  │   │
//! │  │   │ Inventory     │───►│               │    │   _schema    │  │   │
//! │  │   │   Ledger      │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │           └── rules from caja-core (apply, suggest, validate)   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/drawer/caja.db                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`ledger`] - Inventory ledger service (snapshot, apply, suggest)
//! - [`manager`] - Movement manager service (create, edit, delete, verify)
//! - [`repository`] - Connection-bound table access
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_core::BillBundle;
//! use caja_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/caja.db")).await?;
//!
//! let id = db.movements()
//!     .create_deposit(BillBundle::from_counts([(500, 2)])?)
//!     .await?;
//!
//! let change = db.ledger().suggest(640).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod manager;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::InventoryLedger;
pub use manager::MovementManager;
pub use pool::{Database, DbConfig};
