//! # caja-core: Pure Business Logic for Caja
//!
//! This crate is the **heart** of Caja, a cash drawer ledger. It contains the
//! denomination bookkeeping and the change-suggestion engine as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Caja Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    caja-cli (composition root)                  │   │
//! │  │    deposit, expense, edit-*, delete, suggest, inventory        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          caja-db (Inventory Ledger, Movement Manager)           │   │
//! │  │          SQLite transactions, per-process write lock            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐ ┌───────────┐ ┌───────────┐ ┌─────────────┐  │   │
//! │  │  │ denomination │ │  bundle   │ │ inventory │ │ suggestion  │  │   │
//! │  │  │ DENOMINATIONS│ │BillBundle │ │StockDelta │ │  suggest    │  │   │
//! │  │  │              │ │           │ │ Snapshot  │ │  shortfall  │  │   │
//! │  │  └──────────────┘ └───────────┘ └───────────┘ └─────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOCKS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`denomination`] - The fixed denomination set
//! - [`bundle`] - Validated denomination → count bundles
//! - [`inventory`] - Snapshots and signed deltas with all-or-nothing apply
//! - [`movement`] - Deposit / Expense records and edit inputs
//! - [`suggestion`] - Greedy change suggestion
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::{suggest, BillBundle, InventorySnapshot, StockDelta};
//!
//! let deposit = BillBundle::from_counts([(500, 1), (100, 3), (20, 2)]).unwrap();
//! let drawer = InventorySnapshot::empty()
//!     .apply(&StockDelta::credit(&deposit))
//!     .unwrap();
//!
//! let change = suggest(640, &drawer).unwrap();
//! assert_eq!(change.total_value(), 640);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundle;
pub mod denomination;
pub mod error;
pub mod inventory;
pub mod movement;
pub mod suggestion;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bundle::BillBundle;
pub use denomination::{Denomination, DENOMINATIONS};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{Discrepancy, InventoryEntry, InventorySnapshot, StockDelta};
pub use movement::{
    net_effect, Deposit, Expense, ExpenseEdit, MovementKind, MovementRecord, NewExpense,
};
pub use suggestion::{shortfall, suggest};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum characters in an expense payee.
pub const MAX_PAYEE_LEN: usize = 100;

/// Maximum characters in an expense description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Most pieces of one denomination a bundle or the drawer may hold.
///
/// Keeps every value sum (at most 10 × 1000 × `MAX_PIECES`) well inside `i64`.
pub const MAX_PIECES: i64 = 1_000_000_000;
