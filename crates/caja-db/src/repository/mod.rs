//! # Repository Module
//!
//! Database repository implementations for Caja.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Connection-Bound Repositories                             │
//! │                                                                         │
//! │  MovementManager                                                       │
//! │       │  let mut tx = pool.begin().await?;                             │
//! │       │                                                                 │
//! │       ├──► InventoryRepository::new(&mut *tx).load_snapshot()          │
//! │       ├──► InventoryRepository::new(&mut *tx).upsert(100, 3)           │
//! │       └──► MovementRepository::new(&mut *tx).save(&record)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tx.commit()  ← every statement above lands, or none does              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories borrow a connection instead of owning the pool, so the same
//! code runs inside whatever transaction the caller opened. They never take
//! the write lock and never decide whether a change is allowed; that belongs
//! to the ledger and the movement manager.
//!
//! ## Available Repositories
//!
//! - [`inventory::InventoryRepository`] - Per-denomination counts
//! - [`movement::MovementRepository`] - Deposit / expense records and bundles

pub mod inventory;
pub mod movement;
