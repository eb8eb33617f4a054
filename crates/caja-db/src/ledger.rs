//! # Inventory Ledger
//!
//! The authoritative per-denomination counts of the drawer.
//!
//! ## Apply Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      InventoryLedger::apply                             │
//! │                                                                         │
//! │  write_lock.lock()          ← one inventory change at a time            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load snapshot ──► InventorySnapshot::apply(delta)                     │
//! │       │                   │                                             │
//! │       │                   ├── Err(InsufficientStock) ──► ROLLBACK       │
//! │       │                   │                                             │
//! │       ▼                   ▼                                             │
//! │  UPSERT every denomination the delta touches                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`apply_in`] is the same check-then-write without the lock or the
//! transaction, so the movement manager can fold it into a larger unit of
//! work that also writes the movement record.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::inventory::InventoryRepository;
use caja_core::{suggest, BillBundle, InventorySnapshot, StockDelta};

/// Handle to the stored inventory.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl InventoryLedger {
    pub(crate) fn new(pool: SqlitePool, write_lock: Arc<Mutex<()>>) -> Self {
        InventoryLedger { pool, write_lock }
    }

    /// Current counts for every denomination.
    pub async fn snapshot(&self) -> DbResult<InventorySnapshot> {
        let mut conn = self.pool.acquire().await?;
        InventoryRepository::new(&mut *conn).load_snapshot().await
    }

    /// Σ(denomination × count) over the current snapshot.
    pub async fn total_value(&self) -> DbResult<i64> {
        Ok(self.snapshot().await?.total_value())
    }

    /// Greedy bundle for `amount` drawn from the current stock.
    ///
    /// Read-only. Use [`caja_core::shortfall`] on the result to see how much
    /// of `amount` it leaves uncovered.
    pub async fn suggest(&self, amount: i64) -> DbResult<BillBundle> {
        let snapshot = self.snapshot().await?;
        let bills = suggest(amount, &snapshot)?;
        debug!(amount, suggested = bills.total_value(), "Suggestion computed");
        Ok(bills)
    }

    /// Applies a delta atomically.
    ///
    /// ## Errors
    /// [`caja_core::CoreError::InsufficientStock`] (as [`DbError::Domain`]) if
    /// any count would go negative. Nothing is written in that case.
    pub async fn apply(&self, delta: &StockDelta) -> DbResult<InventorySnapshot> {
        let _guard = self.lock().await;

        let mut tx = self.pool.begin().await?;
        let next = apply_in(&mut *tx, delta).await?;
        commit(tx).await?;

        Ok(next)
    }

    /// Acquires the process-wide write lock.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

/// Checks `delta` against the stored counts and writes the result on `conn`.
///
/// The caller must hold the write lock and own the surrounding transaction.
pub(crate) async fn apply_in(
    conn: &mut SqliteConnection,
    delta: &StockDelta,
) -> DbResult<InventorySnapshot> {
    let mut repo = InventoryRepository::new(conn);
    let current = repo.load_snapshot().await?;

    let next = current.apply(delta).inspect_err(|e| {
        warn!(error = %e, "Inventory change rejected");
    })?;

    for (denomination, _) in delta.iter() {
        repo.upsert(denomination, next.count(denomination)).await?;
    }

    debug!(
        touched = delta.iter().count(),
        total = next.total_value(),
        "Inventory updated"
    );
    Ok(next)
}

/// Commits a write transaction.
pub(crate) async fn commit(tx: Transaction<'_, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}
