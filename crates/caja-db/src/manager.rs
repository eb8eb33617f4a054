//! # Movement Manager
//!
//! Creates, edits and deletes movement records, keeping the inventory equal
//! to the net effect of every record that exists.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create / edit / delete                                                │
//! │                                                                         │
//! │  validate input               ← ValidationError, nothing touched       │
//! │       │                                                                 │
//! │  write_lock + BEGIN                                                    │
//! │       │                                                                 │
//! │  load existing record         ← NotFound, rollback                     │
//! │       │                                                                 │
//! │  delta = reversal(old) + effect(new)                                   │
//! │       │                                                                 │
//! │  apply_in(delta)              ← InsufficientStock, rollback            │
//! │       │                                                                 │
//! │  save / delete record                                                  │
//! │       │                                                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Operation      | Delta applied                        |
//! |----------------|--------------------------------------|
//! | create deposit | `+bills`                             |
//! | create expense | `-bills`                             |
//! | edit deposit   | `-old + new` (checked as one sum)    |
//! | edit expense   | `+old - new` (checked as one sum)    |
//! | delete         | reversal of the stored record        |

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::ledger::{apply_in, commit, InventoryLedger};
use crate::repository::movement::MovementRepository;
use caja_core::{
    net_effect, BillBundle, CoreError, Deposit, Discrepancy, Expense, ExpenseEdit, MovementKind,
    MovementRecord, NewExpense,
};

/// Service coordinating movement records with the inventory ledger.
#[derive(Debug, Clone)]
pub struct MovementManager {
    pool: SqlitePool,
    ledger: InventoryLedger,
}

impl MovementManager {
    pub(crate) fn new(pool: SqlitePool, ledger: InventoryLedger) -> Self {
        MovementManager { pool, ledger }
    }

    /// The ledger this manager writes to.
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Records cash entering the drawer. Returns the new record id.
    pub async fn create_deposit(&self, bills: BillBundle) -> DbResult<String> {
        let record: MovementRecord = Deposit::new(bills).into();
        self.insert(record).await
    }

    /// Records cash leaving the drawer. Returns the new record id.
    ///
    /// ## Errors
    /// - Validation failure on payee, description or declared amount
    /// - `InsufficientStock` if the drawer lacks any of the bills; no record
    ///   is created and the inventory is unchanged
    pub async fn create_expense(&self, input: NewExpense) -> DbResult<String> {
        input.validate()?;
        let record: MovementRecord = Expense::new(input).into();
        self.insert(record).await
    }

    async fn insert(&self, record: MovementRecord) -> DbResult<String> {
        let _guard = self.ledger.lock().await;
        let mut tx = self.pool.begin().await?;

        apply_in(&mut *tx, &record.effect()).await?;
        MovementRepository::new(&mut *tx).save(&record).await?;
        commit(tx).await?;

        info!(
            id = %record.id(),
            kind = %record.kind(),
            total = record.bills().total_value(),
            "Movement created"
        );
        Ok(record.id().to_string())
    }

    // =========================================================================
    // Edit
    // =========================================================================

    /// Replaces a deposit's bundle and timestamp.
    pub async fn edit_deposit(&self, id: &str, bills: BillBundle) -> DbResult<String> {
        self.replace(id, MovementKind::Deposit, |record| match record {
            MovementRecord::Deposit(old) => Some(
                Deposit {
                    id: old.id,
                    recorded_at: Utc::now(),
                    bills,
                }
                .into(),
            ),
            MovementRecord::Expense(_) => None,
        })
        .await
    }

    /// Replaces an expense's bundle and timestamp, and whichever of payee,
    /// description and declared amount `edit` supplies.
    pub async fn edit_expense(&self, id: &str, edit: ExpenseEdit) -> DbResult<String> {
        edit.validate()?;

        self.replace(id, MovementKind::Expense, |record| match record {
            MovementRecord::Expense(old) => Some(edit.apply_to(&old).into()),
            MovementRecord::Deposit(_) => None,
        })
        .await
    }

    /// Swaps the stored record `id` of `kind` for the one `rebuild` returns.
    ///
    /// `rebuild` returns `None` when the stored record has the wrong kind.
    async fn replace<F>(&self, id: &str, kind: MovementKind, rebuild: F) -> DbResult<String>
    where
        F: FnOnce(MovementRecord) -> Option<MovementRecord>,
    {
        let _guard = self.ledger.lock().await;
        let mut tx = self.pool.begin().await?;

        let existing = MovementRepository::new(&mut *tx).load(id).await?;
        let Some((reversal, updated)) = existing.and_then(|old| {
            let reversal = old.reversal();
            rebuild(old).map(|new| (reversal, new))
        }) else {
            warn!(id, kind = %kind, "Edit target not found");
            return Err(CoreError::not_found(kind.label(), id).into());
        };

        let delta = reversal.then(updated.effect());
        apply_in(&mut *tx, &delta).await?;
        MovementRepository::new(&mut *tx).save(&updated).await?;
        commit(tx).await?;

        info!(
            id,
            kind = %kind,
            total = updated.bills().total_value(),
            "Movement edited"
        );
        Ok(updated.id().to_string())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes a record of either kind, reversing its effect on the drawer.
    ///
    /// ## Errors
    /// - `MovementNotFound` if no record has this id
    /// - `InsufficientStock` if the deposit's bills have since been paid out;
    ///   the record is kept
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let _guard = self.ledger.lock().await;
        let mut tx = self.pool.begin().await?;

        let Some(record) = MovementRepository::new(&mut *tx).load(id).await? else {
            warn!(id, "Delete target not found");
            return Err(CoreError::not_found("Movement", id).into());
        };

        apply_in(&mut *tx, &record.reversal()).await?;

        if !MovementRepository::new(&mut *tx).delete(id).await? {
            return Err(DbError::Internal(format!("movement {id} vanished mid-delete")));
        }
        commit(tx).await?;

        info!(id, kind = %record.kind(), "Movement deleted");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Loads one record.
    pub async fn get(&self, id: &str) -> DbResult<MovementRecord> {
        let mut conn = self.pool.acquire().await?;
        MovementRepository::new(&mut *conn)
            .load(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Movement", id).into())
    }

    /// Lists records newest first, optionally only one kind.
    pub async fn list(&self, kind: Option<MovementKind>) -> DbResult<Vec<MovementRecord>> {
        let mut conn = self.pool.acquire().await?;
        MovementRepository::new(&mut *conn).list(kind).await
    }

    /// Number of stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        MovementRepository::new(&mut *conn).count().await
    }

    /// Compares stored counts with the net effect of every stored record.
    ///
    /// Empty when the two agree.
    pub async fn check_consistency(&self) -> DbResult<Vec<Discrepancy>> {
        let _guard = self.ledger.lock().await;

        let records = self.list(None).await?;
        let snapshot = self.ledger.snapshot().await?;
        let discrepancies = snapshot.discrepancies(&net_effect(&records));

        if !discrepancies.is_empty() {
            warn!(count = discrepancies.len(), "Inventory disagrees with movements");
        }
        Ok(discrepancies)
    }
}
