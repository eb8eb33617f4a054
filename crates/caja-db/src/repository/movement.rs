//! # Movement Repository
//!
//! Persists deposits and expenses across two tables.
//!
//! ## Storage Layout
//! ```text
//! movements                          movement_bills
//! ┌──────────┬─────────┬───────┐     ┌─────────────┬──────────────┬───────┐
//! │ id (PK)  │ kind    │ ...   │ ◄── │ movement_id │ denomination │ count │
//! └──────────┴─────────┴───────┘     └─────────────┴──────────────┴───────┘
//!   payee / description /              one row per denomination with
//!   declared_amount are NULL           count > 0 (empty bundle = no rows)
//!   for deposits
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caja_core::{BillBundle, Deposit, Expense, MovementKind, MovementRecord};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: String,
    kind: MovementKind,
    payee: Option<String>,
    description: Option<String>,
    declared_amount: Option<i64>,
    recorded_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    movement_id: String,
    denomination: i64,
    count: i64,
}

impl MovementRow {
    fn into_record(self, bills: Vec<(i64, i64)>) -> DbResult<MovementRecord> {
        let bills = BillBundle::from_counts(bills)
            .map_err(|e| DbError::Corrupt(format!("movement {}: {}", self.id, e)))?;

        match self.kind {
            MovementKind::Deposit => Ok(Deposit {
                id: self.id,
                recorded_at: self.recorded_at,
                bills,
            }
            .into()),
            MovementKind::Expense => {
                let (Some(payee), Some(description), Some(declared_amount)) =
                    (self.payee, self.description, self.declared_amount)
                else {
                    return Err(DbError::Corrupt(format!(
                        "expense {} is missing payee, description or amount",
                        self.id
                    )));
                };

                Ok(Expense {
                    id: self.id,
                    recorded_at: self.recorded_at,
                    payee,
                    description,
                    declared_amount,
                    bills,
                }
                .into())
            }
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `movements` and `movement_bills`.
pub struct MovementRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> MovementRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        MovementRepository { conn }
    }

    /// Loads one record with its bundle.
    pub async fn load(&mut self, id: &str) -> DbResult<Option<MovementRecord>> {
        let row: Option<MovementRow> = sqlx::query_as(
            r#"
            SELECT id, kind, payee, description, declared_amount, recorded_at
            FROM movements
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let bills: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT denomination, count
            FROM movement_bills
            WHERE movement_id = ?1
            "#,
        )
        .bind(id)
        .fetch_all(&mut *self.conn)
        .await?;

        row.into_record(bills).map(Some)
    }

    /// Inserts or replaces a record, rewriting its bundle rows.
    pub async fn save(&mut self, record: &MovementRecord) -> DbResult<()> {
        debug!(id = %record.id(), kind = %record.kind(), "Saving movement");

        let (payee, description, declared_amount) = match record {
            MovementRecord::Deposit(_) => (None, None, None),
            MovementRecord::Expense(expense) => (
                Some(expense.payee.as_str()),
                Some(expense.description.as_str()),
                Some(expense.declared_amount),
            ),
        };

        sqlx::query(
            r#"
            INSERT INTO movements (id, kind, payee, description, declared_amount, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                kind = excluded.kind,
                payee = excluded.payee,
                description = excluded.description,
                declared_amount = excluded.declared_amount,
                recorded_at = excluded.recorded_at
            "#,
        )
        .bind(record.id())
        .bind(record.kind())
        .bind(payee)
        .bind(description)
        .bind(declared_amount)
        .bind(record.recorded_at())
        .execute(&mut *self.conn)
        .await?;

        sqlx::query("DELETE FROM movement_bills WHERE movement_id = ?1")
            .bind(record.id())
            .execute(&mut *self.conn)
            .await?;

        for (denomination, count) in record.bills().iter() {
            sqlx::query(
                r#"
                INSERT INTO movement_bills (movement_id, denomination, count)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(record.id())
            .bind(denomination.value())
            .bind(count)
            .execute(&mut *self.conn)
            .await?;
        }

        Ok(())
    }

    /// Removes a record and its bundle. Returns false if no such id.
    pub async fn delete(&mut self, id: &str) -> DbResult<bool> {
        sqlx::query("DELETE FROM movement_bills WHERE movement_id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        let result = sqlx::query("DELETE FROM movements WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists records, newest first, optionally restricted to one kind.
    pub async fn list(&mut self, kind: Option<MovementKind>) -> DbResult<Vec<MovementRecord>> {
        let rows: Vec<MovementRow> = sqlx::query_as(
            r#"
            SELECT id, kind, payee, description, declared_amount, recorded_at
            FROM movements
            WHERE (?1 IS NULL OR kind = ?1)
            ORDER BY recorded_at DESC, id
            "#,
        )
        .bind(kind)
        .fetch_all(&mut *self.conn)
        .await?;

        let bill_rows: Vec<BillRow> = sqlx::query_as(
            r#"
            SELECT b.movement_id, b.denomination, b.count
            FROM movement_bills b
            JOIN movements m ON m.id = b.movement_id
            WHERE (?1 IS NULL OR m.kind = ?1)
            "#,
        )
        .bind(kind)
        .fetch_all(&mut *self.conn)
        .await?;

        let mut bills: HashMap<String, Vec<(i64, i64)>> = HashMap::new();
        for row in bill_rows {
            bills
                .entry(row.movement_id)
                .or_default()
                .push((row.denomination, row.count));
        }

        rows.into_iter()
            .map(|row| {
                let pairs = bills.remove(&row.id).unwrap_or_default();
                row.into_record(pairs)
            })
            .collect()
    }

    /// Number of stored records.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}
