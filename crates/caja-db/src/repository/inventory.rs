//! # Inventory Repository
//!
//! Reads and writes `cash_inventory`, one row per denomination.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use caja_core::{Denomination, InventoryEntry, InventorySnapshot};

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    denomination: i64,
    count: i64,
}

/// Repository for `cash_inventory`.
pub struct InventoryRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> InventoryRepository<'c> {
    /// Binds the repository to a connection or open transaction.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        InventoryRepository { conn }
    }

    /// Creates a zero-count row for every denomination that has none.
    ///
    /// ## Returns
    /// Number of rows created (0 on every run after the first).
    pub async fn initialize(&mut self) -> DbResult<u64> {
        let now = Utc::now();
        let mut created = 0;

        for denomination in Denomination::all() {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO cash_inventory (denomination, count, updated_at)
                VALUES (?1, 0, ?2)
                "#,
            )
            .bind(denomination.value())
            .bind(now)
            .execute(&mut *self.conn)
            .await?;

            created += result.rows_affected();
        }

        debug!(created, "Inventory rows initialized");
        Ok(created)
    }

    /// Loads every known denomination's entry, largest first.
    ///
    /// Rows for values outside the denomination set are ignored.
    pub async fn load_all(&mut self) -> DbResult<Vec<InventoryEntry>> {
        let rows: Vec<InventoryRow> = sqlx::query_as(
            r#"
            SELECT denomination, count
            FROM cash_inventory
            ORDER BY denomination DESC
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match Denomination::new(row.denomination) {
                Ok(denomination) => entries.push(InventoryEntry {
                    denomination,
                    count: row.count,
                }),
                Err(_) => {
                    warn!(denomination = row.denomination, "Ignoring unknown denomination row")
                }
            }
        }

        Ok(entries)
    }

    /// Loads the current counts as a snapshot.
    pub async fn load_snapshot(&mut self) -> DbResult<InventorySnapshot> {
        let entries = self.load_all().await?;
        InventorySnapshot::from_entries(entries).map_err(|e| DbError::Corrupt(e.to_string()))
    }

    /// Writes an absolute count for one denomination.
    ///
    /// Callers are responsible for having checked `count >= 0`; the schema's
    /// CHECK constraint rejects anything else.
    pub async fn upsert(&mut self, denomination: Denomination, count: i64) -> DbResult<()> {
        debug!(denomination = denomination.value(), count, "Writing inventory count");

        sqlx::query(
            r#"
            INSERT INTO cash_inventory (denomination, count, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (denomination) DO UPDATE SET
                count = excluded.count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(denomination.value())
        .bind(count)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn d(value: i64) -> Denomination {
        Denomination::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_load_all_is_descending_and_complete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let entries = InventoryRepository::new(&mut *conn).load_all().await.unwrap();
        let values: Vec<i64> = entries.iter().map(|e| e.denomination.value()).collect();

        assert_eq!(values, caja_core::DENOMINATIONS.to_vec());
        assert!(entries.iter().all(|e| e.count == 0));
    }

    #[tokio::test]
    async fn test_upsert_overwrites_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        let mut repo = InventoryRepository::new(&mut *conn);

        repo.upsert(d(200), 7).await.unwrap();
        repo.upsert(d(200), 3).await.unwrap();

        let snapshot = repo.load_snapshot().await.unwrap();
        assert_eq!(snapshot.count(d(200)), 3);
        assert_eq!(snapshot.total_value(), 600);
    }

    #[tokio::test]
    async fn test_schema_rejects_negative_counts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let result = InventoryRepository::new(&mut *conn).upsert(d(5), -1).await;
        assert!(matches!(result, Err(DbError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let created = InventoryRepository::new(&mut *conn).initialize().await.unwrap();
        assert_eq!(created, 0);
    }
}
