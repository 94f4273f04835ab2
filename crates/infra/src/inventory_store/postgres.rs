//! Postgres-backed inventory store.
//!
//! Records live in the `inventory_records` table. The unique index over
//! `(name, category, subcategory)` is what upholds the composite-key invariant,
//! and the upsert leans on it through `ON CONFLICT ... DO UPDATE`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | InventoryStoreError |
//! |------------|----------------------|---------------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (check constraint violation) | `23514` | `Conflict` |
//! | Database (other) | Any other | `Database` |
//! | PoolClosed / PoolTimedOut / Io | N/A | `Unavailable` |
//! | Other | N/A | `Database` |

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use stockroom_core::RecordId;
use stockroom_inventory::{InventoryRecord, ItemKey};

use super::r#trait::{InventoryStore, InventoryStoreError, UpsertOutcome};

/// Schema for the inventory table; idempotent.
pub const SCHEMA: &str = include_str!("../../migrations/0001_inventory_records.sql");

/// Postgres-backed inventory store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`. Each operation is a
/// single statement, so no explicit transactions are needed.
///
/// ## Atomic Upsert
///
/// `upsert_quantity` is one `INSERT ... ON CONFLICT DO UPDATE ... RETURNING`
/// statement. Concurrent callers on an unseen triple serialize on the unique
/// index: one inserts, the others update the row it created.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    /// Create a new PostgresInventoryStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, InventoryStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the table and the composite unique index if missing.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), InventoryStoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), fields(record_count = tracing::field::Empty), err)]
    async fn find_by_name(&self, name: &str) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, subcategory, quantity
            FROM inventory_records
            WHERE name = $1
            ORDER BY category, subcategory
            "#,
        )
        .bind(name)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_name", e))?;

        let records = decode_rows(rows)?;
        Span::current().record("record_count", records.len());
        Ok(records)
    }

    #[instrument(skip(self), err)]
    async fn find_by_name_and_category(
        &self,
        name: &str,
        category: &str,
    ) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category, subcategory, quantity
            FROM inventory_records
            WHERE name = $1 AND category = $2
            ORDER BY subcategory
            "#,
        )
        .bind(name)
        .bind(category)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_name_and_category", e))?;

        decode_rows(rows)
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn find_one(
        &self,
        key: &ItemKey,
    ) -> Result<Option<InventoryRecord>, InventoryStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, subcategory, quantity
            FROM inventory_records
            WHERE name = $1 AND category = $2 AND subcategory = $3
            "#,
        )
        .bind(&key.name)
        .bind(&key.category)
        .bind(&key.subcategory)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_one", e))?;

        row.as_ref().map(decode_row).transpose()
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn upsert_quantity(
        &self,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<UpsertOutcome, InventoryStoreError> {
        let id = RecordId::new();

        // `xmax = 0` only for a freshly inserted row version.
        let row = sqlx::query(
            r#"
            INSERT INTO inventory_records (id, name, category, subcategory, quantity)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name, category, subcategory)
            DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING id, name, category, subcategory, quantity, (xmax = 0) AS created
            "#,
        )
        .bind(id.as_uuid())
        .bind(&key.name)
        .bind(&key.category)
        .bind(&key.subcategory)
        .bind(quantity)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_quantity", e))?;

        let created: bool = row.try_get("created").map_err(|e| {
            InventoryStoreError::Database(format!("failed to read upsert flag: {e}"))
        })?;

        Ok(UpsertOutcome {
            record: decode_row(&row)?,
            created,
        })
    }

    #[instrument(skip(self), err)]
    async fn delete_by_name(&self, name: &str) -> Result<u64, InventoryStoreError> {
        let result = sqlx::query("DELETE FROM inventory_records WHERE name = $1")
            .bind(name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_name", e))?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn delete_one(&self, key: &ItemKey) -> Result<u64, InventoryStoreError> {
        let result = sqlx::query(
            "DELETE FROM inventory_records WHERE name = $1 AND category = $2 AND subcategory = $3",
        )
        .bind(&key.name)
        .bind(&key.category)
        .bind(&key.subcategory)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_one", e))?;

        Ok(result.rows_affected())
    }
}

struct InventoryRow {
    id: uuid::Uuid,
    name: String,
    category: String,
    subcategory: String,
    quantity: i64,
}

impl<'r> sqlx::FromRow<'r, PgRow> for InventoryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            subcategory: row.try_get("subcategory")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

impl From<InventoryRow> for InventoryRecord {
    fn from(row: InventoryRow) -> Self {
        InventoryRecord::new(
            RecordId::from_uuid(row.id),
            ItemKey::new(row.name, row.category, row.subcategory),
            row.quantity,
        )
    }
}

fn decode_row(row: &PgRow) -> Result<InventoryRecord, InventoryStoreError> {
    use sqlx::FromRow;

    InventoryRow::from_row(row)
        .map(Into::into)
        .map_err(|e| InventoryStoreError::Database(format!("failed to decode inventory row: {e}")))
}

fn decode_rows(rows: Vec<PgRow>) -> Result<Vec<InventoryRecord>, InventoryStoreError> {
    rows.iter().map(decode_row).collect()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> InventoryStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23514") => InventoryStoreError::Conflict(msg),
                _ => InventoryStoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            InventoryStoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            InventoryStoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => {
            InventoryStoreError::Unavailable(format!("io error in {}: {}", operation, e))
        }
        _ => InventoryStoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use stockroom_core::Entity;

    use super::*;

    #[derive(Debug)]
    struct CodedDbError(&'static str);

    impl core::fmt::Display for CodedDbError {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            write!(f, "database error {}", self.0)
        }
    }

    impl StdError for CodedDbError {}

    impl sqlx::error::DatabaseError for CodedDbError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(CodedDbError(code)))
    }

    #[test]
    fn constraint_violations_map_to_conflict() {
        for code in ["23505", "23514"] {
            match map_sqlx_error("upsert_quantity", db_error(code)) {
                InventoryStoreError::Conflict(msg) => {
                    assert!(msg.contains("upsert_quantity"), "{msg}");
                    assert!(msg.contains("constraint violated"), "{msg}");
                }
                other => panic!("Expected Conflict for {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_database_codes_map_to_database() {
        let err = map_sqlx_error("find_one", db_error("42P01"));
        assert!(matches!(err, InventoryStoreError::Database(_)));
    }

    #[test]
    fn connectivity_failures_map_to_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        for err in [sqlx::Error::PoolClosed, sqlx::Error::PoolTimedOut, sqlx::Error::Io(io)] {
            match map_sqlx_error("find_by_name", err) {
                InventoryStoreError::Unavailable(msg) => assert!(msg.contains("find_by_name")),
                other => panic!("Expected Unavailable, got {other:?}"),
            }
        }
    }

    #[test]
    fn remaining_sqlx_errors_map_to_database() {
        let err = map_sqlx_error("delete_one", sqlx::Error::RowNotFound);
        assert!(matches!(err, InventoryStoreError::Database(_)));
    }

    /// Connects when `DATABASE_URL` is set; these tests are skipped otherwise.
    async fn live_store() -> Option<PostgresInventoryStore> {
        let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty())?;
        let store = PostgresInventoryStore::connect(&url, 8, Duration::from_secs(5))
            .await
            .unwrap();
        store.ensure_schema().await.unwrap();
        Some(store)
    }

    fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", RecordId::new())
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_one_row() {
        let Some(store) = live_store().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        // Schema creation is idempotent.
        store.ensure_schema().await.unwrap();

        let key = ItemKey::new(unique_name("pg-upsert"), "cat1", "subcat1");

        let first = store.upsert_quantity(&key, 8).await.unwrap();
        assert!(first.created);
        assert_eq!(first.record.quantity(), 8);

        let second = store.upsert_quantity(&key, 3).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.record.quantity(), 3);
        assert_eq!(second.record.id(), first.record.id());

        let rows = store.find_by_name(&key.name).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.find_one(&key).await.unwrap(), Some(second.record));

        let err = store.upsert_quantity(&key, -1).await.unwrap_err();
        assert!(matches!(err, InventoryStoreError::Conflict(_)));

        assert_eq!(store.delete_one(&key).await.unwrap(), 1);
        assert_eq!(store.delete_one(&key).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_on_one_triple_leave_one_row() {
        let Some(store) = live_store().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        let key = ItemKey::new(unique_name("pg-race"), "cat1", "subcat2");

        let tasks: Vec<_> = (0..16i64)
            .map(|q| {
                let store = store.clone();
                let key = key.clone();
                tokio::spawn(async move { store.upsert_quantity(&key, q).await })
            })
            .collect();

        let mut created = 0;
        let mut quantities = Vec::new();
        for task in tasks {
            let outcome = task.await.unwrap().unwrap();
            created += usize::from(outcome.created);
            quantities.push(outcome.record.quantity());
        }
        assert_eq!(created, 1);

        let rows = store.find_by_name(&key.name).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(quantities.contains(&rows[0].quantity()));

        assert_eq!(store.delete_by_name(&key.name).await.unwrap(), 1);
    }
}
