//! Repository for the `products` table.

use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgConnection, PgExecutor, PgPool};
use product_core::product::product_id_of;
use product_core::types::{DbId, Document};

use crate::models::product::ProductRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, doc, created_at, updated_at";

/// Provides document operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Number of stored products.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await
    }

    /// List all products ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products ORDER BY id");
        sqlx::query_as::<_, ProductRow>(&query).fetch_all(pool).await
    }

    /// Find a product by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a product under the next free id (highest id plus one, or 1).
    ///
    /// Allocation and insert share one transaction that holds the writer
    /// lock, so concurrent creates queue up instead of colliding. The
    /// stored document's `id` field is forced to the allocated id.
    pub async fn create(pool: &PgPool, doc: &Document) -> Result<ProductRow, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_writers(&mut *tx).await?;

        let query = format!(
            "WITH next AS (SELECT COALESCE(MAX(id), 0) + 1 AS id FROM products)
             INSERT INTO products (id, doc)
             SELECT next.id, $1::jsonb || jsonb_build_object('id', next.id) FROM next
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(Json(doc))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Insert a document under a caller-chosen `id`.
    ///
    /// The stored document's `id` field is forced to `id`. Returns `None`
    /// when the id is already taken.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        doc: &Document,
    ) -> Result<Option<ProductRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (id, doc)
             VALUES ($1, $2::jsonb || jsonb_build_object('id', $1::bigint))
             ON CONFLICT (id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(Json(doc))
            .fetch_optional(executor)
            .await
    }

    /// Merge top-level fields of `patch` into the stored document.
    ///
    /// Fields absent from `patch` are kept. The `id` field cannot be
    /// changed. Returns `None` if no product has the given id.
    pub async fn merge_update(
        pool: &PgPool,
        id: DbId,
        patch: &Document,
    ) -> Result<Option<ProductRow>, sqlx::Error> {
        let query = format!(
            "UPDATE products
             SET doc = doc || $2::jsonb || jsonb_build_object('id', id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(Json(patch))
            .fetch_optional(pool)
            .await
    }

    /// Delete a product by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert `docs` if and only if the table is empty.
    ///
    /// Runs in one transaction holding a lock that excludes concurrent
    /// writers, so two instances starting together seed once. Documents
    /// without an integer `id` are skipped. Returns the number inserted.
    pub async fn seed_if_empty(pool: &PgPool, docs: &[Value]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        lock_writers(&mut *tx).await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.commit().await?;
            return Ok(0);
        }

        let mut inserted = 0;
        for doc in docs {
            let (Some(id), Some(fields)) = (product_id_of(doc), doc.as_object()) else {
                tracing::warn!(doc = %doc, "Skipping seed document without an integer id");
                continue;
            };
            if Self::insert(&mut *tx, id, fields).await?.is_some() {
                inserted += 1;
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

/// Take the table lock shared by every id-allocating writer.
///
/// SHARE ROW EXCLUSIVE conflicts with itself and with ordinary row writes,
/// so only one allocating transaction runs at a time while readers go on.
async fn lock_writers(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("LOCK TABLE products IN SHARE ROW EXCLUSIVE MODE")
        .execute(conn)
        .await?;
    Ok(())
}
