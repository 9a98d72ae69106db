//! Product persistence: the gateway between the diff engine and Postgres.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use stocksync_engine::{NewProduct, ProductChange, ProductRecord};

/// A product row from the database.
#[derive(Debug)]
pub struct ProductRow {
    pub id: i32,
    pub title: String,
    pub handle: String,
    #[allow(dead_code)]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            handle: row.try_get("handle")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ProductRow {
    /// Convert a database row to the engine's record contract.
    pub fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: self.id,
            title: self.title.clone(),
            handle: self.handle.clone(),
        }
    }
}

/// Batched persistence operations the sync engine depends on.
///
/// The trait seam keeps the reconciliation logic testable without a
/// database.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetch every product row.
    async fn get_all(&self) -> Result<Vec<ProductRecord>, sqlx::Error>;

    /// Insert new products in a single transaction. A row whose handle
    /// already exists is skipped, not an error.
    async fn create_batch(&self, products: &[NewProduct]) -> Result<(), sqlx::Error>;

    /// Update existing products by primary key in a single transaction.
    async fn update_batch(&self, changes: &[ProductChange]) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ProductStore for PgPool {
    async fn get_all(&self) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, title, COALESCE(handle, '') AS handle, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(self)
        .await?;

        Ok(rows.iter().map(ProductRow::to_record).collect())
    }

    async fn create_batch(&self, products: &[NewProduct]) -> Result<(), sqlx::Error> {
        if products.is_empty() {
            return Ok(());
        }

        let mut tx = self.begin().await?;

        for product in products {
            sqlx::query(
                r#"
                INSERT INTO products (title, handle)
                VALUES ($1, $2)
                ON CONFLICT (handle) DO NOTHING
                "#,
            )
            .bind(&product.title)
            .bind(&product.handle)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    async fn update_batch(&self, changes: &[ProductChange]) -> Result<(), sqlx::Error> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut tx = self.begin().await?;

        for change in changes {
            sqlx::query(
                r#"
                UPDATE products
                SET title = $1, handle = $2, updated_at = now()
                WHERE id = $3
                "#,
            )
            .bind(&change.title)
            .bind(&change.handle)
            .bind(change.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}
