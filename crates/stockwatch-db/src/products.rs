//! Database operations for `products` and `inventory_updates`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use stockwatch_core::{Category, InventoryUpdate, Product, ProductStatus};

use crate::store::{PgStore, ProductStore, WriteBatch, WriteOp};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table. `synced_at` is bookkeeping only and is not
/// selected.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub sku: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub inventory: i64,
    pub category: String,
    pub image_url: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category: Category = row.category.parse().map_err(|_| DbError::InvalidRow {
            table: "products",
            column: "category",
            value: row.category.clone(),
        })?;
        let status = ProductStatus::parse(&row.status).ok_or_else(|| DbError::InvalidRow {
            table: "products",
            column: "status",
            value: row.status.clone(),
        })?;

        Ok(Product {
            id: row.id,
            title: row.title,
            sku: row.sku,
            price: row.price,
            compare_at_price: row.compare_at_price,
            inventory: row.inventory,
            category,
            image_url: row.image_url,
            vendor: row.vendor,
            product_type: row.product_type,
            tags: row.tags,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `inventory_updates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryUpdateRow {
    pub id: i64,
    pub product_id: String,
    pub sku: String,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub recorded_at: DateTime<Utc>,
}

impl From<InventoryUpdateRow> for InventoryUpdate {
    fn from(row: InventoryUpdateRow) -> Self {
        InventoryUpdate {
            product_id: row.product_id,
            sku: row.sku,
            previous_quantity: row.previous_quantity,
            new_quantity: row.new_quantity,
            timestamp: row.recorded_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, title, sku, price, compare_at_price, inventory, category, \
     image_url, vendor, product_type, tags, status, created_at, updated_at";

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, DbError> {
    rows.into_iter().map(Product::try_from).collect()
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

async fn upsert_product(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product: &Product,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO products \
             (id, title, sku, price, compare_at_price, inventory, category, \
              image_url, vendor, product_type, tags, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (id) DO UPDATE SET \
             title            = EXCLUDED.title, \
             sku              = EXCLUDED.sku, \
             price            = EXCLUDED.price, \
             compare_at_price = EXCLUDED.compare_at_price, \
             inventory        = EXCLUDED.inventory, \
             category         = EXCLUDED.category, \
             image_url        = EXCLUDED.image_url, \
             vendor           = EXCLUDED.vendor, \
             product_type     = EXCLUDED.product_type, \
             tags             = EXCLUDED.tags, \
             status           = EXCLUDED.status, \
             created_at       = EXCLUDED.created_at, \
             updated_at       = EXCLUDED.updated_at, \
             synced_at        = NOW()",
    )
    .bind(&product.id)
    .bind(&product.title)
    .bind(&product.sku)
    .bind(product.price)
    .bind(product.compare_at_price)
    .bind(product.inventory)
    .bind(product.category.as_str())
    .bind(product.image_url.as_deref())
    .bind(product.vendor.as_deref())
    .bind(product.product_type.as_deref())
    .bind(product.tags.as_deref())
    .bind(product.status.as_str())
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn append_inventory_update(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    update: &InventoryUpdate,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO inventory_updates \
             (product_id, sku, previous_quantity, new_quantity, recorded_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&update.product_id)
    .bind(&update.sku)
    .bind(update.previous_quantity)
    .bind(update.new_quantity)
    .bind(update.timestamp)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// ProductStore
// ---------------------------------------------------------------------------

impl ProductStore for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(self.pool()).await
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, DbError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn commit_batch(&self, batch: &WriteBatch) -> Result<(), DbError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool().begin().await?;
        for op in batch.ops() {
            match op {
                WriteOp::UpsertProduct(product) => upsert_product(&mut tx, product).await?,
                WriteOp::AppendInventoryUpdate(update) => {
                    append_inventory_update(&mut tx, update).await?;
                }
            }
        }
        tx.commit().await?;

        tracing::debug!(operations = batch.len(), "committed write batch");
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY title, id"
        ))
        .fetch_all(self.pool())
        .await?;

        into_products(rows)
    }

    async fn list_products_by_category(&self, category: Category) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY title, id"
        ))
        .bind(category.as_str())
        .fetch_all(self.pool())
        .await?;

        into_products(rows)
    }

    async fn list_low_stock_products(&self, threshold: i64) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE inventory > 0 AND inventory < $1 \
             ORDER BY inventory ASC, id"
        ))
        .bind(threshold)
        .fetch_all(self.pool())
        .await?;

        into_products(rows)
    }

    async fn list_out_of_stock_products(&self) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE inventory = 0 ORDER BY title, id"
        ))
        .fetch_all(self.pool())
        .await?;

        into_products(rows)
    }

    async fn list_recent_inventory_updates(
        &self,
        limit: i64,
    ) -> Result<Vec<InventoryUpdate>, DbError> {
        let rows = sqlx::query_as::<_, InventoryUpdateRow>(
            "SELECT id, product_id, sku, previous_quantity, new_quantity, recorded_at \
             FROM inventory_updates \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(InventoryUpdate::from).collect())
    }
}
