//! # Product Repository
//!
//! Database operations for products, including the deletion policy.
//!
//! ## Deletion Policy
//! ```text
//! delete(id)
//!   │
//!   ├─ product never referenced by a sale/quote line
//!   │    └─► hard DELETE  → ProductDeletion::Deleted
//!   │
//!   └─ referenced (FOREIGN KEY conflict)
//!        └─► archive instead: is_archived = 1, stock zeroed
//!            → ProductDeletion::Archived  (reported as success)
//!
//! The integrity conflict is never surfaced to the caller; historical
//! sale and quote snapshots stay intact either way.
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::money::{Money, Quantity};
use fiado_core::types::Product;
use fiado_core::validation::validate_name;

/// Fields for a new catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub cost: Money,
    pub price: Money,
    pub has_deferred_price: bool,
    pub deferred_price: Option<Money>,
}

/// Outcome of a product delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductDeletion {
    /// The product was unreferenced and has been removed entirely.
    Deleted,
    /// The product is referenced by sale/quote history and was archived
    /// (hidden from listings, stock zeroed) instead.
    Archived,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product. Name is unique across the catalog.
    pub async fn create(&self, new: NewProduct) -> DbResult<Product> {
        validate_name(&new.name)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            cost: new.cost,
            price: new.price,
            has_deferred_price: new.has_deferred_price,
            deferred_price: new.deferred_price,
            stock: Quantity::zero(),
            is_archived: false,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, cost, price,
                has_deferred_price, deferred_price,
                stock, is_archived, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.cost)
        .bind(product.price)
        .bind(product.has_deferred_price)
        .bind(product.deferred_price)
        .bind(product.stock)
        .bind(product.is_archived)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID (archived or not).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, cost, price,
                   has_deferred_price, deferred_price,
                   stock, is_archived, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active (non-archived) products ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, cost, price,
                   has_deferred_price, deferred_price,
                   stock, is_archived, created_at, updated_at
            FROM products
            WHERE is_archived = 0
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates a product's catalog data. Existing sale/quote snapshots are
    /// unaffected by design.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_name(&product.name)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                cost = ?3,
                price = ?4,
                has_deferred_price = ?5,
                deferred_price = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(product.name.trim())
        .bind(product.cost)
        .bind(product.price)
        .bind(product.has_deferred_price)
        .bind(product.deferred_price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Sets a product's stock level directly (inventory adjustment).
    pub async fn set_stock(&self, id: &str, stock: Quantity) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product, or archives it when sale/quote history still
    /// references it. Returns which path was taken; the referential
    /// conflict itself is never propagated.
    pub async fn delete(&self, id: &str) -> DbResult<ProductDeletion> {
        let attempt = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from);

        match attempt {
            Ok(result) => {
                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Product", id));
                }
                info!(id = %id, "Product deleted");
                Ok(ProductDeletion::Deleted)
            }
            Err(err) if err.is_foreign_key_violation() => {
                // Referenced by history: hide it and zero the stock so it
                // can't be sold by mistake.
                let result = sqlx::query(
                    r#"
                    UPDATE products SET is_archived = 1, stock = 0, updated_at = ?2
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Product", id));
                }

                info!(id = %id, "Product referenced by history, archived instead");
                Ok(ProductDeletion::Archived)
            }
            Err(err) => Err(err),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
