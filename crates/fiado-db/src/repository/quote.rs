//! # Quote Repository
//!
//! Database operations for quotes and their line items.
//!
//! Quotes share the line-item snapshot shape with sales but carry no
//! payment or debt semantics. Note the pricing difference: quote creation
//! only honors strictly positive overrides (`OverridePolicy::PositiveOnly`),
//! where sale creation honors any supplied override.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::money::Money;
use fiado_core::pricing::{resolve_line, OverridePolicy};
use fiado_core::types::{CreateQuoteRequest, Product, Quote, QuoteItem, QuoteStatus};
use fiado_core::validation::validate_quantity;

/// Repository for quote database operations.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    /// Creates a quote with its line items in one transaction.
    ///
    /// Pricing uses the PositiveOnly override policy: a zero or missing
    /// override falls back to the catalog price.
    pub async fn create(&self, request: CreateQuoteRequest) -> DbResult<Quote> {
        for item in &request.items {
            validate_quantity(item.quantity)?;
        }

        let mut tx = self.pool.begin().await?;

        let customer_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
                .bind(&request.customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if customer_exists.is_none() {
            return Err(DbError::not_found("Customer", &request.customer_id));
        }

        let quote_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut total = Money::zero();
        let mut items = Vec::with_capacity(request.items.len());

        for (position, item_request) in request.items.iter().enumerate() {
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, cost, price,
                       has_deferred_price, deferred_price,
                       stock, is_archived, created_at, updated_at
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(&item_request.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &item_request.product_id))?;

            let resolved = resolve_line(
                product.price,
                item_request.quantity,
                item_request.unit_price,
                item_request.line_total,
                OverridePolicy::PositiveOnly,
            );
            total += resolved.line_total;

            items.push(QuoteItem {
                id: Uuid::new_v4().to_string(),
                quote_id: quote_id.clone(),
                product_id: product.id,
                name: product.name,
                quantity: item_request.quantity,
                unit_price: resolved.unit_price,
                line_total: resolved.line_total,
                cost: product.cost,
                position: position as i64,
            });
        }

        let quote = Quote {
            id: quote_id,
            customer_id: request.customer_id,
            salesperson: request.salesperson,
            total,
            status: QuoteStatus::Pending,
            created_at: now,
        };

        debug!(id = %quote.id, total = %quote.total, "Creating quote");

        sqlx::query(
            r#"
            INSERT INTO quotes (id, customer_id, salesperson, total, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&quote.id)
        .bind(&quote.customer_id)
        .bind(&quote.salesperson)
        .bind(quote.total)
        .bind(quote.status)
        .bind(quote.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO quote_items (
                    id, quote_id, product_id, name,
                    quantity, unit_price, line_total, cost, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.quote_id)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.line_total)
            .bind(item.cost)
            .bind(item.position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(id = %quote.id, items = items.len(), total = %quote.total, "Quote created");

        Ok(quote)
    }

    /// Gets a quote by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, customer_id, salesperson, total, status, created_at
            FROM quotes
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    /// Lists all quotes, newest first.
    pub async fn list(&self) -> DbResult<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, customer_id, salesperson, total, status, created_at
            FROM quotes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// Gets all line items for a quote, in listing order.
    pub async fn items(&self, quote_id: &str) -> DbResult<Vec<QuoteItem>> {
        let items = sqlx::query_as::<_, QuoteItem>(
            r#"
            SELECT id, quote_id, product_id, name, quantity, unit_price, line_total, cost, position
            FROM quote_items
            WHERE quote_id = ?1
            ORDER BY position
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates a quote's status.
    pub async fn set_status(&self, id: &str, status: QuoteStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE quotes SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quote", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_customer, seed_product, test_db};
    use fiado_core::money::Quantity;
    use fiado_core::types::LineItemRequest;

    #[tokio::test]
    async fn test_create_quote_with_catalog_pricing() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Maria").await;
        let product_id = seed_product(&db, "Telha", 2500).await;

        let quote = db
            .quotes()
            .create(CreateQuoteRequest {
                customer_id,
                salesperson: Some("Carlos".to_string()),
                items: vec![LineItemRequest {
                    product_id,
                    quantity: Quantity::from_units(4),
                    unit_price: None,
                    line_total: None,
                }],
            })
            .await
            .unwrap();

        assert_eq!(quote.total, Money::from_cents(10000));
        assert_eq!(quote.status, QuoteStatus::Pending);

        let items = db.quotes().items(&quote.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Telha");
        assert_eq!(items[0].unit_price, Money::from_cents(2500));
    }

    #[tokio::test]
    async fn test_quote_ignores_zero_price_override() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Maria").await;
        let product_id = seed_product(&db, "Telha", 2500).await;

        let quote = db
            .quotes()
            .create(CreateQuoteRequest {
                customer_id,
                salesperson: None,
                items: vec![LineItemRequest {
                    product_id,
                    quantity: Quantity::from_units(2),
                    unit_price: Some(Money::zero()), // not honored on quotes
                    line_total: None,
                }],
            })
            .await
            .unwrap();

        assert_eq!(quote.total, Money::from_cents(5000));
    }

    #[tokio::test]
    async fn test_quote_requires_existing_customer() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Telha", 2500).await;

        let err = db
            .quotes()
            .create(CreateQuoteRequest {
                customer_id: "missing".to_string(),
                salesperson: None,
                items: vec![LineItemRequest {
                    product_id,
                    quantity: Quantity::from_units(1),
                    unit_price: None,
                    line_total: None,
                }],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_status() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Maria").await;
        let product_id = seed_product(&db, "Telha", 2500).await;

        let quote = db
            .quotes()
            .create(CreateQuoteRequest {
                customer_id,
                salesperson: None,
                items: vec![LineItemRequest {
                    product_id,
                    quantity: Quantity::from_units(1),
                    unit_price: None,
                    line_total: None,
                }],
            })
            .await
            .unwrap();

        db.quotes()
            .set_status(&quote.id, QuoteStatus::Accepted)
            .await
            .unwrap();

        let fetched = db.quotes().get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, QuoteStatus::Accepted);
    }
}
