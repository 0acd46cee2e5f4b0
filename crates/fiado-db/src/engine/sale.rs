//! # Sale Engine
//!
//! Transactional sale lifecycle: creation with line-item snapshots and
//! payment installments, full cancellation, and single-item removal.
//!
//! ## Creation
//! ```text
//! CreateSaleRequest
//!   │
//!   ├─ validate discount and quantities
//!   ├─ BEGIN
//!   ├─ resolve each line against the catalog (AnyProvided policy:
//!   │  an explicit override wins even when it is zero)
//!   ├─ decrement product stock per line
//!   ├─ INSERT sale, items, installments
//!   │    deferred installments start PENDING, everything else PAID
//!   └─ COMMIT
//! ```
//!
//! ## Cancellation vs. item removal
//! Cancellation restores every item's stock, marks installments
//! CANCELLED, and deletes the sale row (items and installments go with
//! it via cascade). Item removal restores one item's stock, shrinks the
//! sale's subtotal and total, and absorbs the difference into the
//! pending non-cash installments in listing order.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::money::Money;
use fiado_core::pricing::{resolve_line, OverridePolicy};
use fiado_core::types::{
    CreateSaleRequest, InstallmentStatus, PaymentInstallment, PaymentMethod, Product, Sale,
    SaleItem,
};
use fiado_core::validation::{validate_discount, validate_quantity};

/// The transactional sale engine.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    pool: SqlitePool,
}

impl SaleEngine {
    /// Creates a new SaleEngine.
    pub fn new(pool: SqlitePool) -> Self {
        SaleEngine { pool }
    }

    /// Creates a sale with its line items and payment installments in one
    /// transaction.
    ///
    /// Each line snapshots the product's name, resolved unit price and
    /// cost at the moment of sale; later catalog edits do not rewrite
    /// history. Stock is decremented per line and may go negative (the
    /// counter sells what is physically on the floor, the number catches
    /// up at the next stock count).
    pub async fn create_sale(&self, request: CreateSaleRequest) -> DbResult<Sale> {
        validate_discount(request.discount)?;
        if request.items.is_empty() {
            return Err(DbError::Validation(
                fiado_core::error::ValidationError::Required {
                    field: "items".to_string(),
                },
            ));
        }
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

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut subtotal = Money::zero();
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
                OverridePolicy::AnyProvided,
            );
            subtotal += resolved.line_total;

            sqlx::query(
                "UPDATE products SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(&product.id)
            .bind(item_request.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            items.push(SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id,
                name: product.name,
                quantity: item_request.quantity,
                unit_price: resolved.unit_price,
                line_total: resolved.line_total,
                cost: product.cost,
                position: position as i64,
            });
        }

        let sale = Sale {
            id: sale_id,
            customer_id: request.customer_id,
            salesperson: request.salesperson,
            subtotal,
            discount: request.discount,
            total: subtotal - request.discount,
            created_at: now,
        };

        debug!(id = %sale.id, total = %sale.total, "Creating sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, customer_id, salesperson, subtotal, discount, total, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(&sale.salesperson)
        .bind(sale.subtotal)
        .bind(sale.discount)
        .bind(sale.total)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, name,
                    quantity, unit_price, line_total, cost, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
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

        for (position, installment) in request.installments.iter().enumerate() {
            let status = if installment.method.is_deferred() {
                InstallmentStatus::Pending
            } else {
                InstallmentStatus::Paid
            };

            sqlx::query(
                r#"
                INSERT INTO installments (id, sale_id, method, amount, status, position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(installment.method)
            .bind(installment.amount)
            .bind(status)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %sale.id,
            items = items.len(),
            total = %sale.total,
            "Sale created"
        );

        Ok(sale)
    }

    /// Cancels a sale: restores every item's stock, marks all
    /// installments CANCELLED, and deletes the sale.
    ///
    /// The installments are deleted by the sale's cascade; the CANCELLED
    /// mark exists so any concurrent reader of the same transaction never
    /// observes them as live debt. A sale that was already cancelled is
    /// gone, so a second attempt is a NotFound.
    pub async fn cancel_sale(&self, sale_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let sale_exists: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&mut *tx)
            .await?;
        if sale_exists.is_none() {
            return Err(DbError::not_found("Sale", sale_id));
        }

        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name, quantity, unit_price, line_total, cost, position
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();
        for item in &items {
            sqlx::query(
                "UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE installments SET status = 'cancelled' WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(id = %sale_id, restocked_items = items.len(), "Sale cancelled");

        Ok(())
    }

    /// Removes one line item from a sale.
    ///
    /// Restores the item's stock, deletes the item, shrinks the sale's
    /// subtotal and total by the item's line total, and absorbs the same
    /// amount into the PENDING non-cash installments in listing order:
    /// an installment larger than the remaining difference is reduced in
    /// place, a smaller-or-equal one is deleted and the walk continues.
    pub async fn remove_line_item(&self, sale_id: &str, item_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, name, quantity, unit_price, line_total, cost, position
            FROM sale_items
            WHERE id = ?1 AND sale_id = ?2
            "#,
        )
        .bind(item_id)
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::ItemNotFound {
            sale_id: sale_id.to_string(),
            item_id: item_id.to_string(),
        })?;

        sqlx::query("UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM sale_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE sales
            SET subtotal = subtotal - ?2,
                total = total - ?2
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .bind(item.line_total)
        .execute(&mut *tx)
        .await?;

        // Absorb the removed value into the adjustable installments. Cash
        // was handed over at the counter and is not clawed back here.
        let adjustable = sqlx::query_as::<_, PaymentInstallment>(
            r#"
            SELECT id, sale_id, method, amount, status, position
            FROM installments
            WHERE sale_id = ?1
              AND status = 'pending'
              AND method != ?2
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .bind(PaymentMethod::Cash)
        .fetch_all(&mut *tx)
        .await?;

        let mut remaining = item.line_total;
        for installment in &adjustable {
            if remaining.is_zero() {
                break;
            }

            if installment.amount > remaining {
                let reduced = installment.amount - remaining;
                sqlx::query("UPDATE installments SET amount = ?2 WHERE id = ?1")
                    .bind(&installment.id)
                    .bind(reduced)
                    .execute(&mut *tx)
                    .await?;
                remaining = Money::zero();
            } else {
                remaining -= installment.amount;
                sqlx::query("DELETE FROM installments WHERE id = ?1")
                    .bind(&installment.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            item_id = %item_id,
            removed = %item.line_total,
            "Line item removed"
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
