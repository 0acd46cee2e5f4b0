//! # Reporting Engine
//!
//! Read-only aggregation queries: the debtors report and the dashboard
//! summary. Everything here is computed inside SQLite; Rust only shapes
//! the rows.
//!
//! ## Debtors Report
//! ```text
//! per customer:
//!   current_debt     = Σ pending deferred installments
//!   historical_paid  = Σ recorded debt payments
//!
//! keep rows where current_debt > 1 cent, sort by current_debt DESC
//! ```
//!
//! The one-cent threshold filters rounding residue left behind by
//! partial settlements.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use fiado_core::money::{Money, Quantity};
use fiado_core::{DEBTORS_REPORT_THRESHOLD, TOP_PRODUCTS_LIMIT};

// =============================================================================
// Report Rows
// =============================================================================

/// One row of the debtors report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DebtorRow {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Sum of this customer's pending deferred installments.
    pub current_debt: Money,
    /// Sum of every debt payment this customer has ever made.
    pub historical_paid: Money,
}

/// One entry of the dashboard's best-sellers ranking.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub name: String,
    /// Total quantity ever sold, across all sales.
    pub total_quantity: Quantity,
}

/// The dashboard summary card.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Revenue from sales created today (UTC).
    pub today_sales: Money,
    /// Revenue from sales created this calendar month (UTC).
    pub month_sales: Money,
    /// Number of sales created this calendar month.
    pub month_count: i64,
    /// Total registered customers.
    pub customer_count: i64,
    /// Sum of all pending deferred installments, across every customer.
    pub total_receivable: Money,
    /// All-time best-selling products by quantity, at most five.
    pub top_products: Vec<TopProduct>,
}

// =============================================================================
// Engine
// =============================================================================

/// Read-only reporting engine.
#[derive(Debug, Clone)]
pub struct ReportingEngine {
    pool: SqlitePool,
}

impl ReportingEngine {
    /// Creates a new ReportingEngine.
    pub fn new(pool: SqlitePool) -> Self {
        ReportingEngine { pool }
    }

    /// Builds the debtors report: customers with outstanding debt above
    /// the one-cent threshold, heaviest debtor first.
    pub async fn debtors_report(&self) -> DbResult<Vec<DebtorRow>> {
        let rows = sqlx::query_as::<_, DebtorRow>(
            r#"
            SELECT * FROM (
                SELECT
                    c.id,
                    c.name,
                    c.phone,
                    c.address,
                    COALESCE((
                        SELECT SUM(i.amount)
                        FROM installments i
                        JOIN sales s ON s.id = i.sale_id
                        WHERE s.customer_id = c.id
                          AND i.method = 'deferred'
                          AND i.status = 'pending'
                    ), 0) AS current_debt,
                    COALESCE((
                        SELECT SUM(p.amount)
                        FROM debt_payments p
                        WHERE p.customer_id = c.id
                    ), 0) AS historical_paid
                FROM customers c
            )
            WHERE current_debt > ?1
            ORDER BY current_debt DESC
            "#,
        )
        .bind(DEBTORS_REPORT_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;

        debug!(debtors = rows.len(), "Debtors report built");

        Ok(rows)
    }

    /// Builds the dashboard summary. All date filtering is UTC, matching
    /// the `created_at` timestamps written at sale time.
    pub async fn dashboard_summary(&self) -> DbResult<DashboardSummary> {
        let today_sales: Money = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM sales
            WHERE date(created_at) = date('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let month_sales: Money = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM sales
            WHERE strftime('%Y-%m', created_at) = strftime('%Y-%m', 'now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let month_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE strftime('%Y-%m', created_at) = strftime('%Y-%m', 'now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let customer_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        let total_receivable: Money = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM installments
            WHERE method = 'deferred' AND status = 'pending'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT name, SUM(quantity) AS total_quantity
            FROM sale_items
            GROUP BY name
            ORDER BY total_quantity DESC
            LIMIT ?1
            "#,
        )
        .bind(TOP_PRODUCTS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardSummary {
            today_sales,
            month_sales,
            month_count,
            customer_count,
            total_receivable,
            top_products,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{backdate_sale, seed_customer, seed_product, test_db};
    use crate::Database;
    use fiado_core::types::{
        CreateSaleRequest, InstallmentRequest, LineItemRequest, PaymentMethod, SettlementMethod,
    };

    async fn deferred_sale(db: &Database, customer_id: &str, product_id: &str, cents: i64) {
        db.sale_engine()
            .create_sale(CreateSaleRequest {
                customer_id: customer_id.to_string(),
                salesperson: None,
                discount: Money::zero(),
                items: vec![LineItemRequest {
                    product_id: product_id.to_string(),
                    quantity: Quantity::from_units(1),
                    unit_price: None,
                    line_total: Some(Money::from_cents(cents)),
                }],
                installments: vec![InstallmentRequest {
                    method: PaymentMethod::Deferred,
                    amount: Money::from_cents(cents),
                }],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_debtors_report_sorted_desc_and_filtered() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Areia", 1000).await;

        let small = seed_customer(&db, "Ana").await;
        let big = seed_customer(&db, "Bruno").await;
        let clean = seed_customer(&db, "Clara").await;

        deferred_sale(&db, &small, &product_id, 3000).await;
        deferred_sale(&db, &big, &product_id, 20000).await;
        // Clara buys but pays in full, so she never shows up.
        db.sale_engine()
            .create_sale(CreateSaleRequest {
                customer_id: clean.clone(),
                salesperson: None,
                discount: Money::zero(),
                items: vec![LineItemRequest {
                    product_id: product_id.clone(),
                    quantity: Quantity::from_units(1),
                    unit_price: None,
                    line_total: None,
                }],
                installments: vec![InstallmentRequest {
                    method: PaymentMethod::Cash,
                    amount: Money::from_cents(1000),
                }],
            })
            .await
            .unwrap();

        let report = db.reporting().debtors_report().await.unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].name, "Bruno");
        assert_eq!(report[0].current_debt, Money::from_cents(20000));
        assert_eq!(report[1].name, "Ana");
        assert_eq!(report[1].current_debt, Money::from_cents(3000));
    }

    #[tokio::test]
    async fn test_debtors_report_tracks_historical_payments() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Areia", 1000).await;
        let customer_id = seed_customer(&db, "Ana").await;

        deferred_sale(&db, &customer_id, &product_id, 10000).await;

        db.settlement()
            .receive_payment(&customer_id, "40,00", SettlementMethod::Cash)
            .await
            .unwrap();

        let report = db.reporting().debtors_report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].current_debt, Money::from_cents(6000));
        assert_eq!(report[0].historical_paid, Money::from_cents(4000));
    }

    #[tokio::test]
    async fn test_fully_settled_customer_drops_off_report() {
        let db = test_db().await;
        let product_id = seed_product(&db, "Areia", 1000).await;
        let customer_id = seed_customer(&db, "Ana").await;

        deferred_sale(&db, &customer_id, &product_id, 5000).await;
        db.settlement()
            .receive_payment(&customer_id, "50,00", SettlementMethod::Pix)
            .await
            .unwrap();

        let report = db.reporting().debtors_report().await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_summary_counts_and_sums() {
        let db = test_db().await;
        let brick = seed_product(&db, "Tijolo", 100).await;
        let sand = seed_product(&db, "Areia", 5000).await;
        let customer_id = seed_customer(&db, "Ana").await;

        // 200 bricks (cash) and 1 sand (deferred), both created "now" so
        // they land in today and this month.
        db.sale_engine()
            .create_sale(CreateSaleRequest {
                customer_id: customer_id.clone(),
                salesperson: None,
                discount: Money::zero(),
                items: vec![LineItemRequest {
                    product_id: brick,
                    quantity: Quantity::from_units(200),
                    unit_price: None,
                    line_total: None,
                }],
                installments: vec![InstallmentRequest {
                    method: PaymentMethod::Cash,
                    amount: Money::from_cents(20000),
                }],
            })
            .await
            .unwrap();
        deferred_sale(&db, &customer_id, &sand, 5000).await;

        let summary = db.reporting().dashboard_summary().await.unwrap();
        assert_eq!(summary.today_sales, Money::from_cents(25000));
        assert_eq!(summary.month_sales, Money::from_cents(25000));
        assert_eq!(summary.month_count, 2);
        assert_eq!(summary.customer_count, 1);
        assert_eq!(summary.total_receivable, Money::from_cents(5000));

        // Ranked by quantity, not revenue: 200 bricks beat 1 sand.
        assert_eq!(summary.top_products.len(), 2);
        assert_eq!(summary.top_products[0].name, "Tijolo");
        assert_eq!(
            summary.top_products[0].total_quantity,
            Quantity::from_units(200)
        );
    }

    #[tokio::test]
    async fn test_dashboard_empty_database() {
        let db = test_db().await;
        let summary = db.reporting().dashboard_summary().await.unwrap();
        assert!(summary.today_sales.is_zero());
        assert!(summary.month_sales.is_zero());
        assert_eq!(summary.month_count, 0);
        assert_eq!(summary.customer_count, 0);
        assert!(summary.total_receivable.is_zero());
        assert!(summary.top_products.is_empty());
    }

    #[tokio::test]
    async fn test_top_products_ranking_is_all_time() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ana").await;
        let old_product = seed_product(&db, "Cal", 900).await;
        let new_product = seed_product(&db, "Gesso", 900).await;

        // A big sale from years back still dominates the ranking.
        let old_sale = db
            .sale_engine()
            .create_sale(CreateSaleRequest {
                customer_id: customer_id.clone(),
                salesperson: None,
                discount: Money::zero(),
                items: vec![LineItemRequest {
                    product_id: old_product,
                    quantity: Quantity::from_units(9),
                    unit_price: None,
                    line_total: None,
                }],
                installments: vec![],
            })
            .await
            .unwrap();
        backdate_sale(&db, &old_sale.id, "2020-06-15T12:00:00+00:00").await;

        db.sale_engine()
            .create_sale(CreateSaleRequest {
                customer_id,
                salesperson: None,
                discount: Money::zero(),
                items: vec![LineItemRequest {
                    product_id: new_product,
                    quantity: Quantity::from_units(2),
                    unit_price: None,
                    line_total: None,
                }],
                installments: vec![],
            })
            .await
            .unwrap();

        let summary = db.reporting().dashboard_summary().await.unwrap();
        assert_eq!(summary.top_products.len(), 2);
        assert_eq!(summary.top_products[0].name, "Cal");
        assert_eq!(
            summary.top_products[0].total_quantity,
            Quantity::from_units(9)
        );

        // The day/month revenue windows still exclude it.
        assert_eq!(summary.today_sales, Money::from_cents(1800));
        assert_eq!(summary.month_sales, Money::from_cents(1800));
    }

    #[tokio::test]
    async fn test_top_products_limited_to_five() {
        let db = test_db().await;
        let customer_id = seed_customer(&db, "Ana").await;

        for n in 0..7i64 {
            let product_id = seed_product(&db, &format!("Produto {n}"), 100).await;
            db.sale_engine()
                .create_sale(CreateSaleRequest {
                    customer_id: customer_id.clone(),
                    salesperson: None,
                    discount: Money::zero(),
                    items: vec![LineItemRequest {
                        product_id,
                        quantity: Quantity::from_units(n + 1),
                        unit_price: None,
                        line_total: None,
                    }],
                    installments: vec![],
                })
                .await
                .unwrap();
        }

        let summary = db.reporting().dashboard_summary().await.unwrap();
        assert_eq!(summary.top_products.len(), 5);
        assert_eq!(summary.top_products[0].name, "Produto 6");
    }
}
