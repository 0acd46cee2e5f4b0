//! # fiado-db: Database Layer for Fiado POS
//!
//! This crate provides SQLite persistence for the Fiado POS system plus
//! the transactional engines that implement the accounts-receivable core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Fiado POS Data Flow                           │
//! │                                                                     │
//! │  External HTTP layer (receive_payment, create_sale, reports, ...)   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                    fiado-db (THIS CRATE)                      │  │
//! │  │                                                               │  │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌───────────────────┐  │  │
//! │  │   │  Database  │   │ Repositories │   │      Engines      │  │  │
//! │  │   │ (pool.rs)  │   │  customer    │   │  settlement FIFO  │  │  │
//! │  │   │            │◄──│  product     │◄──│  sale mutation    │  │  │
//! │  │   │ SqlitePool │   │  sale/quote  │   │  reporting        │  │  │
//! │  │   └────────────┘   └──────────────┘   └───────────────────┘  │  │
//! │  │                                                               │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL, foreign keys ON, embedded migrations)        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-entity queries (customer, product, sale, quote,
//!   debt payment)
//! - [`engine`] - Multi-entity transactional operations: FIFO debt
//!   settlement, sale mutation, reporting aggregation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/fiado.db")).await?;
//!
//! let outcome = db
//!     .settlement()
//!     .receive_payment(&customer_id, "120,00", SettlementMethod::Cash)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

pub use engine::reporting::{DashboardSummary, DebtorRow, ReportingEngine, TopProduct};
pub use engine::sale::SaleEngine;
pub use engine::settlement::{Abatement, AbatementKind, SettlementEngine, SettlementOutcome};
pub use repository::customer::CustomerRepository;
pub use repository::debt_payment::DebtPaymentRepository;
pub use repository::product::{NewProduct, ProductDeletion, ProductRepository};
pub use repository::quote::QuoteRepository;
pub use repository::sale::SaleRepository;

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared helpers for engine and repository tests. Everything runs
    //! against an isolated in-memory database with real migrations.

    use fiado_core::money::Money;

    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;

    pub async fn test_db() -> Database {
        // Surfaces engine tracing in failing tests; first caller wins,
        // later calls are no-ops.
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();

        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn seed_customer(db: &Database, name: &str) -> String {
        db.customers()
            .create(name, None, None)
            .await
            .unwrap()
            .id
    }

    pub async fn seed_product(db: &Database, name: &str, price_cents: i64) -> String {
        db.products()
            .create(NewProduct {
                name: name.to_string(),
                cost: Money::from_cents(price_cents / 2),
                price: Money::from_cents(price_cents),
                has_deferred_price: false,
                deferred_price: None,
            })
            .await
            .unwrap()
            .id
    }

    /// Rewrites a sale's creation timestamp so FIFO ordering tests can
    /// construct sales with known relative ages.
    pub async fn backdate_sale(db: &Database, sale_id: &str, rfc3339: &str) {
        sqlx::query("UPDATE sales SET created_at = ?1 WHERE id = ?2")
            .bind(rfc3339)
            .bind(sale_id)
            .execute(db.pool())
            .await
            .unwrap();
    }
}
