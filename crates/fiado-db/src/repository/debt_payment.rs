//! # Debt Payment Repository
//!
//! Read-side queries for the immutable debt-payment history.
//!
//! Inserts happen only inside the settlement engine's transaction
//! ([`crate::engine::settlement`]); history records are never updated or
//! deleted.

use sqlx::SqlitePool;

use crate::error::DbResult;
use fiado_core::types::DebtPayment;

/// Repository for debt payment history queries.
#[derive(Debug, Clone)]
pub struct DebtPaymentRepository {
    pool: SqlitePool,
}

impl DebtPaymentRepository {
    /// Creates a new DebtPaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DebtPaymentRepository { pool }
    }

    /// Lists all received payments, newest first.
    pub async fn list(&self) -> DbResult<Vec<DebtPayment>> {
        let payments = sqlx::query_as::<_, DebtPayment>(
            r#"
            SELECT id, customer_id, amount, method, created_at
            FROM debt_payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists a customer's received payments, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<DebtPayment>> {
        let payments = sqlx::query_as::<_, DebtPayment>(
            r#"
            SELECT id, customer_id, amount, method, created_at
            FROM debt_payments
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Gets a single payment record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DebtPayment>> {
        let payment = sqlx::query_as::<_, DebtPayment>(
            r#"
            SELECT id, customer_id, amount, method, created_at
            FROM debt_payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }
}
