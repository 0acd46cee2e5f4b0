//! # Debt Settlement Engine
//!
//! Applies an incoming payment against a customer's oldest outstanding
//! installments first (FIFO), fully or partially extinguishing each, and
//! reports per-installment outcomes plus any leftover credit.
//!
//! ## Allocation Walk
//! ```text
//! payment R$120 against installments ordered by owning sale's date:
//!
//!   Sale A (oldest)  deferred PENDING R$100
//!   Sale B           deferred PENDING R$50
//!   Sale C (newest)  deferred PENDING R$80
//!
//!   unallocated = 120
//!   ├─ A: 120 ≥ 100 → A marked PAID, unallocated = 20
//!   ├─ B: 20 < 50   → B reduced to 30, stays PENDING, unallocated = 0
//!   └─ C: untouched
//!
//!   outcomes  = [A fully settled (100), B partially settled (20)]
//!   remaining = 0
//! ```
//!
//! The payment record itself is inserted unconditionally once validation
//! passes - a customer with no debt still gets a receipt, and the whole
//! amount comes back as `remaining_credit`. The system does not
//! auto-apply that credit anywhere; it is a signal to the caller.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::money::Money;
use fiado_core::types::{DebtPayment, PaymentInstallment, SettlementMethod};
use fiado_core::validation::parse_payment_amount;

// =============================================================================
// Outcomes
// =============================================================================

/// How one installment was affected by a settlement walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbatementKind {
    /// The installment was extinguished and marked PAID.
    FullySettled,
    /// The installment's amount was reduced in place; it stays PENDING.
    PartiallySettled,
}

/// One per-installment outcome of a settlement walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Abatement {
    /// The sale whose debt was touched.
    pub sale_id: String,
    /// How much of the payment went to this installment.
    pub amount: Money,
    pub kind: AbatementKind,
}

impl std::fmt::Display for Abatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            AbatementKind::FullySettled => {
                write!(f, "Sale {} fully settled ({})", self.sale_id, self.amount)
            }
            AbatementKind::PartiallySettled => {
                write!(f, "Sale {} partially settled ({})", self.sale_id, self.amount)
            }
        }
    }
}

/// Result of `receive_payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// ID of the immutable payment record that was created.
    pub payment_id: String,
    /// Ordered per-installment outcomes, oldest sale first.
    pub abatements: Vec<Abatement>,
    /// Whatever was left after all debt was extinguished. Overpayment
    /// signal for the caller; never auto-applied.
    pub remaining_credit: Money,
}

// =============================================================================
// Engine
// =============================================================================

/// The debt settlement engine.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    pool: SqlitePool,
}

impl SettlementEngine {
    /// Creates a new SettlementEngine.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementEngine { pool }
    }

    /// Receives a payment from a customer and settles their oldest
    /// outstanding debt first.
    ///
    /// ## Preconditions (checked before any mutation)
    /// - `raw_amount` parses as a positive decimal ("120,50" or "120.50")
    /// - the customer exists
    ///
    /// ## Atomicity
    /// The payment record and every installment mutation commit together
    /// or not at all.
    pub async fn receive_payment(
        &self,
        customer_id: &str,
        raw_amount: &str,
        method: SettlementMethod,
    ) -> DbResult<SettlementOutcome> {
        let amount = parse_payment_amount(raw_amount)?;

        debug!(customer_id = %customer_id, amount = %amount, "Receiving debt payment");

        let mut tx = self.pool.begin().await?;

        let customer_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM customers WHERE id = ?1")
                .bind(customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        if customer_exists.is_none() {
            return Err(DbError::not_found("Customer", customer_id));
        }

        // 1. Record the payment. Unconditional: a receipt exists even if
        //    there is no debt to settle.
        let payment = DebtPayment {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            amount,
            method,
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO debt_payments (id, customer_id, amount, method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.customer_id)
        .bind(payment.amount)
        .bind(payment.method)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        // 2. Outstanding debt, oldest sale first. Position breaks ties
        //    between installments of the same sale.
        let debts = sqlx::query_as::<_, PaymentInstallment>(
            r#"
            SELECT i.id, i.sale_id, i.method, i.amount, i.status, i.position
            FROM installments i
            JOIN sales s ON s.id = i.sale_id
            WHERE s.customer_id = ?1
              AND i.method = 'deferred'
              AND i.status = 'pending'
            ORDER BY s.created_at ASC, i.position ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        // 3. Allocation walk.
        let mut unallocated = amount;
        let mut abatements = Vec::new();

        for installment in &debts {
            if unallocated.is_zero() {
                break;
            }

            if unallocated >= installment.amount {
                sqlx::query("UPDATE installments SET status = 'paid' WHERE id = ?1")
                    .bind(&installment.id)
                    .execute(&mut *tx)
                    .await?;

                unallocated -= installment.amount;
                abatements.push(Abatement {
                    sale_id: installment.sale_id.clone(),
                    amount: installment.amount,
                    kind: AbatementKind::FullySettled,
                });
            } else {
                let reduced = installment.amount - unallocated;
                sqlx::query("UPDATE installments SET amount = ?2 WHERE id = ?1")
                    .bind(&installment.id)
                    .bind(reduced)
                    .execute(&mut *tx)
                    .await?;

                abatements.push(Abatement {
                    sale_id: installment.sale_id.clone(),
                    amount: unallocated,
                    kind: AbatementKind::PartiallySettled,
                });
                unallocated = Money::zero();
            }
        }

        tx.commit().await?;

        info!(
            customer_id = %customer_id,
            payment_id = %payment.id,
            amount = %amount,
            settled = abatements.len(),
            remaining_credit = %unallocated,
            "Payment received and debt settled"
        );

        Ok(SettlementOutcome {
            payment_id: payment.id,
            abatements,
            remaining_credit: unallocated,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
