//! # Domain Types
//!
//! Core domain types used throughout Fiado POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌──────────────┐    ┌──────────────┐    ┌────────────────────┐    │
//! │  │   Customer   │───►│     Sale     │───►│ PaymentInstallment │    │
//! │  │  unique name │    │ subtotal     │    │ method / amount /  │    │
//! │  │  phone, addr │    │ discount     │    │ status             │    │
//! │  └──────┬───────┘    │ total        │    └────────────────────┘    │
//! │         │            └──────┬───────┘                              │
//! │         │                   └────────►┌──────────┐                 │
//! │         ├───►┌───────┐                │ SaleItem │◄── snapshot of  │
//! │         │    │ Quote │───►QuoteItem   │          │    Product      │
//! │         │    └───────┘                └──────────┘                 │
//! │         │                                                          │
//! │         └───►DebtPayment  (immutable receipt history)              │
//! │                                                                    │
//! │  Balance invariant: a customer's outstanding balance is ALWAYS     │
//! │  derived as Σ PENDING deferred installment amounts - never stored. │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Quantity};

// =============================================================================
// Payment Method
// =============================================================================

/// How an installment of a sale is paid.
///
/// Only `Deferred` installments represent real debt; every other method is
/// settled the moment the sale is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Instant bank transfer (Pix).
    Pix,
    /// On credit ("fiado") - creates a PENDING installment.
    Deferred,
}

impl PaymentMethod {
    /// True for the only method that creates debt.
    #[inline]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, PaymentMethod::Deferred)
    }
}

// =============================================================================
// Settlement Method
// =============================================================================

/// How a debt payment is received.
///
/// Deliberately a separate enum without a `Deferred` variant: settling
/// debt by creating more debt is disallowed, and the type system is the
/// cheapest place to enforce that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SettlementMethod {
    Cash,
    Card,
    Pix,
}

impl Default for SettlementMethod {
    fn default() -> Self {
        SettlementMethod::Cash
    }
}

// =============================================================================
// Installment Status
// =============================================================================

/// Lifecycle of a payment installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Settled - either created settled (cash/card/pix) or extinguished
    /// by a received payment.
    Paid,
    /// Outstanding debt. Only deferred installments are ever pending.
    Pending,
    /// Voided by sale cancellation.
    Cancelled,
}

// =============================================================================
// Quote Status
// =============================================================================

/// Lifecycle of a quote. Quotes never generate debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Pending
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer of the store.
///
/// The outstanding balance is NOT a field here; it is derived at query
/// time from pending deferred installments (see `fiado-db`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name - unique across the store.
    pub name: String,

    pub phone: Option<String>,
    pub address: Option<String>,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name - unique across the catalog.
    pub name: String,

    /// Purchase cost in cents (for margin calculations).
    pub cost: Money,

    /// Standard sale price in cents.
    pub price: Money,

    /// Whether this product has a separate price for deferred sales.
    pub has_deferred_price: bool,

    /// Alternate price for deferred-payment sales, when flagged.
    pub deferred_price: Option<Money>,

    /// Current stock level in milli-units. Single canonical field; there
    /// is no alternate stock column.
    pub stock: Quantity,

    /// Soft-delete flag. Archived products are hidden from active
    /// listings but kept for referential history.
    pub is_archived: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price charged on deferred sales: the alternate deferred price
    /// when configured, the standard price otherwise.
    pub fn effective_deferred_price(&self) -> Money {
        if self.has_deferred_price {
            self.deferred_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale.
///
/// Immutable once created except through the sale mutation engine
/// (remove item, cancel).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    /// Optional salesperson reference.
    pub salesperson: Option<String>,
    pub subtotal: Money,
    pub discount: Money,
    /// Always `subtotal - discount`.
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// Uses the snapshot pattern: product name, cost and unit price are frozen
/// at sale time so later product edits never rewrite sale history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Quantity sold in milli-units (fractional allowed).
    pub quantity: Quantity,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price: Money,
    /// Line total in cents.
    pub line_total: Money,
    /// Purchase cost in cents at time of sale (frozen).
    pub cost: Money,
    /// Listing order within the sale.
    pub position: i64,
}

// =============================================================================
// Payment Installment
// =============================================================================

/// One portion of a sale's payment, possibly deferred debt.
///
/// Invariant: the sum of a sale's PENDING deferred installment amounts is
/// that sale's current contribution to the customer's balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentInstallment {
    pub id: String,
    pub sale_id: String,
    pub method: PaymentMethod,
    /// Remaining amount in cents. Partial settlements reduce this in
    /// place while the status stays Pending.
    pub amount: Money,
    pub status: InstallmentStatus,
    /// Listing order within the sale.
    pub position: i64,
}

impl PaymentInstallment {
    /// True while this installment still counts toward the customer's
    /// outstanding balance.
    #[inline]
    pub fn is_outstanding_debt(&self) -> bool {
        self.method.is_deferred() && self.status == InstallmentStatus::Pending
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A quote given to a customer. Same line shape as a sale, but no payment
/// or debt semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Quote {
    pub id: String,
    pub customer_id: String,
    pub salesperson: Option<String>,
    pub total: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item in a quote, snapshotted like a sale item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuoteItem {
    pub id: String,
    pub quote_id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub line_total: Money,
    pub cost: Money,
    pub position: i64,
}

// =============================================================================
// Debt Payment
// =============================================================================

/// A payment received against a customer's outstanding debt.
///
/// Immutable history record: settlement mutates installments, never this.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DebtPayment {
    pub id: String,
    pub customer_id: String,
    pub amount: Money,
    pub method: SettlementMethod,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Boundary Requests
// =============================================================================

/// One requested line of a new sale or quote.
///
/// `unit_price` / `line_total` are caller overrides; how they are honored
/// differs between sales and quotes (see [`crate::pricing`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: String,
    pub quantity: Quantity,
    pub unit_price: Option<Money>,
    pub line_total: Option<Money>,
}

/// One requested payment installment of a new sale.
///
/// The caller decides the split across methods; the engine decides the
/// initial status (deferred ⇒ pending, everything else ⇒ paid).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRequest {
    pub method: PaymentMethod,
    pub amount: Money,
}

/// Request shape for creating a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: String,
    pub salesperson: Option<String>,
    #[serde(default)]
    pub discount: Money,
    pub items: Vec<LineItemRequest>,
    pub installments: Vec<InstallmentRequest>,
}

/// Request shape for creating a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuoteRequest {
    pub customer_id: String,
    pub salesperson: Option<String>,
    pub items: Vec<LineItemRequest>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_deferred_is_debt() {
        assert!(PaymentMethod::Deferred.is_deferred());
        assert!(!PaymentMethod::Cash.is_deferred());
        assert!(!PaymentMethod::Card.is_deferred());
        assert!(!PaymentMethod::Pix.is_deferred());
    }

    #[test]
    fn test_outstanding_debt_requires_pending_deferred() {
        let mut installment = PaymentInstallment {
            id: "i1".to_string(),
            sale_id: "s1".to_string(),
            method: PaymentMethod::Deferred,
            amount: Money::from_cents(5000),
            status: InstallmentStatus::Pending,
            position: 0,
        };
        assert!(installment.is_outstanding_debt());

        installment.status = InstallmentStatus::Paid;
        assert!(!installment.is_outstanding_debt());

        installment.status = InstallmentStatus::Pending;
        installment.method = PaymentMethod::Cash;
        assert!(!installment.is_outstanding_debt());
    }

    #[test]
    fn test_effective_deferred_price() {
        let mut product = Product {
            id: "p1".to_string(),
            name: "Cimento 50kg".to_string(),
            cost: Money::from_cents(2000),
            price: Money::from_cents(3000),
            has_deferred_price: false,
            deferred_price: Some(Money::from_cents(3300)),
            stock: Quantity::from_units(10),
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Not flagged: alternate price is ignored.
        assert_eq!(product.effective_deferred_price(), Money::from_cents(3000));

        product.has_deferred_price = true;
        assert_eq!(product.effective_deferred_price(), Money::from_cents(3300));

        product.deferred_price = None;
        assert_eq!(product.effective_deferred_price(), Money::from_cents(3000));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(QuoteStatus::default(), QuoteStatus::Pending);
        assert_eq!(SettlementMethod::default(), SettlementMethod::Cash);
    }
}
