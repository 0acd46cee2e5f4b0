//! # fiado-core: Pure Business Logic for Fiado POS
//!
//! This crate is the **heart** of Fiado POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Fiado POS Architecture                        │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              HTTP / Routing (external collaborator)           │ │
//! │  │    create_sale, receive_payment, cancel_sale, reports, ...    │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │               ★ fiado-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐           │ │
//! │  │   │  types  │ │  money  │ │ pricing │ │ interest │           │ │
//! │  │   │Customer │ │  Money  │ │ resolve │ │ overdue  │           │ │
//! │  │   │  Sale   │ │Quantity │ │  line   │ │ periods  │           │ │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘           │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │                 fiado-db (Database Layer)                     │ │
//! │  │    SQLite queries, migrations, settlement + mutation engines  │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale, Installment, etc.)
//! - [`money`] - Money and Quantity types with integer arithmetic
//! - [`pricing`] - Line-item pricing resolution for sales and quotes
//! - [`interest`] - Simple periodic interest on overdue amounts
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: Cents (i64) for money, milli-units for quantities
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod interest;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::{Money, Quantity};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum outstanding balance for a customer to appear on the debtors
/// report: strictly more than one cent.
///
/// ## Business Reason
/// Partial settlements can leave one-cent residues from rounding; those
/// are noise, not debt worth chasing.
pub const DEBTORS_REPORT_THRESHOLD: Money = Money::from_cents(1);

/// Number of products shown in the dashboard "top sellers" ranking.
pub const TOP_PRODUCTS_LIMIT: u32 = 5;
