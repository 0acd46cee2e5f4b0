//! # Validation Module
//!
//! Input validation utilities for Fiado POS.
//!
//! Validation runs before any mutation: a request that fails here must
//! leave no partial effects anywhere.

use crate::error::ValidationError;
use crate::money::{Money, Quantity};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for customer and product names.
pub const MAX_NAME_LEN: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer or product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 255 characters
///
/// ## Example
/// ```rust
/// use fiado_core::validation::validate_name;
///
/// assert!(validate_name("Maria Silva").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Parses and validates a payment amount from raw caller input.
///
/// Accepts comma or dot decimal separators ("120,50" / "120.50"); the
/// parsed amount must be strictly positive.
///
/// ## Example
/// ```rust
/// use fiado_core::validation::parse_payment_amount;
/// use fiado_core::money::Money;
///
/// assert_eq!(parse_payment_amount("120,50").unwrap(), Money::from_cents(12050));
/// assert!(parse_payment_amount("0").is_err());
/// assert!(parse_payment_amount("abc").is_err());
/// ```
pub fn parse_payment_amount(raw: &str) -> ValidationResult<Money> {
    let amount = Money::parse(raw).ok_or_else(|| ValidationError::InvalidAmount {
        raw: raw.to_string(),
    })?;

    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

/// Validates a sale discount: zero is fine, negative is not.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }
    Ok(())
}

/// Validates a line-item quantity: must be strictly positive.
pub fn validate_quantity(quantity: Quantity) -> ValidationResult<()> {
    if !quantity.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
