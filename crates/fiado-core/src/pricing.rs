//! # Line-Item Pricing Resolver
//!
//! Resolves the unit price and line total for a sale or quote line, given
//! the catalog price and optional caller-supplied overrides.
//!
//! ## The Override Asymmetry
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Sale creation  (OverridePolicy::AnyProvided)                       │
//! │    override supplied  → use it, EVEN IF ZERO                        │
//! │    (a zero-priced line is a legitimate giveaway on a sale)          │
//! │                                                                     │
//! │  Quote creation (OverridePolicy::PositiveOnly)                      │
//! │    override supplied AND > 0 → use it                               │
//! │    otherwise                 → fall back to the catalog price       │
//! │                                                                     │
//! │  This asymmetry is intentional and load-bearing: changing it        │
//! │  silently changes historical pricing behavior.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::{Money, Quantity};

// =============================================================================
// Override Policy
// =============================================================================

/// Governs when a caller-supplied price override is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridePolicy {
    /// Any supplied override wins, including zero. Used by sale creation.
    AnyProvided,
    /// Only a strictly positive override wins. Used by quote creation.
    PositiveOnly,
}

impl OverridePolicy {
    fn honors(&self, supplied: Option<Money>) -> Option<Money> {
        match (self, supplied) {
            (OverridePolicy::AnyProvided, Some(value)) => Some(value),
            (OverridePolicy::PositiveOnly, Some(value)) if value.is_positive() => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// Resolved Line
// =============================================================================

/// The outcome of pricing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub unit_price: Money,
    pub line_total: Money,
}

/// Resolves one line's unit price and total.
///
/// - Unit price: the honored override, else the catalog price.
/// - Line total: the honored override, else `unit_price × quantity`
///   rounded half-up to cents.
///
/// ## Example
/// ```rust
/// use fiado_core::money::{Money, Quantity};
/// use fiado_core::pricing::{resolve_line, OverridePolicy};
///
/// let line = resolve_line(
///     Money::from_cents(1000),
///     Quantity::from_units(3),
///     None,
///     None,
///     OverridePolicy::AnyProvided,
/// );
/// assert_eq!(line.unit_price.cents(), 1000);
/// assert_eq!(line.line_total.cents(), 3000);
/// ```
pub fn resolve_line(
    catalog_price: Money,
    quantity: Quantity,
    unit_override: Option<Money>,
    total_override: Option<Money>,
    policy: OverridePolicy,
) -> ResolvedLine {
    let unit_price = policy.honors(unit_override).unwrap_or(catalog_price);
    let line_total = policy
        .honors(total_override)
        .unwrap_or_else(|| unit_price.times(quantity));

    ResolvedLine {
        unit_price,
        line_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: Money = Money::from_cents(1000);

    #[test]
    fn test_no_overrides_uses_catalog() {
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(2),
            None,
            None,
            OverridePolicy::AnyProvided,
        );
        assert_eq!(line.unit_price, CATALOG);
        assert_eq!(line.line_total, Money::from_cents(2000));
    }

    #[test]
    fn test_unit_override_drives_total() {
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(2),
            Some(Money::from_cents(800)),
            None,
            OverridePolicy::AnyProvided,
        );
        assert_eq!(line.unit_price, Money::from_cents(800));
        assert_eq!(line.line_total, Money::from_cents(1600));
    }

    #[test]
    fn test_total_override_wins_over_arithmetic() {
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(2),
            Some(Money::from_cents(800)),
            Some(Money::from_cents(1500)),
            OverridePolicy::AnyProvided,
        );
        assert_eq!(line.unit_price, Money::from_cents(800));
        assert_eq!(line.line_total, Money::from_cents(1500));
    }

    #[test]
    fn test_sale_honors_zero_override() {
        // Presence test only: an explicit zero is a giveaway line.
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(1),
            Some(Money::zero()),
            None,
            OverridePolicy::AnyProvided,
        );
        assert_eq!(line.unit_price, Money::zero());
        assert_eq!(line.line_total, Money::zero());
    }

    #[test]
    fn test_quote_ignores_zero_override() {
        // PositiveOnly: zero falls back to the catalog price.
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(1),
            Some(Money::zero()),
            None,
            OverridePolicy::PositiveOnly,
        );
        assert_eq!(line.unit_price, CATALOG);
        assert_eq!(line.line_total, CATALOG);
    }

    #[test]
    fn test_quote_honors_positive_override() {
        let line = resolve_line(
            CATALOG,
            Quantity::from_units(1),
            Some(Money::from_cents(950)),
            Some(Money::from_cents(900)),
            OverridePolicy::PositiveOnly,
        );
        assert_eq!(line.unit_price, Money::from_cents(950));
        assert_eq!(line.line_total, Money::from_cents(900));
    }

    #[test]
    fn test_fractional_quantity_rounds_half_up() {
        // 10.00 × 0.125 = 1.25 exactly
        let line = resolve_line(
            CATALOG,
            Quantity::from_milli(125),
            None,
            None,
            OverridePolicy::AnyProvided,
        );
        assert_eq!(line.line_total, Money::from_cents(125));

        // 0.33 × 1.500 = 0.495 → 0.50
        let line = resolve_line(
            Money::from_cents(33),
            Quantity::from_milli(1500),
            None,
            None,
            OverridePolicy::PositiveOnly,
        );
        assert_eq!(line.line_total, Money::from_cents(50));
    }
}
