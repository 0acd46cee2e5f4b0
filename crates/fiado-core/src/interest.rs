//! # Overdue Interest
//!
//! Simple periodic interest on overdue amounts: 1.5% per complete 15-day
//! period elapsed since the sale date, date-only precision.
//!
//! ## Status
//! This is available infrastructure, deliberately NOT wired into balance
//! or report computations. Displayed balances never include interest
//! unless a product decision reintroduces it explicitly.

use chrono::{NaiveDate, Utc};

use crate::money::Money;

/// Length of one interest accrual period, in days.
pub const PERIOD_DAYS: i64 = 15;

/// Interest rate per complete period, in basis points (150 = 1.5%).
pub const RATE_BPS_PER_PERIOD: i64 = 150;

/// Computes simple interest on `principal` for the time elapsed between
/// `sale_date` and today.
///
/// See [`compute_interest_as_of`] for the actual arithmetic; this variant
/// exists for callers that want "as of now" semantics.
pub fn compute_interest(sale_date: NaiveDate, principal: Money) -> Money {
    compute_interest_as_of(sale_date, Utc::now().date_naive(), principal)
}

/// Computes simple interest on `principal` as of a given evaluation date.
///
/// ## Rules
/// - `periods = floor(days_elapsed / 15)`; anything under 15 days accrues
///   nothing.
/// - `interest = principal × 1.5% × periods`, rounded half-up to cents.
/// - Dates in the future (negative elapsed time) accrue nothing.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use fiado_core::interest::compute_interest_as_of;
/// use fiado_core::money::Money;
///
/// let sale = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(); // 29 days
/// let interest = compute_interest_as_of(sale, as_of, Money::from_cents(20000));
/// assert_eq!(interest.cents(), 300); // 1 period: 200.00 × 1.5% = 3.00
/// ```
pub fn compute_interest_as_of(sale_date: NaiveDate, as_of: NaiveDate, principal: Money) -> Money {
    let days_elapsed = (as_of - sale_date).num_days();
    if days_elapsed < PERIOD_DAYS {
        return Money::zero();
    }

    let periods = days_elapsed / PERIOD_DAYS;
    let raw = principal.cents() as i128 * RATE_BPS_PER_PERIOD as i128 * periods as i128;
    Money::from_cents(((raw + 5000) / 10000) as i64)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_under_fifteen_days_is_free() {
        let sale = date(2026, 3, 1);
        let as_of = date(2026, 3, 15); // 14 days
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(10000)),
            Money::zero()
        );
    }

    #[test]
    fn test_one_complete_period() {
        // 29 days elapsed → exactly 1 period: 200.00 × 1.5% = 3.00
        let sale = date(2026, 1, 1);
        let as_of = date(2026, 1, 30);
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(20000)).cents(),
            300
        );
    }

    #[test]
    fn test_multiple_periods() {
        // 45 days → 3 periods: 100.00 × 1.5% × 3 = 4.50
        let sale = date(2026, 1, 1);
        let as_of = date(2026, 2, 15);
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(10000)).cents(),
            450
        );
    }

    #[test]
    fn test_rounding_half_up() {
        // 0.99 × 1.5% = 1.485 cents → 1 cent
        let sale = date(2026, 1, 1);
        let as_of = date(2026, 1, 16);
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(99)).cents(),
            1
        );

        // 1.01 × 1.5% = 1.515 cents → 2 cents
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(101)).cents(),
            2
        );
    }

    #[test]
    fn test_future_sale_date_accrues_nothing() {
        let sale = date(2026, 6, 1);
        let as_of = date(2026, 5, 1);
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::from_cents(10000)),
            Money::zero()
        );
    }

    #[test]
    fn test_zero_principal() {
        let sale = date(2026, 1, 1);
        let as_of = date(2026, 3, 1);
        assert_eq!(
            compute_interest_as_of(sale, as_of, Money::zero()),
            Money::zero()
        );
    }
}
