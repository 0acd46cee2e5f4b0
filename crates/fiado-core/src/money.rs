//! # Money Module
//!
//! Provides the `Money` and `Quantity` types for handling monetary values
//! and fractional quantities safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A customer's debt balance is derived by summing installment        │
//! │  amounts across many sales; a drift of even one cent breaks the     │
//! │  invariant that balance == sum of PENDING deferred installments.    │
//! │                                                                     │
//! │  OUR SOLUTION: Integer smallest-units                               │
//! │    Money    = i64 cents        (2 decimal places)                   │
//! │    Quantity = i64 milli-units  (3 decimal places, e.g. 1.250 kg)    │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::money::{Money, Quantity};
//!
//! let price = Money::from_cents(1099);           // R$10.99
//! let qty = Quantity::from_milli(2500);          // 2.500 units
//! let line = price.times(qty);                   // R$27.48 (half-up)
//! assert_eq!(line.cents(), 2748);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Scale factor between quantity milli-units and whole units.
const QUANTITY_SCALE: i64 = 1000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for reversals and credit
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serializes as plain integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-currency (reais) portion.
    #[inline]
    pub const fn whole(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two values.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Multiplies a unit price by a fractional quantity, rounding half-up
    /// to the nearest cent.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::{Money, Quantity};
    ///
    /// // R$0.33 × 1.500 = R$0.495 → rounds to R$0.50
    /// let line = Money::from_cents(33).times(Quantity::from_milli(1500));
    /// assert_eq!(line.cents(), 50);
    /// ```
    pub fn times(&self, quantity: Quantity) -> Money {
        // i128 intermediate prevents overflow; half-up rounds away from
        // zero so positive and negative lines mirror each other.
        let product = self.0 as i128 * quantity.milli() as i128;
        let half = if product >= 0 { 500 } else { -500 };
        Money::from_cents(((product + half) / QUANTITY_SCALE as i128) as i64)
    }

    /// Parses a decimal string into Money, accepting both `,` and `.` as
    /// the decimal separator (payments arrive as "120,50" or "120.50").
    ///
    /// Returns `None` for empty input, non-numeric input, or more than two
    /// fraction digits.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// assert_eq!(Money::parse("120,50"), Some(Money::from_cents(12050)));
    /// assert_eq!(Money::parse("120.5"), Some(Money::from_cents(12050)));
    /// assert_eq!(Money::parse("abc"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Money> {
        let normalized = raw.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }

        let (negative, digits) = match normalized.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, normalized.as_str()),
        };

        let (whole_str, frac_str) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole_str.is_empty() && frac_str.is_empty() {
            return None;
        }
        if frac_str.len() > 2 {
            return None;
        }

        let whole: i64 = if whole_str.is_empty() {
            0
        } else {
            whole_str.parse().ok()?
        };

        // Pad "5" to "50" so R$x.5 means 50 cents, not 5.
        let frac: i64 = if frac_str.is_empty() {
            0
        } else {
            format!("{:0<2}", frac_str).parse().ok()?
        };

        let cents = whole.checked_mul(100)?.checked_add(frac)?;
        Some(Money(if negative { -cents } else { cents }))
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logging and settlement outcome descriptions. Use frontend
/// formatting for actual UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R${}.{:02}", sign, self.whole().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A fractional quantity in milli-units (3 decimal places).
///
/// Sales of bulk goods need fractional quantities (1.250 kg of nails);
/// three decimal places match the precision the ledger stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milli-units.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Quantity;
    ///
    /// assert_eq!(Quantity::from_units(3).milli(), 3000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * QUANTITY_SCALE)
    }

    /// Returns the value in milli-units.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// Checks if the quantity is positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:03}", sign, abs / QUANTITY_SCALE, abs % QUANTITY_SCALE)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.whole(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "R$0.00");
    }

    #[test]
    fn test_serializes_as_plain_integers() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1099)).unwrap(), "1099");
        assert_eq!(serde_json::to_string(&Quantity::from_milli(1250)).unwrap(), "1250");

        let money: Money = serde_json::from_str("1099").unwrap();
        assert_eq!(money, Money::from_cents(1099));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c -= b;
        assert_eq!(c.cents(), 500);
    }

    #[test]
    fn test_times_whole_quantity() {
        let unit_price = Money::from_cents(299);
        let line = unit_price.times(Quantity::from_units(3));
        assert_eq!(line.cents(), 897);
    }

    #[test]
    fn test_times_fractional_quantity_rounds_half_up() {
        // R$0.33 × 1.500 = 49.5 cents → 50
        let line = Money::from_cents(33).times(Quantity::from_milli(1500));
        assert_eq!(line.cents(), 50);

        // R$0.33 × 1.400 = 46.2 cents → 46
        let line = Money::from_cents(33).times(Quantity::from_milli(1400));
        assert_eq!(line.cents(), 46);
    }

    #[test]
    fn test_parse_comma_and_dot() {
        assert_eq!(Money::parse("120,50"), Some(Money::from_cents(12050)));
        assert_eq!(Money::parse("120.50"), Some(Money::from_cents(12050)));
        assert_eq!(Money::parse("120"), Some(Money::from_cents(12000)));
        assert_eq!(Money::parse(" 120,5 "), Some(Money::from_cents(12050)));
        assert_eq!(Money::parse("0.07"), Some(Money::from_cents(7)));
        assert_eq!(Money::parse("-3,25"), Some(Money::from_cents(-325)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Money::parse(""), None);
        assert_eq!(Money::parse("abc"), None);
        assert_eq!(Money::parse("1.2.3"), None);
        assert_eq!(Money::parse("10.505"), None); // more than 2 decimals
        assert_eq!(Money::parse("-"), None);
        assert_eq!(Money::parse("."), None);
    }

    #[test]
    fn test_quantity_display_and_units() {
        assert_eq!(format!("{}", Quantity::from_milli(1250)), "1.250");
        assert_eq!(format!("{}", Quantity::from_units(2)), "2.000");
        assert_eq!(format!("{}", Quantity::from_milli(-500)), "-0.500");
    }

    #[test]
    fn test_min() {
        let a = Money::from_cents(100);
        let b = Money::from_cents(50);
        assert_eq!(a.min(b), b);
    }
}
