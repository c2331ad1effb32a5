//! # Money Module
//!
//! Provides the `Money` type for flower prices and sale totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A stem at 0.10 sold 3 times in floating point:                        │
//! │    0.1 + 0.1 + 0.1 = 0.30000000000000004                               │
//! │                                                                         │
//! │  Bloom stores prices as integer minor units (cents):                   │
//! │    10 cents × 3 = 30 cents, exactly                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bloom_core::money::Money;
//!
//! let stem = Money::from_cents(350); // $3.50 per rose
//! let total = stem.multiply_quantity(12).unwrap();
//! assert_eq!(total.cents(), 4200);
//! assert_eq!(total.to_string(), "$42.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

/// A monetary value in the smallest currency unit (cents).
///
/// Flower prices and sale totals are never negative in this domain, but the
/// type stays signed so that arithmetic mistakes surface as negative values
/// instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units and cents.
    ///
    /// ```rust
    /// use bloom_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(4, 99).cents(), 499);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Money(major * 100 + minor)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity sold.
    ///
    /// Returns `None` on overflow so that a runaway quantity can never
    /// produce a wrapped total.
    ///
    /// ## User Workflow
    /// ```text
    /// Flower: Sunflower $2.75
    /// Quantity: 4
    ///      │
    ///      ▼
    /// multiply_quantity(4) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Sale total: $11.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// Debug-oriented display; the UI formats currency itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_multiply_quantity() {
        let stem = Money::from_cents(275);
        assert_eq!(stem.multiply_quantity(4), Some(Money::from_cents(1100)));
        assert_eq!(stem.multiply_quantity(0), Some(Money::zero()));
    }

    #[test]
    fn test_multiply_quantity_overflow_is_none() {
        assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2), None);
    }

    #[test]
    fn test_add() {
        let mut total = Money::from_cents(100) + Money::from_cents(250);
        total += Money::from_cents(50);
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_ten_cent_stems_stay_exact() {
        let stem = Money::from_cents(10);
        let total = stem + stem + stem;
        assert_eq!(total, Money::from_cents(30));
        assert!(!total.is_negative());
    }
}
