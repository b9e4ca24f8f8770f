//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! The original handlers did all arithmetic in floating point, which means
//! `0.1 + 0.2 != 0.3` and surcharge totals drift by a paisa over long
//! ledgers. Every monetary value here is an integer number of paise, so a
//! 5% surcharge on ₹250.00 is exactly ₹12.50 (1250 paise), always.
//!
//! ## Usage
//! ```rust
//! use mandi_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(2500); // ₹25.00
//!
//! // Arithmetic operations
//! let line_total = price * 10;                    // ₹250.00
//! let with_fee = line_total + Money::from_paise(1250); // ₹262.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest rupee unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: balances can be negative (customer overpaid,
///   vendor return exceeding purchases)
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use mandi_core::money::Money;
    ///
    /// let price = Money::from_paise(2550); // ₹25.50
    /// assert_eq!(price.paise(), 2550);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Computes a percentage of this amount, where the rate is in basis
    /// points (500 bps = 5%). Rounds half-up in integer math.
    ///
    /// This is the arithmetic behind the percent-of-subtotal surcharge:
    /// `(amount * bps + 5000) / 10000`, evaluated in i128 so large ledgers
    /// cannot overflow.
    ///
    /// ```rust
    /// use mandi_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(25_000); // ₹250.00
    /// let surcharge = subtotal.percent_bps(500); // 5%
    /// assert_eq!(surcharge.paise(), 1_250);      // ₹12.50 exactly
    /// ```
    pub fn percent_bps(&self, bps: u32) -> Money {
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_paise(amount as i64)
    }

    /// Multiplies money by a quantity (line total = unit price x qty).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display. The frontend owns real localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(2550);
        assert_eq!(money.paise(), 2550);
        assert_eq!(money.rupees(), 25);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        assert_eq!(Money::from_rupees(15).paise(), 1500);
        assert_eq!(Money::from_rupees(-5).paise(), -500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(2550)), "₹25.50");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(400);

        assert_eq!((a + b).paise(), 1400);
        assert_eq!((a - b).paise(), 600);
        assert_eq!((a * 3).paise(), 3000);
    }

    #[test]
    fn test_sum() {
        let totals = [Money::from_paise(100), Money::from_paise(250), Money::from_paise(50)];
        let sum: Money = totals.iter().copied().sum();
        assert_eq!(sum.paise(), 400);
    }

    #[test]
    fn test_percent_bps_exact() {
        // ₹250.00 at 5% = ₹12.50, no drift
        let subtotal = Money::from_paise(25_000);
        assert_eq!(subtotal.percent_bps(500).paise(), 1_250);
    }

    #[test]
    fn test_percent_bps_rounding() {
        // ₹10.00 at 8.25% = 82.5 paise, rounds half-up to 83
        let amount = Money::from_paise(1000);
        assert_eq!(amount.percent_bps(825).paise(), 83);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(1500); // ₹15.00
        assert_eq!(unit_price.multiply_quantity(100).paise(), 150_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_paise(100).is_positive());
        assert!(Money::from_paise(-100).is_negative());
    }
}
