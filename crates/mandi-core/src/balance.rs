//! # Balance Arithmetic
//!
//! Pure balance math for vendors and customers. Balances are DERIVED, never
//! stored: the engine layer aggregates the raw sums from the store and this
//! module turns them into balances and display statuses.
//!
//! ```text
//! vendor balance   = total purchases - total payments - total returns
//! customer balance = total invoiced  - total payments
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Payment Status
// =============================================================================

/// Display classification of a customer's position.
///
/// Precedence: `Paid` wins whenever nothing is owed (balance <= 0), even if
/// nothing was ever invoiced; `Unpaid` only when a balance remains and no
/// payment was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
}

/// Classifies a customer position from the two raw sums.
pub fn classify_payment_status(total_invoiced: Money, total_paid: Money) -> PaymentStatus {
    let balance = total_invoiced - total_paid;

    if balance <= Money::zero() {
        PaymentStatus::Paid
    } else if total_paid.is_zero() {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Partial
    }
}

// =============================================================================
// Vendor Balance
// =============================================================================

/// Derived vendor position: what the business still owes the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorBalance {
    pub total_purchases_paise: i64,
    pub total_payments_paise: i64,
    pub total_returns_paise: i64,
    /// `total_purchases - total_payments - total_returns`. Negative means
    /// the vendor owes the business.
    pub balance_paise: i64,
}

impl VendorBalance {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_paise(self.balance_paise)
    }
}

/// Computes a vendor balance from the three raw sums.
pub fn vendor_balance(
    total_purchases: Money,
    total_payments: Money,
    total_returns: Money,
) -> VendorBalance {
    let balance = total_purchases - total_payments - total_returns;

    VendorBalance {
        total_purchases_paise: total_purchases.paise(),
        total_payments_paise: total_payments.paise(),
        total_returns_paise: total_returns.paise(),
        balance_paise: balance.paise(),
    }
}

// =============================================================================
// Customer Balance
// =============================================================================

/// Derived customer position: what the customer still owes the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerBalance {
    pub total_invoiced_paise: i64,
    pub total_payments_paise: i64,
    /// `total_invoiced - total_payments`. Negative means the customer
    /// overpaid.
    pub balance_paise: i64,
    pub status: PaymentStatus,
}

impl CustomerBalance {
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_paise(self.balance_paise)
    }
}

/// Computes a customer balance and its display status from the raw sums.
pub fn customer_balance(total_invoiced: Money, total_payments: Money) -> CustomerBalance {
    let balance = total_invoiced - total_payments;

    CustomerBalance {
        total_invoiced_paise: total_invoiced.paise(),
        total_payments_paise: total_payments.paise(),
        balance_paise: balance.paise(),
        status: classify_payment_status(total_invoiced, total_payments),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn paise(n: i64) -> Money {
        Money::from_paise(n)
    }

    #[test]
    fn test_vendor_balance_arithmetic() {
        // Purchase ₹14,600 + payment ₹5,000 + return ₹1,600 => ₹8,000 owed
        let balance = vendor_balance(
            paise(1_460_000),
            paise(500_000),
            paise(160_000),
        );
        assert_eq!(balance.balance_paise, 800_000);
        assert_eq!(balance.total_purchases_paise, 1_460_000);
    }

    #[test]
    fn test_vendor_balance_can_go_negative() {
        let balance = vendor_balance(paise(100_000), paise(120_000), paise(0));
        assert_eq!(balance.balance_paise, -20_000);
        assert!(balance.balance().is_negative());
    }

    #[test]
    fn test_customer_balance() {
        let balance = customer_balance(paise(26_250), paise(10_000));
        assert_eq!(balance.balance_paise, 16_250);
        assert_eq!(balance.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_status_paid_iff_balance_nonpositive() {
        assert_eq!(classify_payment_status(paise(100), paise(100)), PaymentStatus::Paid);
        assert_eq!(classify_payment_status(paise(100), paise(150)), PaymentStatus::Paid);
        // Nothing invoiced, nothing paid: balance 0, so paid wins
        assert_eq!(classify_payment_status(paise(0), paise(0)), PaymentStatus::Paid);
    }

    #[test]
    fn test_status_unpaid_iff_no_payment_and_balance_remains() {
        assert_eq!(classify_payment_status(paise(100), paise(0)), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_status_partial_otherwise() {
        assert_eq!(classify_payment_status(paise(100), paise(1)), PaymentStatus::Partial);
        assert_eq!(classify_payment_status(paise(100), paise(99)), PaymentStatus::Partial);
    }
}
