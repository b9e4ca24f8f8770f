//! # Validation Module
//!
//! Input validators for Mandi Ledger. Every create/update operation runs
//! these BEFORE any side effect, so a rejected request leaves the store
//! untouched.
//!
//! ## Usage
//! ```rust
//! use mandi_core::validation::{validate_quantity, validate_required};
//!
//! validate_required("customer_id", "cust-1").unwrap();
//! validate_quantity(10).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a referenced id or required string field is non-empty.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a party/product/vehicle display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item or movement quantity.
///
/// ## Rules
/// - Must be positive (> 0); zero-or-negative quantities are rejected
///   before any side effect
/// - Must not exceed MAX_LINE_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in paise.
///
/// Zero is allowed: negotiated giveaway lines exist in practice.
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an edited surcharge amount in paise.
///
/// Zero is allowed (the surcharge can be waived at payment time);
/// negatives are not.
pub fn validate_surcharge_amount(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "surcharge_amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a payment amount in paise. Must be strictly positive.
pub fn validate_payment_amount(paise: i64) -> ValidationResult<()> {
    if paise <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a percent surcharge rate in basis points (0% to 100%).
pub fn validate_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "surcharge_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that a document carries at least one line item.
pub fn validate_line_items_present(document: &str, count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::EmptyLineItems {
            document: document.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("customer_id", "cust-1").is_ok());
        assert!(validate_required("customer_id", "").is_err());
        assert!(validate_required("customer_id", "   ").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Tomato (Desi)").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(MAX_LINE_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise(0).is_ok());
        assert!(validate_price_paise(2500).is_ok());
        assert!(validate_price_paise(-1).is_err());
    }

    #[test]
    fn test_validate_surcharge_amount() {
        assert!(validate_surcharge_amount(0).is_ok());
        assert!(validate_surcharge_amount(1_000).is_ok());

        let err = validate_surcharge_amount(-100).unwrap_err();
        assert!(err.to_string().contains("surcharge_amount"));
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(500_000).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-100).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps(0).is_ok());
        assert!(validate_rate_bps(500).is_ok());
        assert!(validate_rate_bps(10_000).is_ok());
        assert!(validate_rate_bps(10_001).is_err());
    }

    #[test]
    fn test_validate_line_items_present() {
        assert!(validate_line_items_present("invoice", 3).is_ok());
        assert!(validate_line_items_present("invoice", 0).is_err());
    }
}
