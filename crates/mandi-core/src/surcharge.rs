//! # Surcharge Computation
//!
//! The hamali surcharge is an invoice-level fee computed on one of three
//! rate bases. The original handlers copy-pasted the math per invoice page;
//! here the three variants collapse into one tagged [`SurchargeConfig`]
//! union with a single pure computation.
//!
//! ## Variants
//! ```text
//! percent_of_subtotal: amount = subtotal * rate_bps / 10000
//! per_kg:              amount = rate_paise * total_kg
//! per_bag:             amount = rate_paise * total_bags
//! ```
//!
//! ## Usage
//! ```rust
//! use mandi_core::money::Money;
//! use mandi_core::surcharge::SurchargeConfig;
//!
//! let subtotal = Money::from_paise(25_000); // ₹250.00
//! let config = SurchargeConfig::PercentOfSubtotal { rate_bps: 500 }; // 5%
//! assert_eq!(config.amount(subtotal).paise(), 1_250); // ₹12.50
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Surcharge Mode (persisted discriminant)
// =============================================================================

/// Rate basis persisted on an invoice row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeMode {
    Percent,
    PerKg,
    PerBag,
}

// =============================================================================
// Surcharge Configuration
// =============================================================================

/// Caller-supplied surcharge configuration for one invoice.
///
/// Serialized with an explicit `mode` tag so the three rate bases share a
/// single wire shape:
/// `{"mode": "percent_of_subtotal", "rate_bps": 500}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SurchargeConfig {
    /// No surcharge on this invoice.
    None,

    /// Percent of the item subtotal, in basis points (500 = 5%).
    PercentOfSubtotal { rate_bps: u32 },

    /// Flat rate per kilogram, applied to the weighed total.
    PerKg { rate_paise: i64, total_kg: i64 },

    /// Flat rate per bag.
    PerBag { rate_paise: i64, total_bags: i64 },
}

impl SurchargeConfig {
    /// Computes the surcharge amount for the given item subtotal.
    ///
    /// Pure and idempotent: recomputing from the stored rate and basis
    /// always reproduces the stored amount.
    pub fn amount(&self, subtotal: Money) -> Money {
        match *self {
            SurchargeConfig::None => Money::zero(),
            SurchargeConfig::PercentOfSubtotal { rate_bps } => subtotal.percent_bps(rate_bps),
            SurchargeConfig::PerKg { rate_paise, total_kg } => {
                Money::from_paise(rate_paise).multiply_quantity(total_kg)
            }
            SurchargeConfig::PerBag { rate_paise, total_bags } => {
                Money::from_paise(rate_paise).multiply_quantity(total_bags)
            }
        }
    }

    /// Whether any surcharge applies.
    #[inline]
    pub fn is_some(&self) -> bool {
        !matches!(self, SurchargeConfig::None)
    }

    /// The persisted discriminant, if a surcharge applies.
    pub fn mode(&self) -> Option<SurchargeMode> {
        match self {
            SurchargeConfig::None => None,
            SurchargeConfig::PercentOfSubtotal { .. } => Some(SurchargeMode::Percent),
            SurchargeConfig::PerKg { .. } => Some(SurchargeMode::PerKg),
            SurchargeConfig::PerBag { .. } => Some(SurchargeMode::PerBag),
        }
    }

    /// The raw rate value persisted on the invoice row: basis points for
    /// percent mode, paise per unit for the weight-based modes.
    pub fn rate_value(&self) -> i64 {
        match *self {
            SurchargeConfig::None => 0,
            SurchargeConfig::PercentOfSubtotal { rate_bps } => rate_bps as i64,
            SurchargeConfig::PerKg { rate_paise, .. } => rate_paise,
            SurchargeConfig::PerBag { rate_paise, .. } => rate_paise,
        }
    }
}

impl Default for SurchargeConfig {
    fn default() -> Self {
        SurchargeConfig::None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_zero() {
        let config = SurchargeConfig::None;
        assert_eq!(config.amount(Money::from_paise(99_999)).paise(), 0);
        assert!(!config.is_some());
        assert_eq!(config.mode(), None);
    }

    #[test]
    fn test_percent_of_subtotal() {
        // ₹250.00 at 5% = ₹12.50
        let config = SurchargeConfig::PercentOfSubtotal { rate_bps: 500 };
        assert_eq!(config.amount(Money::from_paise(25_000)).paise(), 1_250);
        assert_eq!(config.mode(), Some(SurchargeMode::Percent));
        assert_eq!(config.rate_value(), 500);
    }

    #[test]
    fn test_per_kg() {
        // ₹2.00 per kg on 120 kg = ₹240.00; subtotal is ignored
        let config = SurchargeConfig::PerKg { rate_paise: 200, total_kg: 120 };
        assert_eq!(config.amount(Money::from_paise(1)).paise(), 24_000);
        assert_eq!(config.mode(), Some(SurchargeMode::PerKg));
    }

    #[test]
    fn test_per_bag() {
        // ₹5.00 per bag on 40 bags = ₹200.00
        let config = SurchargeConfig::PerBag { rate_paise: 500, total_bags: 40 };
        assert_eq!(config.amount(Money::zero()).paise(), 20_000);
        assert_eq!(config.mode(), Some(SurchargeMode::PerBag));
    }

    #[test]
    fn test_recompute_matches_stored() {
        // The stored amount must be reproducible from rate + basis alone.
        let configs = [
            SurchargeConfig::PercentOfSubtotal { rate_bps: 250 },
            SurchargeConfig::PerKg { rate_paise: 150, total_kg: 37 },
            SurchargeConfig::PerBag { rate_paise: 700, total_bags: 11 },
        ];
        let subtotal = Money::from_paise(123_456);
        for config in configs {
            let first = config.amount(subtotal);
            let second = config.amount(subtotal);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_wire_shape() {
        let config = SurchargeConfig::PercentOfSubtotal { rate_bps: 500 };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"mode":"percent_of_subtotal","rate_bps":500}"#);

        let parsed: SurchargeConfig =
            serde_json::from_str(r#"{"mode":"per_kg","rate_paise":200,"total_kg":120}"#).unwrap();
        assert_eq!(parsed, SurchargeConfig::PerKg { rate_paise: 200, total_kg: 120 });
    }
}
