//! # Report Projections
//!
//! Pure read-side projections over plain record slices. The engine layer
//! fetches the rows; this module holds the arithmetic so every report number
//! is reproducible in a unit test.
//!
//! No state, no caching: reports are recomputed from the store on every
//! request, and different sub-totals of one report may reflect different
//! instants under concurrent writes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Invoice, Product, SurchargeCashPayment};

// =============================================================================
// Profit / Loss
// =============================================================================

/// Gross trading result: `total_sales - (total_purchases - total_returns)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitLoss {
    pub total_sales_paise: i64,
    pub total_purchases_paise: i64,
    pub total_returns_paise: i64,
    /// `total_purchases - total_returns`.
    pub net_purchases_paise: i64,
    /// `total_sales - net_purchases`. Negative is a loss.
    pub gross_profit_paise: i64,
}

/// Computes the profit/loss projection from the three raw sums.
pub fn profit_loss(
    total_sales: Money,
    total_purchases: Money,
    total_returns: Money,
) -> ProfitLoss {
    let net_purchases = total_purchases - total_returns;
    let gross_profit = total_sales - net_purchases;

    ProfitLoss {
        total_sales_paise: total_sales.paise(),
        total_purchases_paise: total_purchases.paise(),
        total_returns_paise: total_returns.paise(),
        net_purchases_paise: net_purchases.paise(),
        gross_profit_paise: gross_profit.paise(),
    }
}

// =============================================================================
// Product Margins
// =============================================================================

/// Per-product margin at the catalog's default prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductMargin {
    pub product_id: String,
    pub name: String,
    pub unit: String,
    pub purchase_price_paise: i64,
    pub sale_price_paise: i64,
    pub margin_paise: i64,
    /// `margin / purchase_price * 100`. Zero when the purchase price is
    /// zero (margin percent is undefined for free stock).
    pub margin_percent: f64,
}

/// Computes the margin row for one product.
pub fn product_margin(product: &Product) -> ProductMargin {
    let margin = product.margin();

    let margin_percent = if product.purchase_price_paise != 0 {
        margin.paise() as f64 / product.purchase_price_paise as f64 * 100.0
    } else {
        0.0
    };

    ProductMargin {
        product_id: product.id.clone(),
        name: product.name.clone(),
        unit: product.unit.clone(),
        purchase_price_paise: product.purchase_price_paise,
        sale_price_paise: product.sale_price_paise,
        margin_paise: margin.paise(),
        margin_percent,
    }
}

// =============================================================================
// Surcharge Summary
// =============================================================================

/// Hamali collected: invoice-embedded plus standalone cash records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurchargeSummary {
    pub invoice_surcharge_paise: i64,
    pub cash_surcharge_paise: i64,
    pub total_paise: i64,
}

/// Sums invoice surcharges and standalone cash surcharge payments.
pub fn surcharge_summary(
    invoices: &[Invoice],
    cash_payments: &[SurchargeCashPayment],
) -> SurchargeSummary {
    let invoice_surcharge: Money = invoices.iter().map(|i| i.surcharge_amount()).sum();
    let cash_surcharge: Money = cash_payments.iter().map(|p| p.amount()).sum();

    SurchargeSummary {
        invoice_surcharge_paise: invoice_surcharge.paise(),
        cash_surcharge_paise: cash_surcharge.paise(),
        total_paise: (invoice_surcharge + cash_surcharge).paise(),
    }
}

// =============================================================================
// Period Rollups
// =============================================================================

/// One day's or month's aggregate of invoices and cash surcharge receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodRollup {
    /// "2026-08-23" for daily, "2026-08" for monthly rollups.
    pub period: String,
    pub invoice_count: i64,
    pub invoiced_paise: i64,
    pub invoice_surcharge_paise: i64,
    pub cash_surcharge_paise: i64,
}

/// Groups invoices and cash surcharge payments by calendar day.
pub fn daily_rollup(
    invoices: &[Invoice],
    cash_payments: &[SurchargeCashPayment],
) -> Vec<PeriodRollup> {
    rollup_by(invoices, cash_payments, "%Y-%m-%d")
}

/// Groups invoices and cash surcharge payments by calendar month.
pub fn monthly_rollup(
    invoices: &[Invoice],
    cash_payments: &[SurchargeCashPayment],
) -> Vec<PeriodRollup> {
    rollup_by(invoices, cash_payments, "%Y-%m")
}

/// Shared grouping over the `date` field. BTreeMap keeps periods sorted.
fn rollup_by(
    invoices: &[Invoice],
    cash_payments: &[SurchargeCashPayment],
    key_format: &str,
) -> Vec<PeriodRollup> {
    let mut periods: BTreeMap<String, PeriodRollup> = BTreeMap::new();

    for invoice in invoices {
        let key = invoice.date.format(key_format).to_string();
        let entry = periods.entry(key.clone()).or_insert_with(|| PeriodRollup {
            period: key,
            invoice_count: 0,
            invoiced_paise: 0,
            invoice_surcharge_paise: 0,
            cash_surcharge_paise: 0,
        });
        entry.invoice_count += 1;
        entry.invoiced_paise += invoice.grand_total_paise;
        entry.invoice_surcharge_paise += invoice.surcharge_amount_paise;
    }

    for payment in cash_payments {
        let key = payment.date.format(key_format).to_string();
        let entry = periods.entry(key.clone()).or_insert_with(|| PeriodRollup {
            period: key,
            invoice_count: 0,
            invoiced_paise: 0,
            invoice_surcharge_paise: 0,
            cash_surcharge_paise: 0,
        });
        entry.cash_surcharge_paise += payment.amount_paise;
    }

    periods.into_values().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surcharge::SurchargeMode;
    use crate::types::DocumentStatus;
    use chrono::{TimeZone, Utc};

    fn invoice_on(day: u32, grand_total: i64, surcharge: i64) -> Invoice {
        let date = Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap();
        Invoice {
            id: format!("inv-{day}-{grand_total}"),
            invoice_number: format!("INV-202608{day:02}-0001"),
            customer_id: "cust-1".to_string(),
            vehicle_id: None,
            date,
            subtotal_paise: grand_total - surcharge,
            include_surcharge: surcharge > 0,
            surcharge_mode: (surcharge > 0).then_some(SurchargeMode::Percent),
            surcharge_rate: 500,
            surcharge_amount_paise: surcharge,
            grand_total_paise: grand_total,
            status: DocumentStatus::Completed,
            created_at: date,
            updated_at: date,
        }
    }

    fn cash_on(day: u32, amount: i64) -> SurchargeCashPayment {
        let date = Utc.with_ymd_and_hms(2026, 8, day, 18, 0, 0).unwrap();
        SurchargeCashPayment {
            id: format!("cash-{day}-{amount}"),
            customer_id: None,
            invoice_id: None,
            amount_paise: amount,
            date,
            notes: None,
            created_at: date,
        }
    }

    #[test]
    fn test_profit_loss() {
        let report = profit_loss(
            Money::from_paise(500_000),
            Money::from_paise(300_000),
            Money::from_paise(50_000),
        );
        assert_eq!(report.net_purchases_paise, 250_000);
        assert_eq!(report.gross_profit_paise, 250_000);
    }

    #[test]
    fn test_profit_loss_can_be_negative() {
        let report = profit_loss(
            Money::from_paise(100_000),
            Money::from_paise(200_000),
            Money::zero(),
        );
        assert_eq!(report.gross_profit_paise, -100_000);
    }

    #[test]
    fn test_product_margin() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".to_string(),
            name: "Onion".to_string(),
            unit: "KG".to_string(),
            purchase_price_paise: 2_000,
            sale_price_paise: 2_500,
            current_stock: 0,
            reorder_level: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let margin = product_margin(&product);
        assert_eq!(margin.margin_paise, 500);
        assert!((margin.margin_percent - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_product_margin_zero_purchase_price() {
        let now = Utc::now();
        let product = Product {
            id: "p-2".to_string(),
            name: "Sample".to_string(),
            unit: "Box".to_string(),
            purchase_price_paise: 0,
            sale_price_paise: 1_000,
            current_stock: 0,
            reorder_level: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let margin = product_margin(&product);
        assert_eq!(margin.margin_percent, 0.0);
    }

    #[test]
    fn test_surcharge_summary() {
        let invoices = [invoice_on(1, 26_250, 1_250), invoice_on(2, 10_000, 0)];
        let cash = [cash_on(1, 500), cash_on(3, 700)];

        let summary = surcharge_summary(&invoices, &cash);
        assert_eq!(summary.invoice_surcharge_paise, 1_250);
        assert_eq!(summary.cash_surcharge_paise, 1_200);
        assert_eq!(summary.total_paise, 2_450);
    }

    #[test]
    fn test_daily_rollup_groups_and_sorts() {
        let invoices = [
            invoice_on(2, 10_000, 0),
            invoice_on(1, 26_250, 1_250),
            invoice_on(1, 5_000, 0),
        ];
        let cash = [cash_on(3, 700)];

        let rollup = daily_rollup(&invoices, &cash);
        assert_eq!(rollup.len(), 3);

        assert_eq!(rollup[0].period, "2026-08-01");
        assert_eq!(rollup[0].invoice_count, 2);
        assert_eq!(rollup[0].invoiced_paise, 31_250);
        assert_eq!(rollup[0].invoice_surcharge_paise, 1_250);

        assert_eq!(rollup[1].period, "2026-08-02");
        assert_eq!(rollup[1].invoiced_paise, 10_000);

        // Day 3 exists only through the cash payment
        assert_eq!(rollup[2].period, "2026-08-03");
        assert_eq!(rollup[2].invoice_count, 0);
        assert_eq!(rollup[2].cash_surcharge_paise, 700);
    }

    #[test]
    fn test_monthly_rollup_collapses_days() {
        let invoices = [invoice_on(1, 10_000, 0), invoice_on(20, 5_000, 0)];
        let rollup = monthly_rollup(&invoices, &[]);

        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].period, "2026-08");
        assert_eq!(rollup[0].invoice_count, 2);
        assert_eq!(rollup[0].invoiced_paise, 15_000);
    }
}
