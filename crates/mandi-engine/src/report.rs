//! # Report Aggregator
//!
//! Fetches the raw rows for a date window and hands them to the pure
//! projections in mandi-core. Reports are recomputed per request; nothing
//! is cached or stored.

use chrono::{DateTime, Utc};

use mandi_core::report::{
    daily_rollup, monthly_rollup, product_margin, profit_loss, surcharge_summary, PeriodRollup,
    ProductMargin, ProfitLoss, SurchargeSummary,
};
use mandi_core::Money;
use mandi_db::Database;

use crate::error::EngineResult;

/// Read-side report builder over a date window.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    db: Database,
}

impl ReportAggregator {
    pub fn new(db: Database) -> Self {
        ReportAggregator { db }
    }

    /// Gross trading result for the window:
    /// `sales - (purchases - returns)` over completed documents.
    pub async fn profit_loss(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<ProfitLoss> {
        let invoices = self.db.invoices().list_completed(from, to).await?;
        let purchases = self.db.purchases().list_completed(from, to).await?;
        let returns = self.db.vendor_returns().list_completed(from, to).await?;

        let total_sales: Money = invoices.iter().map(|i| i.grand_total()).sum();
        let total_purchases: Money = purchases.iter().map(|p| p.total_amount()).sum();
        let total_returns: Money = returns.iter().map(|r| r.total_amount()).sum();

        Ok(profit_loss(total_sales, total_purchases, total_returns))
    }

    /// Per-product margins at the catalog's default prices, active only.
    pub async fn product_margins(&self) -> EngineResult<Vec<ProductMargin>> {
        let products = self.db.products().list_active().await?;
        Ok(products.iter().map(product_margin).collect())
    }

    /// Hamali collected in the window: invoice-embedded plus cash records.
    pub async fn surcharge_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<SurchargeSummary> {
        let invoices = self.db.invoices().list_completed(from, to).await?;
        let cash = self.db.payments().list_surcharge_cash(from, to).await?;

        Ok(surcharge_summary(&invoices, &cash))
    }

    /// Per-day sales and surcharge rollup for the window.
    pub async fn daily_rollup(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<PeriodRollup>> {
        let invoices = self.db.invoices().list_completed(from, to).await?;
        let cash = self.db.payments().list_surcharge_cash(from, to).await?;

        Ok(daily_rollup(&invoices, &cash))
    }

    /// Per-month sales and surcharge rollup for the window.
    pub async fn monthly_rollup(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<PeriodRollup>> {
        let invoices = self.db.invoices().list_completed(from, to).await?;
        let cash = self.db.payments().list_surcharge_cash(from, to).await?;

        Ok(monthly_rollup(&invoices, &cash))
    }
}
