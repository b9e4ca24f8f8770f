//! # Balance Calculator
//!
//! Derives vendor and customer positions from the raw completed-document
//! and payment sums. Nothing here is stored; every call recomputes from
//! the store, so a balance can never drift from its source rows.

use serde::Serialize;

use mandi_core::balance::{customer_balance, vendor_balance, CustomerBalance, VendorBalance};
use mandi_core::validation::validate_payment_amount;
use mandi_core::{
    CoreError, CustomerPayment, Money, PaymentMethod, SurchargeCashPayment, VendorPayment,
};
use mandi_db::repository::generate_id;
use mandi_db::Database;

use crate::error::EngineResult;

/// One row of the all-vendors balance report.
#[derive(Debug, Clone, Serialize)]
pub struct VendorBalanceRow {
    pub vendor_id: String,
    pub vendor_name: String,
    #[serde(flatten)]
    pub balance: VendorBalance,
}

/// One row of the all-customers balance report.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerBalanceRow {
    pub customer_id: String,
    pub customer_name: String,
    #[serde(flatten)]
    pub balance: CustomerBalance,
}

/// Derives balances and records payments.
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    db: Database,
}

impl BalanceCalculator {
    pub fn new(db: Database) -> Self {
        BalanceCalculator { db }
    }

    /// Position of one vendor:
    /// `purchases - payments - returns` over completed documents.
    pub async fn vendor_balance(&self, vendor_id: &str) -> EngineResult<VendorBalance> {
        self.require_vendor(vendor_id).await?;

        let purchases = self.db.purchases().sum_completed_for_vendor(vendor_id).await?;
        let payments = self.db.payments().sum_vendor_payments(vendor_id).await?;
        let returns = self
            .db
            .vendor_returns()
            .sum_completed_for_vendor(vendor_id)
            .await?;

        Ok(vendor_balance(
            Money::from_paise(purchases),
            Money::from_paise(payments),
            Money::from_paise(returns),
        ))
    }

    /// Position of one customer: `invoiced - payments`, with status.
    pub async fn customer_balance(&self, customer_id: &str) -> EngineResult<CustomerBalance> {
        self.require_customer(customer_id).await?;

        let invoiced = self
            .db
            .invoices()
            .sum_completed_for_customer(customer_id)
            .await?;
        let payments = self.db.payments().sum_customer_payments(customer_id).await?;

        Ok(customer_balance(
            Money::from_paise(invoiced),
            Money::from_paise(payments),
        ))
    }

    /// Balance report across all active vendors.
    pub async fn vendor_balances(&self) -> EngineResult<Vec<VendorBalanceRow>> {
        let vendors = self.db.vendors().list_active().await?;

        let mut rows = Vec::with_capacity(vendors.len());
        for vendor in vendors {
            let balance = self.vendor_balance(&vendor.id).await?;
            rows.push(VendorBalanceRow {
                vendor_id: vendor.id,
                vendor_name: vendor.name,
                balance,
            });
        }

        Ok(rows)
    }

    /// Balance report across all active customers.
    pub async fn customer_balances(&self) -> EngineResult<Vec<CustomerBalanceRow>> {
        let customers = self.db.customers().list_active().await?;

        let mut rows = Vec::with_capacity(customers.len());
        for customer in customers {
            let balance = self.customer_balance(&customer.id).await?;
            rows.push(CustomerBalanceRow {
                customer_id: customer.id,
                customer_name: customer.name,
                balance,
            });
        }

        Ok(rows)
    }

    /// Records a payment made to a vendor.
    pub async fn record_vendor_payment(
        &self,
        vendor_id: &str,
        purchase_id: Option<&str>,
        amount_paise: i64,
        method: PaymentMethod,
        notes: Option<&str>,
    ) -> EngineResult<VendorPayment> {
        validate_payment_amount(amount_paise)?;
        self.require_vendor(vendor_id).await?;

        let now = chrono::Utc::now();
        let payment = VendorPayment {
            id: generate_id(),
            vendor_id: vendor_id.to_string(),
            purchase_id: purchase_id.map(str::to_string),
            amount_paise,
            date: now,
            payment_method: method,
            notes: notes.map(str::to_string),
            created_at: now,
        };

        self.db.payments().insert_vendor_payment(&payment).await?;
        Ok(payment)
    }

    /// Records a payment received from a customer.
    pub async fn record_customer_payment(
        &self,
        customer_id: &str,
        invoice_id: Option<&str>,
        amount_paise: i64,
        method: PaymentMethod,
        notes: Option<&str>,
    ) -> EngineResult<CustomerPayment> {
        validate_payment_amount(amount_paise)?;
        self.require_customer(customer_id).await?;

        let now = chrono::Utc::now();
        let payment = CustomerPayment {
            id: generate_id(),
            customer_id: customer_id.to_string(),
            invoice_id: invoice_id.map(str::to_string),
            amount_paise,
            date: now,
            payment_method: method,
            notes: notes.map(str::to_string),
            created_at: now,
        };

        self.db.payments().insert_customer_payment(&payment).await?;
        Ok(payment)
    }

    /// Records hamali collected in cash outside the invoice flow.
    pub async fn record_surcharge_cash(
        &self,
        customer_id: Option<&str>,
        invoice_id: Option<&str>,
        amount_paise: i64,
        notes: Option<&str>,
    ) -> EngineResult<SurchargeCashPayment> {
        validate_payment_amount(amount_paise)?;
        if let Some(id) = customer_id {
            self.require_customer(id).await?;
        }

        let now = chrono::Utc::now();
        let payment = SurchargeCashPayment {
            id: generate_id(),
            customer_id: customer_id.map(str::to_string),
            invoice_id: invoice_id.map(str::to_string),
            amount_paise,
            date: now,
            notes: notes.map(str::to_string),
            created_at: now,
        };

        self.db.payments().insert_surcharge_cash(&payment).await?;
        Ok(payment)
    }

    async fn require_vendor(&self, vendor_id: &str) -> EngineResult<()> {
        self.db
            .vendors()
            .get_by_id(vendor_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Vendor", vendor_id))?;
        Ok(())
    }

    async fn require_customer(&self, customer_id: &str) -> EngineResult<()> {
        self.db
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Customer", customer_id))?;
        Ok(())
    }
}
