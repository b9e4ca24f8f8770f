//! # Payment Repository
//!
//! Vendor payments, customer payments, and cash-collected surcharge. All
//! three tables are append-only; balances are always derived by summing,
//! never stored.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use mandi_core::{CustomerPayment, SurchargeCashPayment, VendorPayment};

const VENDOR_PAYMENT_COLUMNS: &str =
    "id, vendor_id, purchase_id, amount_paise, date, payment_method, notes, created_at";

const CUSTOMER_PAYMENT_COLUMNS: &str =
    "id, customer_id, invoice_id, amount_paise, date, payment_method, notes, created_at";

const SURCHARGE_CASH_COLUMNS: &str =
    "id, customer_id, invoice_id, amount_paise, date, notes, created_at";

/// Repository for all three payment families.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    // -------------------------------------------------------------------
    // Vendor payments
    // -------------------------------------------------------------------

    /// Records a payment made to a vendor.
    pub async fn insert_vendor_payment(&self, payment: &VendorPayment) -> DbResult<()> {
        debug!(
            vendor_id = %payment.vendor_id,
            amount_paise = payment.amount_paise,
            "Recording vendor payment"
        );

        sqlx::query(
            r#"
            INSERT INTO vendor_payments (
                id, vendor_id, purchase_id, amount_paise, date, payment_method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.vendor_id)
        .bind(&payment.purchase_id)
        .bind(payment.amount_paise)
        .bind(payment.date)
        .bind(payment.payment_method)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Payments made to one vendor, newest first.
    pub async fn list_vendor_payments(&self, vendor_id: &str) -> DbResult<Vec<VendorPayment>> {
        let sql = format!(
            "SELECT {VENDOR_PAYMENT_COLUMNS} FROM vendor_payments \
             WHERE vendor_id = ?1 ORDER BY date DESC, created_at DESC"
        );
        let payments = sqlx::query_as::<_, VendorPayment>(&sql)
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Total paise paid to one vendor.
    pub async fn sum_vendor_payments(&self, vendor_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_paise) FROM vendor_payments WHERE vendor_id = ?1")
                .bind(vendor_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    // -------------------------------------------------------------------
    // Customer payments
    // -------------------------------------------------------------------

    /// Records a payment received from a customer.
    pub async fn insert_customer_payment(&self, payment: &CustomerPayment) -> DbResult<()> {
        debug!(
            customer_id = %payment.customer_id,
            amount_paise = payment.amount_paise,
            "Recording customer payment"
        );

        sqlx::query(
            r#"
            INSERT INTO customer_payments (
                id, customer_id, invoice_id, amount_paise, date, payment_method, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.customer_id)
        .bind(&payment.invoice_id)
        .bind(payment.amount_paise)
        .bind(payment.date)
        .bind(payment.payment_method)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Payments received from one customer, newest first.
    pub async fn list_customer_payments(
        &self,
        customer_id: &str,
    ) -> DbResult<Vec<CustomerPayment>> {
        let sql = format!(
            "SELECT {CUSTOMER_PAYMENT_COLUMNS} FROM customer_payments \
             WHERE customer_id = ?1 ORDER BY date DESC, created_at DESC"
        );
        let payments = sqlx::query_as::<_, CustomerPayment>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Total paise received from one customer.
    pub async fn sum_customer_payments(&self, customer_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount_paise) FROM customer_payments WHERE customer_id = ?1",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    // -------------------------------------------------------------------
    // Surcharge collected in cash
    // -------------------------------------------------------------------

    /// Records hamali collected in cash outside the invoice flow.
    pub async fn insert_surcharge_cash(&self, payment: &SurchargeCashPayment) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO surcharge_cash_payments (
                id, customer_id, invoice_id, amount_paise, date, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.customer_id)
        .bind(&payment.invoice_id)
        .bind(payment.amount_paise)
        .bind(payment.date)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Cash-collected surcharge in a date window, for reports.
    pub async fn list_surcharge_cash(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<SurchargeCashPayment>> {
        let sql = format!(
            "SELECT {SURCHARGE_CASH_COLUMNS} FROM surcharge_cash_payments \
             WHERE date >= ?1 AND date <= ?2 ORDER BY date"
        );
        let payments = sqlx::query_as::<_, SurchargeCashPayment>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }
}
