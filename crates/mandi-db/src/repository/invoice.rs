//! # Invoice Repository
//!
//! Reads, aggregates, and the transaction-scoped writes the invoice engine
//! drives. Revision replaces the full item set and overwrites the header
//! totals in one transaction; the `grand_total = subtotal + surcharge`
//! invariant is enforced by the engine before anything reaches here.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use mandi_core::{Invoice, InvoiceItem};

const INVOICE_COLUMNS: &str = "\
    id, invoice_number, customer_id, vehicle_id, date, subtotal_paise, \
    include_surcharge, surcharge_mode, surcharge_rate, surcharge_amount_paise, \
    grand_total_paise, status, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, quantity, unit_price_paise, total_paise, created_at";

/// Repository for invoice reads and aggregates.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1");
        let invoice = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Items of one invoice, in insertion order.
    pub async fn get_items(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items \
             WHERE invoice_id = ?1 ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, InvoiceItem>(&sql)
            .bind(invoice_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Completed invoices for one customer, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE customer_id = ?1 AND status = 'completed' ORDER BY date DESC"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    /// All completed invoices in a date window, for reports.
    pub async fn list_completed(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE status = 'completed' AND date >= ?1 AND date <= ?2 ORDER BY date"
        );
        let invoices = sqlx::query_as::<_, Invoice>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }

    /// Total paise invoiced (grand totals) to one customer, completed only.
    pub async fn sum_completed_for_customer(&self, customer_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(grand_total_paise) FROM invoices \
             WHERE customer_id = ?1 AND status = 'completed'",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }

    /// Count of invoices dated on the given calendar day, for numbering.
    pub async fn count_on_day(&self, day_prefix: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE invoice_number LIKE ?1",
        )
        .bind(format!("INV-{day_prefix}-%"))
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

/// Inserts an invoice header on the caller's connection.
pub async fn insert_invoice(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, invoice_number, customer_id, vehicle_id, date, subtotal_paise,
            include_surcharge, surcharge_mode, surcharge_rate, surcharge_amount_paise,
            grand_total_paise, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.invoice_number)
    .bind(&invoice.customer_id)
    .bind(&invoice.vehicle_id)
    .bind(invoice.date)
    .bind(invoice.subtotal_paise)
    .bind(invoice.include_surcharge)
    .bind(invoice.surcharge_mode)
    .bind(invoice.surcharge_rate)
    .bind(invoice.surcharge_amount_paise)
    .bind(invoice.grand_total_paise)
    .bind(invoice.status)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts one invoice line on the caller's connection.
pub async fn insert_item(conn: &mut SqliteConnection, item: &InvoiceItem) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO invoice_items (
            id, invoice_id, product_id, quantity, unit_price_paise, total_paise, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.invoice_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_paise)
    .bind(item.total_paise)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Overwrites header totals during revision. Both totals fields move
/// together so the consistency invariant cannot be half-applied.
pub async fn update_totals(
    conn: &mut SqliteConnection,
    invoice_id: &str,
    subtotal_paise: i64,
    surcharge_amount_paise: i64,
    grand_total_paise: i64,
) -> DbResult<()> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE invoices SET
            subtotal_paise = ?2,
            surcharge_amount_paise = ?3,
            grand_total_paise = ?4,
            updated_at = ?5
        WHERE id = ?1
        "#,
    )
    .bind(invoice_id)
    .bind(subtotal_paise)
    .bind(surcharge_amount_paise)
    .bind(grand_total_paise)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Deletes all items of one invoice, during revision.
pub async fn delete_items(conn: &mut SqliteConnection, invoice_id: &str) -> DbResult<()> {
    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
