//! # Purchase and Vendor Return Repositories
//!
//! Read access for the two vendor-side document families plus the
//! transaction-scoped insert helpers the purchase engine drives. Document
//! headers and their items are always written inside the caller's
//! transaction so a failed line never leaves a half-written document.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use mandi_core::{Purchase, PurchaseItem, VendorReturn, VendorReturnItem};

const PURCHASE_COLUMNS: &str =
    "id, vendor_id, vehicle_id, date, total_amount_paise, status, created_at, updated_at";

const PURCHASE_ITEM_COLUMNS: &str =
    "id, purchase_id, product_id, quantity, unit_price_paise, total_paise, created_at";

const RETURN_COLUMNS: &str =
    "id, vendor_id, vehicle_id, date, total_amount_paise, reason, status, created_at";

const RETURN_ITEM_COLUMNS: &str =
    "id, return_id, product_id, quantity, unit_price_paise, total_paise, created_at";

// =============================================================================
// Purchase Repository
// =============================================================================

/// Repository for purchase reads and aggregates.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Gets a purchase header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let sql = format!("SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = ?1");
        let purchase = sqlx::query_as::<_, Purchase>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(purchase)
    }

    /// Items of one purchase, in insertion order.
    pub async fn get_items(&self, purchase_id: &str) -> DbResult<Vec<PurchaseItem>> {
        let sql = format!(
            "SELECT {PURCHASE_ITEM_COLUMNS} FROM purchase_items \
             WHERE purchase_id = ?1 ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, PurchaseItem>(&sql)
            .bind(purchase_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Completed purchases for one vendor, newest first.
    pub async fn list_for_vendor(&self, vendor_id: &str) -> DbResult<Vec<Purchase>> {
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases \
             WHERE vendor_id = ?1 AND status = 'completed' ORDER BY date DESC"
        );
        let purchases = sqlx::query_as::<_, Purchase>(&sql)
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(purchases)
    }

    /// All completed purchases in a date window, for reports.
    pub async fn list_completed(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> DbResult<Vec<Purchase>> {
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases \
             WHERE status = 'completed' AND date >= ?1 AND date <= ?2 ORDER BY date"
        );
        let purchases = sqlx::query_as::<_, Purchase>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(purchases)
    }

    /// Total paise of completed purchases for one vendor.
    pub async fn sum_completed_for_vendor(&self, vendor_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_amount_paise) FROM purchases \
             WHERE vendor_id = ?1 AND status = 'completed'",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

/// Inserts a purchase header on the caller's connection.
pub async fn insert_purchase(conn: &mut SqliteConnection, purchase: &Purchase) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO purchases (
            id, vendor_id, vehicle_id, date, total_amount_paise, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&purchase.id)
    .bind(&purchase.vendor_id)
    .bind(&purchase.vehicle_id)
    .bind(purchase.date)
    .bind(purchase.total_amount_paise)
    .bind(purchase.status)
    .bind(purchase.created_at)
    .bind(purchase.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts one purchase line on the caller's connection.
pub async fn insert_purchase_item(
    conn: &mut SqliteConnection,
    item: &PurchaseItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_items (
            id, purchase_id, product_id, quantity, unit_price_paise, total_paise, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.purchase_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_paise)
    .bind(item.total_paise)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Vendor Return Repository
// =============================================================================

/// Repository for vendor-return reads and aggregates.
#[derive(Debug, Clone)]
pub struct VendorReturnRepository {
    pool: SqlitePool,
}

impl VendorReturnRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VendorReturnRepository { pool }
    }

    /// Gets a return header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<VendorReturn>> {
        let sql = format!("SELECT {RETURN_COLUMNS} FROM vendor_returns WHERE id = ?1");
        let ret = sqlx::query_as::<_, VendorReturn>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ret)
    }

    /// Items of one return, in insertion order.
    pub async fn get_items(&self, return_id: &str) -> DbResult<Vec<VendorReturnItem>> {
        let sql = format!(
            "SELECT {RETURN_ITEM_COLUMNS} FROM vendor_return_items \
             WHERE return_id = ?1 ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, VendorReturnItem>(&sql)
            .bind(return_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Completed returns for one vendor, newest first.
    pub async fn list_for_vendor(&self, vendor_id: &str) -> DbResult<Vec<VendorReturn>> {
        let sql = format!(
            "SELECT {RETURN_COLUMNS} FROM vendor_returns \
             WHERE vendor_id = ?1 AND status = 'completed' ORDER BY date DESC"
        );
        let returns = sqlx::query_as::<_, VendorReturn>(&sql)
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(returns)
    }

    /// All completed returns in a date window, for reports.
    pub async fn list_completed(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    ) -> DbResult<Vec<VendorReturn>> {
        let sql = format!(
            "SELECT {RETURN_COLUMNS} FROM vendor_returns \
             WHERE status = 'completed' AND date >= ?1 AND date <= ?2 ORDER BY date"
        );
        let returns = sqlx::query_as::<_, VendorReturn>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(returns)
    }

    /// Total paise of completed returns for one vendor.
    pub async fn sum_completed_for_vendor(&self, vendor_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_amount_paise) FROM vendor_returns \
             WHERE vendor_id = ?1 AND status = 'completed'",
        )
        .bind(vendor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

/// Inserts a return header on the caller's connection.
pub async fn insert_return(conn: &mut SqliteConnection, ret: &VendorReturn) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vendor_returns (
            id, vendor_id, vehicle_id, date, total_amount_paise, reason, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&ret.id)
    .bind(&ret.vendor_id)
    .bind(&ret.vehicle_id)
    .bind(ret.date)
    .bind(ret.total_amount_paise)
    .bind(&ret.reason)
    .bind(ret.status)
    .bind(ret.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts one return line on the caller's connection.
pub async fn insert_return_item(
    conn: &mut SqliteConnection,
    item: &VendorReturnItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vendor_return_items (
            id, return_id, product_id, quantity, unit_price_paise, total_paise, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&item.id)
    .bind(&item.return_id)
    .bind(&item.product_id)
    .bind(item.quantity)
    .bind(item.unit_price_paise)
    .bind(item.total_paise)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
