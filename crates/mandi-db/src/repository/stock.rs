//! # Stock Movement Repository
//!
//! The append-only central stock ledger. Movements are never updated or
//! deleted; `Product.current_stock` is the clamped projection over them.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;
use mandi_core::StockMovement;

const MOVEMENT_COLUMNS: &str =
    "id, product_id, movement_type, quantity, reason, date, reference_id, created_at";

/// Repository for stock-movement reads.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
}

impl StockMovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockMovementRepository { pool }
    }

    /// Movement history for one product, newest first.
    pub async fn list_for_product(
        &self,
        product_id: &str,
        limit: i64,
    ) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
             WHERE product_id = ?1 ORDER BY date DESC, created_at DESC LIMIT ?2"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(product_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Most recent movements across all products.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
             ORDER BY date DESC, created_at DESC LIMIT ?1"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }

    /// Movements tied to one document (purchase, invoice, return).
    pub async fn list_for_reference(&self, reference_id: &str) -> DbResult<Vec<StockMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements \
             WHERE reference_id = ?1 ORDER BY created_at"
        );
        let movements = sqlx::query_as::<_, StockMovement>(&sql)
            .bind(reference_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(movements)
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

/// Appends one stock movement on the caller's connection.
pub async fn insert_movement(
    conn: &mut SqliteConnection,
    movement: &StockMovement,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, product_id, movement_type, quantity, reason, date, reference_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(&movement.reason)
    .bind(movement.date)
    .bind(&movement.reference_id)
    .bind(movement.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
