//! # Stock Ledger
//!
//! The single writer of `Product.current_stock`. Every change flows through
//! [`StockLedger::apply_movement`] or the connection-scoped helpers the
//! document engines call inside their own transactions.
//!
//! ## Clamp Contract
//! Deductions clamp at zero: removing 100 units from a stock of 60 leaves 0,
//! not -40. The movement row still records the REQUESTED quantity, so the
//! audit trail shows intent while the projection absorbs the over-deduction.
//! A `warn!` fires whenever clamping masks a discrepancy.
//!
//! ## Unknown Products
//! A direct call on an unknown product id is an error. Inside document
//! engines the lenient helper is used instead: the line item stands, the
//! stock side effect is skipped with a `warn!`.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use mandi_core::validation::validate_quantity;
use mandi_core::{CoreError, MovementType, Product, StockMovement};
use mandi_db::repository::{generate_id, product as product_repo, stock as stock_repo};
use mandi_db::Database;

use crate::error::EngineResult;

/// Applies stock movements and maintains the clamped stock projection.
#[derive(Debug, Clone)]
pub struct StockLedger {
    db: Database,
}

impl StockLedger {
    pub fn new(db: Database) -> Self {
        StockLedger { db }
    }

    /// Applies one manual stock movement in its own transaction.
    ///
    /// Unknown product ids are an error here; validation runs before any
    /// side effect.
    pub async fn apply_movement(
        &self,
        product_id: &str,
        movement_type: MovementType,
        quantity: i64,
        reason: &str,
        date: DateTime<Utc>,
        reference_id: Option<&str>,
    ) -> EngineResult<StockMovement> {
        validate_quantity(quantity)?;

        let mut tx = self.db.pool().begin().await?;

        let movement = apply_strict(
            &mut tx,
            product_id,
            movement_type,
            quantity,
            reason,
            date,
            reference_id,
        )
        .await?;

        tx.commit().await?;

        info!(
            product_id = %product_id,
            ?movement_type,
            quantity,
            "Stock movement applied"
        );

        Ok(movement)
    }
}

// =============================================================================
// Connection-Scoped Application
// =============================================================================

/// Applies a movement on the caller's connection; unknown product is an
/// error. Used by direct ledger calls.
pub(crate) async fn apply_strict(
    conn: &mut SqliteConnection,
    product_id: &str,
    movement_type: MovementType,
    quantity: i64,
    reason: &str,
    date: DateTime<Utc>,
    reference_id: Option<&str>,
) -> EngineResult<StockMovement> {
    let product = product_repo::fetch_product(conn, product_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", product_id))?;

    apply_to_product(conn, &product, movement_type, quantity, reason, date, reference_id).await
}

/// Applies a movement on the caller's connection; unknown product is
/// tolerated (warn + skip). Used per line item by the document engines.
pub(crate) async fn apply_lenient(
    conn: &mut SqliteConnection,
    product_id: &str,
    movement_type: MovementType,
    quantity: i64,
    reason: &str,
    date: DateTime<Utc>,
    reference_id: Option<&str>,
) -> EngineResult<Option<StockMovement>> {
    let Some(product) = product_repo::fetch_product(conn, product_id).await? else {
        warn!(
            product_id = %product_id,
            reason = %reason,
            "Line item references unknown product; stock movement skipped"
        );
        return Ok(None);
    };

    let movement =
        apply_to_product(conn, &product, movement_type, quantity, reason, date, reference_id)
            .await?;

    Ok(Some(movement))
}

async fn apply_to_product(
    conn: &mut SqliteConnection,
    product: &Product,
    movement_type: MovementType,
    quantity: i64,
    reason: &str,
    date: DateTime<Utc>,
    reference_id: Option<&str>,
) -> EngineResult<StockMovement> {
    let new_stock = match movement_type {
        MovementType::In => product.current_stock + quantity,
        MovementType::Out => {
            if quantity > product.current_stock {
                warn!(
                    product_id = %product.id,
                    current_stock = product.current_stock,
                    requested = quantity,
                    "Stock deduction clamped at zero"
                );
            }
            (product.current_stock - quantity).max(0)
        }
    };

    product_repo::set_stock(conn, &product.id, new_stock).await?;

    let now = Utc::now();
    let movement = StockMovement {
        id: generate_id(),
        product_id: product.id.clone(),
        movement_type,
        quantity,
        reason: reason.to_string(),
        date,
        reference_id: reference_id.map(str::to_string),
        created_at: now,
    };

    stock_repo::insert_movement(conn, &movement).await?;

    Ok(movement)
}
