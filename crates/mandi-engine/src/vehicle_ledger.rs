//! # Vehicle Inventory Ledger
//!
//! Per-vehicle stock projection over the authoritative central ledger.
//! Loads are a single atomic upsert; deductions are a conditional update
//! that either applies in full or reports a [`DeductOutcome::Shortfall`].
//!
//! A shortfall is informational, never fatal: the vehicle projection may
//! lag reality (goods moved between vehicles by hand, a missed load entry)
//! and the invoice that triggered the deduction must still complete.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use mandi_core::validation::validate_quantity;
use mandi_core::{
    CoreError, ValidationError, VehicleInventoryMovement, VehicleMovementType,
    UNKNOWN_PRODUCT_NAME,
};
use mandi_db::repository::{generate_id, vehicle as vehicle_repo};
use mandi_db::Database;

use crate::error::EngineResult;

/// Result of a vehicle-inventory deduction.
///
/// Callers that ignore a `Shortfall` do so consciously; the ledger has
/// already logged it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeductOutcome {
    /// The full quantity came off the vehicle.
    Applied,
    /// The vehicle carried less than requested; nothing was changed.
    Shortfall { available: i64, requested: i64 },
}

/// One line of the per-vehicle stock view, with the product name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleStockLine {
    pub product_id: String,
    /// "Unknown Product" when the catalog row no longer exists.
    pub product_name: String,
    pub unit: Option<String>,
    pub quantity: i64,
}

/// Maintains per-vehicle inventory and its audit movements.
#[derive(Debug, Clone)]
pub struct VehicleLedger {
    db: Database,
}

impl VehicleLedger {
    pub fn new(db: Database) -> Self {
        VehicleLedger { db }
    }

    /// Loads goods onto a vehicle (atomic upsert-increment).
    pub async fn load(
        &self,
        vehicle_id: &str,
        product_id: &str,
        quantity: i64,
        reference_id: Option<&str>,
        reference_type: Option<&str>,
    ) -> EngineResult<()> {
        validate_quantity(quantity)?;
        self.require_vehicle(vehicle_id).await?;

        let mut tx = self.db.pool().begin().await?;

        load_tx(
            &mut tx,
            vehicle_id,
            product_id,
            quantity,
            Utc::now(),
            reference_id,
            reference_type,
        )
        .await?;

        tx.commit().await?;

        info!(vehicle_id = %vehicle_id, product_id = %product_id, quantity, "Vehicle loaded");
        Ok(())
    }

    /// Deducts goods from a vehicle. A shortfall leaves the row untouched
    /// and is reported, not raised.
    pub async fn deduct(
        &self,
        vehicle_id: &str,
        product_id: &str,
        quantity: i64,
        reference_id: Option<&str>,
        reference_type: Option<&str>,
    ) -> EngineResult<DeductOutcome> {
        validate_quantity(quantity)?;
        self.require_vehicle(vehicle_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let outcome = deduct_tx(
            &mut tx,
            vehicle_id,
            product_id,
            quantity,
            Utc::now(),
            reference_id,
            reference_type,
        )
        .await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Overwrites one (vehicle, product) quantity, for physical recounts.
    /// The audit movement records the signed delta.
    pub async fn adjust(
        &self,
        vehicle_id: &str,
        product_id: &str,
        new_quantity: i64,
    ) -> EngineResult<()> {
        if new_quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }
        self.require_vehicle(vehicle_id).await?;

        let mut tx = self.db.pool().begin().await?;

        let old = vehicle_repo::fetch_quantity(&mut tx, vehicle_id, product_id).await?;
        vehicle_repo::set_quantity(&mut tx, vehicle_id, product_id, new_quantity).await?;

        let now = Utc::now();
        let movement = VehicleInventoryMovement {
            id: generate_id(),
            vehicle_id: vehicle_id.to_string(),
            product_id: product_id.to_string(),
            movement_type: VehicleMovementType::Adjustment,
            quantity: new_quantity - old,
            reference_id: None,
            reference_type: Some("manual".to_string()),
            date: now,
            created_at: now,
        };
        vehicle_repo::insert_movement(&mut tx, &movement).await?;

        tx.commit().await?;

        info!(
            vehicle_id = %vehicle_id,
            product_id = %product_id,
            old,
            new = new_quantity,
            "Vehicle inventory adjusted"
        );
        Ok(())
    }

    /// The per-vehicle stock view with product names resolved; dangling
    /// product references fall back to "Unknown Product".
    pub async fn stock_view(&self, vehicle_id: &str) -> EngineResult<Vec<VehicleStockLine>> {
        self.require_vehicle(vehicle_id).await?;

        let rows = self.db.vehicles().inventory_for_vehicle(vehicle_id).await?;
        let products = self.db.products();

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let product = products.get_by_id(&row.product_id).await?;
            let (product_name, unit) = match product {
                Some(p) => (p.name, Some(p.unit)),
                None => (UNKNOWN_PRODUCT_NAME.to_string(), None),
            };

            lines.push(VehicleStockLine {
                product_id: row.product_id,
                product_name,
                unit,
                quantity: row.quantity,
            });
        }

        Ok(lines)
    }

    async fn require_vehicle(&self, vehicle_id: &str) -> EngineResult<()> {
        self.db
            .vehicles()
            .get_by_id(vehicle_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Vehicle", vehicle_id))?;
        Ok(())
    }
}

// =============================================================================
// Connection-Scoped Application
// =============================================================================

/// Loads goods onto a vehicle on the caller's connection.
pub(crate) async fn load_tx(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
    quantity: i64,
    date: DateTime<Utc>,
    reference_id: Option<&str>,
    reference_type: Option<&str>,
) -> EngineResult<()> {
    vehicle_repo::upsert_increment(conn, vehicle_id, product_id, quantity).await?;

    let now = Utc::now();
    let movement = VehicleInventoryMovement {
        id: generate_id(),
        vehicle_id: vehicle_id.to_string(),
        product_id: product_id.to_string(),
        movement_type: VehicleMovementType::Load,
        quantity,
        reference_id: reference_id.map(str::to_string),
        reference_type: reference_type.map(str::to_string),
        date,
        created_at: now,
    };
    vehicle_repo::insert_movement(conn, &movement).await?;

    Ok(())
}

/// Deducts goods from a vehicle on the caller's connection. The audit
/// movement is written only when the deduction actually applied.
pub(crate) async fn deduct_tx(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
    quantity: i64,
    date: DateTime<Utc>,
    reference_id: Option<&str>,
    reference_type: Option<&str>,
) -> EngineResult<DeductOutcome> {
    let applied = vehicle_repo::try_decrement(conn, vehicle_id, product_id, quantity).await?;

    if !applied {
        let available = vehicle_repo::fetch_quantity(conn, vehicle_id, product_id).await?;
        warn!(
            vehicle_id = %vehicle_id,
            product_id = %product_id,
            available,
            requested = quantity,
            "Vehicle inventory shortfall; deduction skipped"
        );
        return Ok(DeductOutcome::Shortfall {
            available,
            requested: quantity,
        });
    }

    let now = Utc::now();
    let movement = VehicleInventoryMovement {
        id: generate_id(),
        vehicle_id: vehicle_id.to_string(),
        product_id: product_id.to_string(),
        movement_type: VehicleMovementType::Sale,
        quantity,
        reference_id: reference_id.map(str::to_string),
        reference_type: reference_type.map(str::to_string),
        date,
        created_at: now,
    };
    vehicle_repo::insert_movement(conn, &movement).await?;

    Ok(DeductOutcome::Applied)
}
