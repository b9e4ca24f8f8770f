//! # Vehicle Repository
//!
//! Vehicles plus their per-vehicle inventory projection.
//!
//! The `vehicle_inventory` table has a composite `(vehicle_id, product_id)`
//! primary key and is written only through the transaction-scoped helpers
//! here: [`upsert_increment`] is a single atomic `INSERT .. ON CONFLICT`
//! statement, and [`try_decrement`] is a conditional `UPDATE` whose
//! `rows_affected` tells the caller whether the vehicle actually carried
//! enough stock. Neither helper can produce a negative quantity.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use mandi_core::{Vehicle, VehicleInventory, VehicleInventoryMovement};

const VEHICLE_COLUMNS: &str = "id, name, registration_no, is_active, created_at, updated_at";

const INVENTORY_COLUMNS: &str = "vehicle_id, product_id, quantity, updated_at";

const MOVEMENT_COLUMNS: &str = "\
    id, vehicle_id, product_id, movement_type, quantity, \
    reference_id, reference_type, date, created_at";

/// Repository for vehicles and vehicle inventory.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: SqlitePool,
}

impl VehicleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VehicleRepository { pool }
    }

    // -------------------------------------------------------------------
    // Vehicles
    // -------------------------------------------------------------------

    /// Gets a vehicle by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vehicle>> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = ?1");
        let vehicle = sqlx::query_as::<_, Vehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Lists active vehicles sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Vehicle>> {
        let sql =
            format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE is_active = 1 ORDER BY name");
        let vehicles = sqlx::query_as::<_, Vehicle>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Inserts a new vehicle.
    pub async fn insert(&self, vehicle: &Vehicle) -> DbResult<()> {
        debug!(id = %vehicle.id, name = %vehicle.name, "Inserting vehicle");

        sqlx::query(
            r#"
            INSERT INTO vehicles (id, name, registration_no, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.name)
        .bind(&vehicle.registration_no)
        .bind(vehicle.is_active)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates name and registration.
    pub async fn update(&self, vehicle: &Vehicle) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE vehicles SET name = ?2, registration_no = ?3, is_active = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.name)
        .bind(&vehicle.registration_no)
        .bind(vehicle.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", &vehicle.id));
        }

        Ok(())
    }

    /// Soft-deletes a vehicle. Its inventory rows are kept for audit.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE vehicles SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vehicle", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------
    // Inventory reads
    // -------------------------------------------------------------------

    /// All inventory rows for one vehicle, heaviest first.
    pub async fn inventory_for_vehicle(&self, vehicle_id: &str) -> DbResult<Vec<VehicleInventory>> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM vehicle_inventory \
             WHERE vehicle_id = ?1 ORDER BY quantity DESC"
        );
        let rows = sqlx::query_as::<_, VehicleInventory>(&sql)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// One (vehicle, product) quantity, `None` when the pair never loaded.
    pub async fn inventory_entry(
        &self,
        vehicle_id: &str,
        product_id: &str,
    ) -> DbResult<Option<VehicleInventory>> {
        let sql = format!(
            "SELECT {INVENTORY_COLUMNS} FROM vehicle_inventory \
             WHERE vehicle_id = ?1 AND product_id = ?2"
        );
        let row = sqlx::query_as::<_, VehicleInventory>(&sql)
            .bind(vehicle_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Movement history for one vehicle, newest first.
    pub async fn movements_for_vehicle(
        &self,
        vehicle_id: &str,
        limit: i64,
    ) -> DbResult<Vec<VehicleInventoryMovement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM vehicle_inventory_movements \
             WHERE vehicle_id = ?1 ORDER BY date DESC, created_at DESC LIMIT ?2"
        );
        let rows = sqlx::query_as::<_, VehicleInventoryMovement>(&sql)
            .bind(vehicle_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================

/// Fetches the current quantity for a (vehicle, product) pair on the
/// caller's connection. Missing row means zero.
pub async fn fetch_quantity(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
) -> DbResult<i64> {
    let quantity: Option<i64> = sqlx::query_scalar(
        "SELECT quantity FROM vehicle_inventory WHERE vehicle_id = ?1 AND product_id = ?2",
    )
    .bind(vehicle_id)
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(quantity.unwrap_or(0))
}

/// Atomically adds `quantity` to the (vehicle, product) row, creating it
/// when absent. Single statement, no read-modify-write window.
pub async fn upsert_increment(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO vehicle_inventory (vehicle_id, product_id, quantity, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(vehicle_id, product_id)
        DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at
        "#,
    )
    .bind(vehicle_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Attempts to remove `quantity` from the (vehicle, product) row. Returns
/// `true` when the deduction applied, `false` when the row was missing or
/// held less than requested (the row is then left untouched).
pub async fn try_decrement(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE vehicle_inventory
        SET quantity = quantity - ?3, updated_at = ?4
        WHERE vehicle_id = ?1 AND product_id = ?2 AND quantity >= ?3
        "#,
    )
    .bind(vehicle_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Overwrites the (vehicle, product) quantity, for manual corrections.
pub async fn set_quantity(
    conn: &mut SqliteConnection,
    vehicle_id: &str,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO vehicle_inventory (vehicle_id, product_id, quantity, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(vehicle_id, product_id)
        DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at
        "#,
    )
    .bind(vehicle_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Appends one vehicle-inventory audit movement.
pub async fn insert_movement(
    conn: &mut SqliteConnection,
    movement: &VehicleInventoryMovement,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO vehicle_inventory_movements (
            id, vehicle_id, product_id, movement_type, quantity,
            reference_id, reference_type, date, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.vehicle_id)
    .bind(&movement.product_id)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(&movement.reference_id)
    .bind(&movement.reference_type)
    .bind(movement.date)
    .bind(movement.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
