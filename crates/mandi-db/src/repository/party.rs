//! # Party Repositories
//!
//! Vendors and customers. Both are immutable once referenced by a document
//! except for contact-field edits, which is why `update_contact` touches
//! only phone/address/email (and the display name, which the business does
//! correct in practice).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mandi_core::{Customer, Vendor};

const PARTY_COLUMNS: &str =
    "id, name, phone, address, email, is_active, created_at, updated_at";

// =============================================================================
// Vendor Repository
// =============================================================================

/// Repository for vendor database operations.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Gets a vendor by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vendor>> {
        let sql = format!("SELECT {PARTY_COLUMNS} FROM vendors WHERE id = ?1");
        let vendor = sqlx::query_as::<_, Vendor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vendor)
    }

    /// Lists active vendors sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Vendor>> {
        let sql =
            format!("SELECT {PARTY_COLUMNS} FROM vendors WHERE is_active = 1 ORDER BY name");
        let vendors = sqlx::query_as::<_, Vendor>(&sql).fetch_all(&self.pool).await?;

        Ok(vendors)
    }

    /// Inserts a new vendor.
    pub async fn insert(&self, vendor: &Vendor) -> DbResult<()> {
        debug!(id = %vendor.id, name = %vendor.name, "Inserting vendor");

        sqlx::query(
            r#"
            INSERT INTO vendors (id, name, phone, address, email, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.phone)
        .bind(&vendor.address)
        .bind(&vendor.email)
        .bind(vendor.is_active)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Edits name/contact fields. The only permitted mutation once the
    /// vendor is referenced by purchases.
    pub async fn update_contact(
        &self,
        id: &str,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE vendors SET name = ?2, phone = ?3, address = ?4, email = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vendor", id));
        }

        Ok(())
    }

    /// Soft-deletes a vendor.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE vendors SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vendor", id));
        }

        Ok(())
    }
}

// =============================================================================
// Customer Repository
// =============================================================================

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {PARTY_COLUMNS} FROM customers WHERE id = ?1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists active customers sorted by name.
    pub async fn list_active(&self) -> DbResult<Vec<Customer>> {
        let sql =
            format!("SELECT {PARTY_COLUMNS} FROM customers WHERE is_active = 1 ORDER BY name");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, address, email, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.email)
        .bind(customer.is_active)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Edits name/contact fields.
    pub async fn update_contact(
        &self,
        id: &str,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
        email: Option<&str>,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE customers SET name = ?2, phone = ?3, address = ?4, email = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .bind(email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Soft-deletes a customer.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE customers SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}
