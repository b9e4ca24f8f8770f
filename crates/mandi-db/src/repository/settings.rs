//! # Company Settings Repository
//!
//! The `company_settings` table holds exactly one row (`id = 1`, enforced
//! by a CHECK constraint). Reads fall back to sensible defaults so a fresh
//! database works before anything is configured.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::DbResult;
use mandi_core::CompanySettings;

const SETTINGS_COLUMNS: &str =
    "id, name, address, phone, email, default_surcharge_rate_bps, updated_at";

/// Repository for the singleton settings row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets the settings row, or defaults when never configured.
    pub async fn get(&self) -> DbResult<CompanySettings> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM company_settings WHERE id = 1");
        let settings = sqlx::query_as::<_, CompanySettings>(&sql)
            .fetch_optional(&self.pool)
            .await?;

        Ok(settings.unwrap_or_else(default_settings))
    }

    /// Creates or overwrites the settings row.
    pub async fn upsert(&self, settings: &CompanySettings) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO company_settings (
                id, name, address, phone, email, default_surcharge_rate_bps, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                default_surcharge_rate_bps = excluded.default_surcharge_rate_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&settings.name)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.email)
        .bind(settings.default_surcharge_rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn default_settings() -> CompanySettings {
    CompanySettings {
        id: 1,
        name: "Mandi Ledger".to_string(),
        address: None,
        phone: None,
        email: None,
        default_surcharge_rate_bps: 0,
        updated_at: Utc::now(),
    }
}
