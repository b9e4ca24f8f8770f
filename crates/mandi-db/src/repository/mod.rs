//! # Repositories
//!
//! One repository per entity family. Each repository owns pool-based
//! read/CRUD methods; write helpers that must participate in an engine
//! transaction are free functions taking `&mut SqliteConnection`.

use uuid::Uuid;

pub mod invoice;
pub mod party;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod settings;
pub mod stock;
pub mod vehicle;

/// Generates a new entity id (UUID v4 string).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
