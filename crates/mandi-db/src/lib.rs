//! # mandi-db: Database Layer for Mandi Ledger
//!
//! This crate provides database access for the Mandi Ledger system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Mandi Ledger Data Flow                       │
//! │                                                                  │
//! │  Engine call (create_invoice)                                    │
//! │       │                                                          │
//! │       ▼                                                          │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │                  mandi-db (THIS CRATE)                     │ │
//! │  │                                                            │ │
//! │  │  ┌─────────────┐   ┌────────────────┐   ┌──────────────┐  │ │
//! │  │  │  Database   │   │  Repositories  │   │  Migrations  │  │ │
//! │  │  │  (pool.rs)  │   │ (invoice.rs..) │   │  (embedded)  │  │ │
//! │  │  │             │   │                │   │              │  │ │
//! │  │  │ SqlitePool  │◄──│ InvoiceRepo    │   │ 001_init.sql │  │ │
//! │  │  │ WAL, FK on  │   │ ProductRepo    │   │ 002_idx.sql  │  │ │
//! │  │  └─────────────┘   └────────────────┘   └──────────────┘  │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! │       │                                                          │
//! │       ▼                                                          │
//! │              SQLite database file (mandi.db)                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, invoice, etc.)
//!
//! ## Write Discipline
//! Reads and single-row writes go through the pool-based repositories.
//! Multi-row document writes (invoice + items + ledger movements) go
//! through the transaction-scoped free functions in [`repository`], all
//! on one connection owned by the calling engine's transaction.
//!
//! ## Usage
//! ```rust,ignore
//! use mandi_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mandi.db")).await?;
//! let products = db.products().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::generate_id;
pub use repository::invoice::InvoiceRepository;
pub use repository::party::{CustomerRepository, VendorRepository};
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::{PurchaseRepository, VendorReturnRepository};
pub use repository::settings::SettingsRepository;
pub use repository::stock::StockMovementRepository;
pub use repository::vehicle::VehicleRepository;
