//! # mandi-core: Pure Business Logic for Mandi Ledger
//!
//! This crate is the heart of the wholesale-produce management system. It
//! contains the invoice/surcharge arithmetic, balance rules, and report
//! projections as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  REST handlers / TypeScript SPA (out of scope here)        │
//! └──────────────────────────────┬─────────────────────────────┘
//!                                │
//! ┌──────────────────────────────▼─────────────────────────────┐
//! │  mandi-engine: invoice/purchase engines, stock & vehicle   │
//! │  ledgers, balance calculator, report aggregator            │
//! └───────────────┬───────────────────────────┬────────────────┘
//!                 │                           │
//! ┌───────────────▼──────────────┐ ┌──────────▼────────────────┐
//! │  ★ mandi-core (THIS CRATE) ★ │ │  mandi-db: SQLite         │
//! │  money · types · surcharge   │ │  repositories, migrations │
//! │  balance · report · checks   │ │                           │
//! │  NO I/O · PURE FUNCTIONS     │ └───────────────────────────┘
//! └──────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer `Money` in paise (no floating point!)
//! - [`types`] - Domain entities (Product, Invoice, StockMovement, ...)
//! - [`surcharge`] - The tagged hamali surcharge configuration
//! - [`balance`] - Vendor/customer balance arithmetic and payment status
//! - [`report`] - Profit/loss, margins, surcharge and period rollups
//! - [`validation`] - Input validators run before any side effect
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output, always
//! 2. **No I/O**: database, network, and file access are forbidden here
//! 3. **Integer money**: all monetary values are paise (i64)
//! 4. **Explicit errors**: typed enums, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod money;
pub mod report;
pub mod surcharge;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use balance::{CustomerBalance, PaymentStatus, VendorBalance};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use surcharge::{SurchargeConfig, SurchargeMode};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity a single line item or stock movement may carry.
///
/// ## Business Reason
/// Guards against fat-finger entries (typing 100000 instead of 100) in a
/// business whose largest real lots are a few thousand units.
pub const MAX_LINE_ITEM_QUANTITY: i64 = 100_000;

/// Display-time fallback when a line item references a product that no
/// longer exists (dangling references are tolerated, not rejected).
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";
