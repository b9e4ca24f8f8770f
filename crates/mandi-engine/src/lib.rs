//! # mandi-engine: Business Engines for Mandi Ledger
//!
//! Orchestration layer between the pure logic in mandi-core and the SQLite
//! store in mandi-db. Every multi-write operation here runs inside a single
//! transaction on one connection, so a failure mid-document rolls the whole
//! document back.
//!
//! ## Engines
//!
//! - [`StockLedger`] - the single writer of `Product.current_stock`;
//!   clamp-at-zero deductions with requested quantities in the audit trail
//! - [`VehicleLedger`] - per-vehicle inventory projection; atomic loads,
//!   shortfall-reporting deductions, manual recounts
//! - [`InvoiceEngine`] - invoice creation (subtotal + surcharge + both
//!   ledgers) and revision (totals only, no stock effects)
//! - [`PurchaseEngine`] - purchases and vendor returns, mirrored in/out
//! - [`BalanceCalculator`] - derived vendor/customer positions and payment
//!   recording
//! - [`ReportAggregator`] - profit/loss, margins, surcharge and period
//!   rollups over a date window
//!
//! ## Usage
//! ```rust,ignore
//! use mandi_db::{Database, DbConfig};
//! use mandi_engine::{InvoiceEngine, NewInvoice};
//!
//! let db = Database::new(DbConfig::new("mandi.db")).await?;
//! let engine = InvoiceEngine::new(db.clone());
//! let invoice = engine.create_invoice(request).await?;
//! assert!(invoice.totals_consistent());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod invoice;
pub mod purchase;
pub mod report;
pub mod stock_ledger;
pub mod vehicle_ledger;

// =============================================================================
// Re-exports
// =============================================================================

pub use balance::{BalanceCalculator, CustomerBalanceRow, VendorBalanceRow};
pub use error::{EngineError, EngineResult};
pub use invoice::{InvoiceEngine, NewInvoice, NewLineItem};
pub use purchase::{NewPurchase, NewVendorReturn, PurchaseEngine};
pub use report::ReportAggregator;
pub use stock_ledger::StockLedger;
pub use vehicle_ledger::{DeductOutcome, VehicleLedger, VehicleStockLine};
