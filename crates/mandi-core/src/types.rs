//! # Domain Types
//!
//! Core domain types used throughout Mandi Ledger.
//!
//! ## Entity Families
//! - Catalog: [`Product`], [`Vendor`], [`Customer`], [`Vehicle`]
//! - Documents: [`Purchase`]/[`PurchaseItem`], [`Invoice`]/[`InvoiceItem`],
//!   [`VendorReturn`]/[`VendorReturnItem`]
//! - Ledgers: [`StockMovement`], [`VehicleInventory`],
//!   [`VehicleInventoryMovement`]
//! - Payments: [`VendorPayment`], [`CustomerPayment`],
//!   [`SurchargeCashPayment`]
//! - Configuration: [`CompanySettings`]
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an immutable UUID v4 `id` used for relations; invoices
//! additionally carry a human-readable `invoice_number` (display-level
//! uniqueness only, not a hard constraint).
//!
//! All monetary fields are integer paise (`*_paise: i64`); use the
//! `Money`-returning accessors for arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::surcharge::SurchargeMode;

// =============================================================================
// Movement and Status Enums
// =============================================================================

/// Direction of a central stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Stock arriving (purchase, correction upward).
    In,
    /// Stock leaving (invoice, vendor return, correction downward).
    Out,
}

/// Kind of a vehicle-scoped inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMovementType {
    /// Goods loaded onto the vehicle (purchase inbound).
    Load,
    /// Goods sold off the vehicle (invoice, vendor return).
    Sale,
    /// Manual correction.
    Adjustment,
}

/// Lifecycle status of a purchase, invoice, or vendor return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is committed and drives ledgers.
    Completed,
    /// Document was cancelled; kept for audit display.
    Cancelled,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Completed
    }
}

/// How a payment was received or made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    BankTransfer,
    Cheque,
}

// =============================================================================
// Product
// =============================================================================

/// A produce item tracked in the central stock ledger.
///
/// `current_stock` is mutated only via the Stock Ledger; it is clamped at
/// zero on deduction (over-deduction is absorbed, never an error).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Tomato (Desi)".
    pub name: String,

    /// Sale/stock unit: "KG", "Box", "Bag", ...
    pub unit: String,

    /// Default buying price per unit, in paise.
    pub purchase_price_paise: i64,

    /// Default selling price per unit, in paise.
    pub sale_price_paise: i64,

    /// Current stock level in units. Never negative.
    pub current_stock: i64,

    /// Stock level at or below which the product shows as low-stock.
    pub reorder_level: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Default purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_paise(self.purchase_price_paise)
    }

    /// Default sale price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_paise(self.sale_price_paise)
    }

    /// Per-unit margin at the default prices.
    #[inline]
    pub fn margin(&self) -> Money {
        self.sale_price() - self.purchase_price()
    }

    /// Whether the product is at or below its reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.reorder_level
    }
}

// =============================================================================
// Parties: Vendor / Customer
// =============================================================================

/// A supplier the business buys from.
///
/// Immutable once referenced by a purchase, except for contact-field edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A buyer the business invoices.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Vehicle
// =============================================================================

/// A delivery vehicle carrying its own inventory projection.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Vehicle {
    pub id: String,
    /// Display name, e.g. "Tata Ace #2".
    pub name: String,
    /// Registration plate, e.g. "MH-12-AB-1234".
    pub registration_no: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// An incoming stock document from a vendor.
///
/// Creation is atomic: every item drives one inbound stock movement and,
/// when a vehicle is attached, one vehicle-inventory load.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Purchase {
    pub id: String,
    pub vendor_id: String,
    pub vehicle_id: Option<String>,
    /// Business date of the purchase.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub total_amount_paise: i64,
    pub status: DocumentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }
}

/// A line on a purchase. `total = quantity x unit price`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseItem {
    pub id: String,
    pub purchase_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub total_paise: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PurchaseItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An outgoing sales document to a customer.
///
/// Invariant: `grand_total_paise == subtotal_paise + surcharge_amount_paise`
/// at all times. Editors that adjust item prices or the surcharge must
/// recompute and persist both fields together.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,

    /// Caller-facing number, e.g. "INV-20260823-0421". Display-level
    /// uniqueness only.
    pub invoice_number: String,

    pub customer_id: String,
    pub vehicle_id: Option<String>,

    /// Business date of the invoice.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    pub subtotal_paise: i64,

    /// Whether a hamali surcharge was applied.
    pub include_surcharge: bool,

    /// Rate basis used when `include_surcharge` is set.
    pub surcharge_mode: Option<SurchargeMode>,

    /// Rate value: basis points for percent mode, paise per kg/bag for the
    /// weight-based modes. Zero when no surcharge.
    pub surcharge_rate: i64,

    pub surcharge_amount_paise: i64,
    pub grand_total_paise: i64,
    pub status: DocumentStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_paise(self.subtotal_paise)
    }

    #[inline]
    pub fn surcharge_amount(&self) -> Money {
        Money::from_paise(self.surcharge_amount_paise)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_paise(self.grand_total_paise)
    }

    /// Checks the `grand_total = subtotal + surcharge` invariant.
    #[inline]
    pub fn totals_consistent(&self) -> bool {
        self.grand_total_paise == self.subtotal_paise + self.surcharge_amount_paise
    }
}

/// A line on an invoice.
///
/// `product_id` is NOT validated against the catalog at creation time; a
/// dangling reference renders as "Unknown Product" at display time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub total_paise: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl InvoiceItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Append-only audit record of one stock change.
///
/// The movement records the REQUESTED quantity, not the clamped delta: the
/// ledger logs intent, `Product.current_stock` is the clamped projection.
/// Never mutated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    /// Requested quantity, always > 0.
    pub quantity: i64,
    /// Free text, typically references the triggering document.
    pub reason: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Id of the triggering purchase/invoice/return, if any.
    pub reference_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Vehicle Inventory
// =============================================================================

/// Per-(vehicle, product) quantity currently loaded.
///
/// A convenience projection over the authoritative `Product.current_stock`;
/// its shortfalls never block the primary invoice/purchase transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VehicleInventory {
    pub vehicle_id: String,
    pub product_id: String,
    /// Units on the vehicle. Never negative.
    pub quantity: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Append-only audit record of one vehicle-inventory change.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VehicleInventoryMovement {
    pub id: String,
    pub vehicle_id: String,
    pub product_id: String,
    pub movement_type: VehicleMovementType,
    pub quantity: i64,
    /// Id of the triggering document, if any.
    pub reference_id: Option<String>,
    /// "purchase" / "invoice" / "vendor_return" / "manual".
    pub reference_type: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Payments
// =============================================================================

/// A payment made to a vendor. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VendorPayment {
    pub id: String,
    pub vendor_id: String,
    /// Optionally ties the payment to one purchase.
    pub purchase_id: Option<String>,
    pub amount_paise: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl VendorPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

/// A payment received from a customer. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerPayment {
    pub id: String,
    pub customer_id: String,
    /// Optionally ties the payment to one invoice.
    pub invoice_id: Option<String>,
    pub amount_paise: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CustomerPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

/// Hamali collected in cash outside the invoice flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SurchargeCashPayment {
    pub id: String,
    pub customer_id: Option<String>,
    pub invoice_id: Option<String>,
    pub amount_paise: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SurchargeCashPayment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

// =============================================================================
// Vendor Return
// =============================================================================

/// Goods sent back to a vendor. Mirrors a purchase but outbound: stock goes
/// down, and a vehicle deduction is attempted when a vehicle is attached.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VendorReturn {
    pub id: String,
    pub vendor_id: String,
    pub vehicle_id: Option<String>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub total_amount_paise: i64,
    pub reason: Option<String>,
    pub status: DocumentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl VendorReturn {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }
}

/// A line on a vendor return.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct VendorReturnItem {
    pub id: String,
    pub return_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
    pub total_paise: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Company Settings
// =============================================================================

/// Singleton business configuration row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CompanySettings {
    /// Always 1; the table holds a single row.
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Default percent surcharge offered in the invoice UI, in basis points.
    pub default_surcharge_rate_bps: u32,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_invoice() -> Invoice {
        let now = Utc::now();
        Invoice {
            id: "inv-1".to_string(),
            invoice_number: "INV-20260823-0001".to_string(),
            customer_id: "cust-1".to_string(),
            vehicle_id: None,
            date: now,
            subtotal_paise: 25_000,
            include_surcharge: true,
            surcharge_mode: Some(SurchargeMode::Percent),
            surcharge_rate: 500,
            surcharge_amount_paise: 1_250,
            grand_total_paise: 26_250,
            status: DocumentStatus::Completed,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_invoice_totals_consistent() {
        let mut invoice = sample_invoice();
        assert!(invoice.totals_consistent());

        invoice.grand_total_paise += 1;
        assert!(!invoice.totals_consistent());
    }

    #[test]
    fn test_product_low_stock() {
        let now = Utc::now();
        let mut product = Product {
            id: "p-1".to_string(),
            name: "Tomato".to_string(),
            unit: "KG".to_string(),
            purchase_price_paise: 1_500,
            sale_price_paise: 2_500,
            current_stock: 10,
            reorder_level: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        assert!(product.is_low_stock());

        product.current_stock = 11;
        assert!(!product.is_low_stock());
        assert_eq!(product.margin().paise(), 1_000);
    }

    #[test]
    fn test_document_status_default() {
        assert_eq!(DocumentStatus::default(), DocumentStatus::Completed);
    }
}
