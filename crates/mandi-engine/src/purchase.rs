//! # Purchase Engine
//!
//! Inbound documents from vendors: purchases bring stock in (and load the
//! attached vehicle), vendor returns send it back out (and deduct the
//! vehicle). Each creation is one transaction; the header total is the sum
//! of the line totals, computed here, never trusted from the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mandi_core::{
    CoreError, DocumentStatus, Money, MovementType, Purchase, PurchaseItem, VendorReturn,
    VendorReturnItem,
};
use mandi_db::repository::{generate_id, purchase as purchase_repo};
use mandi_db::Database;

use crate::error::EngineResult;
use crate::invoice::{validate_new_items, NewLineItem};
use crate::stock_ledger;
use crate::vehicle_ledger::{self, DeductOutcome};

/// A requested purchase, before totals are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchase {
    pub vendor_id: String,
    pub vehicle_id: Option<String>,
    pub date: DateTime<Utc>,
    pub items: Vec<NewLineItem>,
}

/// A requested vendor return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVendorReturn {
    pub vendor_id: String,
    pub vehicle_id: Option<String>,
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
    pub items: Vec<NewLineItem>,
}

/// Creates purchases and vendor returns.
#[derive(Debug, Clone)]
pub struct PurchaseEngine {
    db: Database,
}

impl PurchaseEngine {
    pub fn new(db: Database) -> Self {
        PurchaseEngine { db }
    }

    /// Creates a purchase with all its side effects, atomically: stock IN
    /// per item, vehicle load when a vehicle is attached.
    pub async fn create_purchase(&self, new: NewPurchase) -> EngineResult<Purchase> {
        validate_new_items("purchase", &new.items)?;
        self.require_vendor(&new.vendor_id).await?;
        self.require_vehicle(new.vehicle_id.as_deref()).await?;

        let total: Money = new.items.iter().map(NewLineItem::total).sum();
        let now = Utc::now();

        let purchase = Purchase {
            id: generate_id(),
            vendor_id: new.vendor_id.clone(),
            vehicle_id: new.vehicle_id.clone(),
            date: new.date,
            total_amount_paise: total.paise(),
            status: DocumentStatus::Completed,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.pool().begin().await?;

        purchase_repo::insert_purchase(&mut tx, &purchase).await?;

        for item in &new.items {
            let row = PurchaseItem {
                id: generate_id(),
                purchase_id: purchase.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_paise: item.unit_price_paise,
                total_paise: item.total().paise(),
                created_at: now,
            };
            purchase_repo::insert_purchase_item(&mut tx, &row).await?;

            stock_ledger::apply_lenient(
                &mut tx,
                &item.product_id,
                MovementType::In,
                item.quantity,
                &format!("Purchase {}", purchase.id),
                purchase.date,
                Some(&purchase.id),
            )
            .await?;

            if let Some(vehicle_id) = &new.vehicle_id {
                vehicle_ledger::load_tx(
                    &mut tx,
                    vehicle_id,
                    &item.product_id,
                    item.quantity,
                    purchase.date,
                    Some(&purchase.id),
                    Some("purchase"),
                )
                .await?;
            }
        }

        tx.commit().await?;

        info!(
            purchase_id = %purchase.id,
            vendor_id = %purchase.vendor_id,
            total_paise = purchase.total_amount_paise,
            "Purchase created"
        );

        Ok(purchase)
    }

    /// Creates a vendor return: stock OUT per item (clamped), vehicle
    /// deduction attempted when a vehicle is attached.
    pub async fn create_vendor_return(&self, new: NewVendorReturn) -> EngineResult<VendorReturn> {
        validate_new_items("vendor return", &new.items)?;
        self.require_vendor(&new.vendor_id).await?;
        self.require_vehicle(new.vehicle_id.as_deref()).await?;

        let total: Money = new.items.iter().map(NewLineItem::total).sum();
        let now = Utc::now();

        let vendor_return = VendorReturn {
            id: generate_id(),
            vendor_id: new.vendor_id.clone(),
            vehicle_id: new.vehicle_id.clone(),
            date: new.date,
            total_amount_paise: total.paise(),
            reason: new.reason.clone(),
            status: DocumentStatus::Completed,
            created_at: now,
        };

        let mut tx = self.db.pool().begin().await?;

        purchase_repo::insert_return(&mut tx, &vendor_return).await?;

        for item in &new.items {
            let row = VendorReturnItem {
                id: generate_id(),
                return_id: vendor_return.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_paise: item.unit_price_paise,
                total_paise: item.total().paise(),
                created_at: now,
            };
            purchase_repo::insert_return_item(&mut tx, &row).await?;

            stock_ledger::apply_lenient(
                &mut tx,
                &item.product_id,
                MovementType::Out,
                item.quantity,
                &format!("Vendor return {}", vendor_return.id),
                vendor_return.date,
                Some(&vendor_return.id),
            )
            .await?;

            if let Some(vehicle_id) = &new.vehicle_id {
                let outcome = vehicle_ledger::deduct_tx(
                    &mut tx,
                    vehicle_id,
                    &item.product_id,
                    item.quantity,
                    vendor_return.date,
                    Some(&vendor_return.id),
                    Some("vendor_return"),
                )
                .await?;

                if let DeductOutcome::Shortfall { available, requested } = outcome {
                    warn!(
                        return_id = %vendor_return.id,
                        vehicle_id = %vehicle_id,
                        product_id = %item.product_id,
                        available,
                        requested,
                        "Vendor return proceeds despite vehicle shortfall"
                    );
                }
            }
        }

        tx.commit().await?;

        info!(
            return_id = %vendor_return.id,
            vendor_id = %vendor_return.vendor_id,
            total_paise = vendor_return.total_amount_paise,
            "Vendor return created"
        );

        Ok(vendor_return)
    }

    async fn require_vendor(&self, vendor_id: &str) -> EngineResult<()> {
        self.db
            .vendors()
            .get_by_id(vendor_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Vendor", vendor_id))?;
        Ok(())
    }

    async fn require_vehicle(&self, vehicle_id: Option<&str>) -> EngineResult<()> {
        if let Some(id) = vehicle_id {
            self.db
                .vehicles()
                .get_by_id(id)
                .await?
                .ok_or_else(|| CoreError::not_found("Vehicle", id))?;
        }
        Ok(())
    }
}
