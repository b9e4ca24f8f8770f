//! # Invoice Engine
//!
//! Builds customer invoices: computes the subtotal and hamali surcharge,
//! persists the document, and drives the two ledgers, all in one SQLite
//! transaction.
//!
//! ## Creation Flow
//! ```text
//! validate items ─► resolve customer/vehicle ─► compute totals
//!       │
//!       ▼  (single transaction)
//! insert invoice ─► insert items ─► per item:
//!                                     stock OUT (lenient, clamped)
//!                                     vehicle deduct (shortfall tolerated)
//! ```
//!
//! ## Revision
//! Revision replaces the item set and recomputes the totals. It never
//! touches stock or vehicle inventory: corrections to quantities after the
//! fact are bookkeeping edits, the goods already moved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mandi_core::validation::{
    validate_line_items_present, validate_price_paise, validate_quantity, validate_rate_bps,
    validate_required, validate_surcharge_amount,
};
use mandi_core::{
    CoreError, Invoice, InvoiceItem, DocumentStatus, Money, MovementType, SurchargeConfig,
    SurchargeMode,
};
use mandi_db::repository::{generate_id, invoice as invoice_repo};
use mandi_db::Database;

use crate::error::EngineResult;
use crate::stock_ledger;
use crate::vehicle_ledger::{self, DeductOutcome};

/// One requested line on a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_paise: i64,
}

impl NewLineItem {
    pub(crate) fn total(&self) -> Money {
        Money::from_paise(self.unit_price_paise).multiply_quantity(self.quantity)
    }
}

/// A requested invoice, before totals are computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub customer_id: String,
    pub vehicle_id: Option<String>,
    /// Business date; defaults to now upstream when the caller omits it.
    pub date: DateTime<Utc>,
    pub surcharge: SurchargeConfig,
    pub items: Vec<NewLineItem>,
}

/// Creates and revises invoices.
#[derive(Debug, Clone)]
pub struct InvoiceEngine {
    db: Database,
}

impl InvoiceEngine {
    pub fn new(db: Database) -> Self {
        InvoiceEngine { db }
    }

    /// Creates an invoice with all its side effects, atomically.
    pub async fn create_invoice(&self, new: NewInvoice) -> EngineResult<Invoice> {
        validate_new_items("invoice", &new.items)?;
        if let SurchargeConfig::PercentOfSubtotal { rate_bps } = new.surcharge {
            validate_rate_bps(rate_bps)?;
        }

        self.db
            .customers()
            .get_by_id(&new.customer_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Customer", &new.customer_id))?;

        if let Some(vehicle_id) = &new.vehicle_id {
            self.db
                .vehicles()
                .get_by_id(vehicle_id)
                .await?
                .ok_or_else(|| CoreError::not_found("Vehicle", vehicle_id))?;
        }

        let subtotal: Money = new.items.iter().map(NewLineItem::total).sum();
        let surcharge_amount = new.surcharge.amount(subtotal);
        let grand_total = subtotal + surcharge_amount;

        let invoice_number = self.next_invoice_number(new.date).await?;
        let now = Utc::now();

        let invoice = Invoice {
            id: generate_id(),
            invoice_number,
            customer_id: new.customer_id.clone(),
            vehicle_id: new.vehicle_id.clone(),
            date: new.date,
            subtotal_paise: subtotal.paise(),
            include_surcharge: new.surcharge.is_some(),
            surcharge_mode: new.surcharge.mode(),
            surcharge_rate: new.surcharge.rate_value(),
            surcharge_amount_paise: surcharge_amount.paise(),
            grand_total_paise: grand_total.paise(),
            status: DocumentStatus::Completed,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.pool().begin().await?;

        invoice_repo::insert_invoice(&mut tx, &invoice).await?;

        for item in &new.items {
            let row = InvoiceItem {
                id: generate_id(),
                invoice_id: invoice.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_paise: item.unit_price_paise,
                total_paise: item.total().paise(),
                created_at: now,
            };
            invoice_repo::insert_item(&mut tx, &row).await?;

            // Central stock always goes out; unknown products are tolerated.
            stock_ledger::apply_lenient(
                &mut tx,
                &item.product_id,
                MovementType::Out,
                item.quantity,
                &format!("Invoice {}", invoice.invoice_number),
                invoice.date,
                Some(&invoice.id),
            )
            .await?;

            // Vehicle projection follows when a vehicle carried the goods.
            if let Some(vehicle_id) = &new.vehicle_id {
                let outcome = vehicle_ledger::deduct_tx(
                    &mut tx,
                    vehicle_id,
                    &item.product_id,
                    item.quantity,
                    invoice.date,
                    Some(&invoice.id),
                    Some("invoice"),
                )
                .await?;

                if let DeductOutcome::Shortfall { available, requested } = outcome {
                    warn!(
                        invoice_id = %invoice.id,
                        vehicle_id = %vehicle_id,
                        product_id = %item.product_id,
                        available,
                        requested,
                        "Invoice proceeds despite vehicle shortfall"
                    );
                }
            }
        }

        tx.commit().await?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            grand_total_paise = invoice.grand_total_paise,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Replaces an invoice's items and recomputes its totals.
    ///
    /// `edited_surcharge_paise` overrides the surcharge amount for payment
    /// -time corrections; when absent the stored basis is kept, with
    /// percent-mode amounts recomputed from the stored rate against the new
    /// subtotal (per-kg/per-bag amounts do not depend on the subtotal and
    /// stand as stored). No stock or vehicle side effects: the goods
    /// already moved, revision is bookkeeping.
    pub async fn revise_invoice(
        &self,
        invoice_id: &str,
        items: Vec<NewLineItem>,
        edited_surcharge_paise: Option<i64>,
    ) -> EngineResult<Invoice> {
        validate_new_items("invoice", &items)?;
        if let Some(amount) = edited_surcharge_paise {
            validate_surcharge_amount(amount)?;
        }

        let invoice = self
            .db
            .invoices()
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Invoice", invoice_id))?;

        let subtotal: Money = items.iter().map(NewLineItem::total).sum();

        let surcharge_amount = match edited_surcharge_paise {
            Some(amount) => Money::from_paise(amount),
            None if !invoice.include_surcharge => Money::zero(),
            None => match invoice.surcharge_mode {
                Some(SurchargeMode::Percent) => subtotal.percent_bps(invoice.surcharge_rate as u32),
                _ => invoice.surcharge_amount(),
            },
        };
        let grand_total = subtotal + surcharge_amount;

        let now = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        invoice_repo::delete_items(&mut tx, invoice_id).await?;
        for item in &items {
            let row = InvoiceItem {
                id: generate_id(),
                invoice_id: invoice_id.to_string(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_paise: item.unit_price_paise,
                total_paise: item.total().paise(),
                created_at: now,
            };
            invoice_repo::insert_item(&mut tx, &row).await?;
        }

        invoice_repo::update_totals(
            &mut tx,
            invoice_id,
            subtotal.paise(),
            surcharge_amount.paise(),
            grand_total.paise(),
        )
        .await?;

        tx.commit().await?;

        info!(
            invoice_id = %invoice_id,
            subtotal_paise = subtotal.paise(),
            grand_total_paise = grand_total.paise(),
            "Invoice revised"
        );

        let revised = self
            .db
            .invoices()
            .get_by_id(invoice_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Invoice", invoice_id))?;

        Ok(revised)
    }

    /// Next display number: `INV-YYYYMMDD-NNNN`, per-day counter.
    async fn next_invoice_number(&self, date: DateTime<Utc>) -> EngineResult<String> {
        let day = date.format("%Y%m%d").to_string();
        let count = self.db.invoices().count_on_day(&day).await?;
        Ok(format!("INV-{day}-{:04}", count + 1))
    }
}

/// Shared line-item validation for the document engines.
pub(crate) fn validate_new_items(document: &str, items: &[NewLineItem]) -> EngineResult<()> {
    validate_line_items_present(document, items.len())?;
    for item in items {
        validate_required("product_id", &item.product_id)?;
        validate_quantity(item.quantity)?;
        validate_price_paise(item.unit_price_paise)?;
    }
    Ok(())
}
