//! End-to-end engine scenarios against in-memory SQLite: purchase intake,
//! invoicing with surcharge, vehicle shortfalls, balances, and reports.

use chrono::{Duration, Utc};

use mandi_core::{
    Customer, DocumentStatus, MovementType, Product, SurchargeConfig, Vehicle,
    VehicleMovementType, Vendor, PaymentMethod, PaymentStatus,
};
use mandi_db::{generate_id, Database, DbConfig};
use mandi_engine::{
    BalanceCalculator, DeductOutcome, EngineError, InvoiceEngine, NewInvoice, NewLineItem,
    NewPurchase, NewVendorReturn, PurchaseEngine, ReportAggregator, StockLedger, VehicleLedger,
};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn seed_product(db: &Database, name: &str, stock: i64) -> Product {
    let now = Utc::now();
    let product = Product {
        id: generate_id(),
        name: name.to_string(),
        unit: "KG".to_string(),
        purchase_price_paise: 1_500,
        sale_price_paise: 2_500,
        current_stock: stock,
        reorder_level: 10,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product
}

async fn seed_vendor(db: &Database) -> Vendor {
    let now = Utc::now();
    let vendor = Vendor {
        id: generate_id(),
        name: "Sharma Traders".to_string(),
        phone: None,
        address: None,
        email: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.vendors().insert(&vendor).await.unwrap();
    vendor
}

async fn seed_customer(db: &Database) -> Customer {
    let now = Utc::now();
    let customer = Customer {
        id: generate_id(),
        name: "Hotel Annapurna".to_string(),
        phone: None,
        address: None,
        email: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.customers().insert(&customer).await.unwrap();
    customer
}

async fn seed_vehicle(db: &Database) -> Vehicle {
    let now = Utc::now();
    let vehicle = Vehicle {
        id: generate_id(),
        name: "Tata Ace #1".to_string(),
        registration_no: Some("MH-12-AB-1234".to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.vehicles().insert(&vehicle).await.unwrap();
    vehicle
}

fn line(product_id: &str, quantity: i64, unit_price_paise: i64) -> NewLineItem {
    NewLineItem {
        product_id: product_id.to_string(),
        quantity,
        unit_price_paise,
    }
}

// =============================================================================
// Purchase intake (scenario A)
// =============================================================================

#[tokio::test]
async fn purchase_loads_stock_and_vehicle() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 0).await;
    let vendor = seed_vendor(&db).await;
    let vehicle = seed_vehicle(&db).await;

    let engine = PurchaseEngine::new(db.clone());
    let purchase = engine
        .create_purchase(NewPurchase {
            vendor_id: vendor.id.clone(),
            vehicle_id: Some(vehicle.id.clone()),
            date: Utc::now(),
            items: vec![line(&product.id, 100, 1_500)],
        })
        .await
        .unwrap();

    assert_eq!(purchase.total_amount_paise, 150_000);
    assert_eq!(purchase.status, DocumentStatus::Completed);

    // Central stock went up by the purchased quantity
    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 100);

    // One inbound stock movement referencing the purchase
    let movements = db.stock_movements().list_for_reference(&purchase.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::In);
    assert_eq!(movements[0].quantity, 100);

    // Vehicle carries the goods, with one load movement
    let entry = db
        .vehicles()
        .inventory_entry(&vehicle.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.quantity, 100);

    let vehicle_moves = db.vehicles().movements_for_vehicle(&vehicle.id, 10).await.unwrap();
    assert_eq!(vehicle_moves.len(), 1);
    assert_eq!(vehicle_moves[0].movement_type, VehicleMovementType::Load);
}

// =============================================================================
// Invoice with percent surcharge (scenario B)
// =============================================================================

#[tokio::test]
async fn invoice_computes_surcharge_and_drives_both_ledgers() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;
    let vehicle = seed_vehicle(&db).await;

    let vehicles = VehicleLedger::new(db.clone());
    vehicles.load(&vehicle.id, &product.id, 50, None, None).await.unwrap();

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: Some(vehicle.id.clone()),
            date: Utc::now(),
            surcharge: SurchargeConfig::PercentOfSubtotal { rate_bps: 500 },
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();

    // ₹250.00 + 5% = ₹262.50
    assert_eq!(invoice.subtotal_paise, 25_000);
    assert_eq!(invoice.surcharge_amount_paise, 1_250);
    assert_eq!(invoice.grand_total_paise, 26_250);
    assert!(invoice.totals_consistent());
    assert!(invoice.invoice_number.starts_with("INV-"));

    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 90);

    let entry = db
        .vehicles()
        .inventory_entry(&vehicle.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.quantity, 40);

    let vehicle_moves = db.vehicles().movements_for_vehicle(&vehicle.id, 10).await.unwrap();
    assert!(vehicle_moves
        .iter()
        .any(|m| m.movement_type == VehicleMovementType::Sale && m.quantity == 10));
}

#[tokio::test]
async fn per_bag_surcharge_ignores_subtotal() {
    let db = test_db().await;
    let product = seed_product(&db, "Onion", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::PerBag { rate_paise: 500, total_bags: 40 },
            items: vec![line(&product.id, 20, 2_800)],
        })
        .await
        .unwrap();

    // 40 bags at ₹5.00 = ₹200.00, regardless of the ₹560.00 subtotal
    assert_eq!(invoice.subtotal_paise, 56_000);
    assert_eq!(invoice.surcharge_amount_paise, 20_000);
    assert_eq!(invoice.grand_total_paise, 76_000);
}

// =============================================================================
// Vehicle shortfall is non-fatal (scenario C)
// =============================================================================

#[tokio::test]
async fn invoice_commits_despite_vehicle_shortfall() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;
    let vehicle = seed_vehicle(&db).await;

    let vehicles = VehicleLedger::new(db.clone());
    vehicles.load(&vehicle.id, &product.id, 3, None, None).await.unwrap();

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: Some(vehicle.id.clone()),
            date: Utc::now(),
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();

    // Invoice committed at the full 10 units
    assert_eq!(invoice.grand_total_paise, 25_000);

    // Central stock still moved
    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 90);

    // Vehicle row untouched: deduction refused, not partially applied
    let entry = db
        .vehicles()
        .inventory_entry(&vehicle.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.quantity, 3);

    // No sale movement was written for the refused deduction
    let vehicle_moves = db.vehicles().movements_for_vehicle(&vehicle.id, 10).await.unwrap();
    assert!(!vehicle_moves.iter().any(|m| m.movement_type == VehicleMovementType::Sale));
}

#[tokio::test]
async fn direct_deduct_reports_shortfall() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let vehicle = seed_vehicle(&db).await;

    let vehicles = VehicleLedger::new(db.clone());
    vehicles.load(&vehicle.id, &product.id, 3, None, None).await.unwrap();

    let outcome = vehicles
        .deduct(&vehicle.id, &product.id, 10, None, None)
        .await
        .unwrap();
    assert_eq!(outcome, DeductOutcome::Shortfall { available: 3, requested: 10 });

    let outcome = vehicles
        .deduct(&vehicle.id, &product.id, 3, None, None)
        .await
        .unwrap();
    assert_eq!(outcome, DeductOutcome::Applied);
}

// =============================================================================
// Vendor balance (scenario D)
// =============================================================================

#[tokio::test]
async fn vendor_balance_from_purchase_payment_and_return() {
    let db = test_db().await;
    let product = seed_product(&db, "Potato", 0).await;
    let vendor = seed_vendor(&db).await;

    let purchases = PurchaseEngine::new(db.clone());
    purchases
        .create_purchase(NewPurchase {
            vendor_id: vendor.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            items: vec![line(&product.id, 1_000, 1_460)], // ₹14,600
        })
        .await
        .unwrap();

    let balances = BalanceCalculator::new(db.clone());
    balances
        .record_vendor_payment(&vendor.id, None, 500_000, PaymentMethod::Cash, None)
        .await
        .unwrap();

    purchases
        .create_vendor_return(NewVendorReturn {
            vendor_id: vendor.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            reason: Some("Rotten lot".to_string()),
            items: vec![line(&product.id, 100, 1_600)], // ₹1,600
        })
        .await
        .unwrap();

    // 14600 - 5000 - 1600 = ₹8,000
    let balance = balances.vendor_balance(&vendor.id).await.unwrap();
    assert_eq!(balance.total_purchases_paise, 1_460_000);
    assert_eq!(balance.total_payments_paise, 500_000);
    assert_eq!(balance.total_returns_paise, 160_000);
    assert_eq!(balance.balance_paise, 800_000);

    // Return also pulled the stock back out: 1000 in, 100 out
    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 900);
}

#[tokio::test]
async fn customer_balance_and_status() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let invoices = InvoiceEngine::new(db.clone());
    invoices
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();

    let balances = BalanceCalculator::new(db.clone());

    let balance = balances.customer_balance(&customer.id).await.unwrap();
    assert_eq!(balance.balance_paise, 25_000);
    assert_eq!(balance.status, PaymentStatus::Unpaid);

    balances
        .record_customer_payment(&customer.id, None, 10_000, PaymentMethod::Upi, None)
        .await
        .unwrap();
    let balance = balances.customer_balance(&customer.id).await.unwrap();
    assert_eq!(balance.balance_paise, 15_000);
    assert_eq!(balance.status, PaymentStatus::Partial);

    balances
        .record_customer_payment(&customer.id, None, 15_000, PaymentMethod::Cash, None)
        .await
        .unwrap();
    let balance = balances.customer_balance(&customer.id).await.unwrap();
    assert_eq!(balance.balance_paise, 0);
    assert_eq!(balance.status, PaymentStatus::Paid);
}

// =============================================================================
// Stock ledger contract
// =============================================================================

#[tokio::test]
async fn stock_deduction_clamps_at_zero_but_records_requested() {
    let db = test_db().await;
    let product = seed_product(&db, "Cabbage", 60).await;

    let ledger = StockLedger::new(db.clone());
    let movement = ledger
        .apply_movement(
            &product.id,
            MovementType::Out,
            100,
            "Spoilage write-off",
            Utc::now(),
            None,
        )
        .await
        .unwrap();

    // The audit row records intent, the projection clamps
    assert_eq!(movement.quantity, 100);

    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 0);
}

#[tokio::test]
async fn direct_movement_on_unknown_product_fails() {
    let db = test_db().await;
    let ledger = StockLedger::new(db.clone());

    let err = ledger
        .apply_movement("no-such-id", MovementType::In, 5, "test", Utc::now(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Core(_)));
}

#[tokio::test]
async fn invoice_tolerates_unknown_product_in_line_item() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 10, 2_500), line("ghost-product", 5, 1_000)],
        })
        .await
        .unwrap();

    // Both lines persisted and priced into the subtotal
    assert_eq!(invoice.subtotal_paise, 30_000);
    let items = db.invoices().get_items(&invoice.id).await.unwrap();
    assert_eq!(items.len(), 2);

    // But only the known product moved stock
    let movements = db.stock_movements().list_for_reference(&invoice.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].product_id, product.id);
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_side_effects() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let err = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 0, 2_500)],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 100);
}

// =============================================================================
// Invoice revision
// =============================================================================

#[tokio::test]
async fn revision_recomputes_totals_without_stock_effects() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::PercentOfSubtotal { rate_bps: 500 },
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();
    assert_eq!(invoice.grand_total_paise, 26_250);

    let revised = engine
        .revise_invoice(&invoice.id, vec![line(&product.id, 20, 2_500)], None)
        .await
        .unwrap();

    // Percent surcharge recomputed against the new subtotal
    assert_eq!(revised.subtotal_paise, 50_000);
    assert_eq!(revised.surcharge_amount_paise, 2_500);
    assert_eq!(revised.grand_total_paise, 52_500);
    assert!(revised.totals_consistent());

    let items = db.invoices().get_items(&invoice.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 20);

    // Stock reflects only the original creation (100 - 10)
    let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.current_stock, 90);
}

#[tokio::test]
async fn revision_accepts_negotiated_surcharge_amount() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::PercentOfSubtotal { rate_bps: 500 },
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();

    // Hamali talked down to a flat ₹10.00 at payment time
    let revised = engine
        .revise_invoice(&invoice.id, vec![line(&product.id, 10, 2_500)], Some(1_000))
        .await
        .unwrap();

    assert_eq!(revised.subtotal_paise, 25_000);
    assert_eq!(revised.surcharge_amount_paise, 1_000);
    assert_eq!(revised.grand_total_paise, 26_000);
    assert!(revised.totals_consistent());
}

#[tokio::test]
async fn revision_rejects_negative_surcharge_amount() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let invoice = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date: Utc::now(),
            surcharge: SurchargeConfig::PercentOfSubtotal { rate_bps: 500 },
            items: vec![line(&product.id, 10, 2_500)],
        })
        .await
        .unwrap();

    let err = engine
        .revise_invoice(&invoice.id, vec![line(&product.id, 10, 2_500)], Some(-100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(err.to_string().contains("surcharge_amount"));

    // Rejected before any write: totals stand as created
    let stored = db.invoices().get_by_id(&invoice.id).await.unwrap().unwrap();
    assert_eq!(stored.surcharge_amount_paise, 1_250);
    assert_eq!(stored.grand_total_paise, 26_250);
}

// =============================================================================
// Vehicle stock view and adjustment
// =============================================================================

#[tokio::test]
async fn vehicle_stock_view_resolves_names_with_unknown_fallback() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let vehicle = seed_vehicle(&db).await;

    let vehicles = VehicleLedger::new(db.clone());
    vehicles.load(&vehicle.id, &product.id, 30, None, None).await.unwrap();
    vehicles.load(&vehicle.id, "ghost-product", 7, None, None).await.unwrap();

    let view = vehicles.stock_view(&vehicle.id).await.unwrap();
    assert_eq!(view.len(), 2);

    let known = view.iter().find(|l| l.product_id == product.id).unwrap();
    assert_eq!(known.product_name, "Tomato");
    assert_eq!(known.quantity, 30);

    let ghost = view.iter().find(|l| l.product_id == "ghost-product").unwrap();
    assert_eq!(ghost.product_name, "Unknown Product");
    assert_eq!(ghost.quantity, 7);
}

#[tokio::test]
async fn adjustment_overwrites_quantity_and_logs_delta() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let vehicle = seed_vehicle(&db).await;

    let vehicles = VehicleLedger::new(db.clone());
    vehicles.load(&vehicle.id, &product.id, 30, None, None).await.unwrap();
    vehicles.adjust(&vehicle.id, &product.id, 25).await.unwrap();

    let entry = db
        .vehicles()
        .inventory_entry(&vehicle.id, &product.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.quantity, 25);

    let moves = db.vehicles().movements_for_vehicle(&vehicle.id, 10).await.unwrap();
    let adjustment = moves
        .iter()
        .find(|m| m.movement_type == VehicleMovementType::Adjustment)
        .unwrap();
    assert_eq!(adjustment.quantity, -5);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn reports_over_a_trading_day() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 0).await;
    let vendor = seed_vendor(&db).await;
    let customer = seed_customer(&db).await;

    let date = Utc::now();

    PurchaseEngine::new(db.clone())
        .create_purchase(NewPurchase {
            vendor_id: vendor.id.clone(),
            vehicle_id: None,
            date,
            items: vec![line(&product.id, 100, 1_500)], // ₹1,500
        })
        .await
        .unwrap();

    InvoiceEngine::new(db.clone())
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date,
            surcharge: SurchargeConfig::PercentOfSubtotal { rate_bps: 500 },
            items: vec![line(&product.id, 10, 2_500)], // ₹250 + ₹12.50
        })
        .await
        .unwrap();

    let balances = BalanceCalculator::new(db.clone());
    balances
        .record_surcharge_cash(Some(&customer.id), None, 700, None)
        .await
        .unwrap();

    let reports = ReportAggregator::new(db.clone());
    let from = date - Duration::days(1);
    let to = date + Duration::days(1);

    let pnl = reports.profit_loss(from, to).await.unwrap();
    assert_eq!(pnl.total_sales_paise, 26_250);
    assert_eq!(pnl.total_purchases_paise, 150_000);
    assert_eq!(pnl.gross_profit_paise, 26_250 - 150_000);

    let surcharge = reports.surcharge_summary(from, to).await.unwrap();
    assert_eq!(surcharge.invoice_surcharge_paise, 1_250);
    assert_eq!(surcharge.cash_surcharge_paise, 700);
    assert_eq!(surcharge.total_paise, 1_950);

    let daily = reports.daily_rollup(from, to).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].invoice_count, 1);
    assert_eq!(daily[0].invoiced_paise, 26_250);

    let margins = reports.product_margins().await.unwrap();
    assert_eq!(margins.len(), 1);
    assert_eq!(margins[0].margin_paise, 1_000);
}

// =============================================================================
// Invoice numbering
// =============================================================================

#[tokio::test]
async fn invoice_numbers_count_up_within_a_day() {
    let db = test_db().await;
    let product = seed_product(&db, "Tomato", 100).await;
    let customer = seed_customer(&db).await;

    let engine = InvoiceEngine::new(db.clone());
    let date = Utc::now();
    let day = date.format("%Y%m%d").to_string();

    let first = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date,
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 1, 2_500)],
        })
        .await
        .unwrap();
    let second = engine
        .create_invoice(NewInvoice {
            customer_id: customer.id.clone(),
            vehicle_id: None,
            date,
            surcharge: SurchargeConfig::None,
            items: vec![line(&product.id, 1, 2_500)],
        })
        .await
        .unwrap();

    assert_eq!(first.invoice_number, format!("INV-{day}-0001"));
    assert_eq!(second.invoice_number, format!("INV-{day}-0002"));
}
