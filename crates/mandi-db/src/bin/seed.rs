//! # Seed Data Generator
//!
//! Populates the database with a realistic mandi setup for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p mandi-db --bin seed
//!
//! # Specify database path
//! cargo run -p mandi-db --bin seed -- --db ./data/mandi.db
//! ```
//!
//! ## Generated Data
//! - Produce catalog (vegetables and fruits with KG/Box/Bag units)
//! - A handful of vendors and customers
//! - Two delivery vehicles
//! - The singleton company-settings row with a 5% default surcharge

use chrono::Utc;
use std::env;

use mandi_core::{CompanySettings, Customer, Product, Vehicle, Vendor};
use mandi_db::{generate_id, Database, DbConfig};

/// (name, unit, purchase paise, sale paise, opening stock, reorder level)
const PRODUCE: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("Tomato (Desi)", "KG", 1_500, 2_500, 200, 40),
    ("Tomato (Hybrid)", "KG", 1_200, 2_000, 150, 40),
    ("Onion (Red)", "KG", 1_800, 2_800, 500, 100),
    ("Potato", "KG", 1_000, 1_800, 600, 120),
    ("Cauliflower", "Box", 25_000, 38_000, 30, 8),
    ("Cabbage", "KG", 900, 1_600, 180, 30),
    ("Green Chilli", "KG", 3_500, 5_500, 60, 15),
    ("Coriander", "Bag", 8_000, 14_000, 25, 6),
    ("Ginger", "KG", 6_000, 9_500, 80, 20),
    ("Garlic", "KG", 9_000, 14_000, 70, 20),
    ("Lady Finger", "KG", 2_200, 3_800, 90, 20),
    ("Brinjal", "KG", 1_400, 2_400, 110, 25),
    ("Banana", "Box", 30_000, 45_000, 40, 10),
    ("Apple (Shimla)", "Box", 120_000, 165_000, 15, 4),
    ("Lemon", "Bag", 20_000, 32_000, 20, 5),
];

const VENDORS: &[(&str, &str)] = &[
    ("Sharma Traders", "9811000001"),
    ("Patel & Sons", "9811000002"),
    ("Nashik Farm Supply", "9811000003"),
    ("Verma Produce Co", "9811000004"),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Hotel Annapurna", "9822000001"),
    ("Green Leaf Restaurant", "9822000002"),
    ("Gupta Kirana Store", "9822000003"),
    ("City Hospital Canteen", "9822000004"),
    ("Raju Thela Wala", "9822000005"),
];

const VEHICLES: &[(&str, &str)] = &[
    ("Tata Ace #1", "MH-12-AB-1234"),
    ("Mahindra Pickup", "MH-12-CD-5678"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./mandi_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: seed [--db PATH]");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Seeding database at {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let now = Utc::now();

    let products = db.products();
    for &(name, unit, purchase, sale, stock, reorder) in PRODUCE {
        products
            .insert(&Product {
                id: generate_id(),
                name: name.to_string(),
                unit: unit.to_string(),
                purchase_price_paise: purchase,
                sale_price_paise: sale,
                current_stock: stock,
                reorder_level: reorder,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  {} products", PRODUCE.len());

    let vendors = db.vendors();
    for &(name, phone) in VENDORS {
        vendors
            .insert(&Vendor {
                id: generate_id(),
                name: name.to_string(),
                phone: Some(phone.to_string()),
                address: None,
                email: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  {} vendors", VENDORS.len());

    let customers = db.customers();
    for &(name, phone) in CUSTOMERS {
        customers
            .insert(&Customer {
                id: generate_id(),
                name: name.to_string(),
                phone: Some(phone.to_string()),
                address: None,
                email: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  {} customers", CUSTOMERS.len());

    let vehicles = db.vehicles();
    for &(name, reg) in VEHICLES {
        vehicles
            .insert(&Vehicle {
                id: generate_id(),
                name: name.to_string(),
                registration_no: Some(reg.to_string()),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  {} vehicles", VEHICLES.len());

    db.settings()
        .upsert(&CompanySettings {
            id: 1,
            name: "Shree Ganesh Vegetable Supply".to_string(),
            address: Some("Shop 14, APMC Market Yard".to_string()),
            phone: Some("9800000000".to_string()),
            email: None,
            default_surcharge_rate_bps: 500,
            updated_at: now,
        })
        .await?;
    println!("  company settings (default surcharge 5%)");

    let count = products.count().await?;
    println!("Done. Active products in catalog: {count}");

    db.close().await;
    Ok(())
}
