//! # Seed Data Generator
//!
//! Fills an empty catalog with sample grocery products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p shopkeep-db --bin seed
//!
//! # Specify database path
//! cargo run -p shopkeep-db --bin seed -- --db ./data/shop.db
//! ```
//!
//! Prices and stock levels are derived from the item's position in the list,
//! so two runs produce the same catalog.

use shopkeep_core::Money;
use shopkeep_db::{Database, DbConfig};
use std::env;

/// Sample shelves: (item, base price in paise).
const SHELVES: &[(&str, &[(&str, i64)])] = &[
    (
        "Staples",
        &[
            ("Basmati Rice", 9500),
            ("Sona Masoori Rice", 6200),
            ("Wheat Atta", 4800),
            ("Toor Dal", 14500),
            ("Moong Dal", 13200),
            ("Sugar", 4400),
            ("Iodised Salt", 2200),
        ],
    ),
    (
        "Oils & Spices",
        &[
            ("Sunflower Oil", 16500),
            ("Mustard Oil", 17800),
            ("Turmeric Powder", 3800),
            ("Red Chilli Powder", 4200),
            ("Garam Masala", 6500),
        ],
    ),
    (
        "Beverages",
        &[
            ("Assam Tea", 12000),
            ("Filter Coffee", 15500),
            ("Green Tea", 18000),
        ],
    ),
    (
        "Household",
        &[
            ("Bath Soap", 3500),
            ("Detergent Powder", 9900),
            ("Dishwash Bar", 1000),
        ],
    ),
];

/// Pack sizes: (suffix, price multiplier in tenths).
const PACKS: &[(&str, i64)] = &[("500g", 10), ("1kg", 19)];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shopkeep_dev.db");

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
                println!("Shopkeep Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shopkeep_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Shopkeep Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Catalog already has {} products", existing);
        println!("  Skipping seed to avoid merging stock into real data.");
        return Ok(());
    }

    let mut generated = 0usize;
    for (shelf, items) in SHELVES {
        println!("  {}", shelf);
        for (item_idx, (item, base)) in items.iter().enumerate() {
            for (pack_idx, (pack, multiplier)) in PACKS.iter().enumerate() {
                let name = format!("{} {}", item, pack);
                let price = Money::from_cents(base * multiplier / 10);
                let stock = ((item_idx * 7 + pack_idx * 13 + generated) % 40 + 5) as i64;

                if let Err(e) = db.products().add(&name, stock, price).await {
                    eprintln!("Failed to add {}: {}", name, e);
                    continue;
                }
                generated += 1;
            }
        }
    }

    let valuation = db.products().valuation().await?;

    println!();
    println!("✓ Added {} products", generated);
    println!("  Shelf value: {}", valuation);
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
