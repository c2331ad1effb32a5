//! # Seed Data Generator
//!
//! Populates the database with suppliers, flowers and a few sales for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./bloom_dev.db
//! cargo run -p bloom-db --bin seed
//!
//! # Specify database path
//! cargo run -p bloom-db --bin seed -- --db ./data/bloom.db
//!
//! # Skip the demo sales
//! cargo run -p bloom-db --bin seed -- --no-sales
//! ```
//!
//! ## Generated Data
//! - Suppliers, some without contact details
//! - Flowers across categories (and a few uncategorized), with arrival
//!   dates spread over the last two weeks so every freshness status shows up
//! - A handful of sales through the coordinator, enough to raise low stock
//!   alerts

use chrono::{Duration, Local};
use std::env;
use tracing_subscriber::EnvFilter;

use bloom_core::{freshness, NewFlower, NewSupplier, SaleRequest};
use bloom_db::{BloomConfig, Database, DbConfig, SaleCoordinator};

/// (name, phone, email)
const SUPPLIERS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("Holland Bulb Traders", Some("+31 20 555 0199"), Some("orders@hollandbulbs.example")),
    ("Coastal Greens", Some("(555) 010-2233"), None),
    ("Andes Rose Farm", None, Some("sales@andesroses.example")),
];

/// (name, color, category, price cents, quantity, days since arrival, shelf-life days)
const FLOWERS: &[(&str, &str, Option<&str>, i64, i64, i64, i64)] = &[
    ("Red Rose", "Red", Some("Roses"), 350, 120, 1, 10),
    ("White Rose", "White", Some("Roses"), 350, 60, 4, 10),
    ("Spray Rose", "Pink", Some("Roses"), 275, 12, 9, 10),
    ("Tulip", "Yellow", Some("Bulbs"), 150, 200, 0, 7),
    ("Parrot Tulip", "Orange", Some("Bulbs"), 220, 14, 5, 7),
    ("Hyacinth", "Blue", Some("Bulbs"), 300, 25, 8, 7),
    ("Sunflower", "Yellow", Some("Seasonal"), 300, 40, 2, 8),
    ("Peony", "Blush", Some("Seasonal"), 650, 11, 3, 6),
    ("Phalaenopsis Orchid", "White", Some("Potted"), 2_400, 8, 12, 28),
    ("Eucalyptus", "Green", Some("Greenery"), 180, 80, 6, 14),
    ("Leatherleaf Fern", "Green", Some("Greenery"), 90, 150, 13, 14),
    ("Baby's Breath", "White", None, 120, 90, 2, 10),
];

/// (flower index, quantity)
const DEMO_SALES: &[(usize, i64)] = &[(0, 24), (2, 5), (4, 6), (7, 3), (8, 1), (3, 50)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bloom_dev.db");
    let mut with_sales = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--no-sales" => with_sales = false,
            "--help" | "-h" => {
                println!("Bloom Florist Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./bloom_dev.db)");
                println!("      --no-sales     Do not record demo sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }

    // Threshold and timeouts still come from bloom.toml / BLOOM_* variables
    let config = BloomConfig::load_or_default(None);

    println!("🌱 Bloom Florist Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!("Low stock threshold: {}", config.low_stock_threshold());
    println!();

    let db_config = DbConfig::new(&db_path).busy_timeout(config.db_config().busy_timeout);
    let db = Database::new(db_config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.flowers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} flowers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    // Suppliers
    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, phone, email) in SUPPLIERS {
        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: name.to_string(),
                phone: phone.map(str::to_string),
                email: email.map(str::to_string),
            })
            .await?;
        supplier_ids.push(supplier.id);
    }
    println!("✓ Inserted {} suppliers", supplier_ids.len());

    // Flowers
    let today = freshness::today();
    let mut flower_ids = Vec::with_capacity(FLOWERS.len());
    for (idx, (name, color, category, price_cents, quantity, age_days, shelf_life)) in
        FLOWERS.iter().enumerate()
    {
        let flower = NewFlower {
            name: name.to_string(),
            color: color.to_string(),
            category: category.map(str::to_string),
            price_cents: *price_cents,
            quantity: *quantity,
            arrival_date: today - Duration::days(*age_days),
            freshness_days: *shelf_life,
            // Every fourth flower has no known supplier
            supplier_id: (idx % 4 != 3).then(|| supplier_ids[idx % supplier_ids.len()]),
        };

        match db.flowers().insert(&flower).await {
            Ok(stored) => flower_ids.push(stored.id),
            Err(e) => eprintln!("Failed to insert {}: {}", flower.name, e),
        }
    }
    println!("✓ Inserted {} flowers", flower_ids.len());

    // Demo sales
    if with_sales {
        let coordinator = SaleCoordinator::from_config(db.clone(), &config);
        let mut recorded = 0;

        for (flower_idx, quantity) in DEMO_SALES {
            let Some(&flower_id) = flower_ids.get(*flower_idx) else {
                continue;
            };

            match coordinator
                .process_sale(SaleRequest::new(flower_id, *quantity).with_customer("Walk-in"))
                .await
            {
                Ok(sale) => {
                    recorded += 1;
                    println!("  Sold {} x #{} for {}", sale.quantity_sold, flower_id, sale.total_price());
                }
                Err(e) => eprintln!("  Sale of #{} failed: {}", flower_id, e),
            }
        }

        println!("✓ Recorded {} sales", recorded);
        println!("✓ {} open stock alerts", db.alerts().list_unresolved().await?.len());
    }

    // Freshness overview
    println!();
    println!("Inventory as of {}:", Local::now().format("%Y-%m-%d"));
    for item in db.flowers().list_with_freshness(today).await? {
        println!(
            "  {:<22} {:>4} stems  {}",
            item.flower.name, item.flower.quantity, item.freshness.label
        );
    }

    println!();
    println!(
        "Categories: {}",
        db.flowers().unique_categories().await?.join(", ")
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bloom=trace` - Show trace for bloom crates only
/// - Default: info, debug for bloom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bloom=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
