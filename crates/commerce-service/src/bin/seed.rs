//! # Seed Data Generator
//!
//! Populates the database with a small demo dataset for development.
//!
//! ## Usage
//! ```bash
//! # Use commerce.toml / environment for the database path
//! cargo run -p commerce-service --bin seed
//!
//! # Explicit config file or database path
//! cargo run -p commerce-service --bin seed -- --config ./commerce.toml
//! cargo run -p commerce-service --bin seed -- --db ./data/commerce.db
//! ```
//!
//! ## Generated Data
//! - Departments and cities
//! - One role of each kind and a few users
//! - Categories with products linked to them
//! - Stores with stock rows (including a duplicate stocking event)
//! - Sales with lines, dated now
//!
//! Prints the top sellers and today's sales total when done.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use commerce_core::payload::{
    NewCategory, NewCity, NewDepartment, NewProduct, NewSale, NewSaleProduct, NewStore,
    NewStoreProduct, NewUser, NewUserRole,
};
use commerce_core::{Money, Role};
use commerce_service::{telemetry, AppConfig, Commerce};

/// Departments and their cities.
const GEOGRAPHY: &[(&str, &[&str])] = &[
    ("Antioquia", &["Medellin", "Envigado"]),
    ("Cundinamarca", &["Bogota", "Soacha"]),
    ("Valle del Cauca", &["Cali"]),
];

/// Categories and their products as (name, price in cents).
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Beverages",
        &[
            ("Coffee Beans 500g", 1899),
            ("Green Tea Box", 649),
            ("Orange Juice 1L", 399),
            ("Sparkling Water 6-Pack", 549),
        ],
    ),
    (
        "Snacks",
        &[
            ("Salted Almonds", 799),
            ("Dark Chocolate Bar", 299),
            ("Rice Crackers", 249),
        ],
    ),
    (
        "Household",
        &[
            ("Dish Soap", 349),
            ("Paper Towels 4-Roll", 899),
            ("Laundry Detergent", 1549),
        ],
    ),
];

/// Users as (first name, last name, username, role).
const USERS: &[(&str, &str, &str, Role)] = &[
    ("Ana", "Gomez", "agomez", Role::Admin),
    ("Luis", "Perez", "lperez", Role::User),
    ("Maria", "Rodriguez", "mrodriguez", Role::User),
    ("Juan", "Lopez", "jlopez", Role::Manager),
];

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Commerce Manager Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -d, --db <PATH>      Database file path (overrides config)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = AppConfig::load(config_path).context("loading configuration")?;
    if let Some(path) = db_path {
        config.database.path = path;
    }

    telemetry::init_tracing(Some(&config.logging.filter));

    println!("Commerce Manager Seed Data Generator");
    println!("====================================");
    println!("Database: {}", config.database.path.display());
    println!();

    let commerce = Commerce::connect(&config)
        .await
        .context("connecting to database")?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = commerce.database().products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Geography
    let geography = commerce.geography();
    let mut city_ids = Vec::new();
    for (department, cities) in GEOGRAPHY {
        let department = geography
            .create_department(NewDepartment {
                name: department.to_string(),
            })
            .await?;
        for city in *cities {
            let city = geography
                .create_city(NewCity {
                    name: city.to_string(),
                    department_id: department.id,
                })
                .await?;
            city_ids.push(city.id);
        }
    }
    println!("✓ {} departments, {} cities", GEOGRAPHY.len(), city_ids.len());

    // Identity
    let identity = commerce.identity();
    let mut role_ids = Vec::new();
    for role in Role::ALL {
        let created = identity.create_role(NewUserRole { role }).await?;
        role_ids.push((role, created.id));
    }

    let mut user_ids = Vec::new();
    for (idx, (first, last, username, role)) in USERS.iter().enumerate() {
        let role_id = role_ids
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, id)| *id)
            .context("role was not created")?;

        let user = identity
            .create_user(NewUser {
                first_name: first.to_string(),
                last_name: last.to_string(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: format!("{username}-demo"),
                phone: format!("300{:07}", 1_000_000 + idx),
                role_id,
                city_id: city_ids[idx % city_ids.len()],
            })
            .await?;
        user_ids.push(user.id);
    }
    println!("✓ {} roles, {} users", role_ids.len(), user_ids.len());

    // Catalog
    let catalog = commerce.catalog();
    let mut product_ids = Vec::new();
    for (category, products) in CATALOG {
        let category = catalog
            .create_category(NewCategory {
                name: category.to_string(),
            })
            .await?;
        for (name, price) in *products {
            let product = catalog
                .create_product(NewProduct {
                    name: name.to_string(),
                    description: format!("{name}, demo catalog item"),
                    price: *price,
                })
                .await?;
            catalog.link_product_category(&product.id, category.id).await?;
            product_ids.push(product.id);
        }
    }
    println!("✓ {} categories, {} products", CATALOG.len(), product_ids.len());

    // Inventory
    let inventory = commerce.inventory();
    let mut store_count = 0;
    let mut stock_rows = 0;
    for (idx, city_id) in city_ids.iter().enumerate().take(3) {
        let store = inventory
            .create_store(NewStore {
                name: format!("Commerce Store #{}", idx + 1),
                city_id: *city_id,
            })
            .await?;
        store_count += 1;

        for (p_idx, product_id) in product_ids.iter().enumerate() {
            if (p_idx + idx) % 3 == 2 {
                continue;
            }
            inventory
                .create_store_product(NewStoreProduct {
                    stock: ((p_idx * 7 + idx * 11) % 50) as i64,
                    address: format!("Aisle {}", p_idx % 6 + 1),
                    store_id: store.id.clone(),
                    product_id: product_id.clone(),
                })
                .await?;
            stock_rows += 1;
        }

        // A second stocking event for the first product, kept in the back room.
        if let Some(first) = product_ids.first() {
            inventory
                .create_store_product(NewStoreProduct {
                    stock: 24,
                    address: "Back room".to_string(),
                    store_id: store.id.clone(),
                    product_id: first.clone(),
                })
                .await?;
            stock_rows += 1;
        }
    }
    println!("✓ {} stores, {} stock rows", store_count, stock_rows);

    // Sales
    let sales = commerce.sales();
    let prices: Vec<i64> = CATALOG
        .iter()
        .flat_map(|(_, products)| products.iter().map(|(_, price)| *price))
        .collect();

    let mut sale_count = 0;
    for seed in 0..12usize {
        let buyer = &user_ids[seed % user_ids.len()];
        let lines: Vec<(usize, i64)> = (0..(seed % 3 + 1))
            .map(|n| ((seed * 5 + n * 3) % product_ids.len(), ((seed + n) % 4 + 1) as i64))
            .collect();
        let total: Money = lines
            .iter()
            .map(|(p, qty)| Money::from_cents(prices[*p]) * *qty)
            .sum();

        let sale = sales
            .create_sale(NewSale {
                total_amount: total.cents(),
                user_id: buyer.clone(),
            })
            .await?;
        for (p, quantity) in lines {
            sales
                .create_sale_product(NewSaleProduct {
                    quantity,
                    sale_id: sale.id.clone(),
                    product_id: product_ids[p].clone(),
                })
                .await?;
        }
        sale_count += 1;
    }
    println!("✓ {} sales", sale_count);

    info!(elapsed = ?start.elapsed(), "Seed finished");

    // Report
    println!();
    println!("Top sellers:");
    for (rank, row) in commerce
        .analytics()
        .best_seller_report(Some(5))
        .await?
        .iter()
        .enumerate()
    {
        println!(
            "  {}. {} ({} units, {})",
            rank + 1,
            row.product.name,
            row.units_sold,
            row.product.price
        );
    }

    let today = Utc::now().date_naive();
    let total = sales.total_sales_amount_on_day(today).await?;
    println!();
    println!("Sales total for {}: {}", today, total);

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    Ok(())
}
