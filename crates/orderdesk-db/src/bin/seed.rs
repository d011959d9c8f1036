//! # Menu Seeder
//!
//! Loads a menu into an empty database.
//!
//! ## Usage
//! ```bash
//! # Built-in house menu
//! cargo run -p orderdesk-db --bin seed
//!
//! # Menu from a JSON file
//! cargo run -p orderdesk-db --bin seed -- --menu ./menu.json --db ./orderdesk.db
//! ```
//!
//! ## Menu File Format
//! A JSON array of items with decimal prices:
//! ```json
//! [
//!   {
//!     "name": "Big Mac",
//!     "category": "Burgers",
//!     "description": "Two beef patties...",
//!     "price": 5.29,
//!     "calories": 590,
//!     "type": "entree",
//!     "modifications": ["no pickles", "extra cheese"]
//!   }
//! ]
//! ```

use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fs;

use orderdesk_core::menu_data::house_menu_entries;
use orderdesk_core::{CatalogEntry, ItemType, Menu, Money};
use orderdesk_db::{Database, DbConfig};

/// One item as written in a menu file.
#[derive(Debug, Deserialize)]
struct MenuFileItem {
    name: String,
    category: String,
    #[serde(default)]
    description: Option<String>,
    /// Decimal dollars, as a JSON number or string.
    price: Value,
    calories: i64,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    modifications: Vec<String>,
}

impl MenuFileItem {
    fn into_entry(self) -> Result<CatalogEntry, Box<dyn std::error::Error>> {
        let price = match &self.price {
            Value::Number(n) => Money::parse_decimal(&n.to_string())?,
            Value::String(s) => Money::parse_decimal(s)?,
            other => return Err(format!("{}: price must be a number, got {}", self.name, other).into()),
        };
        let item_type: ItemType = self.item_type.parse()?;

        let mut entry = CatalogEntry::new(
            self.name.trim(),
            self.category.trim(),
            price.cents(),
            self.calories,
            item_type,
        )
        .with_modifications(self.modifications);
        entry.description = self.description;
        Ok(entry)
    }
}

fn load_menu_file(path: &str) -> Result<Vec<CatalogEntry>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let items: Vec<MenuFileItem> = serde_json::from_str(&text)?;
    items.into_iter().map(MenuFileItem::into_entry).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./orderdesk_dev.db");
    let mut menu_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--menu" | "-m" => {
                if i + 1 < args.len() {
                    menu_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("OrderDesk Menu Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./orderdesk_dev.db)");
                println!("  -m, --menu <FILE>    JSON menu file (default: built-in house menu)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 OrderDesk Menu Seeder");
    println!("========================");
    println!("Database: {}", db_path);
    println!(
        "Menu:     {}",
        menu_path.as_deref().unwrap_or("built-in house menu")
    );
    println!();

    let entries = match &menu_path {
        Some(path) => load_menu_file(path)?,
        None => house_menu_entries(),
    };

    // Reject duplicates and bad values before touching the database
    let menu = Menu::try_new(entries)?;
    println!("✓ Menu validated: {} items", menu.len());

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.menu().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} menu items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to reseed.");
        return Ok(());
    }

    let inserted = db.menu().insert_all(menu.entries()).await?;
    println!("✓ Inserted {} menu items", inserted);

    println!();
    for (category, items) in menu.by_category() {
        println!("  {:<28} {} item(s)", category, items.len());
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
