use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A catalog entry.
/// Only `name` and `description` take part in search; the rest is carried along.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProductItem {
    pub id: i64,

    pub name: String,

    pub description: String,

    #[serde(default)]
    pub price: Option<f64>,
}

impl ProductItem {
    pub fn new(id: i64, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Products Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_name ON products(name)",
        [],
    )?;

    Ok(())
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<ProductItem>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut products = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let product: ProductItem = result
            .with_context(|| format!("Failed to deserialize product on record {}", line + 1))?;
        products.push(product);
    }

    Ok(products)
}

/// Insert products keyed by id. Rows whose id already exists are skipped,
/// so importing the same file twice is a no-op the second time.
pub fn insert_products(conn: &mut Connection, products: &[ProductItem]) -> Result<usize> {
    let tx = conn.transaction()?;
    let mut inserted = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO products (id, name, description, price)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for product in products {
            inserted += stmt.execute(params![
                product.id,
                product.name,
                product.description,
                product.price,
            ])?;
        }
    }

    tx.commit().context("Failed to commit product import")?;

    let skipped = products.len() - inserted;
    tracing::info!(inserted, skipped, "imported products");

    Ok(inserted)
}

pub fn get_all_products(conn: &Connection) -> Result<Vec<ProductItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, price
         FROM products
         ORDER BY id ASC",
    )?;

    let products = stmt
        .query_map([], |row| {
            Ok(ProductItem {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                price: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(products)
}

pub fn count_products(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;

    Ok(count)
}
