// Catalog Source - read-only provider of the full product collection
// Two backends: SQLite (production) and an in-memory snapshot (tests, embedding)

use crate::db::{count_products, get_all_products, insert_products, setup_database, ProductItem};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

// ============================================================================
// CATALOG SOURCE
// ============================================================================

/// Supplies every product item on demand.
///
/// Implementations must be shareable across request handlers. Failures are
/// returned to the caller rather than masked as an empty catalog.
pub trait CatalogSource: Send + Sync {
    /// All items, in the catalog's stable order.
    fn list_all(&self) -> Result<Vec<ProductItem>>;

    /// Cardinality of the catalog.
    fn count(&self) -> Result<i64>;
}

// ============================================================================
// SQLITE CATALOG
// ============================================================================

#[derive(Clone)]
pub struct SqliteCatalog {
    db: Arc<Mutex<Connection>>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Fresh catalog backed by an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteCatalog {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Import products, skipping ids that already exist
    pub fn import(&self, products: &[ProductItem]) -> Result<usize> {
        let mut conn = self.lock()?;
        insert_products(&mut conn, products)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow!("catalog database lock poisoned"))
    }
}

impl CatalogSource for SqliteCatalog {
    fn list_all(&self) -> Result<Vec<ProductItem>> {
        let conn = self.lock()?;
        get_all_products(&conn).context("Failed to list products")
    }

    fn count(&self) -> Result<i64> {
        let conn = self.lock()?;
        count_products(&conn).context("Failed to count products")
    }
}

// ============================================================================
// IN-MEMORY CATALOG
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<RwLock<Vec<ProductItem>>>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<ProductItem>) -> Self {
        InMemoryCatalog {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Append an item to the end of the catalog
    pub fn insert(&self, item: ProductItem) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        items.push(item);
        Ok(())
    }
}

impl CatalogSource for InMemoryCatalog {
    fn list_all(&self) -> Result<Vec<ProductItem>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        Ok(items.clone())
    }

    fn count(&self) -> Result<i64> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        Ok(items.len() as i64)
    }
}
