//! Database connection management

use std::path::{Path, PathBuf};
use std::time::Duration;
use rusqlite::Connection;
use tracing::{debug, info};
use crate::error::{StockError, Result};
use super::models::{InsertOutcome, StockItem, StockUpdate, UpdateOutcome};
use super::queries;

/// Handle to the stock database
///
/// Every operation opens its own connection, runs, and drops it again,
/// so clones of a store can be used from any number of threads. SQLite
/// serializes the writers; the busy timeout bounds how long a call waits
/// for a lock before failing with [`StockError::StoreBusy`].
#[derive(Debug, Clone)]
pub struct StockStore {
    /// Path to the database file
    path: PathBuf,
    /// Maximum time a call waits on a locked database
    busy_timeout: Duration,
}

impl StockStore {
    /// Point a store at a database file without touching it
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            busy_timeout: Duration::from_millis(crate::DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Open a store and make sure the stock table exists
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self::new(path);
        store.create_table_if_absent()?;
        Ok(store)
    }

    /// Set how long each call may wait for a lock
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the busy timeout
    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    /// Create the stock table if it does not exist
    pub fn create_table_if_absent(&self) -> Result<()> {
        let conn = self.connect()?;
        queries::enable_wal(&conn)?;
        queries::create_stock_table(&conn)?;
        debug!(path = %self.path.display(), "stock table ready");
        Ok(())
    }

    /// Get all rows ordered by item name
    pub fn fetch_all(&self) -> Result<Vec<StockItem>> {
        let conn = self.connect()?;
        queries::get_all_stock(&conn)
    }

    /// Get a single row by item name
    pub fn get(&self, item: &str) -> Result<Option<StockItem>> {
        let conn = self.connect()?;
        queries::get_stock_item(&conn, item)
    }

    /// Check if a product code is already in use
    pub fn code_exists(&self, product_code: &str) -> Result<bool> {
        let conn = self.connect()?;
        queries::product_code_exists(&conn, product_code)
    }

    /// Insert a new row
    ///
    /// A row whose item name or product code is already taken is not
    /// stored; the outcome says which column clashed.
    pub fn insert(&self, item: &StockItem) -> Result<InsertOutcome> {
        if item.item.is_empty() {
            return Err(StockError::InvalidInput("item must not be empty".to_string()));
        }

        let conn = self.connect()?;
        let outcome = queries::insert_stock_item(&conn, item)?;
        match &outcome {
            InsertOutcome::Inserted(row) => {
                info!(item = %row.item, product_code = %row.product_code, "stock item added")
            }
            InsertOutcome::Rejected(key) => {
                debug!(item = %item.item, duplicate = %key, "stock item skipped")
            }
        }
        Ok(outcome)
    }

    /// Replace code, quantity, threshold and on-order flag of a row
    pub fn update(&self, item: &str, update: &StockUpdate) -> Result<UpdateOutcome> {
        let conn = self.connect()?;
        let outcome = queries::update_stock_item(&conn, item, update)?;
        debug!(item, ?outcome, "stock item update");
        Ok(outcome)
    }

    /// Delete a row, returning whether it existed
    pub fn delete(&self, item: &str) -> Result<bool> {
        let conn = self.connect()?;
        let removed = queries::delete_stock_item(&conn, item)?;
        if removed {
            info!(item, "stock item deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_table() {
        let temp_dir = TempDir::new().unwrap();
        let store = StockStore::open(&temp_dir.path().join("stock.db")).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_new_does_not_touch_disk() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("stock.db");
        let store = StockStore::new(&db_path);
        assert!(!db_path.exists());
        assert_eq!(store.path(), db_path.as_path());
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("stock.db");

        StockStore::open(&db_path).unwrap()
            .insert(&StockItem::new("EUK000001", "Widget")).unwrap();

        let store = StockStore::open(&db_path).unwrap();
        assert_eq!(store.fetch_all().unwrap().len(), 1);
        assert!(store.code_exists("EUK000001").unwrap());
    }

    #[test]
    fn test_insert_rejects_empty_item() {
        let temp_dir = TempDir::new().unwrap();
        let store = StockStore::open(&temp_dir.path().join("stock.db")).unwrap();
        let result = store.insert(&StockItem::new("EUK000001", ""));
        assert!(matches!(result, Err(StockError::InvalidInput(_))));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let store = StockStore::open(&temp_dir.path().join("stock.db")).unwrap();
        store.insert(&StockItem::new("EUK000001", "Widget")).unwrap();

        assert!(!store.delete("Ghost").unwrap());
        assert_eq!(store.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_busy_timeout_builder() {
        let store = StockStore::new(Path::new("unused.db"))
            .with_busy_timeout(Duration::from_millis(250));
        assert_eq!(store.busy_timeout(), Duration::from_millis(250));
    }
}
