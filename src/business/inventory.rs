//! Main Inventory API
//!
//! The operations the command-line surface performs on the stock
//! table. Each call maps to exactly one store mutation.

use tracing::info;
use crate::database::{InsertOutcome, StockItem, StockStore, StockUpdate, UpdateOutcome};
use crate::error::{StockError, Result};
use crate::utils::{CodeFormat, generate_unique_code};

/// Values supplied when adding a stock item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStock {
    /// Product code, empty to have one generated
    pub product_code: String,
    pub item: String,
    pub quantity: u64,
    pub low_threshold: u64,
    pub on_order: bool,
}

impl NewStock {
    /// New item with a generated code and default levels
    pub fn named(item: impl Into<String>) -> Self {
        Self {
            product_code: String::new(),
            item: item.into(),
            quantity: 0,
            low_threshold: crate::DEFAULT_LOW_THRESHOLD,
            on_order: false,
        }
    }
}

/// Stock operations over a store and a product code format
#[derive(Debug, Clone)]
pub struct Inventory {
    store: StockStore,
    code_format: CodeFormat,
}

impl Inventory {
    pub fn new(store: StockStore, code_format: CodeFormat) -> Self {
        Self { store, code_format }
    }

    /// Get the underlying store
    pub fn store(&self) -> &StockStore {
        &self.store
    }

    /// Get the format used for generated codes
    pub fn code_format(&self) -> &CodeFormat {
        &self.code_format
    }

    /// Get all stock ordered by item name
    pub fn list(&self) -> Result<Vec<StockItem>> {
        self.store.fetch_all()
    }

    /// Add a stock item
    ///
    /// An empty product code is replaced by a generated one. A clash on
    /// item name or product code leaves the store untouched and is
    /// reported as [`InsertOutcome::Rejected`].
    pub fn add(&self, new: NewStock) -> Result<InsertOutcome> {
        let item = new.item.trim();
        if item.is_empty() {
            return Err(StockError::InvalidInput("item must not be empty".to_string()));
        }

        let mut product_code = new.product_code.trim().to_string();
        if product_code.is_empty() {
            product_code = generate_unique_code(&self.store, &self.code_format)?;
            info!(item, product_code = %product_code, "assigned generated product code");
        }

        let row = StockItem {
            product_code,
            item: item.to_string(),
            quantity: new.quantity,
            low_threshold: new.low_threshold,
            on_order: new.on_order,
        };
        self.store.insert(&row)
    }

    /// Replace all mutable fields of an item
    pub fn update(&self, item: &str, mut update: StockUpdate) -> Result<UpdateOutcome> {
        update.product_code = update.product_code.trim().to_string();
        self.store.update(item, &update)
    }

    /// Delete an item, returning whether it existed
    pub fn delete(&self, item: &str) -> Result<bool> {
        self.store.delete(item)
    }
}
