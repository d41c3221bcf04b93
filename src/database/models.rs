//! Data models for the stock table

use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of the stock table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Product code, empty while unassigned
    pub product_code: String,
    /// Item name, the primary key
    pub item: String,
    /// Units in stock
    pub quantity: u64,
    /// Quantity at or below which the item is low on stock
    pub low_threshold: u64,
    /// True if a reorder has been placed
    pub on_order: bool,
}

impl StockItem {
    /// Create a row with default quantity, threshold and on-order flag
    pub fn new(product_code: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            item: item.into(),
            quantity: 0,
            low_threshold: crate::DEFAULT_LOW_THRESHOLD,
            on_order: false,
        }
    }

    /// Set the quantity
    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the low stock threshold
    pub fn with_low_threshold(mut self, low_threshold: u64) -> Self {
        self.low_threshold = low_threshold;
        self
    }

    /// Set the on-order flag
    pub fn with_on_order(mut self, on_order: bool) -> Self {
        self.on_order = on_order;
        self
    }

    /// Check if quantity has fallen to the threshold or below
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_threshold
    }

    /// Fields replaced by an update, taken from this row
    pub fn to_update(&self) -> StockUpdate {
        StockUpdate {
            product_code: self.product_code.clone(),
            quantity: self.quantity,
            low_threshold: self.low_threshold,
            on_order: self.on_order,
        }
    }
}

/// Replacement values for every mutable column of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub product_code: String,
    pub quantity: u64,
    pub low_threshold: u64,
    pub on_order: bool,
}

/// Unique column that rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKey {
    /// Another row already has this item name
    Item,
    /// Another row already has this product code
    ProductCode,
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateKey::Item => f.write_str("item"),
            DuplicateKey::ProductCode => f.write_str("product_code"),
        }
    }
}

/// Result of an insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row was stored
    Inserted(StockItem),
    /// Row was dropped because a unique column already holds its value
    Rejected(DuplicateKey),
}

impl InsertOutcome {
    /// Check if the row was stored
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Result of an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Row was overwritten
    Updated,
    /// No row has the given item name
    NotFound,
    /// New product code belongs to another row
    Rejected(DuplicateKey),
}
