//! # Stockwatch
//!
//! Stock level tracking on SQLite with a live terminal view.
//!
//! ## Features
//!
//! - Stock table keyed by item name with unique product codes
//! - Product code generation from a prefix-and-digits pattern
//! - Change-detecting monitor that redraws only when stock changes
//! - Duplicate inserts reported as outcomes instead of errors
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use stockwatch::{CodeFormat, Inventory, NewStock, StockStore};
//!
//! let store = StockStore::open(Path::new("inventory.db")).unwrap();
//! let inventory = Inventory::new(store, CodeFormat::parse("EUK111111"));
//!
//! inventory.add(NewStock::named("Widget")).unwrap();
//! for row in inventory.list().unwrap() {
//!     println!("{}: {} (low: {})", row.product_code, row.item, row.is_low_stock());
//! }
//! ```

pub mod business;
pub mod config;
pub mod database;
pub mod error;
pub mod monitor;
pub mod render;
pub mod utils;

// Re-export main types
pub use error::{StockError, Result};
pub use config::Settings;
pub use database::{StockStore, StockItem, StockUpdate, InsertOutcome, UpdateOutcome, DuplicateKey};
pub use business::{Inventory, NewStock};
pub use monitor::{Monitor, MonitorHandle, Snapshot, StockSource, TickOutcome};
pub use render::{RenderSink, TableRenderer};
pub use utils::{CodeFormat, CodeLookup, generate_unique_code};

/// Crate version shown in the monitor header
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Database filename
pub const DATABASE_FILENAME: &str = "inventory.db";

/// Default product code pattern
pub const DEFAULT_CODE_FORMAT: &str = "EUK111111";

/// Default low stock threshold for new items
pub const DEFAULT_LOW_THRESHOLD: u64 = 5;

/// Default seconds between monitor ticks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default wait on a locked database, in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Candidates drawn before code generation gives up
pub const MAX_CODE_ATTEMPTS: u32 = 1000;
