//! Database layer for Stockwatch
//!
//! Handles SQLite storage of the stock table:
//! - Schema creation
//! - CRUD operations keyed by item name
//! - Unique-column clashes reported as outcomes, not errors

pub mod models;
pub mod schema;
pub mod connection;
pub mod queries;

pub use connection::StockStore;
pub use models::*;
