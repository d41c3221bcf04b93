//! Business logic layer for Stockwatch
//!
//! This module provides the Inventory API used by the commands that
//! change stock.

pub mod inventory;

pub use inventory::{Inventory, NewStock};
