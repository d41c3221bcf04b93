//! Database schema definitions

/// Name of the stock table
pub const STOCK_TABLE: &str = "stock";

/// SQL to create the stock table
///
/// `product_code` is stored as NULL while a row has no code, so the
/// UNIQUE constraint only applies to non-empty codes.
pub const CREATE_STOCK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stock (
    product_code    TEXT UNIQUE,
    item            TEXT NOT NULL PRIMARY KEY CHECK (length(item) > 0),
    quantity        INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    low_threshold   INTEGER NOT NULL DEFAULT 5 CHECK (low_threshold >= 0),
    on_order        INTEGER NOT NULL DEFAULT 0
)
"#;

/// Journal settings applied when the table is created
pub const ENABLE_WAL: &str = "PRAGMA journal_mode=WAL";

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[CREATE_STOCK_TABLE];
