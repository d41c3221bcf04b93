//! SQL query operations for the stock table
//!
//! Low-level functions over a borrowed connection. `StockStore` wraps
//! them with connection handling; most callers should use that instead.

use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use crate::error::Result;
use super::models::{DuplicateKey, InsertOutcome, StockItem, StockUpdate, UpdateOutcome};
use super::schema;

/// Prefix of SQLite's message for a UNIQUE or PRIMARY KEY violation
const UNIQUE_VIOLATION: &str = "UNIQUE constraint failed";

/// Create the stock table if it does not exist
pub fn create_stock_table(conn: &Connection) -> Result<()> {
    for sql in schema::CREATE_ALL_TABLES {
        conn.execute(sql, [])?;
    }
    Ok(())
}

/// Switch the database to write-ahead logging
pub fn enable_wal(conn: &Connection) -> Result<()> {
    conn.execute_batch(schema::ENABLE_WAL)?;
    Ok(())
}

/// Get all rows ordered by item name
pub fn get_all_stock(conn: &Connection) -> Result<Vec<StockItem>> {
    let mut stmt = conn.prepare(
        "SELECT product_code, item, quantity, low_threshold, on_order
         FROM stock ORDER BY item"
    )?;

    let items = stmt.query_map([], row_to_item)?;

    items.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get a single row by item name
pub fn get_stock_item(conn: &Connection, item: &str) -> Result<Option<StockItem>> {
    conn.query_row(
        "SELECT product_code, item, quantity, low_threshold, on_order
         FROM stock WHERE item = ?",
        params![item],
        row_to_item,
    )
    .optional()
    .map_err(Into::into)
}

/// Check if any row carries the given product code
pub fn product_code_exists(conn: &Connection, product_code: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM stock WHERE product_code = ?",
            params![product_code],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Insert a row, reporting a unique-column clash as `Rejected`
pub fn insert_stock_item(conn: &Connection, item: &StockItem) -> Result<InsertOutcome> {
    let result = conn.execute(
        "INSERT INTO stock (product_code, item, quantity, low_threshold, on_order)
         VALUES (?, ?, ?, ?, ?)",
        params![
            code_param(&item.product_code),
            item.item,
            item.quantity,
            item.low_threshold,
            item.on_order,
        ],
    );

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted(item.clone())),
        Err(err) => match duplicate_key(&err) {
            Some(key) => Ok(InsertOutcome::Rejected(key)),
            None => Err(err.into()),
        },
    }
}

/// Overwrite the mutable columns of the row keyed by `item`
pub fn update_stock_item(conn: &Connection, item: &str, update: &StockUpdate) -> Result<UpdateOutcome> {
    let result = conn.execute(
        "UPDATE stock SET
            product_code = ?,
            quantity = ?,
            low_threshold = ?,
            on_order = ?
         WHERE item = ?",
        params![
            code_param(&update.product_code),
            update.quantity,
            update.low_threshold,
            update.on_order,
            item,
        ],
    );

    match result {
        Ok(0) => Ok(UpdateOutcome::NotFound),
        Ok(_) => Ok(UpdateOutcome::Updated),
        Err(err) => match duplicate_key(&err) {
            Some(key) => Ok(UpdateOutcome::Rejected(key)),
            None => Err(err.into()),
        },
    }
}

/// Delete the row keyed by `item`, returning whether one existed
pub fn delete_stock_item(conn: &Connection, item: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM stock WHERE item = ?", params![item])?;
    Ok(rows > 0)
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<StockItem> {
    Ok(StockItem {
        product_code: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        item: row.get(1)?,
        quantity: row.get(2)?,
        low_threshold: row.get(3)?,
        on_order: row.get::<_, i64>(4)? != 0,
    })
}

/// Empty codes are stored as NULL
fn code_param(product_code: &str) -> Option<&str> {
    (!product_code.is_empty()).then_some(product_code)
}

/// Map a unique-constraint failure to the column that caused it
fn duplicate_key(err: &rusqlite::Error) -> Option<DuplicateKey> {
    let rusqlite::Error::SqliteFailure(failure, Some(message)) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation || !message.starts_with(UNIQUE_VIOLATION) {
        return None;
    }

    if message.contains("stock.product_code") {
        Some(DuplicateKey::ProductCode)
    } else if message.contains("stock.item") {
        Some(DuplicateKey::Item)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_stock_table(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_table_is_idempotent() {
        let conn = memory_conn();
        create_stock_table(&conn).unwrap();
        assert!(get_all_stock(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_read_back() {
        let conn = memory_conn();
        let item = StockItem::new("EUK123456", "Widget").with_quantity(10).with_on_order(true);

        let outcome = insert_stock_item(&conn, &item).unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted(item.clone()));
        assert_eq!(get_stock_item(&conn, "Widget").unwrap(), Some(item));
    }

    #[test]
    fn test_duplicate_item_is_rejected() {
        let conn = memory_conn();
        insert_stock_item(&conn, &StockItem::new("EUK000001", "Widget")).unwrap();

        let outcome = insert_stock_item(&conn, &StockItem::new("EUK000002", "Widget")).unwrap();
        assert_eq!(outcome, InsertOutcome::Rejected(DuplicateKey::Item));
        assert_eq!(get_all_stock(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_code_is_rejected() {
        let conn = memory_conn();
        insert_stock_item(&conn, &StockItem::new("EUK000001", "Widget")).unwrap();

        let outcome = insert_stock_item(&conn, &StockItem::new("EUK000001", "Gadget")).unwrap();
        assert_eq!(outcome, InsertOutcome::Rejected(DuplicateKey::ProductCode));
        assert_eq!(get_stock_item(&conn, "Gadget").unwrap(), None);
    }

    #[test]
    fn test_empty_codes_do_not_collide() {
        let conn = memory_conn();
        assert!(insert_stock_item(&conn, &StockItem::new("", "Widget")).unwrap().is_inserted());
        assert!(insert_stock_item(&conn, &StockItem::new("", "Gadget")).unwrap().is_inserted());

        let all = get_all_stock(&conn).unwrap();
        assert!(all.iter().all(|i| i.product_code.is_empty()));
        assert!(!product_code_exists(&conn, "").unwrap());
    }

    #[test]
    fn test_empty_item_is_an_error() {
        let conn = memory_conn();
        assert!(insert_stock_item(&conn, &StockItem::new("EUK000001", "")).is_err());
    }

    #[test]
    fn test_quantities_beyond_u32_read_back() {
        let conn = memory_conn();
        conn.execute(
            "INSERT INTO stock (product_code, item, quantity, low_threshold) VALUES ('EUK000002', 'Bulk', 5000000000, 4294967296)",
            [],
        )
        .unwrap();

        let bulk = get_stock_item(&conn, "Bulk").unwrap().unwrap();
        assert_eq!(bulk.quantity, 5_000_000_000);
        assert_eq!(bulk.low_threshold, 4_294_967_296);
        assert_eq!(get_all_stock(&conn).unwrap(), vec![bulk]);
    }

    #[test]
    fn test_get_all_sorted_by_item() {
        let conn = memory_conn();
        for name in ["Sprocket", "Anvil", "Gadget"] {
            insert_stock_item(&conn, &StockItem::new("", name)).unwrap();
        }

        let names: Vec<_> = get_all_stock(&conn).unwrap().into_iter().map(|i| i.item).collect();
        assert_eq!(names, vec!["Anvil", "Gadget", "Sprocket"]);
    }

    #[test]
    fn test_update_outcomes() {
        let conn = memory_conn();
        insert_stock_item(&conn, &StockItem::new("EUK000001", "Widget")).unwrap();
        insert_stock_item(&conn, &StockItem::new("EUK000002", "Gadget")).unwrap();

        let update = StockItem::new("EUK000009", "Widget").with_quantity(3).to_update();
        assert_eq!(update_stock_item(&conn, "Widget", &update).unwrap(), UpdateOutcome::Updated);
        assert_eq!(update_stock_item(&conn, "Ghost", &update).unwrap(), UpdateOutcome::NotFound);

        let clash = StockItem::new("EUK000009", "Gadget").to_update();
        assert_eq!(
            update_stock_item(&conn, "Gadget", &clash).unwrap(),
            UpdateOutcome::Rejected(DuplicateKey::ProductCode)
        );

        let widget = get_stock_item(&conn, "Widget").unwrap().unwrap();
        assert_eq!(widget.product_code, "EUK000009");
        assert_eq!(widget.quantity, 3);
    }

    #[test]
    fn test_delete_reports_presence() {
        let conn = memory_conn();
        insert_stock_item(&conn, &StockItem::new("EUK000001", "Widget")).unwrap();

        assert!(delete_stock_item(&conn, "Widget").unwrap());
        assert!(!delete_stock_item(&conn, "Widget").unwrap());
        assert!(!product_code_exists(&conn, "EUK000001").unwrap());
    }
}
