//! Rendering of stock snapshots
//!
//! The monitor hands every changed snapshot to a [`RenderSink`]. The
//! bundled [`TableRenderer`] draws a plain text table and marks items
//! that are low on stock.

use std::io::{self, Write};

use chrono::Local;

use crate::database::StockItem;
use crate::error::{StockError, Result};

/// Marker placed in front of low stock rows
pub const LOW_STOCK_MARKER: char = '!';

/// Clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const COLUMNS: [&str; 5] = ["Product Code", "Item", "Quantity", "Low Threshold", "On Order"];

/// Consumer of stock snapshots
pub trait RenderSink {
    /// Draw the given rows, already ordered by item name
    fn render(&mut self, stock: &[StockItem]) -> Result<()>;
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn render(&mut self, stock: &[StockItem]) -> Result<()> {
        (**self).render(stock)
    }
}

/// Plain text table written to any `Write`
pub struct TableRenderer<W: Write> {
    out: W,
    header: Option<String>,
    clear_screen: bool,
}

impl TableRenderer<io::Stdout> {
    /// Renderer that redraws the terminal in place
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_clear_screen(true)
    }
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, header: None, clear_screen: false }
    }

    /// Line printed above the table
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Clear the screen before each frame
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Get the writer back, e.g. to inspect captured output
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TableRenderer<W> {
    fn render(&mut self, stock: &[StockItem]) -> Result<()> {
        let mut frame = String::new();
        if self.clear_screen {
            frame.push_str(CLEAR_SCREEN);
        }
        if let Some(header) = &self.header {
            frame.push_str(header);
            frame.push('\n');
        }
        frame.push_str(&format_table(stock));
        frame.push_str(&format!("Updated {}\n", Local::now().format("%H:%M:%S")));

        self.out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| StockError::RenderError(e.to_string()))
    }
}

/// Header line naming the product and its version
pub fn banner() -> String {
    format!("Stockwatch v{} - stock monitor", crate::VERSION)
}

/// Format rows as an aligned text table
///
/// Low stock rows start with [`LOW_STOCK_MARKER`] and end with `LOW`;
/// rows on order show `X` in the last column.
pub fn format_table(stock: &[StockItem]) -> String {
    let rows: Vec<[String; 5]> = stock
        .iter()
        .map(|s| {
            [
                s.product_code.clone(),
                s.item.clone(),
                s.quantity.to_string(),
                s.low_threshold.to_string(),
                if s.on_order { "X".to_string() } else { String::new() },
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, ' ', &COLUMNS.map(String::from), &widths, "");
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("-+-")));

    for (row, item) in rows.iter().zip(stock) {
        if item.is_low_stock() {
            push_line(&mut out, LOW_STOCK_MARKER, row, &widths, "  LOW");
        } else {
            push_line(&mut out, ' ', row, &widths, "");
        }
    }
    out
}

fn push_line(out: &mut String, marker: char, cells: &[String], widths: &[usize], suffix: &str) {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            // numeric columns are right aligned
            if i == 2 || i == 3 {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    out.push(marker);
    out.push(' ');
    out.push_str(cells.join(" | ").trim_end());
    out.push_str(suffix);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stock() -> Vec<StockItem> {
        vec![
            StockItem::new("EUK000001", "Anvil").with_quantity(20).with_low_threshold(5),
            StockItem::new("EUK000002", "Widget").with_quantity(3).with_low_threshold(5).with_on_order(true),
        ]
    }

    #[test]
    fn test_low_stock_rows_are_marked() {
        let table = format_table(&sample_stock());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Product Code"));
        assert!(lines[2].starts_with(' '));
        assert!(lines[2].contains("Anvil"));
        assert!(lines[3].starts_with(LOW_STOCK_MARKER));
        assert!(lines[3].ends_with("LOW"));
    }

    #[test]
    fn test_on_order_column() {
        let table = format_table(&sample_stock());
        let widget = table.lines().find(|l| l.contains("Widget")).unwrap();
        let anvil = table.lines().find(|l| l.contains("Anvil")).unwrap();
        assert!(widget.contains("| X"));
        assert!(!anvil.contains("| X"));
    }

    #[test]
    fn test_empty_stock_has_header_only() {
        let table = format_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_renderer_writes_header_and_table() {
        let mut renderer = TableRenderer::new(Vec::new()).with_header(banner());
        renderer.render(&sample_stock()).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.starts_with("Stockwatch v"));
        assert!(output.contains("Widget"));
        assert!(output.contains("Updated "));
        assert!(!output.contains(CLEAR_SCREEN));
    }

    #[test]
    fn test_banner_advertises_no_address() {
        let header = banner();
        assert!(header.contains(crate::VERSION));
        assert!(!header.contains("http"));
        assert!(!header.contains("web"));
    }

    /// Writer whose every write fails, like a closed terminal
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_render_error() {
        let mut renderer = TableRenderer::new(BrokenPipe);
        let err = renderer.render(&sample_stock()).unwrap_err();
        assert!(matches!(err, StockError::RenderError(ref msg) if msg.contains("pipe closed")));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_clear_screen_prefix() {
        let mut renderer = TableRenderer::new(Vec::new()).with_clear_screen(true);
        renderer.render(&[]).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.starts_with(CLEAR_SCREEN));
    }
}
