//! Error types for Stockwatch

use rusqlite::ErrorCode;
use thiserror::Error;

/// Main error type for stock operations
#[derive(Error, Debug)]
pub enum StockError {
    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// The store stayed locked past the busy timeout
    #[error("Store busy: {0}")]
    StoreBusy(String),

    /// No free product code was found within the attempt budget
    #[error("Code generation failed: space exhausted for format {format} after {attempts} attempts")]
    CodeSpaceExhausted {
        /// Pattern form of the code format
        format: String,
        /// Number of candidates drawn
        attempts: u32,
    },

    /// Caller supplied an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Render sink failed to draw a frame
    #[error("Render error: {0}")]
    RenderError(String),

    /// The monitor thread panicked
    #[error("Monitor thread panicked")]
    MonitorPanicked,

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StockError {
    /// True for failures that may clear up on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, StockError::StoreBusy(_))
    }
}

impl From<rusqlite::Error> for StockError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                StockError::StoreBusy(err.to_string())
            }
            _ => StockError::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StockError {
    fn from(err: serde_json::Error) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
