// ⚠️ Error types for the store, config and import layers
// Panel derivations never fail; everything that touches files or SQLite does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD or MM/DD/YYYY)")]
    InvalidDate(String),

    #[error("Monthly contribution must be greater than 0 (got {0})")]
    InvalidContribution(f64),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
