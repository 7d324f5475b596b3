// 🗄️ Transaction Store - CSV → SQLite + WAL
//
// Stored transactions carry a signed amount (negative = debit, positive =
// credit) and a content hash so re-importing the same statement is a no-op.

use crate::error::{Error, Result};
use crate::rules::RuleEngine;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Category code excluded from income/expense and balance figures
pub const TRANSFER_CATEGORY: &str = "transfers";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Debit,
    Credit,
}

/// A transaction as persisted in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity (UUID)
    pub id: String,

    pub txn_date: NaiveDate,

    /// Date the bank posted it, when the statement carries one
    pub posted_date: Option<NaiveDate>,

    pub description: String,

    /// Merchant string as it appeared on the statement
    pub merchant_raw: String,

    /// Canonical merchant name assigned by a rule
    pub merchant_norm: Option<String>,

    /// Signed amount (negative = money out)
    pub amount: f64,

    pub category: Option<String>,

    pub source_file: String,
    pub line_number: usize,
}

impl Transaction {
    pub fn direction(&self) -> Direction {
        if self.amount < 0.0 {
            Direction::Debit
        } else {
            Direction::Credit
        }
    }

    pub fn is_debit(&self) -> bool {
        self.direction() == Direction::Debit
    }

    pub fn is_transfer(&self) -> bool {
        self.category.as_deref() == Some(TRANSFER_CATEGORY)
    }

    /// Normalized merchant when a rule assigned one, otherwise the raw string.
    /// `None` when both are blank.
    pub fn merchant_key(&self) -> Option<&str> {
        self.merchant_norm
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(self.merchant_raw.trim()).filter(|m| !m.is_empty()))
    }

    /// Compute idempotency hash for duplicate detection
    /// Identity = id (UUID), Deduplication = hash
    pub fn compute_idempotency_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}|{}|{}|{}",
            self.txn_date,
            self.amount,
            self.merchant_raw,
            self.description,
            self.source_file,
            self.line_number
        ));
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// CSV IMPORT
// ============================================================================

/// One row of the import CSV
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "Posted_Date", default)]
    posted_date: Option<String>,

    #[serde(rename = "Description", default)]
    description: String,

    #[serde(rename = "Merchant", default)]
    merchant: String,

    #[serde(rename = "Amount")]
    amount: f64,

    #[serde(rename = "Category", default)]
    category: Option<String>,
}

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load a statement CSV, classifying each row with the rule engine.
/// Explicit `Category` values in the file win over rule categories.
pub fn load_csv(csv_path: &Path, rules: &RuleEngine) -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_path(csv_path)?;
    let source_file = csv_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut transactions = Vec::new();

    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let posted_date = match blank_to_none(row.posted_date) {
            Some(value) => Some(parse_date(&value)?),
            None => None,
        };

        let matched_text = if row.merchant.trim().is_empty() {
            row.description.as_str()
        } else {
            row.merchant.as_str()
        };
        let classification = rules.classify(matched_text);

        transactions.push(Transaction {
            id: uuid::Uuid::new_v4().to_string(),
            txn_date: parse_date(&row.date)?,
            posted_date,
            description: row.description.trim().to_string(),
            merchant_raw: row.merchant.trim().to_string(),
            merchant_norm: classification.merchant,
            amount: row.amount,
            category: blank_to_none(row.category).or(classification.category),
            source_file: source_file.clone(),
            // Header is line 1
            line_number: index + 2,
        });
    }

    tracing::info!(
        file = %source_file,
        rows = transactions.len(),
        "Loaded statement CSV"
    );

    Ok(transactions)
}

// ============================================================================
// SQLITE
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tx_uuid TEXT NOT NULL,
            idempotency_hash TEXT UNIQUE NOT NULL,
            txn_date TEXT NOT NULL,
            posted_date TEXT,
            description TEXT NOT NULL,
            merchant_raw TEXT NOT NULL,
            merchant_norm TEXT,
            amount REAL NOT NULL,
            category TEXT,
            source_file TEXT NOT NULL,
            line_number INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(txn_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_merchant ON transactions(merchant_norm)",
        [],
    )?;

    Ok(())
}

/// Insert transactions, skipping any whose idempotency hash is already stored.
/// Returns the number actually inserted.
pub fn insert_transactions(conn: &Connection, transactions: &[Transaction]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for tx in transactions {
        let result = conn.execute(
            "INSERT INTO transactions (
                tx_uuid, idempotency_hash, txn_date, posted_date, description,
                merchant_raw, merchant_norm, amount, category, source_file, line_number
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                tx.id,
                tx.compute_idempotency_hash(),
                tx.txn_date.to_string(),
                tx.posted_date.map(|d| d.to_string()),
                tx.description,
                tx.merchant_raw,
                tx.merchant_norm,
                tx.amount,
                tx.category,
                tx.source_file,
                tx.line_number as i64,
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(inserted, duplicates, "Inserted transactions");

    Ok(inserted)
}

const SELECT_COLUMNS: &str = "tx_uuid, txn_date, posted_date, description, merchant_raw,
     merchant_norm, amount, category, source_file, line_number";

fn parse_stored_date(value: &str, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let txn_date: String = row.get(1)?;
    let posted_date: Option<String> = row.get(2)?;
    let line_number: i64 = row.get(9)?;

    Ok(Transaction {
        id: row.get(0)?,
        txn_date: parse_stored_date(&txn_date, 1)?,
        posted_date: posted_date
            .map(|d| parse_stored_date(&d, 2))
            .transpose()?,
        description: row.get(3)?,
        merchant_raw: row.get(4)?,
        merchant_norm: row.get(5)?,
        amount: row.get(6)?,
        category: row.get(7)?,
        source_file: row.get(8)?,
        line_number: line_number.max(0) as usize,
    })
}

/// All transactions, newest first
pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions ORDER BY txn_date DESC, id DESC",
        SELECT_COLUMNS
    ))?;

    let transactions = stmt
        .query_map([], row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(transactions)
}

/// Transactions for one merchant (normalized name, falling back to raw), newest first
pub fn get_transactions_by_merchant(conn: &Connection, merchant: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions
         WHERE COALESCE(NULLIF(TRIM(merchant_norm), ''), TRIM(merchant_raw)) = ?1
         ORDER BY txn_date DESC, id DESC",
        SELECT_COLUMNS
    ))?;

    let transactions = stmt
        .query_map(params![merchant.trim()], row_to_transaction)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(transactions)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================
