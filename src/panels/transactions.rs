// 📋 Transaction list modal
//
// Records arrive with optional fields from different producers. They are
// normalized exactly once into `TransactionRow`; display code only ever
// sees the canonical row.

use super::PanelState;
use crate::db::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shown when no merchant name is available
pub const MISSING_FIELD: &str = "N/A";

/// Shown when neither a description nor a merchant is available
pub const DESCRIPTION_PLACEHOLDER: &str = "—";

/// Transaction as handed to the list panel. Any field may be absent;
/// a missing or null amount reads as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub merchant_name_raw: Option<String>,
    #[serde(default)]
    pub merchant_name_norm: Option<String>,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub amount: f64,
    #[serde(default)]
    pub txn_date: Option<NaiveDate>,
    /// Alternate date field (posting date)
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        TransactionRecord {
            id: Some(tx.id.clone()),
            merchant_name_raw: Some(tx.merchant_raw.clone()),
            merchant_name_norm: tx.merchant_norm.clone(),
            amount: tx.amount,
            txn_date: Some(tx.txn_date),
            posted_date: tx.posted_date,
            description: Some(tx.description.clone()),
            category: tx.category.clone(),
        }
    }
}

/// Canonical, display-ready row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: NaiveDate,
    pub merchant: String,
    pub description: String,
    /// Always non-negative
    pub amount: f64,
    pub is_debit: bool,
    pub category: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TransactionRow {
    /// Resolve every fallback chain for one record.
    /// `today` stands in for a missing date; `index` for a missing id.
    pub fn normalize(record: &TransactionRecord, index: usize, today: NaiveDate) -> Self {
        let norm = present(&record.merchant_name_norm);

        TransactionRow {
            id: present(&record.id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("row-{}", index)),
            date: record.txn_date.or(record.posted_date).unwrap_or(today),
            merchant: norm
                .or_else(|| present(&record.merchant_name_raw))
                .unwrap_or(MISSING_FIELD)
                .to_string(),
            description: present(&record.description)
                .or(norm)
                .unwrap_or(DESCRIPTION_PLACEHOLDER)
                .to_string(),
            amount: record.amount.abs(),
            is_debit: record.amount < 0.0,
            category: present(&record.category).map(str::to_string),
        }
    }
}

/// Derived contents of the transaction list modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionList {
    pub title: String,
    pub subtitle: Option<String>,
    pub state: PanelState<Vec<TransactionRow>>,
}

impl TransactionList {
    pub fn derive(
        title: &str,
        subtitle: Option<&str>,
        records: &[TransactionRecord],
        today: NaiveDate,
    ) -> Self {
        let rows: Vec<TransactionRow> = records
            .iter()
            .enumerate()
            .map(|(index, record)| TransactionRow::normalize(record, index, today))
            .collect();

        TransactionList {
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            state: PanelState::resolve(false, None, rows),
        }
    }

    pub fn rows(&self) -> &[TransactionRow] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sum of displayed amounts
    pub fn total(&self) -> f64 {
        self.rows().iter().map(|row| row.amount).sum()
    }
}

// ============================================================================
// MODAL
// ============================================================================

/// A transaction list shown as a dismissible modal.
///
/// `on_close` runs once per dismissal; dismissing a closed modal is a no-op.
pub struct TransactionModal {
    pub list: TransactionList,
    open: bool,
    on_close: Box<dyn FnMut() + Send>,
}

impl TransactionModal {
    pub fn new(list: TransactionList, on_close: impl FnMut() + Send + 'static) -> Self {
        TransactionModal {
            list,
            open: true,
            on_close: Box::new(on_close),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn dismiss(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        (self.on_close)();
    }
}

impl std::fmt::Debug for TransactionModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionModal")
            .field("list", &self.list)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}
