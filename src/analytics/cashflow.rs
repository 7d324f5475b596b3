// Cashflow projection - average monthly net flow carried forward

use super::{month_start, round2};
use crate::db::Transaction;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// History used for the averages, in days
pub const CASHFLOW_HISTORY_DAYS: i64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMonth {
    /// `YYYY-MM`
    pub month: String,
    pub projected_income: f64,
    pub projected_expenses: f64,
    pub projected_balance: f64,
    pub net_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub current_balance: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub projections: Vec<ProjectedMonth>,
}

/// Project the balance `months_ahead` (1-3) months forward.
///
/// Returns `None` when no month in the last 90 days has activity.
pub fn project_cashflow(
    transactions: &[Transaction],
    as_of: NaiveDate,
    months_ahead: u32,
) -> Option<CashflowProjection> {
    let months_ahead = months_ahead.clamp(1, 3);
    let start = as_of - Duration::days(CASHFLOW_HISTORY_DAYS);

    let mut by_month: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| !tx.is_transfer() && tx.txn_date >= start && tx.txn_date <= as_of)
    {
        let entry = by_month.entry(month_start(tx.txn_date)).or_insert((0.0, 0.0));
        if tx.is_debit() {
            entry.1 += tx.amount.abs();
        } else {
            entry.0 += tx.amount;
        }
    }

    if by_month.is_empty() {
        tracing::debug!(%as_of, "No recent activity, skipping cashflow projection");
        return None;
    }

    let months = by_month.len() as f64;
    let average_income = by_month.values().map(|(income, _)| income).sum::<f64>() / months;
    let average_expenses = by_month.values().map(|(_, expenses)| expenses).sum::<f64>() / months;
    let net_flow = average_income - average_expenses;

    // Simplified balance: net of every non-transfer transaction on record
    let current_balance: f64 = transactions
        .iter()
        .filter(|tx| !tx.is_transfer() && tx.txn_date <= as_of)
        .map(|tx| tx.amount)
        .sum();

    let mut balance = current_balance;
    let projections = (1..=months_ahead)
        .map(|i| {
            balance += net_flow;
            let month = as_of + Duration::days(30 * i64::from(i));
            ProjectedMonth {
                month: month.format("%Y-%m").to_string(),
                projected_income: round2(average_income),
                projected_expenses: round2(average_expenses),
                projected_balance: round2(balance),
                net_flow: round2(net_flow),
            }
        })
        .collect();

    Some(CashflowProjection {
        current_balance: round2(current_balance),
        average_monthly_income: round2(average_income),
        average_monthly_expenses: round2(average_expenses),
        projections,
    })
}
