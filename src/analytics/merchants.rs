// Merchant aggregates and metrics

use super::{round2, window_start};
use crate::analytics::forecast::{category_display_name, UNCATEGORIZED};
use crate::db::Transaction;
use crate::panels::{MerchantAggregate, TransactionRecord};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantMetric {
    pub merchant: String,
    pub total_spending: f64,
    pub transaction_count: u32,
    pub average_ticket: f64,
    /// Transactions per day over the lookback window
    pub daily_frequency: f64,
    pub first_transaction: Option<NaiveDate>,
    pub last_transaction: Option<NaiveDate>,
    pub top_category: String,
    /// Change versus the previous window of equal length
    pub trend_percentage: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    total: f64,
    count: u32,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
    by_category: HashMap<String, f64>,
}

/// Debits inside `[start, end]` paired with their merchant key
fn merchant_debits<'a>(
    transactions: &'a [Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = (&'a str, &'a Transaction)> {
    transactions
        .iter()
        .filter(move |tx| tx.is_debit() && tx.txn_date >= start && tx.txn_date <= end)
        .filter_map(|tx| tx.merchant_key().map(|merchant| (merchant, tx)))
}

fn accumulate<'a>(
    transactions: &'a [Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> HashMap<&'a str, Accumulator> {
    let mut merchants: HashMap<&str, Accumulator> = HashMap::new();

    for (merchant, tx) in merchant_debits(transactions, start, end) {
        let amount = tx.amount.abs();
        let acc = merchants.entry(merchant).or_default();
        acc.total += amount;
        acc.count += 1;
        acc.first = Some(acc.first.map_or(tx.txn_date, |d| d.min(tx.txn_date)));
        acc.last = Some(acc.last.map_or(tx.txn_date, |d| d.max(tx.txn_date)));
        let category = tx.category.as_deref().unwrap_or(UNCATEGORIZED);
        *acc.by_category.entry(category.to_string()).or_insert(0.0) += amount;
    }

    merchants
}

/// Highest total first; ties broken by name so the order is stable
fn ranked(merchants: HashMap<&str, Accumulator>) -> Vec<(&str, Accumulator)> {
    let mut ranked: Vec<(&str, Accumulator)> = merchants.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total.total_cmp(&a.1.total).then_with(|| a.0.cmp(b.0)));
    ranked
}

/// Debit spend grouped by merchant between `start` and `end`, highest first
pub fn top_merchants(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
) -> Vec<MerchantAggregate> {
    ranked(accumulate(transactions, start, end))
        .into_iter()
        .take(limit)
        .map(|(merchant, acc)| MerchantAggregate {
            merchant: merchant.to_string(),
            total_spending: round2(acc.total),
            transaction_count: acc.count,
        })
        .collect()
}

/// Every transaction behind each listed aggregate, in store order.
/// Uses the same window and debit filter as `top_merchants`, so a
/// merchant's list length always equals its `transaction_count`.
pub fn merchant_transactions(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
    merchants: &[MerchantAggregate],
) -> BTreeMap<String, Vec<TransactionRecord>> {
    let mut lists: BTreeMap<String, Vec<TransactionRecord>> = merchants
        .iter()
        .map(|m| (m.merchant.clone(), Vec::new()))
        .collect();

    for (merchant, tx) in merchant_debits(transactions, start, end) {
        if let Some(list) = lists.get_mut(merchant) {
            list.push(TransactionRecord::from(tx));
        }
    }

    lists
}

/// Richer per-merchant metrics over the last `lookback_months` (1-12) months
pub fn merchant_metrics(
    transactions: &[Transaction],
    as_of: NaiveDate,
    limit: usize,
    lookback_months: u32,
) -> Vec<MerchantMetric> {
    let lookback_months = lookback_months.clamp(1, 12);
    let start = window_start(as_of, lookback_months);
    let prev_end = start - Duration::days(1);
    let prev_start = window_start(prev_end, lookback_months);
    let lookback_days = (as_of - start).num_days().max(1) as f64;

    let previous = accumulate(transactions, prev_start, prev_end);

    ranked(accumulate(transactions, start, as_of))
        .into_iter()
        .take(limit)
        .map(|(merchant, acc)| {
            let top_category = acc
                .by_category
                .iter()
                .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(code, _)| category_display_name(code))
                .unwrap_or_else(|| category_display_name(UNCATEGORIZED));

            let prev_total = previous.get(merchant).map_or(0.0, |p| p.total);
            let trend = if prev_total > 0.0 {
                (acc.total - prev_total) / prev_total * 100.0
            } else {
                0.0
            };

            MerchantMetric {
                merchant: merchant.to_string(),
                total_spending: round2(acc.total),
                transaction_count: acc.count,
                average_ticket: round2(acc.total / f64::from(acc.count.max(1))),
                daily_frequency: round2(f64::from(acc.count) / lookback_days),
                first_transaction: acc.first,
                last_transaction: acc.last,
                top_category,
                trend_percentage: round2(trend),
            }
        })
        .collect()
}
