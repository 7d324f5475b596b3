// Per-category spending forecast
//
// Next-month prediction from a least-squares line over the monthly debit
// series, blended with the recent average once there are 3+ points.

use super::{month_start, round2, window_start};
use crate::db::Transaction;
use crate::panels::{ForecastItem, ForecastMethod};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Category code for debits without one
pub const UNCATEGORIZED: &str = "uncategorized";

/// Data points at which confidence reaches 1.0
pub const FULL_CONFIDENCE_POINTS: usize = 6;

/// `food_dining` → `Food Dining`
pub fn category_display_name(code: &str) -> String {
    code.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Least-squares slope and intercept over x = 0..n
fn linear_fit(ys: &[f64]) -> (f64, f64) {
    let n = ys.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;

    let (numerator, denominator) = ys.iter().enumerate().fold((0.0, 0.0), |(num, den), (i, y)| {
        let dx = i as f64 - x_mean;
        (num + dx * (y - y_mean), den + dx * dx)
    });

    let slope = if denominator == 0.0 { 0.0 } else { numerator / denominator };
    (slope, y_mean - slope * x_mean)
}

fn forecast_series(category: &str, ys: &[f64]) -> ForecastItem {
    let last = ys[ys.len() - 1];

    let (mut predicted, method) = if ys.len() >= 2 {
        let (slope, intercept) = linear_fit(ys);
        (intercept + slope * ys.len() as f64, ForecastMethod::Trend)
    } else {
        (last, ForecastMethod::RecentValue)
    };

    if ys.len() >= 3 {
        let recent = &ys[ys.len() - 3..];
        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        predicted = (predicted + recent_avg) / 2.0;
    }

    let predicted = predicted.max(0.0);
    let change = if last != 0.0 {
        (predicted - last) / last * 100.0
    } else {
        0.0
    };
    let confidence = (ys.len() as f64 / FULL_CONFIDENCE_POINTS as f64).min(1.0);

    ForecastItem {
        category: category.to_string(),
        category_name: category_display_name(category),
        predicted_amount: round2(predicted),
        last_amount: round2(last),
        change_percentage: round2(change),
        method,
        confidence: round2(confidence),
        data_points: ys.len(),
    }
}

/// Forecast every category with debit activity in the last `months` (3-18)
/// months, highest predicted spend first.
pub fn forecast_spending(transactions: &[Transaction], as_of: NaiveDate, months: u32) -> Vec<ForecastItem> {
    let months = months.clamp(3, 18);
    let start = window_start(as_of, months);

    let mut spend: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    let mut categories: BTreeSet<String> = BTreeSet::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.is_debit() && tx.txn_date >= start && tx.txn_date <= as_of)
    {
        let category = tx
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        categories.insert(category.clone());
        *spend.entry((category, month_start(tx.txn_date))).or_insert(0.0) += tx.amount.abs();
    }

    // A category's series holds only the months in which it had spend, in order
    let mut forecasts: Vec<ForecastItem> = categories
        .iter()
        .map(|category| {
            let ys: Vec<f64> = spend
                .range((category.clone(), NaiveDate::MIN)..=(category.clone(), NaiveDate::MAX))
                .map(|(_, amount)| *amount)
                .collect();
            forecast_series(category, &ys)
        })
        .collect();

    forecasts.sort_by(|a, b| b.predicted_amount.total_cmp(&a.predicted_amount));

    tracing::debug!(categories = forecasts.len(), %as_of, "Built spending forecast");
    forecasts
}
