// Income vs expense series and category spend

use super::{month_end, month_start, window_start};
use crate::db::Transaction;
use crate::panels::IncomeExpensePoint;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Categories counted as discretionary "wants"
pub const WANTS_CATEGORIES: [&str; 3] = ["food_dining", "entertainment", "shopping"];

/// Monthly income, expenses and savings over the last `months` (1-12) months,
/// oldest first. Transfers are excluded from both sides.
pub fn monthly_income_expense(
    transactions: &[Transaction],
    as_of: NaiveDate,
    months: u32,
) -> Vec<IncomeExpensePoint> {
    let months = months.clamp(1, 12);
    let start = window_start(as_of, months);

    // month -> (income, expenses)
    let mut by_month: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for tx in transactions {
        if tx.txn_date < start || tx.txn_date > as_of || tx.is_transfer() {
            continue;
        }
        let entry = by_month.entry(month_start(tx.txn_date)).or_insert((0.0, 0.0));
        if tx.is_debit() {
            entry.1 += tx.amount.abs();
        } else {
            entry.0 += tx.amount;
        }
    }

    let mut cumulative_savings = 0.0;
    by_month
        .into_iter()
        .map(|(month, (income, expenses))| {
            let net_savings = income - expenses;
            cumulative_savings += net_savings;
            IncomeExpensePoint {
                month: month.format("%Y-%m").to_string(),
                income,
                expenses,
                net_savings,
                cumulative_savings,
            }
        })
        .collect()
}

/// Total debit spend in `categories` between `start` and `end` (inclusive)
pub fn category_spend(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
    categories: &[&str],
) -> f64 {
    transactions
        .iter()
        .filter(|tx| tx.is_debit() && tx.txn_date >= start && tx.txn_date <= end)
        .filter(|tx| {
            tx.category
                .as_deref()
                .is_some_and(|category| categories.contains(&category))
        })
        .map(|tx| tx.amount.abs())
        .sum()
}

/// Discretionary spend in the calendar month of `as_of`
pub fn wants_spend(transactions: &[Transaction], as_of: NaiveDate) -> f64 {
    category_spend(
        transactions,
        month_start(as_of),
        month_end(as_of),
        &WANTS_CATEGORIES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::create_test_transaction as tx;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_monthly_series_accumulates() {
        let transactions = vec![
            tx("2026-08-01", "EMPLOYER", 50_000.0, Some("income")),
            tx("2026-08-10", "RENT", -20_000.0, Some("housing")),
            tx("2026-09-01", "EMPLOYER", 50_000.0, Some("income")),
            tx("2026-09-15", "FLIGHT", -60_000.0, Some("travel")),
            tx("2026-10-01", "EMPLOYER", 50_000.0, Some("income")),
            tx("2026-10-05", "SWIGGY", -5_000.0, Some("food_dining")),
        ];

        let series = monthly_income_expense(&transactions, as_of(), 3);
        let months: Vec<&str> = series.iter().map(|p| p.month.as_str()).collect();

        assert_eq!(months, ["2026-08", "2026-09", "2026-10"]);
        assert_eq!(series[0].net_savings, 30_000.0);
        assert_eq!(series[1].net_savings, -10_000.0);
        assert_eq!(series[1].expenses, 60_000.0);
        assert_eq!(series[2].cumulative_savings, 65_000.0);
    }

    #[test]
    fn test_transfers_and_out_of_window_excluded() {
        let transactions = vec![
            tx("2026-10-02", "HDFC CARD", -15_000.0, Some("transfers")),
            tx("2026-10-03", "SAVINGS", 15_000.0, Some("transfers")),
            tx("2025-01-01", "OLD", -999.0, None),
            tx("2026-10-20", "FUTURE", -10.0, None),
            tx("2026-10-04", "UBER", -250.0, None),
        ];

        let series = monthly_income_expense(&transactions, as_of(), 6);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].income, 0.0);
        assert_eq!(series[0].expenses, 250.0);
    }

    #[test]
    fn test_wants_spend_current_month_only() {
        let transactions = vec![
            tx("2026-10-01", "SWIGGY", -1_200.0, Some("food_dining")),
            tx("2026-10-09", "PVR", -800.0, Some("entertainment")),
            tx("2026-10-10", "MYNTRA", -2_000.0, Some("shopping")),
            tx("2026-10-11", "REFUND", 500.0, Some("shopping")),
            tx("2026-10-12", "RENT", -20_000.0, Some("housing")),
            tx("2026-09-30", "SWIGGY", -700.0, Some("food_dining")),
        ];

        assert_eq!(wants_spend(&transactions, as_of()), 4_000.0);
        assert_eq!(
            category_spend(
                &transactions,
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                as_of(),
                &["food_dining"],
            ),
            1_900.0
        );
    }
}
