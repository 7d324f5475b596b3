// 📊 Analytics - producers of the panel inputs
//
// Every producer takes the stored transactions plus an explicit `as_of`
// date, so a snapshot built twice from the same store is identical.

pub mod cashflow;
pub mod forecast;
pub mod goals;
pub mod merchants;
pub mod spending;

use chrono::{Datelike, Duration, NaiveDate};

pub use cashflow::{project_cashflow, CashflowProjection, ProjectedMonth};
pub use forecast::{category_display_name, forecast_spending};
pub use goals::{coaching_tips, goal_impact, simulate_goal, suggested_monthly_need, GoalSimulation};
pub use merchants::{merchant_metrics, merchant_transactions, top_merchants, MerchantMetric};
pub use spending::{category_spend, monthly_income_expense, wants_spend, WANTS_CATEGORIES};

/// First day of the calendar month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the calendar month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|next| next - Duration::days(1))
        .unwrap_or(date)
}

/// Lookback window used throughout: `months` periods of 30 days
pub fn window_start(as_of: NaiveDate, months: u32) -> NaiveDate {
    as_of - Duration::days(i64::from(months) * 30)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(month_end(d), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        let dec = NaiveDate::from_ymd_opt(2026, 12, 5).unwrap();
        assert_eq!(month_end(dec), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_window_start() {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(window_start(as_of, 3), NaiveDate::from_ymd_opt(2026, 7, 19).unwrap());
    }
}
