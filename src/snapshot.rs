// 📸 Dashboard Snapshot - every panel input for one render pass
//
// The snapshot is the only thing panels see. It is built once from the
// store (or loaded from JSON produced elsewhere), then derived into a
// `DashboardView`. Nothing is shared or mutated between passes.

use crate::analytics::{
    self, coaching_tips, goal_impact, merchant_metrics, merchant_transactions,
    monthly_income_expense, project_cashflow, CashflowProjection, MerchantMetric,
};
use crate::config::AppConfig;
use crate::db::Transaction;
use crate::error::Result;
use crate::panels::{
    derive_forecast, derive_goal_progress, derive_merchant_panel, derive_milestones, goal_summary,
    ForecastItem, ForecastRow, GoalProgressRow, GoalRecord, IncomeExpensePoint,
    MerchantAggregate, MerchantBreakdown, MilestoneSummary, PanelState, TransactionList,
    TransactionRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Shown on the goals panel when no goals are configured
pub const NO_GOALS_MESSAGE: &str = "No active goals found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Stands in for "now" in every derivation
    pub as_of: NaiveDate,

    pub transactions_title: String,
    #[serde(default)]
    pub transactions_subtitle: Option<String>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,

    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    /// Explicit message for the goals panel (e.g. a producer failure)
    #[serde(default)]
    pub goals_message: Option<String>,
    #[serde(default)]
    pub goal_tips: Vec<String>,

    #[serde(default)]
    pub income_expense: Vec<IncomeExpensePoint>,
    #[serde(default)]
    pub cashflow: Option<CashflowProjection>,
    #[serde(default)]
    pub forecasts: Vec<ForecastItem>,
    #[serde(default)]
    pub merchants: Vec<MerchantAggregate>,
    /// Uncapped transactions behind each entry of `merchants`
    #[serde(default)]
    pub merchant_transactions: BTreeMap<String, Vec<TransactionRecord>>,
    #[serde(default)]
    pub merchant_metrics: Vec<MerchantMetric>,

    pub wants_target: f64,
    #[serde(default)]
    pub wants_current: f64,
}

impl DashboardSnapshot {
    /// Run every producer over the stored transactions
    pub fn build(transactions: &[Transaction], config: &AppConfig, as_of: NaiveDate) -> Self {
        let dash = &config.dashboard;

        let records = transactions
            .iter()
            .filter(|tx| tx.txn_date <= as_of)
            .take(dash.recent_limit)
            .map(TransactionRecord::from)
            .collect();

        let goals: Vec<GoalRecord> = config.goals.iter().map(goal_impact).collect();
        let goals_message = goals.is_empty().then(|| NO_GOALS_MESSAGE.to_string());
        let goal_tips = coaching_tips(&goals, as_of, &dash.currency_symbol);

        let merchant_start = analytics::window_start(as_of, dash.merchant_lookback_months.clamp(1, 12));
        let merchants = analytics::top_merchants(transactions, merchant_start, as_of, dash.merchant_limit);
        let merchant_lists = merchant_transactions(transactions, merchant_start, as_of, &merchants);

        let snapshot = DashboardSnapshot {
            as_of,
            transactions_title: dash.transactions_title.clone(),
            transactions_subtitle: dash.transactions_subtitle.clone(),
            transactions: records,
            goals,
            goals_message,
            goal_tips,
            income_expense: monthly_income_expense(transactions, as_of, dash.history_months),
            cashflow: project_cashflow(transactions, as_of, dash.cashflow_months_ahead),
            forecasts: analytics::forecast_spending(transactions, as_of, dash.forecast_months),
            merchants,
            merchant_transactions: merchant_lists,
            merchant_metrics: merchant_metrics(
                transactions,
                as_of,
                dash.merchant_limit,
                dash.merchant_lookback_months,
            ),
            wants_target: dash.wants_target,
            wants_current: analytics::wants_spend(transactions, as_of),
        };

        tracing::info!(
            %as_of,
            transactions = snapshot.transactions.len(),
            goals = snapshot.goals.len(),
            months = snapshot.income_expense.len(),
            forecasts = snapshot.forecasts.len(),
            merchants = snapshot.merchants.len(),
            tips = snapshot.goal_tips.len(),
            "Built dashboard snapshot"
        );

        snapshot
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded snapshot from {:?}", path);
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!("Wrote snapshot to {:?}", path);
        Ok(())
    }

    /// Transaction list for the modal, optionally narrowed to one merchant
    pub fn transaction_list(&self, merchant: Option<&str>) -> TransactionList {
        match merchant {
            None => TransactionList::derive(
                &self.transactions_title,
                self.transactions_subtitle.as_deref(),
                &self.transactions,
                self.as_of,
            ),
            Some(name) => match self.merchant_transactions.get(name) {
                Some(records) => {
                    TransactionList::derive(name, Some(&self.transactions_title), records, self.as_of)
                }
                // Snapshots produced elsewhere may omit the per-merchant lists
                None => {
                    let records: Vec<TransactionRecord> = self
                        .transactions
                        .iter()
                        .filter(|record| {
                            let norm = record.merchant_name_norm.as_deref().map(str::trim);
                            let raw = record.merchant_name_raw.as_deref().map(str::trim);
                            norm.filter(|m| !m.is_empty()).or(raw) == Some(name)
                        })
                        .cloned()
                        .collect();
                    TransactionList::derive(name, Some(&self.transactions_title), &records, self.as_of)
                }
            },
        }
    }
}

// ============================================================================
// DERIVED VIEW
// ============================================================================

/// All panels derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub as_of: NaiveDate,
    pub transactions: TransactionList,
    pub goals: PanelState<Vec<GoalProgressRow>>,
    pub goal_summary: String,
    pub goal_tips: Vec<String>,
    pub milestones: MilestoneSummary,
    pub forecast: PanelState<Vec<ForecastRow>>,
    pub cashflow: Option<CashflowProjection>,
    pub merchants: PanelState<MerchantBreakdown>,
}

impl DashboardView {
    pub fn derive(snapshot: &DashboardSnapshot) -> Self {
        let goals = derive_goal_progress(&snapshot.goals, false, snapshot.goals_message.as_deref());
        let goal_summary = goal_summary(goals.ready().map(Vec::as_slice).unwrap_or(&[]));

        DashboardView {
            as_of: snapshot.as_of,
            transactions: snapshot.transaction_list(None),
            goals,
            goal_summary,
            goal_tips: snapshot.goal_tips.clone(),
            milestones: derive_milestones(
                &snapshot.income_expense,
                snapshot.wants_target,
                snapshot.wants_current,
            ),
            forecast: derive_forecast(&snapshot.forecasts, false),
            cashflow: snapshot.cashflow.clone(),
            merchants: derive_merchant_panel(&snapshot.merchants, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoalConfig;
    use crate::db::tests::create_test_transaction as tx;
    use crate::db::{get_all_transactions, insert_transactions, setup_database};
    use rusqlite::Connection;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn config_with_goals() -> AppConfig {
        let mut config = AppConfig::default();
        config.goals = vec![
            GoalConfig {
                goal_id: "emergency".to_string(),
                goal_name: "Emergency Fund".to_string(),
                target_amount: 100_000.0,
                current_amount: 90_000.0,
                target_date: None,
            },
            GoalConfig {
                goal_id: "car".to_string(),
                goal_name: "Car".to_string(),
                target_amount: 500_000.0,
                current_amount: 50_000.0,
                target_date: None,
            },
        ];
        config
    }

    fn stored_transactions() -> Vec<Transaction> {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut swiggy = tx("2026-10-02", "SWIGGY*ORDER", -1_500.0, Some("food_dining"));
        swiggy.merchant_norm = Some("Swiggy".to_string());

        insert_transactions(
            &conn,
            &[
                tx("2026-08-01", "EMPLOYER", 80_000.0, Some("income")),
                tx("2026-08-05", "RENT", -30_000.0, Some("housing")),
                tx("2026-09-01", "EMPLOYER", 80_000.0, Some("income")),
                tx("2026-09-05", "RENT", -30_000.0, Some("housing")),
                tx("2026-10-01", "EMPLOYER", 80_000.0, Some("income")),
                tx("2026-10-05", "RENT", -30_000.0, Some("housing")),
                swiggy,
                tx("2026-10-06", "Uber", -500.0, Some("transport")),
            ],
        )
        .unwrap();

        get_all_transactions(&conn).unwrap()
    }

    #[test]
    fn test_store_to_view() {
        let snapshot = DashboardSnapshot::build(&stored_transactions(), &config_with_goals(), as_of());

        assert_eq!(snapshot.transactions.len(), 8);
        assert_eq!(snapshot.income_expense.len(), 3);
        assert_eq!(snapshot.wants_current, 1_500.0);
        assert!(snapshot.cashflow.is_some());

        let view = DashboardView::derive(&snapshot);

        let goals = view.goals.ready().unwrap();
        assert_eq!(goals.len(), 2);
        assert!(view.goal_summary.contains("1 of 2 goal(s)"));
        assert_eq!(view.goal_tips[0], "1 goal(s) are behind schedule. Review your monthly allocations in BudgetPilot.");

        assert!(view.milestones.under_budget_streak);
        assert_eq!(view.milestones.savings_streak, 3);
        assert_eq!(view.milestones.wants_progress, 100);

        let merchants = view.merchants.ready().unwrap();
        assert_eq!(merchants.shares[0].merchant, "RENT");
        assert!(merchants.shares.iter().any(|s| s.merchant == "Swiggy"));

        let forecast = view.forecast.ready().unwrap();
        assert_eq!(forecast[0].category, "housing");

        assert_eq!(view.transactions.rows().len(), 8);
        assert!(view.transactions.rows().iter().all(|row| row.amount >= 0.0));
    }

    #[test]
    fn test_empty_store_yields_alternate_states() {
        let snapshot = DashboardSnapshot::build(&[], &AppConfig::default(), as_of());
        let view = DashboardView::derive(&snapshot);

        assert_eq!(view.transactions.state, PanelState::Empty);
        assert_eq!(view.goals, PanelState::Message(NO_GOALS_MESSAGE.to_string()));
        assert_eq!(view.forecast, PanelState::Empty);
        assert_eq!(view.merchants, PanelState::Empty);
        assert!(view.cashflow.is_none());
        assert!(!view.milestones.under_budget_streak);
        assert_eq!(view.milestones.savings_streak, 0);
    }

    #[test]
    fn test_merchant_transaction_list() {
        let snapshot = DashboardSnapshot::build(&stored_transactions(), &AppConfig::default(), as_of());

        let list = snapshot.transaction_list(Some("Swiggy"));
        assert_eq!(list.title, "Swiggy");
        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.rows()[0].amount, 1_500.0);

        let none = snapshot.transaction_list(Some("Nobody"));
        assert_eq!(none.state, PanelState::Empty);
    }

    #[test]
    fn test_merchant_list_is_not_capped_by_recent_limit() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut transactions: Vec<Transaction> = (0..60)
            .map(|day| {
                let mut uber = tx("2026-08-01", "Uber", -200.0, Some("transport"));
                uber.txn_date = start + chrono::Duration::days(day);
                uber
            })
            .collect();
        transactions.extend((0..5).map(|day| {
            let mut swiggy = tx("2026-08-01", "Swiggy", -350.0, Some("food_dining"));
            swiggy.txn_date = start + chrono::Duration::days(day * 7);
            swiggy
        }));
        transactions.sort_by(|a, b| b.txn_date.cmp(&a.txn_date));

        let snapshot = DashboardSnapshot::build(&transactions, &AppConfig::default(), as_of());
        assert_eq!(snapshot.transactions.len(), 50, "Recent list stays capped");

        for aggregate in &snapshot.merchants {
            let list = snapshot.transaction_list(Some(&aggregate.merchant));
            assert_eq!(
                list.rows().len(),
                aggregate.transaction_count as usize,
                "{} modal matches its aggregate",
                aggregate.merchant
            );
        }
        assert_eq!(snapshot.transaction_list(Some("Uber")).rows().len(), 60);
        assert_eq!(snapshot.transaction_list(Some("Swiggy")).rows().len(), 5);
    }

    #[test]
    fn test_load_record_without_amount() {
        let json = serde_json::json!({
            "as_of": "2026-10-17",
            "transactions_title": "Recent Transactions",
            "transactions": [
                {"id": "a", "merchant_name_raw": "Uber"},
                {"id": "b", "merchant_name_raw": "Swiggy", "amount": null},
                {"id": "c", "merchant_name_raw": "Zomato", "amount": -120.5}
            ],
            "wants_target": 10000.0
        });
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, json.to_string()).unwrap();

        let loaded = DashboardSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.transactions[0].amount, 0.0);
        assert_eq!(loaded.transactions[1].amount, 0.0);
        assert_eq!(loaded.transactions[2].amount, -120.5);
        assert!(loaded.merchant_transactions.is_empty());

        let rows = loaded.transaction_list(None);
        assert_eq!(rows.rows().len(), 3);
        assert_eq!(rows.rows()[0].amount, 0.0);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = DashboardSnapshot::build(&stored_transactions(), &config_with_goals(), as_of());
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", uuid::Uuid::new_v4()));

        snapshot.save(&path).unwrap();
        let loaded = DashboardSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(DashboardView::derive(&loaded), DashboardView::derive(&snapshot));
    }
}
