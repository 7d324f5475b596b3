// 🏅 Milestones - streaks and badges over the monthly income/expense series

use serde::{Deserialize, Serialize};

/// Trailing months that must all be non-negative for the under-budget badge
pub const UNDER_BUDGET_WINDOW: usize = 3;

/// Trailing months inspected for the savings streak
pub const SAVINGS_WINDOW: usize = 6;

/// Flat bonus added while wants spending is still under target
pub const WANTS_UNDER_TARGET_BONUS: f64 = 50.0;

/// One month of the income/expense series, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeExpensePoint {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net_savings: f64,
    pub cumulative_savings: f64,
}

fn trailing(points: &[IncomeExpensePoint], window: usize) -> &[IncomeExpensePoint] {
    &points[points.len().saturating_sub(window)..]
}

/// True iff the last 3 months exist and none of them lost money
pub fn under_budget_streak(points: &[IncomeExpensePoint]) -> bool {
    points.len() >= UNDER_BUDGET_WINDOW
        && trailing(points, UNDER_BUDGET_WINDOW)
            .iter()
            .all(|p| p.net_savings >= 0.0)
}

/// Months with non-negative savings among the last 6 (0..=6)
pub fn savings_streak(points: &[IncomeExpensePoint]) -> usize {
    trailing(points, SAVINGS_WINDOW)
        .iter()
        .filter(|p| p.net_savings >= 0.0)
        .count()
}

/// Wants-budget progress in 0..=100.
///
/// `(target - current) / target * 100`, +50 while under target, clamped then
/// rounded. Returns 0 for a non-positive target.
pub fn wants_progress(target: f64, current: f64) -> u8 {
    if target <= 0.0 {
        return 0;
    }

    let mut progress = (target - current) / target * 100.0;
    if current < target {
        progress += WANTS_UNDER_TARGET_BONUS;
    }

    progress.clamp(0.0, 100.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub achieved: bool,
    /// 0..=100
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneSummary {
    pub under_budget_streak: bool,
    pub savings_streak: usize,
    pub wants_progress: u8,
    pub badges: Vec<Badge>,
}

pub fn derive_milestones(
    points: &[IncomeExpensePoint],
    wants_target: f64,
    wants_current: f64,
) -> MilestoneSummary {
    let under_budget = under_budget_streak(points);
    let streak = savings_streak(points);
    let wants = wants_progress(wants_target, wants_current);

    let badges = vec![
        Badge {
            id: "under_budget",
            title: "Under Budget",
            description: format!("Spent less than you earned for {} months running", UNDER_BUDGET_WINDOW),
            achieved: under_budget,
            progress: if under_budget { 100 } else { 0 },
        },
        Badge {
            id: "savings_streak",
            title: "Savings Streak",
            description: format!("{} of the last {} months saved money", streak, SAVINGS_WINDOW),
            achieved: streak == SAVINGS_WINDOW,
            progress: (streak * 100 / SAVINGS_WINDOW) as u8,
        },
        Badge {
            id: "wants_in_check",
            title: "Wants in Check",
            description: "Discretionary spending within this month's target".to_string(),
            achieved: wants >= 100,
            progress: wants,
        },
    ];

    MilestoneSummary {
        under_budget_streak: under_budget,
        savings_streak: streak,
        wants_progress: wants,
        badges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(nets: &[f64]) -> Vec<IncomeExpensePoint> {
        let mut cumulative = 0.0;
        nets.iter()
            .enumerate()
            .map(|(i, net)| {
                cumulative += net;
                IncomeExpensePoint {
                    month: format!("2026-{:02}-01", i + 1),
                    income: 50_000.0,
                    expenses: 50_000.0 - net,
                    net_savings: *net,
                    cumulative_savings: cumulative,
                }
            })
            .collect()
    }

    #[test]
    fn test_under_budget_needs_three_points() {
        assert!(!under_budget_streak(&[]));
        assert!(!under_budget_streak(&series(&[100.0])));
        assert!(!under_budget_streak(&series(&[100.0, 200.0])));
    }

    #[test]
    fn test_under_budget_last_three() {
        assert!(under_budget_streak(&series(&[0.0, 10.0, 20.0])));
        // Older losses do not matter
        assert!(under_budget_streak(&series(&[-500.0, -1.0, 5.0, 0.0, 1.0])));

        assert!(!under_budget_streak(&series(&[10.0, -0.01, 20.0])));
        assert!(!under_budget_streak(&series(&[10.0, 20.0, -5.0])));
        assert!(!under_budget_streak(&series(&[-10.0, 20.0, 30.0])));
    }

    #[test]
    fn test_savings_streak_window() {
        assert_eq!(savings_streak(&[]), 0);
        assert_eq!(savings_streak(&series(&[1.0, 2.0])), 2);
        assert_eq!(savings_streak(&series(&[1.0, -2.0, 3.0, 0.0, -1.0, 5.0])), 4);
        // Only the last 6 count
        assert_eq!(
            savings_streak(&series(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])),
            6
        );
        assert_eq!(
            savings_streak(&series(&[1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0])),
            0
        );
    }

    #[test]
    fn test_wants_progress_formula() {
        assert_eq!(wants_progress(25_000.0, 0.0), 100);
        assert_eq!(wants_progress(25_000.0, 30_000.0), 0);
        assert_eq!(wants_progress(0.0, 100.0), 0);
        assert_eq!(wants_progress(-5.0, 0.0), 0);

        // 80% of budget used: 20 + 50 bonus
        assert_eq!(wants_progress(25_000.0, 20_000.0), 70);
        // Exactly on target: no bonus
        assert_eq!(wants_progress(25_000.0, 25_000.0), 0);
        // 12.3 + 50 rounds down
        assert_eq!(wants_progress(1000.0, 877.0), 62);
    }

    #[test]
    fn test_derive_milestones_badges() {
        let summary = derive_milestones(&series(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]), 25_000.0, 5_000.0);

        assert!(summary.under_budget_streak);
        assert_eq!(summary.savings_streak, 6);
        assert_eq!(summary.wants_progress, 100);
        assert_eq!(summary.badges.len(), 3);
        assert!(summary.badges.iter().all(|b| b.achieved));

        let summary = derive_milestones(&series(&[1.0, -1.0, 1.0]), 25_000.0, 30_000.0);
        assert!(!summary.under_budget_streak);
        assert_eq!(summary.savings_streak, 2);
        assert_eq!(summary.badges[1].progress, 33);
        assert!(!summary.badges[2].achieved);
    }
}
