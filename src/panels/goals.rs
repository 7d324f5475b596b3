// 🎯 Goal progress panel

use super::PanelState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Displayed progress at or above this is "on track"
pub const ON_TRACK_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    pub goal_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// May exceed 100 for over-funded goals
    pub progress_percentage: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub impact_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    OnTrack,
    NeedsAttention,
}

impl GoalStatus {
    pub fn from_progress(display_progress: f64) -> Self {
        if display_progress >= ON_TRACK_THRESHOLD {
            GoalStatus::OnTrack
        } else {
            GoalStatus::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "On track",
            GoalStatus::NeedsAttention => "Needs attention",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgressRow {
    pub goal_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub display_progress: f64,
    pub status: GoalStatus,
    pub target_date: Option<NaiveDate>,
    pub impact_message: Option<String>,
}

/// Cap progress at 100. Values below 0 pass through untouched.
pub fn clamp_progress(progress: f64) -> f64 {
    progress.min(100.0)
}

impl From<&GoalRecord> for GoalProgressRow {
    fn from(goal: &GoalRecord) -> Self {
        let display_progress = clamp_progress(goal.progress_percentage);
        GoalProgressRow {
            goal_id: goal.goal_id.clone(),
            goal_name: goal.goal_name.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            display_progress,
            status: GoalStatus::from_progress(display_progress),
            target_date: goal.target_date,
            impact_message: goal.impact_message.clone(),
        }
    }
}

pub fn derive_goal_progress(
    goals: &[GoalRecord],
    loading: bool,
    message: Option<&str>,
) -> PanelState<Vec<GoalProgressRow>> {
    let rows = goals.iter().map(GoalProgressRow::from).collect();
    PanelState::resolve(loading, message, rows)
}

/// One-line coaching summary over the derived rows
pub fn goal_summary(rows: &[GoalProgressRow]) -> String {
    let total = rows.len();
    let on_track = rows.iter().filter(|row| row.status == GoalStatus::OnTrack).count();

    if total == 0 {
        "No active goals found. Create goals to get personalized coaching.".to_string()
    } else if on_track == total {
        format!(
            "Excellent! All {} goal(s) are on track. Keep up the consistent contributions.",
            total
        )
    } else {
        format!(
            "You're making progress on {} of {} goal(s). Small adjustments can help get the rest on track.",
            on_track, total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: &str, progress: f64) -> GoalRecord {
        GoalRecord {
            goal_id: id.to_string(),
            goal_name: format!("Goal {}", id),
            target_amount: 100_000.0,
            current_amount: progress * 1000.0,
            progress_percentage: progress,
            target_date: None,
            impact_message: None,
        }
    }

    #[test]
    fn test_progress_clamped_to_100() {
        for progress in [100.0, 100.1, 150.0, 1e6] {
            let row = GoalProgressRow::from(&goal("g", progress));
            assert_eq!(row.display_progress, 100.0);
            assert_eq!(row.status, GoalStatus::OnTrack);
        }
    }

    #[test]
    fn test_no_lower_clamp() {
        assert_eq!(clamp_progress(-5.0), -5.0);
        assert_eq!(clamp_progress(42.5), 42.5);
    }

    #[test]
    fn test_on_track_threshold() {
        for progress in [0.0, 10.0, 79.9] {
            assert_eq!(
                GoalProgressRow::from(&goal("g", progress)).status,
                GoalStatus::NeedsAttention
            );
        }
        for progress in [80.0, 95.0, 120.0] {
            assert_eq!(GoalProgressRow::from(&goal("g", progress)).status, GoalStatus::OnTrack);
        }
    }

    #[test]
    fn test_state_precedence() {
        let goals = vec![goal("a", 50.0)];

        assert_eq!(derive_goal_progress(&goals, true, Some("x")), PanelState::Loading);
        assert_eq!(
            derive_goal_progress(&goals, false, Some("No active goals found")),
            PanelState::Message("No active goals found".to_string())
        );
        assert_eq!(derive_goal_progress(&[], false, None), PanelState::Empty);

        let ready = derive_goal_progress(&goals, false, None);
        assert_eq!(ready.ready().map(Vec::len), Some(1));
    }

    #[test]
    fn test_goal_summary() {
        let all_good: Vec<GoalProgressRow> =
            [goal("a", 85.0), goal("b", 130.0)].iter().map(GoalProgressRow::from).collect();
        assert!(goal_summary(&all_good).starts_with("Excellent! All 2 goal(s)"));

        let mixed: Vec<GoalProgressRow> =
            [goal("a", 85.0), goal("b", 30.0), goal("c", 10.0)].iter().map(GoalProgressRow::from).collect();
        assert!(goal_summary(&mixed).contains("1 of 3 goal(s)"));

        assert!(goal_summary(&[]).starts_with("No active goals"));
    }
}
