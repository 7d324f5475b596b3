// Goal impact, coaching tips and contribution simulation

use crate::config::GoalConfig;
use crate::error::{Error, Result};
use crate::panels::{clamp_progress, GoalRecord, ON_TRACK_THRESHOLD};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Shown when no other tip applies
pub const BALANCED_TIP: &str = "Your goals are well-balanced. Continue with your current plan.";

/// Progress rounded to one decimal (0 when there is no target) plus a
/// one-line impact message naming the target month.
pub fn goal_impact(goal: &GoalConfig) -> GoalRecord {
    let progress = if goal.target_amount > 0.0 {
        (goal.current_amount / goal.target_amount * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let deadline = goal
        .target_date
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|| "target date".to_string());

    GoalRecord {
        goal_id: goal.goal_id.clone(),
        goal_name: goal.goal_name.clone(),
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        progress_percentage: progress,
        target_date: goal.target_date,
        impact_message: Some(format!(
            "You're {:.0}% on track to fund your goal '{}' by {}.",
            progress, goal.goal_name, deadline
        )),
    }
}

fn remaining_amount(target: f64, current: f64) -> f64 {
    (target - current).max(0.0)
}

/// Whole 30-day periods until the target date, never negative
fn months_until(target_date: Option<NaiveDate>, as_of: NaiveDate) -> Option<u32> {
    target_date.map(|date| ((date - as_of).num_days() / 30).max(0) as u32)
}

/// Monthly amount that funds the remainder by the target date.
/// 0 without a target date; the whole remainder when the date is due.
pub fn suggested_monthly_need(goal: &GoalRecord, as_of: NaiveDate) -> f64 {
    let remaining = remaining_amount(goal.target_amount, goal.current_amount);
    match months_until(goal.target_date, as_of) {
        None => 0.0,
        Some(0) => remaining,
        Some(months) => remaining / f64::from(months),
    }
}

/// `12500.4` -> `12,500`
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && grouped != "0" {
        grouped.insert(0, '-');
    }
    grouped
}

/// Coaching tips for the goals panel
pub fn coaching_tips(goals: &[GoalRecord], as_of: NaiveDate, currency: &str) -> Vec<String> {
    let mut tips = Vec::new();
    if goals.is_empty() {
        return tips;
    }

    let behind = goals
        .iter()
        .filter(|g| clamp_progress(g.progress_percentage) < ON_TRACK_THRESHOLD)
        .count();
    if behind > 0 {
        tips.push(format!(
            "{} goal(s) are behind schedule. Review your monthly allocations in BudgetPilot.",
            behind
        ));
    }

    let total_remaining: f64 = goals
        .iter()
        .map(|g| remaining_amount(g.target_amount, g.current_amount))
        .sum();
    if total_remaining > 0.0 {
        let average = goals.iter().map(|g| suggested_monthly_need(g, as_of)).sum::<f64>() / goals.len() as f64;
        tips.push(format!(
            "Average monthly need across all goals: {}{}. Ensure your budget allocations match.",
            currency,
            group_thousands(average)
        ));
    }

    if tips.is_empty() {
        tips.push(BALANCED_TIP.to_string());
    }

    tips
}

/// What a fixed monthly contribution does to one goal's timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSimulation {
    pub goal_id: String,
    pub goal_name: String,
    pub monthly_contribution: f64,
    pub remaining_amount: f64,
    /// Months left until the configured target date, if there is one
    pub current_months_remaining: Option<u32>,
    pub simulated_months_remaining: u32,
    pub simulated_target_date: Option<NaiveDate>,
    /// Months saved against the target date
    pub acceleration_months: Option<u32>,
}

pub fn simulate_goal(goal: &GoalConfig, monthly_contribution: f64, as_of: NaiveDate) -> Result<GoalSimulation> {
    if monthly_contribution <= 0.0 || !monthly_contribution.is_finite() {
        return Err(Error::InvalidContribution(monthly_contribution));
    }

    let remaining = remaining_amount(goal.target_amount, goal.current_amount);
    let current_months = months_until(goal.target_date, as_of);

    if remaining <= 0.0 {
        return Ok(GoalSimulation {
            goal_id: goal.goal_id.clone(),
            goal_name: goal.goal_name.clone(),
            monthly_contribution,
            remaining_amount: 0.0,
            current_months_remaining: Some(0),
            simulated_months_remaining: 0,
            simulated_target_date: None,
            acceleration_months: Some(0),
        });
    }

    let simulated = ((remaining / monthly_contribution) as u32).max(1);

    tracing::debug!(goal = %goal.goal_id, monthly_contribution, simulated, "simulated goal contribution");

    Ok(GoalSimulation {
        goal_id: goal.goal_id.clone(),
        goal_name: goal.goal_name.clone(),
        monthly_contribution,
        remaining_amount: (remaining * 100.0).round() / 100.0,
        current_months_remaining: current_months,
        simulated_months_remaining: simulated,
        simulated_target_date: Some(as_of + Duration::days(i64::from(simulated) * 30)),
        acceleration_months: current_months.map(|months| months.saturating_sub(simulated)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: f64, current: f64, date: Option<NaiveDate>) -> GoalConfig {
        GoalConfig {
            goal_id: "emergency".to_string(),
            goal_name: "Emergency Fund".to_string(),
            target_amount: target,
            current_amount: current,
            target_date: date,
        }
    }

    #[test]
    fn test_progress_and_message() {
        let record = goal_impact(&goal(100_000.0, 45_000.0, NaiveDate::from_ymd_opt(2027, 6, 30)));

        assert_eq!(record.progress_percentage, 45.0);
        assert_eq!(
            record.impact_message.as_deref(),
            Some("You're 45% on track to fund your goal 'Emergency Fund' by June 2027.")
        );
    }

    #[test]
    fn test_overfunded_goal_not_capped_here() {
        let record = goal_impact(&goal(10_000.0, 12_340.0, None));

        assert_eq!(record.progress_percentage, 123.4);
        assert!(record.impact_message.unwrap().ends_with("by target date."));
    }

    #[test]
    fn test_zero_target() {
        assert_eq!(goal_impact(&goal(0.0, 500.0, None)).progress_percentage, 0.0);
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_tips_behind_schedule_and_average_need() {
        // 300 days out: 10 months
        let due = Some(as_of() + Duration::days(300));
        let goals = vec![
            goal_impact(&goal(100_000.0, 40_000.0, due)),
            goal_impact(&goal(50_000.0, 45_000.0, None)),
        ];

        let tips = coaching_tips(&goals, as_of(), "₹");

        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0], "1 goal(s) are behind schedule. Review your monthly allocations in BudgetPilot.");
        assert_eq!(
            tips[1],
            "Average monthly need across all goals: ₹3,000. Ensure your budget allocations match."
        );
    }

    #[test]
    fn test_tips_fallback_when_funded() {
        let goals = vec![goal_impact(&goal(10_000.0, 10_000.0, None))];
        assert_eq!(coaching_tips(&goals, as_of(), "₹"), vec![BALANCED_TIP.to_string()]);
        assert!(coaching_tips(&[], as_of(), "₹").is_empty());
    }

    #[test]
    fn test_suggested_need_when_due() {
        let overdue = goal_impact(&goal(10_000.0, 4_000.0, NaiveDate::from_ymd_opt(2026, 10, 1)));
        assert_eq!(suggested_monthly_need(&overdue, as_of()), 6_000.0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.4), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_234_567.0), "1,234,567");
    }

    #[test]
    fn test_simulate_goal_projection() {
        // 600 days out: 20 months
        let config = goal(100_000.0, 40_000.0, Some(as_of() + Duration::days(600)));
        let sim = simulate_goal(&config, 5_000.0, as_of()).unwrap();

        assert_eq!(sim.remaining_amount, 60_000.0);
        assert_eq!(sim.current_months_remaining, Some(20));
        assert_eq!(sim.simulated_months_remaining, 12);
        assert_eq!(sim.simulated_target_date, Some(as_of() + Duration::days(360)));
        assert_eq!(sim.acceleration_months, Some(8));

        println!("✅ Simulation PASSED: 12 months, 8 months ahead of target");
    }

    #[test]
    fn test_simulate_goal_edges() {
        // Tiny remainder still takes a month; no target date means no acceleration
        let sim = simulate_goal(&goal(1_000.0, 900.0, None), 5_000.0, as_of()).unwrap();
        assert_eq!(sim.simulated_months_remaining, 1);
        assert_eq!(sim.acceleration_months, None);

        let funded = simulate_goal(&goal(1_000.0, 1_500.0, None), 100.0, as_of()).unwrap();
        assert_eq!(funded.simulated_months_remaining, 0);
        assert_eq!(funded.simulated_target_date, None);
        assert_eq!(funded.remaining_amount, 0.0);

        assert!(matches!(
            simulate_goal(&goal(1_000.0, 0.0, None), 0.0, as_of()),
            Err(Error::InvalidContribution(_))
        ));
        assert!(simulate_goal(&goal(1_000.0, 0.0, None), -5.0, as_of()).is_err());
    }
}
