// 🧮 Panel Derivations - snapshot in, display-ready values out
//
// Each panel is a pure function over an immutable snapshot. None of them
// can fail: missing fields fall back to sentinel values and "not enough
// data" is a display state, not an error.

pub mod forecast;
pub mod goals;
pub mod merchants;
pub mod milestones;
pub mod transactions;

use serde::Serialize;

pub use forecast::{derive_forecast, ForecastMethod, ForecastItem, ForecastRow, FORECAST_DISPLAY_LIMIT};
pub use goals::{
    clamp_progress, derive_goal_progress, goal_summary, GoalProgressRow, GoalRecord, GoalStatus,
    ON_TRACK_THRESHOLD,
};
pub use merchants::{
    derive_merchant_panel, derive_merchant_shares, MerchantAggregate, MerchantBreakdown,
    MerchantShare, MERCHANT_DISPLAY_LIMIT,
};
pub use milestones::{
    derive_milestones, savings_streak, under_budget_streak, wants_progress, Badge,
    IncomeExpensePoint, MilestoneSummary,
};
pub use transactions::{
    TransactionList, TransactionModal, TransactionRecord, TransactionRow,
    DESCRIPTION_PLACEHOLDER, MISSING_FIELD,
};

// ============================================================================
// DISPLAY STATE
// ============================================================================

/// Mutually exclusive display states of a panel, resolved once per render.
///
/// Precedence: `Loading` > `Message` > `Empty` > `Ready`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum PanelState<T> {
    Loading,
    Message(String),
    Empty,
    Ready(T),
}

/// Data that can be "empty" for display purposes
pub trait PanelData {
    fn is_empty(&self) -> bool;
}

impl<T> PanelData for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T: PanelData> PanelState<T> {
    /// Pick the display state for one render pass
    pub fn resolve(loading: bool, message: Option<&str>, data: T) -> Self {
        if loading {
            return PanelState::Loading;
        }
        if let Some(message) = message {
            return PanelState::Message(message.to_string());
        }
        if data.is_empty() {
            return PanelState::Empty;
        }
        PanelState::Ready(data)
    }
}

impl<T> PanelState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PanelState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PanelState::Ready(data) => Some(data),
            _ => None,
        }
    }
}
