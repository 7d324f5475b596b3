// 🔮 Spending forecast panel

use super::PanelState;
use serde::{Deserialize, Serialize};

/// Only the first N forecast items are ever shown
pub const FORECAST_DISPLAY_LIMIT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Least-squares trend over the monthly series
    Trend,
    /// Single data point, carried forward
    RecentValue,
}

impl ForecastMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ForecastMethod::Trend => "trend",
            ForecastMethod::RecentValue => "recent value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub category: String,
    pub category_name: String,
    pub predicted_amount: f64,
    pub last_amount: f64,
    pub change_percentage: f64,
    pub method: ForecastMethod,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub category: String,
    pub category_name: String,
    pub predicted_amount: f64,
    pub last_amount: f64,
    pub rising: bool,
    /// |change| with one decimal, e.g. "12.3"
    pub change_display: String,
    /// confidence * 100 with no decimals, e.g. "83"
    pub confidence_display: String,
    pub method: ForecastMethod,
    pub data_points: usize,
}

/// Half-away-from-zero rounding before formatting, so ties don't go to even
fn fixed(value: f64, decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    format!("{:.*}", decimals as usize, (value * scale).round() / scale)
}

impl From<&ForecastItem> for ForecastRow {
    fn from(item: &ForecastItem) -> Self {
        ForecastRow {
            category: item.category.clone(),
            category_name: item.category_name.clone(),
            predicted_amount: item.predicted_amount,
            last_amount: item.last_amount,
            rising: item.change_percentage >= 0.0,
            change_display: fixed(item.change_percentage.abs(), 1),
            confidence_display: fixed(item.confidence * 100.0, 0),
            method: item.method,
            data_points: item.data_points,
        }
    }
}

pub fn derive_forecast(items: &[ForecastItem], loading: bool) -> PanelState<Vec<ForecastRow>> {
    let rows = items
        .iter()
        .take(FORECAST_DISPLAY_LIMIT)
        .map(ForecastRow::from)
        .collect();
    PanelState::resolve(loading, None, rows)
}
