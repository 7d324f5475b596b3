// ⚙️ Application configuration - spendsense.toml
//
// Every field has a default so an absent file still yields a usable dashboard.
// Goals and merchant rules live here because nothing upstream of this crate
// produces them.

use crate::error::{Error, Result};
use crate::rules::MerchantRule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "spendsense.toml";

/// Environment variable that overrides `database_path`
pub const DATABASE_ENV_VAR: &str = "SPENDSENSE_DB";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub goals: Vec<GoalConfig>,

    #[serde(default)]
    pub rules: Vec<MerchantRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_database_path(),
            dashboard: DashboardConfig::default(),
            goals: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// Knobs for the producers that feed each panel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Monthly budget for discretionary ("wants") spending
    pub wants_target: f64,

    /// Months of income/expense history (1-12)
    pub history_months: u32,

    /// Months of history used for the spending forecast (3-18)
    pub forecast_months: u32,

    /// Months to project the cashflow ahead (1-3)
    pub cashflow_months_ahead: u32,

    /// How many merchants the aggregation returns
    pub merchant_limit: usize,

    /// Lookback window for merchant aggregates, in months
    pub merchant_lookback_months: u32,

    /// How many of the latest transactions the list modal shows
    pub recent_limit: usize,

    pub transactions_title: String,
    pub transactions_subtitle: Option<String>,

    /// Symbol prefixed to amounts in the terminal UI
    pub currency_symbol: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            wants_target: 25_000.0,
            history_months: 6,
            forecast_months: 6,
            cashflow_months_ahead: 1,
            merchant_limit: 10,
            merchant_lookback_months: 3,
            recent_limit: 50,
            transactions_title: "Recent Transactions".to_string(),
            transactions_subtitle: None,
            currency_symbol: "₹".to_string(),
        }
    }
}

/// A savings goal as declared by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    pub goal_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("spendsense.db")
}

impl AppConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply environment overrides (`SPENDSENSE_DB`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
            if !path.trim().is_empty() {
                tracing::debug!("Database path overridden by {}: {}", DATABASE_ENV_VAR, path);
                self.database_path = PathBuf::from(path);
            }
        }
        self
    }
}

/// Load configuration from a TOML file
///
/// A missing file is not an error: defaults are returned. An unreadable or
/// malformed file is.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        tracing::info!("No config at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default().with_env_overrides());
    }

    tracing::debug!("Loading configuration from {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path_ref, e)))?;

    let config = toml::from_str::<AppConfig>(&contents).map_err(|e| {
        Error::Config(format!("Failed to parse TOML from config file {:?}: {}", path_ref, e))
    })?;

    tracing::info!(
        goals = config.goals.len(),
        rules = config.rules.len(),
        "Configuration loaded"
    );

    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.database_path, PathBuf::from("spendsense.db"));
        assert_eq!(config.dashboard.wants_target, 25_000.0);
        assert_eq!(config.dashboard.history_months, 6);
        assert_eq!(config.dashboard.recent_limit, 50);
        assert!(config.goals.is_empty());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_path = "/tmp/finance.db"

            [dashboard]
            wants_target = 12000.0
            forecast_months = 9
            transactions_title = "Dining"

            [[goals]]
            goal_id = "emergency"
            goal_name = "Emergency Fund"
            target_amount = 100000.0
            current_amount = 45000.0
            target_date = "2027-06-30"

            [[goals]]
            goal_id = "trip"
            goal_name = "Goa Trip"
            target_amount = 40000.0

            [[rules]]
            id = "swiggy"
            pattern = "SWIGGY*"
            merchant = "Swiggy"
            category = "food_dining"
            priority = 10
        "#;

        let config = AppConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/finance.db"));
        assert_eq!(config.dashboard.wants_target, 12000.0);
        assert_eq!(config.dashboard.forecast_months, 9);
        // Untouched fields keep their defaults
        assert_eq!(config.dashboard.history_months, 6);
        assert_eq!(config.dashboard.transactions_title, "Dining");

        assert_eq!(config.goals.len(), 2);
        assert_eq!(
            config.goals[0].target_date,
            NaiveDate::from_ymd_opt(2027, 6, 30)
        );
        assert_eq!(config.goals[1].current_amount, 0.0);
        assert_eq!(config.goals[1].target_date, None);

        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].merchant.as_deref(), Some("Swiggy"));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let result = AppConfig::from_toml("database_path = [1, 2");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config("/nonexistent/spendsense.toml").unwrap();
        assert_eq!(config.dashboard.merchant_limit, 10);
    }
}
