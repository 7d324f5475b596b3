// SpendSense Panels - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod analytics; // Producers: monthly series, cashflow, forecast, merchants, goals
pub mod config;
pub mod db;
pub mod error;
pub mod panels; // Pure panel derivations
pub mod rules;
pub mod snapshot;

// Re-export commonly used types
pub use config::{load_config, AppConfig, DashboardConfig, GoalConfig};
pub use db::{
    get_all_transactions, get_transactions_by_merchant, insert_transactions, load_csv,
    setup_database, verify_count, Transaction,
};
pub use error::{Error, Result};
pub use panels::{
    PanelState, TransactionList, TransactionModal, TransactionRecord, TransactionRow,
};
pub use rules::{Classification, MerchantRule, RuleEngine};
pub use snapshot::{DashboardSnapshot, DashboardView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
