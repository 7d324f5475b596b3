// SpendSense - Web Server
// JSON API over the dashboard panels, built with Axum

use anyhow::{bail, Context};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use spendsense_panels::config::DEFAULT_CONFIG_PATH;
use spendsense_panels::db::parse_date;
use spendsense_panels::analytics::simulate_goal;
use spendsense_panels::panels::{GoalProgressRow, PanelState, TransactionRecord};
use spendsense_panels::{
    get_all_transactions, get_transactions_by_merchant, load_config, setup_database, AppConfig,
    DashboardSnapshot, DashboardView, Error, TransactionList,
};

/// Environment variable for the listen address
const ADDR_ENV_VAR: &str = "SPENDSENSE_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    config: Arc<AppConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

/// Failure surfaced to the client as `{success: false, error}`
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("{}", message);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct AsOfQuery {
    /// `YYYY-MM-DD`; defaults to the local date
    as_of: Option<String>,
}

impl AsOfQuery {
    fn resolve(&self) -> Result<NaiveDate, ApiError> {
        match self.as_of.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_date(value).map_err(|e| ApiError::bad_request(e.to_string())),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SimulateQuery {
    monthly_contribution: Option<f64>,
    as_of: Option<String>,
}

#[derive(Serialize)]
struct GoalsResponse {
    summary: String,
    tips: Vec<String>,
    panel: PanelState<Vec<GoalProgressRow>>,
}

/// Build a fresh snapshot under the connection lock
fn build_snapshot(state: &AppState, query: &AsOfQuery) -> Result<DashboardSnapshot, ApiError> {
    let as_of = query.resolve()?;

    let conn = state
        .db
        .lock()
        .map_err(|_| ApiError::internal("Database lock poisoned"))?;
    let transactions = get_all_transactions(&conn)
        .map_err(|e| ApiError::internal(format!("Error getting transactions: {}", e)))?;

    Ok(DashboardSnapshot::build(&transactions, &state.config, as_of))
}

fn build_view(state: &AppState, query: &AsOfQuery) -> Result<(DashboardSnapshot, DashboardView), ApiError> {
    let snapshot = build_snapshot(state, query)?;
    let view = DashboardView::derive(&snapshot);
    Ok((snapshot, view))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/dashboard - Every panel in one payload
async fn get_dashboard(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(view),
        Err(e) => e.into_response(),
    }
}

/// GET /api/transactions - Recent transaction list
async fn get_transactions(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(view.transactions),
        Err(e) => e.into_response(),
    }
}

/// GET /api/merchants/:name/transactions - Transaction list for one merchant
async fn get_merchant_transactions(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    // `Path` has already percent-decoded the segment
    let merchant = name;

    let as_of = match query.resolve() {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };

    let transactions = {
        let conn = match state.db.lock() {
            Ok(conn) => conn,
            Err(_) => return ApiError::internal("Database lock poisoned").into_response(),
        };
        match get_transactions_by_merchant(&conn, &merchant) {
            Ok(transactions) => transactions,
            Err(e) => {
                return ApiError::internal(format!("Error getting transactions for {}: {}", merchant, e))
                    .into_response()
            }
        }
    };

    let records: Vec<TransactionRecord> = transactions
        .iter()
        .filter(|tx| tx.txn_date <= as_of)
        .map(TransactionRecord::from)
        .collect();

    ApiResponse::ok(TransactionList::derive(
        &merchant,
        Some(&state.config.dashboard.transactions_title),
        &records,
        as_of,
    ))
}

/// GET /api/goals - Goal progress rows plus coaching summary and tips
async fn get_goals(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(GoalsResponse {
            summary: view.goal_summary,
            tips: view.goal_tips,
            panel: view.goals,
        }),
        Err(e) => e.into_response(),
    }
}

/// GET /api/goals/:id/simulate?monthly_contribution= - Timeline at a fixed contribution
async fn simulate_goal_contribution(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    Query(query): Query<SimulateQuery>,
) -> Response {
    let as_of = match (AsOfQuery { as_of: query.as_of }).resolve() {
        Ok(date) => date,
        Err(e) => return e.into_response(),
    };

    let Some(goal) = state.config.goals.iter().find(|g| g.goal_id == goal_id) else {
        return ApiError::not_found(format!("Goal not found: {}", goal_id)).into_response();
    };

    let Some(contribution) = query.monthly_contribution else {
        return ApiError::bad_request("monthly_contribution is required").into_response();
    };

    match simulate_goal(goal, contribution, as_of) {
        Ok(simulation) => ApiResponse::ok(simulation),
        Err(e @ Error::InvalidContribution(_)) => ApiError::bad_request(e.to_string()).into_response(),
        Err(e) => ApiError::internal(format!("Failed to simulate goal {}: {}", goal_id, e)).into_response(),
    }
}

/// GET /api/milestones - Streaks and badges
async fn get_milestones(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(view.milestones),
        Err(e) => e.into_response(),
    }
}

/// GET /api/forecast - First six forecast rows
async fn get_forecast(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(view.forecast),
        Err(e) => e.into_response(),
    }
}

/// GET /api/cashflow - Projected balance (null without recent activity)
async fn get_cashflow(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_snapshot(&state, &query) {
        Ok(snapshot) => ApiResponse::ok(snapshot.cashflow),
        Err(e) => e.into_response(),
    }
}

/// GET /api/merchants - Merchant shares
async fn get_merchants(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_view(&state, &query) {
        Ok((_, view)) => ApiResponse::ok(view.merchants),
        Err(e) => e.into_response(),
    }
}

/// GET /api/merchant-metrics - Per-merchant metrics with trend
async fn get_merchant_metrics(State(state): State<AppState>, Query(query): Query<AsOfQuery>) -> Response {
    match build_snapshot(&state, &query) {
        Ok(snapshot) => ApiResponse::ok(snapshot.merchant_metrics),
        Err(e) => e.into_response(),
    }
}

fn api_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/transactions", get(get_transactions))
        .route("/merchants/:name/transactions", get(get_merchant_transactions))
        .route("/goals", get(get_goals))
        .route("/goals/:id/simulate", get(simulate_goal_contribution))
        .route("/milestones", get(get_milestones))
        .route("/forecast", get(get_forecast))
        .route("/cashflow", get(get_cashflow))
        .route("/merchants", get(get_merchants))
        .route("/merchant-metrics", get(get_merchant_metrics))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("🚀 SpendSense - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config_path = std::env::var("SPENDSENSE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path).with_context(|| format!("Failed to load config {}", config_path))?;

    if !config.database_path.exists() {
        bail!(
            "Database not found at {:?}. Run `spendsense import <csv>` first.",
            config.database_path
        );
    }

    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    setup_database(&conn)?;
    println!("✓ Database opened: {:?}", config.database_path);

    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        config: Arc::new(config),
    };

    let addr = std::env::var(ADDR_ENV_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/dashboard", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, api_router(state))
        .await
        .context("Server error")?;

    Ok(())
}
