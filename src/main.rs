// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use spendsense_panels::config::DEFAULT_CONFIG_PATH;
use spendsense_panels::db::parse_date;
use spendsense_panels::{
    get_all_transactions, insert_transactions, load_config, load_csv, setup_database,
    verify_count, AppConfig, DashboardSnapshot, DashboardView, RuleEngine,
};

#[derive(Debug, Parser)]
#[command(name = "spendsense", version, about = "Personal finance dashboard panels")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Date treated as "today" (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true, value_parser = parse_as_of)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import a statement CSV into the store
    Import { csv: PathBuf },

    /// Interactive terminal dashboard (default)
    Dashboard {
        /// Render a saved snapshot instead of the store
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Build a snapshot from the store and write it as JSON
    Snapshot {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print every derived panel as JSON
    Panels {
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn parse_as_of(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;
    let as_of = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match cli.command {
        Some(Command::Import { csv }) => run_import(&config, &csv),
        Some(Command::Snapshot { out }) => run_snapshot(&config, as_of, out.as_deref()),
        Some(Command::Panels { snapshot }) => run_panels(&config, as_of, snapshot.as_deref()),
        Some(Command::Dashboard { snapshot }) => run_ui_mode(&config, as_of, snapshot.as_deref()),
        None => run_ui_mode(&config, as_of, None),
    }
}

fn open_store(config: &AppConfig) -> Result<Connection> {
    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn run_import(config: &AppConfig, csv_path: &Path) -> Result<()> {
    println!("🗄️  Import - CSV → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load CSV, classifying with the configured rules
    println!("\n📂 Loading CSV...");
    let rules = RuleEngine::from_rules(config.rules.clone());
    let transactions = load_csv(csv_path, &rules)
        .with_context(|| format!("Failed to load {:?}", csv_path))?;
    println!("✓ Loaded {} transactions from CSV ({} rules)", transactions.len(), rules.rule_count());

    // 2. Setup database
    println!("\n🔧 Setting up database...");
    let conn = open_store(config)?;
    println!("✓ Database ready at {:?}", config.database_path);

    // 3. Insert transactions
    println!("\n💾 Inserting transactions...");
    let inserted = insert_transactions(&conn, &transactions)?;

    // 4. Verify count
    println!("\n🔍 Verifying database...");
    let count = verify_count(&conn)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ New transactions:   {}", inserted);
    println!("✓ Duplicates skipped: {}", transactions.len() - inserted);
    println!("✓ Database contains {} transactions", count);

    Ok(())
}

/// Saved snapshot when a path is given, otherwise a fresh one from the store
fn load_snapshot(config: &AppConfig, as_of: NaiveDate, path: Option<&Path>) -> Result<DashboardSnapshot> {
    if let Some(path) = path {
        return DashboardSnapshot::load(path).with_context(|| format!("Failed to read snapshot {:?}", path));
    }

    if !config.database_path.exists() {
        bail!(
            "Database not found at {:?}. Run `spendsense import <csv>` first.",
            config.database_path
        );
    }

    let conn = open_store(config)?;
    let transactions = get_all_transactions(&conn)?;
    Ok(DashboardSnapshot::build(&transactions, config, as_of))
}

fn run_snapshot(config: &AppConfig, as_of: NaiveDate, out: Option<&Path>) -> Result<()> {
    let snapshot = load_snapshot(config, as_of, None)?;

    match out {
        Some(path) => {
            snapshot
                .save(path)
                .with_context(|| format!("Failed to write snapshot {:?}", path))?;
            println!("✅ Snapshot for {} written to {:?}", snapshot.as_of, path);
        }
        None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}

fn run_panels(config: &AppConfig, as_of: NaiveDate, snapshot: Option<&Path>) -> Result<()> {
    let snapshot = load_snapshot(config, as_of, snapshot)?;
    let view = DashboardView::derive(&snapshot);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig, as_of: NaiveDate, snapshot: Option<&Path>) -> Result<()> {
    println!("🖥️  Loading SpendSense dashboard...\n");

    let snapshot = load_snapshot(config, as_of, snapshot)?;
    println!("✓ Snapshot as of {} ({} transactions)", snapshot.as_of, snapshot.transactions.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(snapshot, &config.dashboard.currency_symbol);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig, _as_of: NaiveDate, _snapshot: Option<&Path>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: spendsense panels");
    std::process::exit(1);
}
