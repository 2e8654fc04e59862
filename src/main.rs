use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use configuration::{load_config, load_config_from};
use database::{DbRepository, connect, run_migrations};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod overview;
mod schedule;

/// The main entry point for the Social Pulse application.
#[tokio::main]
async fn main() {
    init_tracing();

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = ?e, "Command failed.");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so that `--json` output on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load .env first so PULSE__* overrides and DATABASE_URL in it are visible.
    // A missing file is fine when the variables are already exported.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "No .env file loaded.");
    }

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    // Initialize the database connection pool
    let db_pool = connect().await.context("Failed to connect to the database")?;
    let db_repo = DbRepository::new(db_pool.clone(), config.warehouse.clone());

    // Execute the appropriate command
    match cli.command {
        Commands::Migrate => {
            run_migrations(&db_pool, &config.warehouse)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Migrations applied.");
            Ok(())
        }
        Commands::Overview(args) => overview::handle_overview(args, &config, &db_repo).await,
        Commands::Daily(args) => overview::handle_daily(args, &config, &db_repo).await,
        Commands::Ideas => schedule::handle_ideas(&config, &db_repo).await,
        Commands::Schedule(args) => schedule::handle_schedule(args, &config, &db_repo).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Account performance metrics and post scheduling for a social media account.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to `config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the KPIs of the trailing window with the window before it.
    Overview(OverviewArgs),
    /// Show the daily table of account metrics and post counts.
    Daily(DailyArgs),
    /// List the scheduled post ideas, newest first.
    Ideas,
    /// Date a post idea after the latest scheduled one and store it.
    Schedule(ScheduleArgs),
    /// Create or update the warehouse tables.
    Migrate,
}

#[derive(Parser)]
pub(crate) struct OverviewArgs {
    /// Close the current window at the end of this day (format: YYYY-MM-DD).
    /// Defaults to now.
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Override the configured window length, in days.
    #[arg(long)]
    pub window_days: Option<u32>,

    /// Print the overview as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub(crate) struct DailyArgs {
    /// Look back from the day before this date (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Override the configured lookback, in days.
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Print the table as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub(crate) struct ScheduleArgs {
    /// JSON file holding the post idea (caption, post_type, themes, tone).
    #[arg(long)]
    pub idea: PathBuf,

    /// Optional JSON strategy file the idea must conform to.
    #[arg(long)]
    pub strategy: Option<PathBuf>,
}

/// The last representable instant of a calendar day, in UTC.
pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN))
        .and_utc()
}
