use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use visuy_cast::config::AppConfig;
use visuy_cast::db::{self, DateWindow};
use visuy_cast::forecast::{self, DEFAULT_FORECAST_DAYS, DEFAULT_SUGGESTION_COUNT};
use visuy_cast::load;
use visuy_cast::models::{LoadVector, ScheduleRecord};
use visuy_cast::quadrant::{QuadrantGeometry, DEFAULT_PAD_SIZE};
use visuy_cast::report::{self, Period};

#[derive(Parser)]
#[command(name = "visuy-cast")]
#[command(about = "Forecast your capacity as daily weather", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo user with a week of entries
    Seed,
    /// Import schedule entries from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        user: String,
    },
    /// Print the daily weather forecast
    Forecast {
        #[arg(long)]
        user: String,
        /// First day of the forecast, defaults to today (UTC)
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: usize,
        #[arg(long)]
        json: bool,
    },
    /// Recommend days for a task
    #[command(group(
        ArgGroup::new("candidate")
            .args(["task", "emotional"])
            .required(true)
            .multiple(false)
    ))]
    Suggest {
        #[arg(long)]
        user: String,
        #[arg(long)]
        task: Option<Uuid>,
        #[arg(long, allow_hyphen_values = true, requires_all = ["activity", "intensity"])]
        emotional: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        activity: Option<f64>,
        #[arg(long)]
        intensity: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_FORECAST_DAYS)]
        days: usize,
        #[arg(long, default_value_t = DEFAULT_SUGGESTION_COUNT)]
        count: usize,
        #[arg(long)]
        json: bool,
    },
    /// List open tasks waiting for a day
    Tasks {
        #[arg(long)]
        user: String,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        user: String,
        #[arg(long, value_enum, default_value_t = Period::Week)]
        period: Period,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Convert a position on the input pad to a load vector
    Map {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, default_value_t = DEFAULT_PAD_SIZE)]
        size: f64,
    },
}

/// Schedules for the forecast window. A failed fetch forecasts an empty
/// calendar instead of aborting.
async fn schedules_or_empty(pool: &PgPool, user: &str, window: DateWindow) -> Vec<ScheduleRecord> {
    match db::fetch_schedules(pool, user, Some(window)).await {
        Ok(records) => {
            tracing::debug!(user, count = records.len(), "fetched schedules");
            records
        }
        Err(err) => {
            tracing::warn!(user, error = %err, "could not fetch schedules, forecasting without entries");
            Vec::new()
        }
    }
}

fn forecast_window(start: NaiveDate, days: usize) -> anyhow::Result<DateWindow> {
    let last = forecast::offset_date(start, days.saturating_sub(1) as u64)
        .context("forecast window is out of range")?;
    DateWindow::days(start, last)
}

fn print_map(x: f64, y: f64, size: f64) -> anyhow::Result<()> {
    let pad = QuadrantGeometry::new(size)?;
    let vector = pad.position_to_vector(x, y);
    println!(
        "emotional {:.2}, activity {:.2}, intensity {:.2} (score {:.2})",
        vector.emotional,
        vector.activity,
        vector.intensity,
        load::score(&vector)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Map { x, y, size } = cli.command {
        return print_map(x, y, size);
    }

    let config = AppConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted for {}.", db::DEMO_USER_ID);
        }
        Commands::Import { csv, user } => {
            let inserted = db::import_csv(&pool, &user, &csv).await?;
            println!("Inserted {inserted} entries from {}.", csv.display());
        }
        Commands::Forecast {
            user,
            start,
            days,
            json,
        } => {
            let start = start.unwrap_or(today);
            let records = schedules_or_empty(&pool, &user, forecast_window(start, days)?).await;
            let days = forecast::forecast(start, days, &records);
            tracing::debug!(user = %user, days = days.len(), "generated forecast");

            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
                return Ok(());
            }

            for day in &days {
                println!(
                    "- {} {} load {:.2} across {} entries. {}",
                    day.date, day.weather, day.total_load, day.record_count, day.description
                );
            }
            println!("Average daily load {:.2}", forecast::average_load(&days));
        }
        Commands::Suggest {
            user,
            task,
            emotional,
            activity,
            intensity,
            days,
            count,
            json,
        } => {
            let (label, candidate) = match task {
                Some(task_id) => {
                    let task = db::fetch_task(&pool, task_id)
                        .await?
                        .with_context(|| format!("task {task_id} not found"))?;
                    (task.title, task.load)
                }
                None => {
                    let candidate = LoadVector::new(
                        emotional.context("--emotional is required")?,
                        activity.context("--activity is required")?,
                        intensity.context("--intensity is required")?,
                    );
                    candidate.ensure_in_range()?;
                    ("new task".to_string(), candidate)
                }
            };

            let records = schedules_or_empty(&pool, &user, forecast_window(today, days)?).await;
            let outlook = forecast::forecast(today, days, &records);
            let picks = forecast::suggest_dates(&outlook, &candidate, count);

            if json {
                println!("{}", serde_json::to_string_pretty(&picks)?);
                return Ok(());
            }

            println!(
                "Best days for {} (score {:.2}):",
                label,
                load::score(&candidate)
            );
            for date in &picks {
                if let Some(day) = outlook.iter().find(|d| d.date == *date) {
                    println!(
                        "- {} currently {} with {} entries",
                        day.date, day.weather, day.record_count
                    );
                }
            }
        }
        Commands::Tasks { user } => {
            let tasks = db::fetch_open_tasks(&pool, &user).await?;

            if tasks.is_empty() {
                println!("No open tasks.");
                return Ok(());
            }

            println!("Open tasks:");
            for task in &tasks {
                println!("- {} ({}) score {:.2}", task.title, task.id, load::score(&task.load));
            }
        }
        Commands::Report { user, period, out } => {
            let first = today
                .checked_sub_days(chrono::Days::new(period.days().saturating_sub(1)))
                .context("report period is out of range")?;
            let last = forecast::offset_date(today, DEFAULT_FORECAST_DAYS as u64 - 1)
                .context("report period is out of range")?;
            let records = schedules_or_empty(&pool, &user, DateWindow::days(first, last)?).await;
            let report = report::build_report(&user, period, today, &records);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Map { .. } => unreachable!("handled before connecting"),
    }

    Ok(())
}
