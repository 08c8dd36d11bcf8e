//! sadhana - daily practice tracker CLI
//!
//! Start, complete and log practice sessions, and review streaks and the
//! activity heatmap.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/sadhana/sadhana.db (~/.local/share/sadhana/sadhana.db)
//! - Config: $XDG_CONFIG_HOME/sadhana/config.toml (~/.config/sadhana/config.toml)

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use sadhana_core::analytics::{Calendar, PracticeSummary};
use sadhana_core::{Config, Database, SessionFilter};

#[derive(Parser, Debug)]
#[command(name = "sadhana")]
#[command(about = "Track daily practice sessions, streaks and consistency")]
#[command(version)]
struct Args {
    /// Database path (default: $XDG_DATA_HOME/sadhana/sadhana.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a practice session
    Start,

    /// Complete a session (default: the one in progress)
    Complete {
        /// Session ID
        id: Option<String>,

        /// Practiced minutes (default: time since start)
        #[arg(long)]
        minutes: Option<u32>,
    },

    /// Cancel a session in progress
    Cancel {
        /// Session ID
        id: Option<String>,
    },

    /// Record a finished session
    Log {
        /// Practiced minutes
        #[arg(long)]
        minutes: u32,

        /// Practice date (YYYY-MM-DD, default: now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List sessions, newest first
    List {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Only show completed sessions
        #[arg(long)]
        completed: bool,
    },

    /// Show streaks and totals
    Stats {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the practice heatmap
    Heatmap {
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn parse_format(raw: &str) -> Result<Format> {
    match raw {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => anyhow::bail!("Unknown format: {}. Use 'text' or 'json'", other),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD (e.g., 2024-12-31)", raw))
}

fn minutes_to_seconds(minutes: u32) -> Result<u32> {
    minutes
        .checked_mul(60)
        .with_context(|| format!("--minutes {} is too large", minutes))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = sadhana_core::logging::init(&config.logging).ok();

    let calendar = config
        .practice
        .calendar()
        .context("invalid practice configuration")?;

    let db_path = args.db.clone().unwrap_or_else(Config::database_path);
    tracing::info!(path = %db_path.display(), command = ?args.command, "Running command");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    match args.command {
        Command::Start => {
            let session = db
                .start_session(Utc::now())
                .context("failed to start session")?;
            println!("Started session {}", session.id);
        }
        Command::Complete { id, minutes } => {
            let duration = minutes.map(minutes_to_seconds).transpose()?;
            let id = resolve_session_id(&db, id)?;
            let session = db
                .complete_session(&id, Utc::now(), duration)
                .context("failed to complete session")?;
            println!(
                "Completed session {} ({})",
                session.id,
                sadhana_core::format::minutes_display(session.rounded_minutes())
            );
        }
        Command::Cancel { id } => {
            let id = resolve_session_id(&db, id)?;
            db.cancel_session(&id).context("failed to cancel session")?;
            println!("Cancelled session {}", id);
        }
        Command::Log { minutes, date } => {
            let duration = minutes_to_seconds(minutes)?;
            let completed_at = match date.as_deref() {
                Some(raw) => {
                    let date = parse_date(raw)?;
                    let noon = NaiveTime::from_hms_opt(12, 0, 0).context("invalid time")?;
                    calendar
                        .instant_at(date, noon)
                        .with_context(|| format!("no such local time on {}", date))?
                }
                None => Utc::now(),
            };
            let started_at = completed_at - Duration::minutes(i64::from(minutes));
            let session = db
                .record_session(started_at, completed_at, Some(duration))
                .context("failed to record session")?;
            println!(
                "Logged session {} on {}",
                session.id,
                calendar.date_of(completed_at)
            );
        }
        Command::List { limit, completed } => {
            let filter = SessionFilter {
                completed_only: completed,
                limit: Some(limit),
                ..Default::default()
            };
            let sessions = db.list_sessions(&filter).context("failed to list sessions")?;
            render::print_sessions(&sessions, &calendar);
        }
        Command::Stats { today, format } => {
            let format = parse_format(&format)?;
            let summary = load_summary(&db, &config, calendar, today.as_deref())?;
            match format {
                Format::Text => render::print_stats(&summary),
                Format::Json => render::print_stats_json(&summary)?,
            }
        }
        Command::Heatmap { today, format } => {
            let format = parse_format(&format)?;
            let summary = load_summary(&db, &config, calendar, today.as_deref())?;
            match format {
                Format::Text => render::print_heatmap(&summary.heatmap),
                Format::Json => render::print_heatmap_json(&summary)?,
            }
        }
    }

    Ok(())
}

/// Use the given ID, or fall back to the session in progress.
fn resolve_session_id(db: &Database, id: Option<String>) -> Result<String> {
    if let Some(id) = id {
        return Ok(id);
    }
    match db.active_session().context("failed to look up active session")? {
        Some(session) => Ok(session.id),
        None => anyhow::bail!("No session in progress. Run `sadhana start` first"),
    }
}

fn load_summary(
    db: &Database,
    config: &Config,
    calendar: Calendar,
    today: Option<&str>,
) -> Result<PracticeSummary> {
    let today = match today {
        Some(raw) => parse_date(raw)?,
        None => calendar.today(),
    };
    let sessions = db
        .list_sessions(&SessionFilter::default())
        .context("failed to load sessions")?;

    Ok(PracticeSummary::compute(
        &sessions,
        today,
        calendar,
        config.heatmap.weeks,
    ))
}
