//! # sadhana-core
//!
//! Core library for sadhana - a daily practice tracker.
//!
//! This library provides:
//! - Domain types for practice sessions
//! - Practice analytics: streaks, lifetime totals, and the activity heatmap
//! - A SQLite session store
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use sadhana_core::analytics::{Calendar, HeatmapBuilder, StreakCalculator};
//! use sadhana_core::{Config, Database, SessionFilter};
//!
//! let config = Config::load().expect("failed to load config");
//! let calendar = config.practice.calendar().expect("invalid practice timezone");
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let sessions = db.list_sessions(&SessionFilter::default()).expect("failed to list sessions");
//! let today = calendar.today();
//! let stats = StreakCalculator::new(calendar).compute(&sessions, today);
//! let heatmap = HeatmapBuilder::new(calendar).build(&sessions, today);
//! println!("{} day streak, {} active days", stats.current_streak, heatmap.summary.active_days);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, SessionFilter};
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
