//! Practice analytics for sadhana
//!
//! Pure computations over a list of sessions:
//! - Streaks and lifetime totals ([`streak`])
//! - Trailing-window heatmap with intensity levels ([`heatmap`])
//! - A combined dashboard summary ([`summary`])
//!
//! Every computation takes the reference date (`today`) as an argument and
//! never reads the clock, so the same input always yields the same output.
//!
//! Note that the two "total minutes" figures are rounded differently: the
//! streak totals round once over the summed seconds, while heatmap buckets
//! round each session before summing. They can differ by a few minutes.

pub mod calendar;
pub mod heatmap;
pub mod streak;
pub mod summary;

pub use calendar::{day_key, Calendar};
pub use heatmap::{
    DayBucket, Heatmap, HeatmapBuilder, HeatmapSummary, IntensityLevel, DAYS_PER_WEEK,
    DEFAULT_WEEKS, DEFAULT_WINDOW_DAYS, MAX_WEEKS,
};
pub use streak::{StreakCalculator, StreakStats};
pub use summary::PracticeSummary;
