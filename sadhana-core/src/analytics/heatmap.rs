//! Practice heatmap over a trailing window of calendar days.
//!
//! The window ends today and covers `weeks * 7` days (84 by default),
//! oldest first. Each day is classified into an [`IntensityLevel`] from the
//! minutes practiced that day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::{completed, days_before, Calendar};
use crate::types::Session;

/// Days per heatmap column.
pub const DAYS_PER_WEEK: usize = 7;

/// Default number of weeks in the window.
pub const DEFAULT_WEEKS: usize = 12;

/// Default window length in days.
pub const DEFAULT_WINDOW_DAYS: usize = DEFAULT_WEEKS * DAYS_PER_WEEK;

/// Largest supported window, ten years of weeks.
pub const MAX_WEEKS: usize = 520;

/// Discrete intensity of a day's practice, serialized as 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum IntensityLevel {
    /// 0 minutes
    None,
    /// 1-9 minutes
    Light,
    /// 10-19 minutes
    Moderate,
    /// 20-29 minutes
    Strong,
    /// 30 minutes or more
    Intense,
}

impl IntensityLevel {
    /// Classify a day's total minutes. Lower bounds are inclusive.
    pub fn from_minutes(minutes: u64) -> Self {
        match minutes {
            0 => IntensityLevel::None,
            1..=9 => IntensityLevel::Light,
            10..=19 => IntensityLevel::Moderate,
            20..=29 => IntensityLevel::Strong,
            _ => IntensityLevel::Intense,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            IntensityLevel::None => 0,
            IntensityLevel::Light => 1,
            IntensityLevel::Moderate => 2,
            IntensityLevel::Strong => 3,
            IntensityLevel::Intense => 4,
        }
    }

    pub fn is_active(self) -> bool {
        self != IntensityLevel::None
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> Self {
        level.as_u8()
    }
}

/// One calendar day of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Sum of per-session rounded minutes
    pub minutes: u64,
    /// Completed sessions on this day
    pub count: u32,
    pub level: IntensityLevel,
}

/// Totals over the heatmap window (not lifetime).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HeatmapSummary {
    /// Days in the window with level > 0
    pub active_days: u32,
    /// Minutes practiced within the window
    pub total_minutes: u64,
}

/// A built heatmap: buckets oldest to newest plus the window summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub days: Vec<DayBucket>,
    pub summary: HeatmapSummary,
}

impl Heatmap {
    /// Buckets grouped into weekly columns of seven, oldest first.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayBucket]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    /// Bucket for a specific date, if it falls inside the window.
    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|b| b.date)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DayTotals {
    minutes: u64,
    count: u32,
}

/// Builds a [`Heatmap`] for a session list.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapBuilder {
    calendar: Calendar,
    weeks: usize,
}

impl Default for HeatmapBuilder {
    fn default() -> Self {
        Self::new(Calendar::default())
    }
}

impl HeatmapBuilder {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            weeks: DEFAULT_WEEKS,
        }
    }

    /// Set the number of weeks in the window, clamped to `1..=MAX_WEEKS`.
    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks = weeks.clamp(1, MAX_WEEKS);
        self
    }

    pub fn window_days(&self) -> usize {
        self.weeks.saturating_mul(DAYS_PER_WEEK)
    }

    /// Build the heatmap for the window ending on `today`.
    pub fn build(&self, sessions: &[Session], today: NaiveDate) -> Heatmap {
        let totals = self.daily_totals(sessions);
        let window = self.window_days() as u64;

        let days: Vec<DayBucket> = (0..window)
            .rev()
            .map(|days_ago| {
                let date = days_before(today, days_ago);
                let day = totals.get(&date).copied().unwrap_or_default();
                DayBucket {
                    date,
                    minutes: day.minutes,
                    count: day.count,
                    level: IntensityLevel::from_minutes(day.minutes),
                }
            })
            .collect();

        let summary = HeatmapSummary {
            active_days: days.iter().filter(|b| b.level.is_active()).count() as u32,
            total_minutes: days.iter().map(|b| b.minutes).sum(),
        };

        tracing::debug!(
            window_days = window,
            active_days = summary.active_days,
            total_minutes = summary.total_minutes,
            %today,
            "Built heatmap"
        );

        Heatmap { days, summary }
    }

    /// Per-day minutes and counts. Each session's minutes are rounded
    /// before being added to its day.
    fn daily_totals(&self, sessions: &[Session]) -> BTreeMap<NaiveDate, DayTotals> {
        let mut totals: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
        for session in completed(sessions) {
            let Some(completed_at) = session.completed_at else {
                continue;
            };
            let entry = totals.entry(self.calendar.date_of(completed_at)).or_default();
            entry.minutes += session.rounded_minutes();
            entry.count += 1;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn done(id: &str, days_ago: u64, secs: Option<u32>) -> Session {
        let date = days_before(today(), days_ago);
        let completed_at = Utc.from_utc_datetime(&date.and_hms_opt(18, 30, 0).unwrap());
        Session {
            id: id.to_string(),
            started_at: completed_at - Duration::minutes(30),
            completed_at: Some(completed_at),
            duration_seconds: secs,
        }
    }

    fn builder() -> HeatmapBuilder {
        HeatmapBuilder::new(Calendar::utc())
    }

    #[test]
    fn test_empty_input() {
        let heatmap = builder().build(&[], today());
        assert_eq!(heatmap.days.len(), DEFAULT_WINDOW_DAYS);
        assert!(heatmap.days.iter().all(|b| b.level == IntensityLevel::None));
        assert_eq!(heatmap.summary, HeatmapSummary::default());
    }

    #[test]
    fn test_window_bounds_oldest_first() {
        let heatmap = builder().build(&[], today());
        assert_eq!(heatmap.first_date(), Some(days_before(today(), 83)));
        assert_eq!(heatmap.last_date(), Some(today()));
        assert!(heatmap.days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_weeks_reshape() {
        let heatmap = builder().build(&[done("a", 0, Some(600))], today());
        let weeks: Vec<_> = heatmap.weeks().collect();
        assert_eq!(weeks.len(), 12);
        assert!(weeks.iter().all(|w| w.len() == 7));
        assert_eq!(weeks[11][6].date, today());
        assert_eq!(weeks[11][6].minutes, 10);
    }

    #[test]
    fn test_single_session_today() {
        let heatmap = builder().build(&[done("a", 0, Some(900))], today());
        let last = heatmap.days.last().unwrap();
        assert_eq!(last.minutes, 15);
        assert_eq!(last.count, 1);
        assert_eq!(last.level, IntensityLevel::Moderate);
        assert_eq!(heatmap.summary.active_days, 1);
        assert_eq!(heatmap.summary.total_minutes, 15);
    }

    #[test]
    fn test_intensity_thresholds() {
        let cases = [
            (0, 0),
            (1, 1),
            (9, 1),
            (10, 2),
            (19, 2),
            (20, 3),
            (29, 3),
            (30, 4),
            (240, 4),
        ];
        for (minutes, level) in cases {
            assert_eq!(
                IntensityLevel::from_minutes(minutes).as_u8(),
                level,
                "{} minutes",
                minutes
            );
        }
    }

    #[test]
    fn test_threshold_boundaries_through_builder() {
        let sessions = vec![
            done("nine", 4, Some(9 * 60)),
            done("ten", 3, Some(10 * 60)),
            done("twenty-nine", 2, Some(29 * 60)),
            done("thirty", 1, Some(30 * 60)),
        ];
        let heatmap = builder().build(&sessions, today());
        let level = |d| heatmap.day(days_before(today(), d)).unwrap().level.as_u8();
        assert_eq!(level(4), 1);
        assert_eq!(level(3), 2);
        assert_eq!(level(2), 3);
        assert_eq!(level(1), 4);
    }

    #[test]
    fn test_same_day_sessions_aggregate() {
        let sessions = vec![done("a", 3, Some(300)), done("b", 3, Some(480))];
        let heatmap = builder().build(&sessions, today());
        let bucket = heatmap.day(days_before(today(), 3)).unwrap();
        assert_eq!(bucket.minutes, 13);
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.level, IntensityLevel::Moderate);
    }

    #[test]
    fn test_per_session_rounding() {
        // Two 40s sessions round to one minute each
        let sessions = vec![done("a", 0, Some(40)), done("b", 0, Some(40))];
        let heatmap = builder().build(&sessions, today());
        assert_eq!(heatmap.days.last().unwrap().minutes, 2);
    }

    #[test]
    fn test_in_progress_sessions_ignored() {
        let mut running = done("run", 0, Some(3600));
        running.completed_at = None;
        let heatmap = builder().build(&[running], today());
        assert_eq!(heatmap.summary, HeatmapSummary::default());
        assert_eq!(heatmap.days.last().unwrap().count, 0);
    }

    #[test]
    fn test_sessions_outside_window_excluded_from_summary() {
        let sessions = vec![done("old", 84, Some(3600)), done("edge", 83, Some(600))];
        let heatmap = builder().build(&sessions, today());
        assert_eq!(heatmap.summary.active_days, 1);
        assert_eq!(heatmap.summary.total_minutes, 10);
        assert_eq!(heatmap.days[0].minutes, 10);
    }

    #[test]
    fn test_completed_with_zero_duration_is_inactive() {
        let heatmap = builder().build(&[done("a", 0, None)], today());
        let last = heatmap.days.last().unwrap();
        assert_eq!(last.count, 1);
        assert_eq!(last.level, IntensityLevel::None);
        assert_eq!(heatmap.summary.active_days, 0);
    }

    #[test]
    fn test_custom_window() {
        let heatmap = builder().with_weeks(4).build(&[], today());
        assert_eq!(heatmap.days.len(), 28);
        assert_eq!(builder().with_weeks(0).window_days(), 7);
    }

    #[test]
    fn test_oversized_window_clamped() {
        let builder = builder().with_weeks(usize::MAX);
        assert_eq!(builder.window_days(), MAX_WEEKS * DAYS_PER_WEEK);

        let heatmap = builder.build(&[], today());
        assert_eq!(heatmap.days.len(), MAX_WEEKS * DAYS_PER_WEEK);
        assert!(heatmap.days.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_level_serializes_as_number() {
        let heatmap = builder().build(&[done("a", 0, Some(1800))], today());
        let json = serde_json::to_value(heatmap.days.last().unwrap()).unwrap();
        assert_eq!(json["level"], 4);
        assert_eq!(json["date"], "2024-06-15");
        assert_eq!(json["minutes"], 30);
    }

    #[test]
    fn test_idempotent() {
        let sessions = vec![done("a", 0, Some(95)), done("b", 20, Some(1234))];
        assert_eq!(
            builder().build(&sessions, today()),
            builder().build(&sessions, today())
        );
    }
}
