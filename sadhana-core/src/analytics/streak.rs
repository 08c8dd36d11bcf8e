//! Streak and lifetime totals over completed sessions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::{active_dates, completed, Calendar};
use crate::types::round_secs_to_minutes;

/// Lifetime totals and streaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Number of completed sessions
    pub total_sessions: u64,
    /// Total practiced minutes, rounded once over the summed seconds
    pub total_minutes: u64,
    /// Consecutive active days ending today (or yesterday if today is empty)
    pub current_streak: u32,
    /// Longest run of consecutive active days ever
    pub longest_streak: u32,
    /// Number of distinct active days
    pub active_days: u32,
}

/// Computes [`StreakStats`] for a session list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator {
    calendar: Calendar,
}

impl StreakCalculator {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    /// Compute totals and streaks as of `today`.
    ///
    /// In-progress sessions are ignored. Several sessions on one day count as
    /// a single active day but each adds to the totals.
    pub fn compute(&self, sessions: &[crate::Session], today: NaiveDate) -> StreakStats {
        let (total_sessions, total_secs) = completed(sessions)
            .fold((0u64, 0u64), |(count, secs), s| {
                (count + 1, secs + s.duration_secs_or_zero())
            });

        let dates = active_dates(sessions, &self.calendar);

        let stats = StreakStats {
            total_sessions,
            total_minutes: round_secs_to_minutes(total_secs),
            current_streak: current_streak(&dates, today),
            longest_streak: longest_streak(&dates),
            active_days: dates.len() as u32,
        };

        tracing::debug!(
            total_sessions = stats.total_sessions,
            current_streak = stats.current_streak,
            %today,
            "Computed streak stats"
        );

        stats
    }
}

/// Count consecutive active days ending at `today`.
///
/// If nothing is recorded today but yesterday was active, the streak is still
/// alive and is counted from yesterday. Dates after `today` are ignored.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut recent = dates.range(..=today).rev();

    let Some(&most_recent) = recent.next() else {
        return 0;
    };

    let alive = most_recent == today || today.pred_opt() == Some(most_recent);
    if !alive {
        return 0;
    }

    let mut streak = 1;
    let mut expected = most_recent.pred_opt();
    for &date in recent {
        if Some(date) != expected {
            break;
        }
        streak += 1;
        expected = date.pred_opt();
    }

    streak
}

/// Longest run of consecutive dates.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut streak = 0;
    let mut prev: Option<NaiveDate> = None;

    // Iterate from oldest to newest
    for &date in dates {
        match prev {
            Some(p) if p.succ_opt() == Some(date) => streak += 1,
            _ => streak = 1,
        }
        longest = longest.max(streak);
        prev = Some(date);
    }

    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::calendar::days_before;
    use crate::Session;
    use chrono::{Duration, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Completed session at 09:00 UTC `days_ago` days before today.
    fn done(id: &str, days_ago: u64, secs: Option<u32>) -> Session {
        let date = days_before(today(), days_ago);
        let completed_at = Utc
            .from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap());
        Session {
            id: id.to_string(),
            started_at: completed_at - Duration::minutes(20),
            completed_at: Some(completed_at),
            duration_seconds: secs,
        }
    }

    fn calc() -> StreakCalculator {
        StreakCalculator::new(Calendar::utc())
    }

    #[test]
    fn test_empty_input() {
        let stats = calc().compute(&[], today());
        assert_eq!(stats, StreakStats::default());
    }

    #[test]
    fn test_single_session_today() {
        let stats = calc().compute(&[done("a", 0, Some(900))], today());
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 15);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_yesterday_keeps_streak_alive() {
        let sessions = vec![done("a", 1, Some(600)), done("b", 2, Some(600))];
        assert_eq!(calc().compute(&sessions, today()).current_streak, 2);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let sessions = vec![done("a", 1, Some(600)), done("b", 3, Some(600))];
        let stats = calc().compute(&sessions, today());
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_two_day_gap_before_today_is_zero() {
        let sessions = vec![done("a", 2, Some(600)), done("b", 3, Some(600))];
        let stats = calc().compute(&sessions, today());
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_streak_through_today() {
        let sessions: Vec<_> = (0..5).map(|d| done(&d.to_string(), d, Some(60))).collect();
        assert_eq!(calc().compute(&sessions, today()).current_streak, 5);
    }

    #[test]
    fn test_same_day_sessions_count_once_for_streak() {
        let sessions = vec![done("a", 0, Some(300)), done("b", 0, Some(480))];
        let stats = calc().compute(&sessions, today());
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_minutes, 13);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.active_days, 1);
    }

    #[test]
    fn test_in_progress_sessions_ignored() {
        let mut running = done("run", 0, Some(3600));
        running.completed_at = None;
        let stats = calc().compute(&[running], today());
        assert_eq!(stats, StreakStats::default());
    }

    #[test]
    fn test_total_minutes_rounds_once() {
        // 40s + 40s: per-session rounding would give 1 + 1, a single rounding gives 1
        let sessions = vec![done("a", 0, Some(40)), done("b", 5, Some(40))];
        assert_eq!(calc().compute(&sessions, today()).total_minutes, 1);
    }

    #[test]
    fn test_missing_duration_counts_as_zero_minutes() {
        let stats = calc().compute(&[done("a", 0, None)], today());
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_future_dates_do_not_break_streak() {
        let sessions = vec![done("a", 0, Some(60)), done("b", 1, Some(60))];
        let mut future = done("c", 0, Some(60));
        future.completed_at = future.completed_at.map(|t| t + Duration::days(2));
        let mut all = sessions.clone();
        all.push(future);

        let stats = calc().compute(&all, today());
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.total_sessions, 3);
    }

    #[test]
    fn test_longest_streak_in_history() {
        let sessions: Vec<_> = [10, 11, 12, 13, 20, 21]
            .iter()
            .map(|&d| done(&d.to_string(), d, Some(60)))
            .collect();
        let stats = calc().compute(&sessions, today());
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.active_days, 6);
    }

    #[test]
    fn test_idempotent() {
        let sessions = vec![done("a", 0, Some(95)), done("b", 1, Some(1234))];
        let first = calc().compute(&sessions, today());
        let second = calc().compute(&sessions, today());
        assert_eq!(first, second);
    }
}
