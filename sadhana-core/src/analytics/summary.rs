//! Combined practice summary for front ends.

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::Calendar;
use super::heatmap::{Heatmap, HeatmapBuilder};
use super::streak::{StreakCalculator, StreakStats};
use crate::types::Session;

/// Everything a dashboard needs, computed from one session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PracticeSummary {
    /// Reference date the summary was computed for
    pub today: NaiveDate,
    pub streaks: StreakStats,
    pub heatmap: Heatmap,
    /// Most recently started session that has not been completed
    pub active_session_id: Option<String>,
}

impl PracticeSummary {
    pub fn compute(
        sessions: &[Session],
        today: NaiveDate,
        calendar: Calendar,
        weeks: usize,
    ) -> Self {
        let streaks = StreakCalculator::new(calendar).compute(sessions, today);
        let heatmap = HeatmapBuilder::new(calendar)
            .with_weeks(weeks)
            .build(sessions, today);

        let active_session_id = sessions
            .iter()
            .filter(|s| !s.is_completed())
            .max_by_key(|s| s.started_at)
            .map(|s| s.id.clone());

        Self {
            today,
            streaks,
            heatmap,
            active_session_id,
        }
    }
}
