//! Calendar-day bucketing shared by the streak and heatmap computations.
//!
//! Timestamps are stored in UTC; a [`Calendar`] decides which calendar day a
//! timestamp belongs to. Nothing here reads the system clock except
//! [`Calendar::today`], which callers use once at the edge before handing
//! the date to the pure computations.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::types::Session;

/// Timezone used to cut timestamps into calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Calendar {
    /// The executing machine's local timezone
    #[default]
    Local,
    /// A fixed offset from UTC (the user's practice timezone)
    Fixed(FixedOffset),
}

impl Calendar {
    /// Calendar whose days run midnight to midnight UTC.
    pub fn utc() -> Self {
        Calendar::Fixed(Utc.fix())
    }

    /// Calendar day containing `ts`.
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        match self {
            Calendar::Local => ts.with_timezone(&Local).date_naive(),
            Calendar::Fixed(offset) => ts.with_timezone(offset).date_naive(),
        }
    }

    /// Today's date in this calendar according to the system clock.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// The UTC instant of wall-clock `time` on `date` in this calendar.
    ///
    /// Returns `None` when the local time does not exist (DST gap). An
    /// ambiguous local time resolves to the earlier instant.
    pub fn instant_at(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        let local = date.and_time(time);
        match self {
            Calendar::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Calendar::Fixed(offset) => offset
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// Format a date as the `YYYY-MM-DD` day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The date `days` days before `date`, saturating at the earliest representable date.
pub fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(chrono::Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}

/// Iterate over completed sessions only.
pub fn completed(sessions: &[Session]) -> impl Iterator<Item = &Session> {
    sessions.iter().filter(|s| s.is_completed())
}

/// Distinct calendar days with at least one completed session.
pub fn active_dates(sessions: &[Session], calendar: &Calendar) -> BTreeSet<NaiveDate> {
    completed(sessions)
        .filter_map(|s| s.completed_at)
        .map(|ts| calendar.date_of(ts))
        .collect()
}
