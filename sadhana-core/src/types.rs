//! Core domain types for sadhana
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session** | One sitting of practice, from start to completion |
//! | **Completed session** | A session with a completion timestamp; the unit of all statistics |
//! | **Active day** | A calendar day with at least one completed session |
//! | **Streak** | Consecutive active days ending today, or yesterday if today is still empty |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Session
// ============================================

/// Lifecycle state of a session, derived from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Started, not yet completed
    InProgress,
    /// Has a completion timestamp
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single practice session.
///
/// Only sessions with `completed_at` set contribute to statistics. A completed
/// session may lack a duration; it then counts as zero minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier (UUID v4 when created by the store)
    pub id: String,
    /// When the session began
    pub started_at: DateTime<Utc>,
    /// When the session was completed (None = in progress or abandoned)
    pub completed_at: Option<DateTime<Utc>>,
    /// Elapsed active duration in seconds
    pub duration_seconds: Option<u32>,
}

impl Session {
    /// Whether this session counts toward statistics.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_completed() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    /// Duration in seconds, with a missing value read as zero.
    pub fn duration_secs_or_zero(&self) -> u64 {
        self.duration_seconds.map(u64::from).unwrap_or(0)
    }

    /// Duration rounded to whole minutes (half rounds up).
    pub fn rounded_minutes(&self) -> u64 {
        round_secs_to_minutes(self.duration_secs_or_zero())
    }
}

/// Round a number of seconds to the nearest whole minute, halves rounding up.
pub fn round_secs_to_minutes(secs: u64) -> u64 {
    (secs + 30) / 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(completed: bool, duration: Option<u32>) -> Session {
        let started_at = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        Session {
            id: "s-1".to_string(),
            started_at,
            completed_at: completed.then(|| started_at + chrono::Duration::minutes(20)),
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(session(true, Some(60)).status(), SessionStatus::Completed);
        assert_eq!(session(false, Some(60)).status(), SessionStatus::InProgress);
        assert_eq!(SessionStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_missing_duration_is_zero() {
        let s = session(true, None);
        assert_eq!(s.duration_secs_or_zero(), 0);
        assert_eq!(s.rounded_minutes(), 0);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(round_secs_to_minutes(29), 0);
        assert_eq!(round_secs_to_minutes(30), 1);
        assert_eq!(round_secs_to_minutes(89), 1);
        assert_eq!(round_secs_to_minutes(90), 2);
        assert_eq!(round_secs_to_minutes(900), 15);
    }
}
