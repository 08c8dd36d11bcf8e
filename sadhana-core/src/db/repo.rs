//! Database repository layer
//!
//! Session lifecycle: a session is inserted on start, updated on completion
//! and deleted on cancel. Completed sessions are never modified again.

use crate::error::{Error, Result};
use crate::types::Session;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Filter for listing sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Only return completed sessions
    pub completed_only: bool,
    /// Only return sessions started at or after this time
    pub since: Option<DateTime<Utc>>,
    /// Maximum number of sessions to return
    pub limit: Option<usize>,
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

/// Raw column values before timestamp parsing.
struct SessionRow {
    id: String,
    started_at: String,
    completed_at: Option<String>,
    duration_seconds: Option<i64>,
}

impl SessionRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            duration_seconds: row.get("duration_seconds")?,
        })
    }

    /// Convert to a [`Session`], or `None` if a timestamp does not parse.
    fn into_session(self) -> Option<Session> {
        let started_at = match parse_timestamp(&self.started_at) {
            Some(ts) => ts,
            None => {
                tracing::warn!(id = %self.id, value = %self.started_at, "Skipping session with malformed started_at");
                return None;
            }
        };

        let completed_at = match self.completed_at.as_deref() {
            None => None,
            Some(raw) => match parse_timestamp(raw) {
                Some(ts) => Some(ts),
                None => {
                    tracing::warn!(id = %self.id, value = %raw, "Skipping session with malformed completed_at");
                    return None;
                }
            },
        };

        Some(Session {
            id: self.id,
            started_at,
            completed_at,
            duration_seconds: self
                .duration_seconds
                .and_then(|secs| u32::try_from(secs).ok()),
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reject completions that precede the start.
fn validate_completion(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Result<()> {
    if completed_at < started_at {
        return Err(Error::InvalidSession(format!(
            "completed_at {} precedes started_at {}",
            completed_at.to_rfc3339(),
            started_at.to_rfc3339()
        )));
    }
    Ok(())
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::run_migrations(&conn)
    }

    /// Lock the connection. A poisoned lock still holds a usable connection.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================
    // Session lifecycle
    // ============================================

    /// Start a new session at `now`.
    ///
    /// Only one session may be in progress at a time.
    pub fn start_session(&self, now: DateTime<Utc>) -> Result<Session> {
        let conn = self.conn();

        if let Some(active) = Self::fetch_active(&conn)? {
            return Err(Error::SessionInProgress(active.id));
        }

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: now,
            completed_at: None,
            duration_seconds: None,
        };
        Self::insert(&conn, &session)?;

        tracing::info!(id = %session.id, "Session started");
        Ok(session)
    }

    /// Complete an in-progress session at `now`.
    ///
    /// When `duration_seconds` is `None` the elapsed wall time since start is used.
    pub fn complete_session(
        &self,
        id: &str,
        now: DateTime<Utc>,
        duration_seconds: Option<u32>,
    ) -> Result<Session> {
        let conn = self.conn();

        let mut session = Self::fetch(&conn, id)?
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        if session.is_completed() {
            return Err(Error::SessionAlreadyCompleted(id.to_string()));
        }
        validate_completion(session.started_at, now)?;

        let elapsed = (now - session.started_at).num_seconds().max(0);
        let duration =
            duration_seconds.unwrap_or_else(|| u32::try_from(elapsed).unwrap_or(u32::MAX));

        conn.execute(
            "UPDATE sessions SET completed_at = ?1, duration_seconds = ?2 WHERE id = ?3",
            params![now.to_rfc3339(), duration, id],
        )?;

        session.completed_at = Some(now);
        session.duration_seconds = Some(duration);

        tracing::info!(id = %session.id, duration_seconds = duration, "Session completed");
        Ok(session)
    }

    /// Cancel (delete) an in-progress session.
    pub fn cancel_session(&self, id: &str) -> Result<()> {
        let conn = self.conn();

        let session = Self::fetch(&conn, id)?
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        if session.is_completed() {
            return Err(Error::SessionAlreadyCompleted(id.to_string()));
        }

        conn.execute("DELETE FROM sessions WHERE id = ?", [id])?;

        tracing::info!(id, "Session cancelled");
        Ok(())
    }

    /// Record a session that already happened.
    pub fn record_session(
        &self,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        duration_seconds: Option<u32>,
    ) -> Result<Session> {
        validate_completion(started_at, completed_at)?;

        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            started_at,
            completed_at: Some(completed_at),
            duration_seconds,
        };

        let conn = self.conn();
        Self::insert(&conn, &session)?;

        tracing::info!(id = %session.id, "Session recorded");
        Ok(session)
    }

    /// Insert a session as-is. Completed sessions are validated first.
    pub fn insert_session(&self, session: &Session) -> Result<()> {
        if let Some(completed_at) = session.completed_at {
            validate_completion(session.started_at, completed_at)?;
        }
        let conn = self.conn();
        Self::insert(&conn, session)
    }

    /// Delete any session. Returns whether a row was removed.
    pub fn delete_session(&self, id: &str) -> Result<bool> {
        let conn = self.conn();
        let removed = conn.execute("DELETE FROM sessions WHERE id = ?", [id])?;
        Ok(removed > 0)
    }

    // ============================================
    // Queries
    // ============================================

    /// Get a session by ID
    pub fn get_session(&self, id: &str) -> Result<Option<Session>> {
        let conn = self.conn();
        Self::fetch(&conn, id)
    }

    /// The session currently in progress, if any
    pub fn active_session(&self) -> Result<Option<Session>> {
        let conn = self.conn();
        Self::fetch_active(&conn)
    }

    /// List sessions, most recently started first
    pub fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<Session>> {
        let conn = self.conn();

        let mut sql = String::from(
            "SELECT id, started_at, completed_at, duration_seconds FROM sessions WHERE 1 = 1",
        );
        let mut values: Vec<rusqlite::types::Value> = Vec::new();

        if filter.completed_only {
            sql.push_str(" AND completed_at IS NOT NULL");
        }
        if let Some(since) = filter.since {
            sql.push_str(" AND started_at >= ?");
            values.push(since.to_rfc3339().into());
        }
        sql.push_str(" ORDER BY started_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push((limit as i64).into());
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values), SessionRow::from_row)?;

        let mut sessions = Vec::new();
        for row in rows {
            if let Some(session) = row?.into_session() {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    /// Count all sessions, including in-progress ones
    pub fn count_sessions(&self) -> Result<i64> {
        let conn = self.conn();
        let count = conn.query_row("SELECT COUNT(*) FROM sessions", [], |r| r.get(0))?;
        Ok(count)
    }

    fn insert(conn: &Connection, session: &Session) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO sessions (id, started_at, completed_at, duration_seconds)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                session.id,
                session.started_at.to_rfc3339(),
                session.completed_at.map(|t| t.to_rfc3339()),
                session.duration_seconds,
            ],
        )?;
        Ok(())
    }

    fn fetch(conn: &Connection, id: &str) -> Result<Option<Session>> {
        let row = conn
            .query_row(
                "SELECT id, started_at, completed_at, duration_seconds FROM sessions WHERE id = ?",
                [id],
                SessionRow::from_row,
            )
            .optional()?;
        Ok(row.and_then(SessionRow::into_session))
    }

    /// Newest in-progress session that parses. Malformed rows are skipped
    /// rather than hiding a valid session behind them.
    fn fetch_active(conn: &Connection) -> Result<Option<Session>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, started_at, completed_at, duration_seconds
            FROM sessions
            WHERE completed_at IS NULL
            ORDER BY started_at DESC
            "#,
        )?;
        let rows = stmt.query_map([], SessionRow::from_row)?;

        for row in rows {
            if let Some(session) = row?.into_session() {
                return Ok(Some(session));
            }
        }
        Ok(None)
    }
}
