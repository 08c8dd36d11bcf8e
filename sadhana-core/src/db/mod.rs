//! Database layer for sadhana
//!
//! This module provides the session store using SQLite with:
//! - Schema migrations
//! - Repository pattern for the session lifecycle and queries

pub mod repo;
pub mod schema;

pub use repo::{Database, SessionFilter};
