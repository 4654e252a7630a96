//! Diesel row models for board persistence.

use super::schema::{projects, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// JSON array of assigned user ids.
    pub assignee_user_ids: Value,
    /// Workflow status.
    pub status: String,
    /// Position within the status column.
    pub position: i64,
    /// JSON array of active user ids.
    pub active_user_ids: Value,
    /// Start of the open interval.
    pub last_start_at: Option<DateTime<Utc>>,
    /// Total of closed intervals in milliseconds.
    pub accumulated_ms: i64,
    /// Stored revision.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// JSON array of assigned user ids.
    pub assignee_user_ids: Value,
    /// Workflow status.
    pub status: String,
    /// Position within the status column.
    pub position: i64,
    /// JSON array of active user ids.
    pub active_user_ids: Value,
    /// Start of the open interval.
    pub last_start_at: Option<DateTime<Utc>>,
    /// Total of closed intervals in milliseconds.
    pub accumulated_ms: i64,
    /// Initial revision.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by a version-guarded update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// JSON array of assigned user ids.
    pub assignee_user_ids: Value,
    /// Workflow status.
    pub status: String,
    /// Position within the status column.
    pub position: i64,
    /// JSON array of active user ids.
    pub active_user_ids: Value,
    /// Start of the open interval; `None` clears the column.
    pub last_start_at: Option<DateTime<Utc>>,
    /// Total of closed intervals in milliseconds.
    pub accumulated_ms: i64,
    /// Revision after the write.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Identifier of the creating user.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Identifier of the creating user.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
