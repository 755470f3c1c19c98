// SPDX-License-Identifier: MIT

//! Time entry models and list filters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Tag;

/// A time entry as returned by the API.
///
/// At most one entry per user has `is_running = true`; the server enforces
/// this and the client treats the server copy as authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub project_id: Uuid,
    pub project_name: String,
    pub task_id: Option<Uuid>,
    pub task_name: Option<String>,
    pub organization_id: Uuid,
    /// Server-issued absolute start timestamp (UTC).
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_running: bool,
    pub is_billable: bool,
    pub description: Option<String>,
    /// Only present once the entry has been stopped.
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /time-entries/start`.
#[derive(Debug, Clone, Serialize)]
pub struct StartTimer {
    pub project_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    pub is_billable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<Uuid>,
}

impl StartTimer {
    /// Start a billable timer on a project.
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            task_id: None,
            is_billable: true,
            description: None,
            tag_ids: Vec::new(),
        }
    }
}

/// Payload for `POST /time-entries` (manual, already-completed entry).
#[derive(Debug, Clone, Serialize)]
pub struct ManualEntry {
    pub project_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_billable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_ids: Vec<Uuid>,
}

/// Payload for `PUT /time-entries/{id}` (all fields optional).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeEntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replaces the entry's full tag set when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Paginated time entry list.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeEntryPage {
    pub items: Vec<TimeEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Query filters for `GET /time-entries`.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub is_billable: Option<bool>,
    pub is_running: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Entries carrying any of these tags (OR logic).
    pub tag_ids: Vec<Uuid>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl EntryFilter {
    /// Build the query string pairs for this filter.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.project_id {
            query.push(("project_id", id.to_string()));
        }
        if let Some(id) = self.task_id {
            query.push(("task_id", id.to_string()));
        }
        if let Some(id) = self.user_id {
            query.push(("user_id", id.to_string()));
        }
        if let Some(billable) = self.is_billable {
            query.push(("is_billable", billable.to_string()));
        }
        if let Some(running) = self.is_running {
            query.push(("is_running", running.to_string()));
        }
        if let Some(date) = self.start_date {
            query.push(("start_date", date.to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("end_date", date.to_string()));
        }
        // A repeated parameter, one pair per tag
        for id in &self.tag_ids {
            query.push(("tag_ids", id.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}
