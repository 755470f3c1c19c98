// SPDX-License-Identifier: MIT

//! Project models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Display color in hex format (e.g. `#3B82F6`).
    pub color: String,
    pub organization_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub task_count: i64,
}

/// Payload for `POST /projects`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Payload for `PUT /projects/{id}` (all fields optional).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Paginated project list.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectPage {
    pub items: Vec<Project>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
