// SPDX-License-Identifier: MIT

//! Task models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub project_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: Uuid,
}

/// Payload for `PUT /tasks/{id}` (all fields optional).
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Paginated task list.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
