// SPDX-License-Identifier: MIT

//! Tag models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag as returned by the API.
///
/// Tags are organization-wide labels attached to time entries; deleting a
/// tag removes it from every entry that carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /tags` and `PUT /tags/{id}`; a tag is just its name.
#[derive(Debug, Clone, Serialize)]
pub struct TagDraft {
    pub name: String,
}

impl TagDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Paginated tag list.
#[derive(Debug, Clone, Deserialize)]
pub struct TagPage {
    pub items: Vec<Tag>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
