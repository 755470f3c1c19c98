// SPDX-License-Identifier: MIT

//! Tag endpoints.

use reqwest::Method;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Tag, TagDraft, TagPage};

impl ApiClient {
    /// `GET /tags`.
    pub async fn list_tags(&self, limit: Option<u32>, offset: Option<u32>) -> Result<TagPage> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        self.request(Method::GET, "/tags", None, &query).await
    }

    /// `POST /tags` (boss only).
    pub async fn create_tag(&self, draft: &TagDraft) -> Result<Tag> {
        let body = serde_json::to_value(draft)
            .map_err(|e| anyhow::anyhow!("serialize tag draft: {}", e))?;
        self.request(Method::POST, "/tags", Some(body), &[]).await
    }

    /// `GET /tags/{id}`.
    pub async fn get_tag(&self, tag_id: Uuid) -> Result<Tag> {
        let path = format!("/tags/{}", tag_id);
        self.request(Method::GET, &path, None, &[]).await
    }

    /// `PUT /tags/{id}` (boss only).
    pub async fn update_tag(&self, tag_id: Uuid, draft: &TagDraft) -> Result<Tag> {
        let path = format!("/tags/{}", tag_id);
        let body = serde_json::to_value(draft)
            .map_err(|e| anyhow::anyhow!("serialize tag draft: {}", e))?;
        self.request(Method::PUT, &path, Some(body), &[]).await
    }

    /// `DELETE /tags/{id}` (boss only, cascades off time entries).
    pub async fn delete_tag(&self, tag_id: Uuid) -> Result<()> {
        let path = format!("/tags/{}", tag_id);
        self.request_empty(Method::DELETE, &path, None).await
    }
}
