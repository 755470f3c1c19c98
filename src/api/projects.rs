// SPDX-License-Identifier: MIT

//! Project endpoints.

use reqwest::Method;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Project, ProjectDraft, ProjectPage, ProjectPatch};

impl ApiClient {
    /// `GET /projects`.
    pub async fn list_projects(&self, limit: Option<u32>, offset: Option<u32>) -> Result<ProjectPage> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        self.request(Method::GET, "/projects", None, &query).await
    }

    /// `POST /projects` (boss only).
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project> {
        let body = serde_json::to_value(draft)
            .map_err(|e| anyhow::anyhow!("serialize project draft: {}", e))?;
        self.request(Method::POST, "/projects", Some(body), &[]).await
    }

    /// `GET /projects/{id}`.
    pub async fn get_project(&self, project_id: Uuid) -> Result<Project> {
        let path = format!("/projects/{}", project_id);
        self.request(Method::GET, &path, None, &[]).await
    }

    /// `PUT /projects/{id}` (boss only).
    pub async fn update_project(&self, project_id: Uuid, patch: &ProjectPatch) -> Result<Project> {
        let path = format!("/projects/{}", project_id);
        let body = serde_json::to_value(patch)
            .map_err(|e| anyhow::anyhow!("serialize project patch: {}", e))?;
        self.request(Method::PUT, &path, Some(body), &[]).await
    }

    /// `DELETE /projects/{id}` (boss only).
    pub async fn delete_project(&self, project_id: Uuid) -> Result<()> {
        let path = format!("/projects/{}", project_id);
        self.request_empty(Method::DELETE, &path, None).await
    }
}
