// SPDX-License-Identifier: MIT

//! Task endpoints.

use reqwest::Method;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{Task, TaskDraft, TaskPage, TaskPatch};

impl ApiClient {
    /// `GET /tasks`, optionally scoped to one project.
    pub async fn list_tasks(&self, project_id: Option<Uuid>) -> Result<TaskPage> {
        let mut query = Vec::new();
        if let Some(id) = project_id {
            query.push(("project_id", id.to_string()));
        }
        self.request(Method::GET, "/tasks", None, &query).await
    }

    /// `POST /tasks` (boss only).
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task> {
        let body = serde_json::to_value(draft)
            .map_err(|e| anyhow::anyhow!("serialize task draft: {}", e))?;
        self.request(Method::POST, "/tasks", Some(body), &[]).await
    }

    /// `PUT /tasks/{id}` (boss only).
    pub async fn update_task(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task> {
        let path = format!("/tasks/{}", task_id);
        let body = serde_json::to_value(patch)
            .map_err(|e| anyhow::anyhow!("serialize task patch: {}", e))?;
        self.request(Method::PUT, &path, Some(body), &[]).await
    }

    /// `DELETE /tasks/{id}` (boss only).
    pub async fn delete_task(&self, task_id: Uuid) -> Result<()> {
        let path = format!("/tasks/{}", task_id);
        self.request_empty(Method::DELETE, &path, None).await
    }
}
