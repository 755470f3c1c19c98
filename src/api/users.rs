// SPDX-License-Identifier: MIT

//! Organization member endpoints (boss only).

use reqwest::Method;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{User, UserPage, UserPatch};

impl ApiClient {
    /// `GET /users` - members of the caller's organization.
    pub async fn list_users(&self) -> Result<UserPage> {
        self.request(Method::GET, "/users", None, &[]).await
    }

    /// `PUT /users/{id}` - change role or active status.
    pub async fn update_user(&self, user_id: Uuid, patch: &UserPatch) -> Result<User> {
        let path = format!("/users/{}", user_id);
        let body = serde_json::to_value(patch)
            .map_err(|e| anyhow::anyhow!("serialize user patch: {}", e))?;
        self.request(Method::PUT, &path, Some(body), &[]).await
    }

    /// `DELETE /users/{id}`.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let path = format!("/users/{}", user_id);
        self.request_empty(Method::DELETE, &path, None).await
    }
}
