// SPDX-License-Identifier: MIT

//! Core request transport with bearer auth and transparent 401 recovery.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{CredentialStore, RefreshCoordinator};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::store::StateStore;

/// Endpoints whose 401 responses must never trigger a token refresh.
/// A 401 here is the answer, not an expired session.
const AUTH_EXEMPT_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/refresh",
    "/auth/logout",
];

/// Authenticated client for the Esclavizador API.
///
/// Every request carries `Authorization: Bearer <access_token>` when a token
/// is stored. A 401 on a protected endpoint triggers exactly one refresh via
/// the shared [`RefreshCoordinator`] followed by exactly one retry; callers
/// only ever see the final outcome.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a client over the given state store.
    pub fn new(config: &Config, store: Arc<dyn StateStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(AppError::Network)?;

        let credentials = CredentialStore::new(store);
        let refresh =
            RefreshCoordinator::shared(http.clone(), &config.api_base_url, credentials.clone());

        Ok(Self {
            http,
            base_url: format!("{}/api/v1", config.api_base_url),
            credentials,
            refresh,
        })
    }

    /// Stored credentials (shared with the refresh coordinator).
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// The refresh coordinator backing this client.
    pub fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// Issue a request and deserialize a JSON response body.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self.send(method, path, &body, query).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        response.json::<T>().await.map_err(AppError::Network)
    }

    /// Issue a request and discard the response body (204-style endpoints).
    pub(crate) async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<()> {
        let response = self.send(method, path, &body, &[]).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status, response).await);
        }
        Ok(())
    }

    /// Send a request, recovering from an expired access token at most once.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: &Option<Value>,
        query: &[(&'static str, String)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.credentials.access_token()?;

        let response = self.execute(method.clone(), &url, body, query, token).await?;
        if response.status() != StatusCode::UNAUTHORIZED || is_auth_exempt(path) {
            return Ok(response);
        }

        // Expired or invalid access token. One refresh, one retry; the
        // coordinator collapses concurrent failures into a single refresh.
        tracing::debug!(path, "Got 401, attempting token refresh");
        let Some(token) = self.refresh.ensure_fresh_token().await else {
            return Err(AppError::Unauthorized);
        };

        let retry = self.execute(method, &url, body, query, Some(token)).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // Still rejected with a fresh token: surface, never loop.
            return Err(AppError::Unauthorized);
        }
        Ok(retry)
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: &Option<Value>,
        query: &[(&'static str, String)],
        token: Option<String>,
    ) -> Result<Response> {
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.map_err(AppError::Network)
    }
}

/// Whether a 401 from this path is returned as-is (no refresh, no retry).
fn is_auth_exempt(path: &str) -> bool {
    AUTH_EXEMPT_PATHS.iter().any(|p| path.starts_with(p))
}

/// Convert a non-success response into an [`AppError::Api`].
///
/// The API reports errors as `{"detail": ...}` where `detail` is a string
/// or, for validation errors, a structured list. Parsed here once instead of
/// trusting the shape at every call site.
async fn api_error(status: StatusCode, response: Response) -> AppError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("detail").map(|d| match d {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
        .unwrap_or(body);

    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_endpoint_is_exempt() {
        assert!(is_auth_exempt("/auth/refresh"));
        assert!(is_auth_exempt("/auth/login"));
        assert!(!is_auth_exempt("/auth/me"));
        assert!(!is_auth_exempt("/time-entries/running"));
    }
}
