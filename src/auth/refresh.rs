// SPDX-License-Identifier: MIT

//! Single-flight token refresh.
//!
//! Any number of requests can fail with 401 while one refresh is already in
//! flight; all of them must observe that one refresh's outcome instead of
//! issuing their own. The coordinator keeps a shared pending future that
//! concurrent callers clone and await, and clears it once it settles so the
//! next failure starts a fresh attempt.

use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Deserialize;

use crate::auth::CredentialStore;
use crate::models::SessionTokens;

type PendingRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// Serializes concurrent refresh attempts into a single network operation.
///
/// One instance exists per process and is shared by every [`crate::api::ApiClient`]
/// clone. Uses its own HTTP client so a 401 from the refresh endpoint can
/// never re-enter the interceptor.
pub struct RefreshCoordinator {
    http: reqwest::Client,
    refresh_url: String,
    credentials: CredentialStore,
    pending: Mutex<Option<PendingRefresh>>,
}

/// Response from `POST /auth/refresh`.
///
/// The server does not rotate refresh tokens today; `refresh_token` is
/// modeled anyway so a rotating server is adopted transparently.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl RefreshCoordinator {
    pub fn new(http: reqwest::Client, api_base_url: &str, credentials: CredentialStore) -> Self {
        Self {
            http,
            refresh_url: format!("{}/api/v1/auth/refresh", api_base_url),
            credentials,
            pending: Mutex::new(None),
        }
    }

    /// Shared-ownership constructor used by the API client.
    pub fn shared(
        http: reqwest::Client,
        api_base_url: &str,
        credentials: CredentialStore,
    ) -> Arc<Self> {
        Arc::new(Self::new(http, api_base_url, credentials))
    }

    /// Obtain a fresh access token, or `None` if the session is over.
    ///
    /// If a refresh is already in flight the caller awaits its outcome;
    /// otherwise a new one is started. On failure (missing refresh token,
    /// network error, server rejection) stored credentials are cleared and
    /// no retry is attempted.
    pub async fn ensure_fresh_token(&self) -> Option<String> {
        let (fut, started_here) = {
            let mut pending = self.pending.lock().unwrap();
            match pending.as_ref() {
                Some(fut) => (fut.clone(), false),
                None => {
                    let fut = refresh_once(
                        self.http.clone(),
                        self.refresh_url.clone(),
                        self.credentials.clone(),
                    )
                    .boxed()
                    .shared();
                    *pending = Some(fut.clone());
                    (fut, true)
                }
            }
        };

        let token = fut.await;

        // Only the caller that installed the future clears it; late joiners
        // that cloned it still see the settled value.
        if started_here {
            *self.pending.lock().unwrap() = None;
        }

        token
    }
}

/// Perform one refresh round trip against the API.
async fn refresh_once(
    http: reqwest::Client,
    refresh_url: String,
    credentials: CredentialStore,
) -> Option<String> {
    let refresh_token = match credentials.refresh_token() {
        Ok(Some(token)) => token,
        Ok(None) => {
            // No session to refresh: drop any stale access token and fail
            // fast without a network call.
            tracing::debug!("No refresh token stored, skipping refresh");
            let _ = credentials.clear_access_token();
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read refresh token");
            return None;
        }
    };

    let response = http
        .post(&refresh_url)
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await;

    let body = match response {
        Ok(resp) if resp.status().is_success() => resp.json::<RefreshResponse>().await,
        Ok(resp) => {
            tracing::warn!(status = %resp.status(), "Token refresh rejected, ending session");
            let _ = credentials.clear();
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Token refresh request failed, ending session");
            let _ = credentials.clear();
            return None;
        }
    };

    match body {
        Ok(refreshed) => {
            let tokens = SessionTokens {
                access_token: refreshed.access_token.clone(),
                // Reuse the refresh token in use unless the server rotated it.
                refresh_token: refreshed.refresh_token.unwrap_or(refresh_token),
            };
            if let Err(e) = credentials.store_tokens(&tokens) {
                tracing::warn!(error = %e, "Failed to persist refreshed tokens");
            }
            tracing::debug!("Access token refreshed");
            Some(refreshed.access_token)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Malformed refresh response, ending session");
            let _ = credentials.clear();
            None
        }
    }
}
