// SPDX-License-Identifier: MIT

//! Authentication endpoints.

use reqwest::Method;
use serde_json::json;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{RegisterRequest, SessionTokens, TokenResponse, User};

impl ApiClient {
    /// `POST /auth/login` - authenticate and persist both tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let body = json!({ "email": email, "password": password });
        let tokens: TokenResponse = self
            .request(Method::POST, "/auth/login", Some(body), &[])
            .await?;

        self.credentials().store_tokens(&SessionTokens {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        })?;

        tracing::info!(expires_in = tokens.expires_in, "Logged in");
        Ok(tokens)
    }

    /// `POST /auth/register` - create a user account and its organization.
    ///
    /// Registration does not log the caller in; follow with [`Self::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let body = serde_json::to_value(request)
            .map_err(|e| anyhow::anyhow!("serialize register request: {}", e))?;
        self.request(Method::POST, "/auth/register", Some(body), &[])
            .await
    }

    /// `POST /auth/logout` - revoke the refresh token server-side.
    ///
    /// Local credentials are cleared whether or not the server call
    /// succeeds; a dead session should never be resurrectable locally.
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh_token) = self.credentials().refresh_token()? {
            let body = json!({ "refresh_token": refresh_token });
            if let Err(e) = self.request_empty(Method::POST, "/auth/logout", Some(body)).await {
                tracing::warn!(error = %e, "Server-side logout failed, clearing local session anyway");
            }
        }
        self.credentials().clear()
    }

    /// `GET /auth/me` - current user profile.
    pub async fn me(&self) -> Result<User> {
        self.request(Method::GET, "/auth/me", None, &[]).await
    }
}
