// SPDX-License-Identifier: MIT

//! Typed access to the persisted session credentials.

use std::sync::Arc;

use crate::error::Result;
use crate::models::SessionTokens;
use crate::store::{keys, StateStore};

/// Reads and writes the token pair in the durable state store.
///
/// Invariant: the two tokens are written together. A lone access token or a
/// lone refresh token only ever appears transiently via `clear_access_token`
/// before a full clear.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn StateStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.store.get(keys::AUTH_TOKEN)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.store.get(keys::REFRESH_TOKEN)
    }

    /// Persist both tokens together.
    pub fn store_tokens(&self, tokens: &SessionTokens) -> Result<()> {
        self.store.put(keys::AUTH_TOKEN, &tokens.access_token)?;
        self.store.put(keys::REFRESH_TOKEN, &tokens.refresh_token)?;
        Ok(())
    }

    /// Drop a stale access token without touching the refresh token.
    pub fn clear_access_token(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)
    }

    /// Remove both tokens (logout, refresh failure).
    pub fn clear(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::REFRESH_TOKEN)?;
        Ok(())
    }
}
