// SPDX-License-Identifier: MIT

//! Application error types shared by the library and the CLI.

/// Application error type.
///
/// `Unauthorized` means the session is over: the refresh coordinator either
/// had no refresh token or the server rejected it, and local credentials
/// have already been cleared. Everything else leaves the session intact.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not authenticated - run `esclavizador login`")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("A timer is already running - stop it first")]
    TimerAlreadyRunning,

    #[error("No timer is currently running")]
    NoRunningTimer,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Local state error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error means the session is terminated and the user
    /// must authenticate again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
