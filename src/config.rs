// SPDX-License-Identifier: MIT

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Esclavizador API (no trailing slash).
    pub api_base_url: String,
    /// Directory holding the local state file (tokens, timer snapshot).
    pub state_dir: PathBuf,
    /// HTTP request timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present. The state directory defaults to the
    /// platform data dir (e.g. `~/.local/share/esclavizador` on Linux).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("ESCLAVIZADOR_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        let state_dir = match env::var("ESCLAVIZADOR_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_state_dir().ok_or(ConfigError::NoStateDir)?,
        };

        let http_timeout_secs = env::var("ESCLAVIZADOR_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            api_base_url,
            state_dir,
            http_timeout_secs,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            state_dir: std::env::temp_dir().join("esclavizador-test"),
            http_timeout_secs: 5,
        }
    }
}

/// Platform-specific data directory for the state file.
fn default_state_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "esclavizador", "esclavizador")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a state directory; set ESCLAVIZADOR_STATE_DIR")]
    NoStateDir,
}
