//! # Client Configuration
//!
//! Where the backend lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     OTORITE_BACKEND_URL=https://api.otorite.example                    │
//! │     OTORITE_REQUEST_TIMEOUT_SECS=15                                    │
//! │                                                                         │
//! │  2. [backend] table of otorite.toml (read by the shell)                │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8001, 30 seconds                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [backend]
//! url = "http://localhost:8001"
//! request_timeout_secs = 30
//! user_agent = "otorite-client/0.1.0"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Path prefix every endpoint lives under.
pub const API_PREFIX: &str = "api";

fn default_backend_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("otorite-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, without the `/api` prefix.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at `url`.
    pub fn with_url(url: impl Into<String>) -> Self {
        ClientConfig {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Applies `OTORITE_BACKEND_URL` and `OTORITE_REQUEST_TIMEOUT_SECS`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OTORITE_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.url = url;
        }

        if let Some(timeout) = lookup("OTORITE_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric request timeout"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = Url::parse(&self.url)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.url
            )));
        }

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ApiError::InvalidConfig(format!(
                "Backend URL has no host: {}",
                self.url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Base URL every endpoint path is joined onto: `{url}/api/`.
    pub fn api_base(&self) -> ApiResult<Url> {
        self.validate()?;

        let mut base = Url::parse(&self.url)?;
        let path = format!("{}/{}/", base.path().trim_end_matches('/'), API_PREFIX);
        base.set_path(&path);
        Ok(base)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
