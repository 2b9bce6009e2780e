//! # otorite-client: Typed REST Client
//!
//! Typed access to the Otorite backend for the client-side stores.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore ──► AuthApi, FavoritesApi                                │
//! │  ThemeStore ────► SettingsApi                                          │
//! │                        │                                                │
//! │  ┌─────────────────────▼───────────────────────────────────────────┐   │
//! │  │                otorite-client (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌───────────┐   ┌───────────┐  ┌──────────┐  │   │
//! │  │   │  api.rs   │   │  http.rs  │   │  dto.rs   │  │config.rs │  │   │
//! │  │   │  traits   │◄──│  HttpApi  │──►│ wire DTOs │  │ base URL │  │   │
//! │  │   └───────────┘   └───────────┘   └───────────┘  └──────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                        │ HTTPS + JSON                                   │
//! │                        ▼                                                │
//! │              {backend_url}/api/...                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use otorite_client::{ClientConfig, HttpApi, SettingsApi};
//!
//! let api = HttpApi::new(&ClientConfig::default())?;
//! let settings = api.fetch_settings().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod config;
mod dto;
pub mod error;
pub mod http;

// =============================================================================
// Re-exports
// =============================================================================

pub use api::{AuthApi, AuthSession, BackendApi, FavoritesApi, RemoteSettings, SettingsApi};
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use http::{HttpApi, REQUEST_ID_HEADER};
