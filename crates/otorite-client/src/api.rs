//! # Endpoint Traits
//!
//! The backend operations the stores depend on, grouped by the store that
//! uses them. Stores hold `Arc<dyn ...>` so tests can substitute a fake.
//!
//! | Trait | Endpoints |
//! |-------|-----------|
//! | [`AuthApi`] | `/auth/login`, `/auth/register`, `/auth/me`, `/auth/forgot-password`, `/auth/reset-password`, `/auth/verify-email`, `/auth/resend-verification` |
//! | [`FavoritesApi`] | `POST` / `DELETE /favorites/{id}` |
//! | [`SettingsApi`] | `GET` / `PUT /settings`, `POST /settings/toggle-christmas` |

use std::collections::BTreeSet;

use async_trait::async_trait;
use otorite_core::{Credential, User};

use crate::error::ApiResult;

/// A successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub credential: Credential,
}

/// Site-wide settings as the backend reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub christmas_enabled: bool,
    pub site_name: Option<String>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession>;

    async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthSession>;

    /// The account behind `credential`.
    async fn profile(&self, credential: &Credential) -> ApiResult<User>;

    /// Returns the server's status message.
    async fn forgot_password(&self, email: &str) -> ApiResult<String>;

    async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<String>;

    async fn verify_email(&self, token: &str) -> ApiResult<String>;

    async fn resend_verification(&self, credential: &Credential) -> ApiResult<String>;
}

#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Returns the account's complete favorite set after the change.
    async fn add_favorite(&self, credential: &Credential, vehicle_id: &str)
        -> ApiResult<BTreeSet<String>>;

    /// Returns the account's complete favorite set after the change.
    async fn remove_favorite(
        &self,
        credential: &Credential,
        vehicle_id: &str,
    ) -> ApiResult<BTreeSet<String>>;
}

#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn fetch_settings(&self) -> ApiResult<RemoteSettings>;

    /// Flips the seasonal flag server-side and returns the new value.
    async fn toggle_christmas(&self, credential: Option<&Credential>) -> ApiResult<bool>;

    async fn update_settings(
        &self,
        christmas_enabled: bool,
        credential: Option<&Credential>,
    ) -> ApiResult<RemoteSettings>;
}

/// Every endpoint group, for code that wires all stores at once.
pub trait BackendApi: AuthApi + FavoritesApi + SettingsApi {}

impl<T: AuthApi + FavoritesApi + SettingsApi> BackendApi for T {}
