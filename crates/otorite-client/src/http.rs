//! # HTTP Implementation
//!
//! [`HttpApi`] implements every endpoint trait on top of one reqwest client.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  endpoint method                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build: base/api/ + path, X-Request-Id, Bearer (if any), JSON body     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send ──(no response / timeout)──► Unreachable / Timeout               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  status 401 ──► InvalidCredential { detail }                            │
//! │  status !2xx ─► Rejected { status, detail }                             │
//! │  status 2xx ──► decode DTO ──(fails)──► MalformedResponse              │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │               validated domain value                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use async_trait::async_trait;
use otorite_core::{Credential, User};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::api::{AuthApi, AuthSession, FavoritesApi, RemoteSettings, SettingsApi};
use crate::config::ClientConfig;
use crate::dto::{
    AuthDto, ErrorDto, FavoritesDto, ForgotPasswordRequest, LoginRequest, MessageDto,
    RegisterRequest, ResetPasswordRequest, SettingsDto, SettingsUpdateRequest, ToggleDto, UserDto,
};
use crate::error::{ApiError, ApiResult};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Reqwest-backed implementation of every endpoint trait.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base = config.api_base()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        debug!(base = %base, "Backend client ready");
        Ok(HttpApi { client, base })
    }

    /// The `{backend}/api/` URL paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> ApiResult<RequestBuilder> {
        let url = self.base.join(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(credential) = credential {
            builder = builder.bearer_auth(credential.expose());
        }

        Ok(builder)
    }

    /// Sends a request and decodes a 2xx body into `T`.
    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> ApiResult<T> {
        let (client, request) = builder.build_split();
        let request = request?;
        let method = request.method().clone();
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        debug!(%method, path = %path, request_id = %request_id, "Backend request");

        let response = client.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = map_status_error(status, body.as_ref());
            warn!(
                %method,
                path = %path,
                request_id = %request_id,
                status = status.as_u16(),
                error = %err,
                "Backend request failed"
            );
            return Err(err);
        }

        serde_json::from_slice(body.as_ref()).map_err(|e| {
            warn!(path = %path, request_id = %request_id, error = %e, "Undecodable response");
            ApiError::malformed(path, e.to_string())
        })
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path, credential)?.json(body);
        self.send(path, builder).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> ApiResult<T> {
        let builder = self.request(method, path, credential)?;
        self.send(path, builder).await
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorDto>(body)
        .ok()
        .and_then(ErrorDto::into_message);

    if status == StatusCode::UNAUTHORIZED {
        ApiError::InvalidCredential { message }
    } else {
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

fn favorite_path(vehicle_id: &str) -> ApiResult<String> {
    otorite_core::validation::validate_vehicle_id(vehicle_id)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(format!("favorites/{}", vehicle_id))
}

// =============================================================================
// Endpoint Implementations
// =============================================================================

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let path = "auth/login";
        let dto: AuthDto = self
            .send_json(Method::POST, path, &LoginRequest { email, password }, None)
            .await?;
        dto.into_session().map_err(|e| ApiError::malformed(path, e))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthSession> {
        let path = "auth/register";
        let body = RegisterRequest {
            name,
            email,
            password,
        };
        let dto: AuthDto = self.send_json(Method::POST, path, &body, None).await?;
        dto.into_session().map_err(|e| ApiError::malformed(path, e))
    }

    async fn profile(&self, credential: &Credential) -> ApiResult<User> {
        let path = "auth/me";
        let dto: UserDto = self.send_empty(Method::GET, path, Some(credential)).await?;
        dto.into_user().map_err(|e| ApiError::malformed(path, e))
    }

    async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        let dto: MessageDto = self
            .send_json(
                Method::POST,
                "auth/forgot-password",
                &ForgotPasswordRequest { email },
                None,
            )
            .await?;
        Ok(dto.message)
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<String> {
        let dto: MessageDto = self
            .send_json(
                Method::POST,
                "auth/reset-password",
                &ResetPasswordRequest {
                    token,
                    new_password,
                },
                None,
            )
            .await?;
        Ok(dto.message)
    }

    async fn verify_email(&self, token: &str) -> ApiResult<String> {
        let path = "auth/verify-email";
        let builder = self
            .request(Method::POST, path, None)?
            .query(&[("token", token)]);
        let dto: MessageDto = self.send(path, builder).await?;
        Ok(dto.message)
    }

    async fn resend_verification(&self, credential: &Credential) -> ApiResult<String> {
        let dto: MessageDto = self
            .send_empty(Method::POST, "auth/resend-verification", Some(credential))
            .await?;
        Ok(dto.message)
    }
}

#[async_trait]
impl FavoritesApi for HttpApi {
    async fn add_favorite(
        &self,
        credential: &Credential,
        vehicle_id: &str,
    ) -> ApiResult<BTreeSet<String>> {
        let path = favorite_path(vehicle_id)?;
        let dto: FavoritesDto = self.send_empty(Method::POST, &path, Some(credential)).await?;
        dto.into_set().map_err(|e| ApiError::malformed(path, e))
    }

    async fn remove_favorite(
        &self,
        credential: &Credential,
        vehicle_id: &str,
    ) -> ApiResult<BTreeSet<String>> {
        let path = favorite_path(vehicle_id)?;
        let dto: FavoritesDto = self.send_empty(Method::DELETE, &path, Some(credential)).await?;
        dto.into_set().map_err(|e| ApiError::malformed(path, e))
    }
}

#[async_trait]
impl SettingsApi for HttpApi {
    async fn fetch_settings(&self) -> ApiResult<RemoteSettings> {
        let dto: SettingsDto = self.send_empty(Method::GET, "settings", None).await?;
        Ok(dto.into())
    }

    async fn toggle_christmas(&self, credential: Option<&Credential>) -> ApiResult<bool> {
        let dto: ToggleDto = self
            .send_empty(Method::POST, "settings/toggle-christmas", credential)
            .await?;
        Ok(dto.christmas_enabled)
    }

    async fn update_settings(
        &self,
        christmas_enabled: bool,
        credential: Option<&Credential>,
    ) -> ApiResult<RemoteSettings> {
        let dto: SettingsDto = self
            .send_json(
                Method::PUT,
                "settings",
                &SettingsUpdateRequest { christmas_enabled },
                credential,
            )
            .await?;
        Ok(dto.into())
    }
}
