//! # Wire DTOs
//!
//! One request or response shape per endpoint. Responses are decoded into
//! these first, then checked and mapped into domain values in one pass; a
//! payload that decodes but fails the checks is as unusable as one that
//! does not decode.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use otorite_core::{Credential, User};
use serde::{Deserialize, Serialize};

use crate::api::{AuthSession, RemoteSettings};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SettingsUpdateRequest {
    pub christmas_enabled: bool,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserDto {
    pub(crate) fn into_user(self) -> Result<User, String> {
        if self.id.trim().is_empty() {
            return Err("user id is empty".to_string());
        }
        if self.email.trim().is_empty() {
            return Err(format!("user {} has no email", self.id));
        }

        Ok(User {
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            favorites: into_favorite_set(self.favorites)?,
            id: self.id,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
            is_verified: self.is_verified,
        })
    }
}

/// Login and register answer with the user fields plus the token.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub token: String,
}

impl AuthDto {
    pub(crate) fn into_session(self) -> Result<AuthSession, String> {
        let credential = Credential::new(self.token);
        if credential.is_empty() {
            return Err("token is empty".to_string());
        }
        Ok(AuthSession {
            user: self.user.into_user()?,
            credential,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FavoritesDto {
    pub favorites: Vec<String>,
}

impl FavoritesDto {
    pub(crate) fn into_set(self) -> Result<BTreeSet<String>, String> {
        into_favorite_set(self.favorites)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsDto {
    pub christmas_enabled: bool,
    #[serde(default)]
    pub site_name: Option<String>,
}

impl From<SettingsDto> for RemoteSettings {
    fn from(dto: SettingsDto) -> Self {
        RemoteSettings {
            christmas_enabled: dto.christmas_enabled,
            site_name: dto.site_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToggleDto {
    pub christmas_enabled: bool,
}

/// Error body. `detail` is a string for handled errors and a list of
/// field errors for request validation failures.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDto {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorDto {
    pub(crate) fn into_message(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string),
            _ => None,
        }
    }
}

/// Accepts RFC 3339 and the offset-less form the backend emits for UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()))
        .ok()
}

fn into_favorite_set(ids: Vec<String>) -> Result<BTreeSet<String>, String> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err("favorites contain an empty id".to_string());
    }
    Ok(ids.into_iter().collect())
}
