//! # Store Error Types
//!
//! What the view layer sees when an explicit user action fails.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ApiErrorKind            SessionError               ThemeError          │
//! │  ────────────            ────────────               ──────────          │
//! │  InvalidCredential ────► InvalidCredentials         Unauthorized        │
//! │                          (Expired on favorites)                         │
//! │  Rejected ─────────────► EmailTaken | Rejected      Rejected            │
//! │  Transport ────────────► Unavailable                Unavailable         │
//! │                                                                         │
//! │  ValidationError ──────► Invalid   (before any request)                 │
//! │  no credential ────────► NoSession (before any request)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Background synchronization (restore, settings fetch) never produces these;
//! it logs and falls back to defaults.

use otorite_client::{ApiError, ApiErrorKind};
use otorite_core::ValidationError;
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for theme flag operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

/// The backend's `detail` for a duplicate registration.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

fn detail_suffix(message: &Option<String>) -> String {
    message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default()
}

// =============================================================================
// Session Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Login refused the email/password pair.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration refused because the email is in use.
    #[error("Email already registered")]
    EmailTaken,

    /// The server refused the request, with its message when it sent one.
    #[error("Request rejected{}", detail_suffix(.message))]
    Rejected { message: Option<String> },

    /// Input failed the client-side checks; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The backend could not be reached or answered with garbage.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The operation needs a session and there is none.
    #[error("Not logged in")]
    NoSession,

    /// The server no longer accepts the stored credential. The session has
    /// been cleared.
    #[error("Session expired")]
    Expired,

    /// A later login or logout replaced this request's outcome.
    #[error("Superseded by a newer session change")]
    Superseded,
}

impl SessionError {
    /// Localized inline message for the auth forms.
    ///
    /// Server messages are shown as sent; everything else goes through
    /// `translate` with an `auth.errors.*` key.
    pub fn user_message<F>(&self, translate: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let key = match self {
            SessionError::InvalidCredentials => "auth.errors.invalidCredentials",
            SessionError::EmailTaken => "auth.errors.emailTaken",
            SessionError::Rejected { message: Some(message) } => return message.clone(),
            SessionError::Rejected { message: None } | SessionError::Superseded => {
                "auth.errors.generic"
            }
            SessionError::Invalid(_) => "auth.errors.invalidInput",
            SessionError::Unavailable(_) => "auth.errors.network",
            SessionError::NoSession | SessionError::Expired => "auth.errors.noSession",
        };
        translate(key)
    }
}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        match err.kind() {
            ApiErrorKind::InvalidCredential => SessionError::InvalidCredentials,
            ApiErrorKind::Rejected => match err.server_message() {
                Some(EMAIL_TAKEN_MESSAGE) => SessionError::EmailTaken,
                message => SessionError::Rejected {
                    message: message.map(str::to_string),
                },
            },
            ApiErrorKind::Transport => SessionError::Unavailable(err.to_string()),
        }
    }
}

// =============================================================================
// Theme Error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// The server refused the credential (or its absence).
    #[error("Not allowed to change site settings")]
    Unauthorized,

    #[error("Settings change rejected{}", detail_suffix(.message))]
    Rejected { message: Option<String> },

    #[error("Settings service unavailable: {0}")]
    Unavailable(String),
}

impl From<ApiError> for ThemeError {
    fn from(err: ApiError) -> Self {
        match err.kind() {
            ApiErrorKind::InvalidCredential => ThemeError::Unauthorized,
            ApiErrorKind::Rejected => ThemeError::Rejected {
                message: err.server_message().map(str::to_string),
            },
            ApiErrorKind::Transport => ThemeError::Unavailable(err.to_string()),
        }
    }
}
