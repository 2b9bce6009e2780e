//! # Client Error Types
//!
//! Error types for backend requests.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ApiErrorKind                                      │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Rejected     │  │   InvalidCredential     │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  no response    │  │  4xx/5xx with   │  │  401                    │ │
//! │  │  timeout        │  │  optional       │  │  (bad login, expired    │ │
//! │  │  bad JSON       │  │  `detail`       │  │   or revoked token)     │ │
//! │  │  bad payload    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for backend requests.
pub type ApiResult<T> = Result<T, ApiError>;

/// The three ways a backend call can fail, as the stores see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No usable response: network failure, timeout, undecodable or
    /// malformed payload.
    Transport,
    /// The server answered and refused.
    Rejected,
    /// The server refused the credential (HTTP 401).
    InvalidCredential,
}

/// Backend request error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The response body could not be decoded or failed validation.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// The server rejected the request.
    #[error("Request rejected with status {status}{}", detail_suffix(.message))]
    Rejected { status: u16, message: Option<String> },

    /// The server rejected the credential.
    #[error("Credential rejected{}", detail_suffix(.message))]
    InvalidCredential { message: Option<String> },

    /// The request was refused before it was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client itself is misconfigured.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn detail_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}

impl ApiError {
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Category used by the stores to decide what to do.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Rejected { .. } | ApiError::InvalidRequest(_) => ApiErrorKind::Rejected,
            ApiError::InvalidCredential { .. } => ApiErrorKind::InvalidCredential,
            ApiError::Unreachable(_)
            | ApiError::Timeout(_)
            | ApiError::MalformedResponse { .. }
            | ApiError::InvalidConfig(_) => ApiErrorKind::Transport,
        }
    }

    /// The `detail` string the server sent with a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } | ApiError::InvalidCredential { message } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ApiErrorKind::Transport
    }

    pub fn is_invalid_credential(&self) -> bool {
        self.kind() == ApiErrorKind::InvalidCredential
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidConfig(err.to_string())
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidConfig(err.to_string())
    }
}
