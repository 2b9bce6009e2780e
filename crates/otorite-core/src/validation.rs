//! # Validation Module
//!
//! Shape checks for the auth forms, run before a request leaves the client.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form inputs (view layer)                                     │
//! │  └── Required markers, input types                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: SessionStore (Rust)                                          │
//! │  └── THIS MODULE: same limits the backend enforces                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authoritative; its message wins when it rejects                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use otorite_core::validation::{validate_email, validate_new_password};
//!
//! assert!(validate_email("ayse@example.com").is_ok());
//! assert!(validate_new_password("12345").is_err());
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest password the backend accepts on register and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Name length bounds enforced by the backend.
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Account Fields
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@`, with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("missing @"));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("malformed address"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("malformed domain"));
    }

    Ok(())
}

/// Validates a password typed into the login form. Only presence is checked;
/// older accounts may predate the length rule.
pub fn validate_login_password(password: &str) -> ValidationResult<()> {
    required("password", password)
}

/// Validates a password being set (register, reset).
pub fn validate_new_password(password: &str) -> ValidationResult<()> {
    required("password", password)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;

    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a one-time token from a reset or verification link.
pub fn validate_token(token: &str) -> ValidationResult<()> {
    required("token", token)
}

/// Validates a vehicle id before it is placed in a URL path.
///
/// ## Rules
/// - Must not be empty
/// - Letters, digits, `-` and `_` only
pub fn validate_vehicle_id(id: &str) -> ValidationResult<()> {
    required("vehicle_id", id)?;

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "vehicle_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
