//! # Error Types
//!
//! Domain-specific error types for otorite-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  otorite-core errors (this file)                                       │
//! │  ├── CompareError     - Compare-list rejections                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  otorite-storage errors                                                │
//! │  └── StorageError     - Durable storage failures                       │
//! │                                                                         │
//! │  otorite-client errors                                                 │
//! │  └── ApiError         - Transport / rejected / invalid credential      │
//! │                                                                         │
//! │  otorite-state errors                                                  │
//! │  └── SessionError, ThemeError - What the view layer sees               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Compare Error
// =============================================================================

/// Reasons an entry cannot be added to the compare list.
///
/// Both are "failure indicators" for the view layer, not faults: the list is
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The list already holds the maximum number of entries.
    #[error("Compare list is full ({max} vehicles)")]
    Full { max: usize },

    /// An entry with the same id is already selected.
    #[error("Vehicle {0} is already in the compare list")]
    AlreadySelected(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before a request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., email without a domain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
