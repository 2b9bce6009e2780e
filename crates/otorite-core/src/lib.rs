//! # otorite-core: Pure Domain Logic for the Otorite Client
//!
//! This crate holds the rules the client-side stores are built on, as pure
//! functions and plain data with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Otorite Client Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View Layer (React SPA)                       │   │
//! │  │     Pages ──► Vehicle cards ──► Compare table ──► Forms         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / call                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    otorite-state (stores)                       │   │
//! │  │     LanguageStore  SessionStore  CompareStore  ThemeStore       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ otorite-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   i18n    │  │   types   │  │  compare  │  │ sequence  │  │   │
//! │  │   │ Language  │  │   User    │  │CompareList│  │  Ticket   │  │   │
//! │  │   │ Localized │  │Credential │  │  (max 3)  │  │ Sequencer │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`i18n`] - Language codes, the translation catalog, localized text
//! - [`types`] - Domain types (User, Credential, VehicleSnapshot)
//! - [`compare`] - The bounded, ordered compare list
//! - [`sequence`] - Request tickets for discarding stale responses
//! - [`validation`] - Input checks for the auth forms
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use otorite_core::i18n::{catalog, LanguageCode};
//!
//! let en = LanguageCode::new("en");
//! assert_eq!(catalog().translate(&en, "nav.vehicles"), "Vehicles");
//!
//! // Unknown keys come back verbatim
//! assert_eq!(catalog().translate(&en, "nav.missing"), "nav.missing");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compare;
pub mod error;
pub mod i18n;
pub mod sequence;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compare::CompareList;
pub use error::{CompareError, ValidationError};
pub use i18n::{
    LanguageCode, LanguageDescriptor, LocalizedText, LocalizedValue, TextDirection,
    TranslationTable, DEFAULT_LANGUAGE, FALLBACK_LANGUAGE, SUPPORTED_LANGUAGES,
};
pub use sequence::{RequestSequencer, Ticket};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of vehicles shown side by side in the comparison view.
pub const MAX_COMPARE: usize = 3;

/// Body class toggled while the seasonal theme is active.
pub const CHRISTMAS_BODY_CLASS: &str = "christmas-mode";
