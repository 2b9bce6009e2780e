//! # otorite-state: Client-Side Stores
//!
//! The four pieces of client state the Otorite view layer subscribes to,
//! and the root that mounts them.
//!
//! ## Stores
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            AppState                                     │
//! │                                                                         │
//! │  ┌───────────────┐ ┌───────────────┐ ┌───────────────┐ ┌─────────────┐ │
//! │  │ LanguageStore │ │ SessionStore  │ │ CompareStore  │ │ ThemeStore  │ │
//! │  │               │ │               │ │               │ │             │ │
//! │  │ active code   │ │ user, token   │ │ up to 3       │ │ christmas   │ │
//! │  │ translate()   │ │ favorites     │ │ vehicles      │ │ flag        │ │
//! │  │               │ │               │ │               │ │             │ │
//! │  │ storage       │ │ storage, API  │ │ memory only   │ │ storage,API │ │
//! │  └───────────────┘ └───────────────┘ └───────────────┘ └─────────────┘ │
//! │                                                                         │
//! │  None of them reads another's state.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each store keeps its state in a `tokio::sync::watch` channel; the view
//! layer calls `subscribe()` and re-renders on change.
//!
//! ## Modules
//!
//! - [`language`] - Active language, translation, text direction
//! - [`session`] - Authentication, credential, favorites
//! - [`compare`] - Vehicles selected for comparison
//! - [`theme`] - Seasonal theme flag
//! - [`document`] - Document-level side effects
//! - [`app`] - The root that mounts everything
//! - [`error`] - Errors returned to the view layer

pub mod app;
pub mod compare;
pub mod document;
pub mod error;
pub mod language;
pub mod session;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppSnapshot, AppState};
pub use compare::{CompareSnapshot, CompareStore};
pub use document::{DocumentSnapshot, DocumentSurface, HeadlessDocument};
pub use error::{SessionError, SessionResult, ThemeError, ThemeResult};
pub use language::LanguageStore;
pub use session::{SessionSnapshot, SessionStore};
pub use theme::{ThemeSnapshot, ThemeStore};
