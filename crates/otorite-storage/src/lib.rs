//! # otorite-storage: Durable Local Storage
//!
//! The client's equivalent of a browser's localStorage: a handful of string
//! keys that must outlive the process.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LanguageStore   ThemeStore   SessionStore                             │
//! │       │              │             │                                    │
//! │       └──────────────┼─────────────┘   Arc<dyn DurableStore>           │
//! │                      ▼                                                  │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                otorite-storage (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │ LocalStorageRepo │   │ MemoryStore │  │   │
//! │  │   │   (pool.rs)   │◄───│    (kv.rs)       │   │   (kv.rs)   │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │            <data dir>/otorite.db  (local_storage table)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use otorite_storage::{keys, Database, DurableStore, StorageConfig};
//!
//! let db = Database::open(StorageConfig::new("otorite.db")).await?;
//! let storage = db.local_storage();
//! storage.set(keys::LANGUAGE, "en").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StorageError, StorageResult};
pub use kv::{keys, DurableStore, LocalStorageRepository, MemoryStore};
pub use pool::{Database, StorageConfig};
