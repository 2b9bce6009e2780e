//! # Application Root
//!
//! Mounts the four stores once, in a fixed order, and exposes them to the
//! view layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState::mount                                                        │
//! │                                                                         │
//! │  1. LanguageStore::initialize   (storage read, document lang/dir)       │
//! │  2. SessionStore::mount         ──spawn──► restore()                    │
//! │  3. CompareStore::new                                                   │
//! │  4. ThemeStore::load_cached     ──spawn──► sync_remote()                │
//! │                                                                         │
//! │  ready() awaits both spawned tasks                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first paint can happen right after `mount` returns: every store
//! already holds a usable value, and the two `loading` flags say which ones
//! are still synchronizing.

use std::sync::Arc;

use otorite_client::BackendApi;
use otorite_core::TextDirection;
use otorite_storage::DurableStore;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::compare::{CompareSnapshot, CompareStore};
use crate::document::DocumentSurface;
use crate::language::LanguageStore;
use crate::session::{SessionSnapshot, SessionStore};
use crate::theme::{ThemeSnapshot, ThemeStore};

/// Serializable view of every store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub language: String,
    pub direction: TextDirection,
    pub session: SessionSnapshot,
    pub compare: CompareSnapshot,
    pub theme: ThemeSnapshot,
}

pub struct AppState {
    language: Arc<LanguageStore>,
    session: Arc<SessionStore>,
    compare: Arc<CompareStore>,
    theme: Arc<ThemeStore>,
    startup: Mutex<Vec<JoinHandle<()>>>,
}

impl AppState {
    /// Builds every store and starts the background synchronization.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn mount<A>(
        storage: Arc<dyn DurableStore>,
        document: Arc<dyn DocumentSurface>,
        api: Arc<A>,
    ) -> Self
    where
        A: BackendApi + 'static,
    {
        let language = Arc::new(LanguageStore::initialize(storage.clone(), document.clone()).await);

        let session = Arc::new(SessionStore::mount(storage.clone(), api.clone(), api.clone()));
        let restore = tokio::spawn({
            let session = session.clone();
            async move { session.restore().await }
        });

        let compare = Arc::new(CompareStore::new());

        let theme = Arc::new(ThemeStore::load_cached(storage, document, api).await);
        let sync = tokio::spawn({
            let theme = theme.clone();
            async move { theme.sync_remote().await }
        });

        info!(language = %language.language(), "Application state mounted");

        AppState {
            language,
            session,
            compare,
            theme,
            startup: Mutex::new(vec![restore, sync]),
        }
    }

    /// Waits for the startup restore and settings fetch. Returns immediately
    /// on later calls.
    pub async fn ready(&self) {
        let tasks = std::mem::take(&mut *self.startup.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Startup task did not complete");
            }
        }
    }

    pub fn language(&self) -> &Arc<LanguageStore> {
        &self.language
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn compare(&self) -> &Arc<CompareStore> {
        &self.compare
    }

    pub fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            language: self.language.language().as_str().to_string(),
            direction: self.language.direction(),
            session: self.session.snapshot(),
            compare: self.compare.snapshot(),
            theme: self.theme.snapshot(),
        }
    }
}
