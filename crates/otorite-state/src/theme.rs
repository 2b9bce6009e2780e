//! # Theme / Feature-Flag Store
//!
//! Tracks the site-wide seasonal theme flag (`christmas_enabled`).
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_cached()                         sync_remote()                    │
//! │  ─────────────                         ─────────────                    │
//! │  storage["christmas_enabled"]          GET /settings                    │
//! │    "true" ──► true                       ok  ──► adopt server value     │
//! │    else   ──► false                      err ──► keep cached, log       │
//! │  loading = true                        loading = false (always)         │
//! │  apply side effects, rewrite cache                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Changes Are Server-Authoritative
//! `toggle` and `set_enabled` only ever adopt a value the server reported.
//! When the change request fails, the store re-reads the settings and adopts
//! that; if the re-read fails too, the current value stays. The change error
//! is returned either way.
//!
//! Every transition persists the flag and updates the body class. Responses
//! older than the last one applied are dropped.

use std::sync::Arc;

use otorite_client::SettingsApi;
use otorite_core::{Credential, RequestSequencer, Ticket, CHRISTMAS_BODY_CLASS};
use otorite_storage::{keys, DurableStore};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::document::DocumentSurface;
use crate::error::{ThemeError, ThemeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ThemeSnapshot {
    pub christmas_enabled: bool,
    /// True until the first settings fetch has finished.
    pub loading: bool,
}

pub struct ThemeStore {
    state: watch::Sender<ThemeSnapshot>,
    sequencer: RequestSequencer,
    /// Serializes writes of the cached flag.
    persist: Mutex<()>,
    storage: Arc<dyn DurableStore>,
    document: Arc<dyn DocumentSurface>,
    api: Arc<dyn SettingsApi>,
}

impl ThemeStore {
    /// Builds the store from the cached flag only. No network.
    pub async fn load_cached(
        storage: Arc<dyn DurableStore>,
        document: Arc<dyn DocumentSurface>,
        api: Arc<dyn SettingsApi>,
    ) -> Self {
        let cached = match storage.get(keys::CHRISTMAS_ENABLED).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "Could not read cached theme flag");
                false
            }
        };

        document.set_body_class(CHRISTMAS_BODY_CLASS, cached);
        debug!(christmas_enabled = cached, "Theme flag loaded from cache");

        let (state, _) = watch::channel(ThemeSnapshot {
            christmas_enabled: cached,
            loading: true,
        });

        let store = ThemeStore {
            state,
            sequencer: RequestSequencer::new(),
            persist: Mutex::new(()),
            storage,
            document,
            api,
        };

        // Normalize whatever was cached to the value now in effect
        store.persist_flag().await;
        store
    }

    /// `load_cached` followed by `sync_remote`.
    pub async fn initialize(
        storage: Arc<dyn DurableStore>,
        document: Arc<dyn DocumentSurface>,
        api: Arc<dyn SettingsApi>,
    ) -> Self {
        let store = Self::load_cached(storage, document, api).await;
        store.sync_remote().await;
        store
    }

    /// Fetches the settings and adopts the server's flag. Failures keep the
    /// current value. Clears `loading` in every case.
    pub async fn sync_remote(&self) {
        let ticket = self.sequencer.issue();

        match self.api.fetch_settings().await {
            Ok(settings) => {
                self.apply(ticket, settings.christmas_enabled).await;
                info!(christmas_enabled = settings.christmas_enabled, "Theme flag synchronized");
            }
            Err(e) => {
                warn!(error = %e, "Settings fetch failed; keeping cached theme flag");
            }
        }

        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }

    /// Asks the server to flip the flag. Returns the value it reported.
    pub async fn toggle(&self, credential: Option<&Credential>) -> ThemeResult<bool> {
        let ticket = self.sequencer.issue();

        match self.api.toggle_christmas(credential).await {
            Ok(enabled) => {
                self.apply(ticket, enabled).await;
                Ok(enabled)
            }
            Err(e) => Err(self.reconcile("toggle", e.into()).await),
        }
    }

    /// Asks the server to set the flag. Returns the value it reported.
    pub async fn set_enabled(
        &self,
        christmas_enabled: bool,
        credential: Option<&Credential>,
    ) -> ThemeResult<bool> {
        let ticket = self.sequencer.issue();

        match self.api.update_settings(christmas_enabled, credential).await {
            Ok(settings) => {
                self.apply(ticket, settings.christmas_enabled).await;
                Ok(settings.christmas_enabled)
            }
            Err(e) => Err(self.reconcile("update", e.into()).await),
        }
    }

    pub fn christmas_enabled(&self) -> bool {
        self.state.borrow().christmas_enabled
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.state.subscribe()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Re-reads the server value after a failed change.
    async fn reconcile(&self, operation: &str, err: ThemeError) -> ThemeError {
        warn!(operation, error = %err, "Theme flag change failed; re-reading settings");

        let ticket = self.sequencer.issue();
        match self.api.fetch_settings().await {
            Ok(settings) => {
                self.apply(ticket, settings.christmas_enabled).await;
            }
            Err(e) => {
                warn!(error = %e, "Settings re-read failed; keeping current theme flag");
            }
        }
        err
    }

    /// Adopts a server-reported value unless a newer response was applied.
    async fn apply(&self, ticket: Ticket, enabled: bool) -> bool {
        let mut admitted = false;

        self.state.send_if_modified(|s| {
            if !self.sequencer.admit(ticket) {
                return false;
            }
            admitted = true;
            self.document.set_body_class(CHRISTMAS_BODY_CLASS, enabled);
            std::mem::replace(&mut s.christmas_enabled, enabled) != enabled
        });

        if admitted {
            self.persist_flag().await;
        } else {
            debug!(ticket = ticket.value(), "Dropping stale settings response");
        }
        admitted
    }

    async fn persist_flag(&self) {
        let _guard = self.persist.lock().await;
        let enabled = self.christmas_enabled();
        let value = if enabled { "true" } else { "false" };

        if let Err(e) = self.storage.set(keys::CHRISTMAS_ENABLED, value).await {
            warn!(error = %e, "Could not cache theme flag");
        }
    }
}
