//! # Localization Store
//!
//! Owns the active UI language and answers every translation lookup.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Localization Store                                 │
//! │                                                                         │
//! │  initialize() ──► storage["language"] ──┬── supported ──► use it        │
//! │                                         └── otherwise ──► "tr"          │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 document lang/dir                                       │
//! │                                                                         │
//! │  set_language(code) ──► active = code ──► document lang/dir             │
//! │                              │                                          │
//! │                              └──► storage["language"] = code            │
//! │                                   (failure logged, not surfaced)        │
//! │                                                                         │
//! │  translate(key) ──► catalog[active] or catalog["en"] ──► string | key   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use otorite_core::i18n::catalog;
use otorite_core::{
    LanguageCode, LanguageDescriptor, LocalizedText, TextDirection, SUPPORTED_LANGUAGES,
};
use otorite_storage::{keys, DurableStore};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::document::DocumentSurface;

pub struct LanguageStore {
    state: watch::Sender<LanguageCode>,
    storage: Arc<dyn DurableStore>,
    document: Arc<dyn DocumentSurface>,
}

impl LanguageStore {
    /// Restores the persisted language and applies its direction.
    ///
    /// A missing, unreadable, or unsupported persisted value starts the
    /// store in the default language.
    pub async fn initialize(
        storage: Arc<dyn DurableStore>,
        document: Arc<dyn DocumentSurface>,
    ) -> Self {
        let persisted = match storage.get(keys::LANGUAGE).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Could not read persisted language");
                None
            }
        };

        let language = persisted
            .map(LanguageCode::new)
            .filter(LanguageCode::is_supported)
            .unwrap_or_default();

        document.set_language(&language, language.direction());
        info!(language = %language, "Language store initialized");

        let (state, _) = watch::channel(language);
        LanguageStore {
            state,
            storage,
            document,
        }
    }

    /// Switches the active language. Any code is accepted; codes without a
    /// table translate through the fallback table.
    pub async fn set_language(&self, code: impl Into<LanguageCode>) {
        let code = code.into();
        if !code.is_supported() {
            debug!(language = %code, "Switching to a language without a descriptor");
        }

        self.document.set_language(&code, code.direction());
        self.state.send_replace(code);

        // Persist whatever is active now, so concurrent switches converge
        let active = self.language();
        if let Err(e) = self.storage.set(keys::LANGUAGE, active.as_str()).await {
            warn!(language = %active, error = %e, "Could not persist language");
        }
    }

    /// Looks up a dotted key in the active language.
    pub fn translate(&self, key: &str) -> String {
        catalog().translate(&self.state.borrow(), key)
    }

    /// Display string of backend-supplied localized text; `""` for `None`.
    pub fn resolve_localized(&self, text: Option<&LocalizedText>) -> String {
        text.map(|t| t.resolve_display(&self.state.borrow()))
            .unwrap_or_default()
    }

    /// List form of backend-supplied localized text (strengths, weaknesses).
    pub fn resolve_localized_list(&self, text: Option<&LocalizedText>) -> Vec<String> {
        text.map(|t| t.resolve_list(&self.state.borrow()))
            .unwrap_or_default()
    }

    /// Languages the picker offers.
    pub fn languages(&self) -> &'static [LanguageDescriptor] {
        SUPPORTED_LANGUAGES
    }

    pub fn language(&self) -> LanguageCode {
        self.state.borrow().clone()
    }

    pub fn direction(&self) -> TextDirection {
        self.state.borrow().direction()
    }

    pub fn subscribe(&self) -> watch::Receiver<LanguageCode> {
        self.state.subscribe()
    }
}
