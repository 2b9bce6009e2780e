//! # Document Surface
//!
//! Document-level side effects the stores produce: the root element's
//! `lang`/`dir` attributes and marker classes on `<body>`.
//!
//! A browser host implements [`DocumentSurface`] over the real DOM. The
//! headless shell and the tests use [`HeadlessDocument`], which records the
//! same effects in memory.

use std::collections::BTreeSet;
use std::sync::Mutex;

use otorite_core::{LanguageCode, TextDirection};
use serde::Serialize;

/// Sink for document-level side effects.
pub trait DocumentSurface: Send + Sync {
    /// Sets the root element's `lang` and `dir` attributes.
    fn set_language(&self, language: &LanguageCode, direction: TextDirection);

    /// Adds (`present = true`) or removes a class on `<body>`.
    fn set_body_class(&self, class: &str, present: bool);
}

/// What a [`HeadlessDocument`] currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub lang: String,
    pub dir: TextDirection,
    pub body_classes: BTreeSet<String>,
}

impl Default for DocumentSnapshot {
    fn default() -> Self {
        DocumentSnapshot {
            lang: otorite_core::DEFAULT_LANGUAGE.to_string(),
            dir: TextDirection::Ltr,
            body_classes: BTreeSet::new(),
        }
    }
}

/// In-memory document.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    inner: Mutex<DocumentSnapshot>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.with(|doc| doc.clone())
    }

    pub fn direction(&self) -> TextDirection {
        self.with(|doc| doc.dir)
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.with(|doc| doc.body_classes.contains(class))
    }

    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DocumentSnapshot) -> R,
    {
        let mut doc = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut doc)
    }
}

impl DocumentSurface for HeadlessDocument {
    fn set_language(&self, language: &LanguageCode, direction: TextDirection) {
        self.with(|doc| {
            doc.lang = language.as_str().to_string();
            doc.dir = direction;
        });
    }

    fn set_body_class(&self, class: &str, present: bool) {
        self.with(|doc| {
            if present {
                doc.body_classes.insert(class.to_string());
            } else {
                doc.body_classes.remove(class);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_document_records_effects() {
        let doc = HeadlessDocument::new();
        assert_eq!(doc.direction(), TextDirection::Ltr);

        doc.set_language(&LanguageCode::new("ar"), TextDirection::Rtl);
        doc.set_body_class("christmas-mode", true);
        doc.set_body_class("christmas-mode", true);

        let snap = doc.snapshot();
        assert_eq!(snap.lang, "ar");
        assert_eq!(snap.dir, TextDirection::Rtl);
        assert_eq!(snap.body_classes.len(), 1);

        doc.set_body_class("christmas-mode", false);
        assert!(!doc.has_body_class("christmas-mode"));
    }
}
