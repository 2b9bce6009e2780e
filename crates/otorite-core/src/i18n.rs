//! # Localization Primitives
//!
//! Language codes, the embedded translation catalog and multi-language text.
//!
//! ## Lookup Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     translate("vehicle.bestFor")                        │
//! │                                                                         │
//! │   active table ──(missing)──► "en" table ──(missing)──► key itself     │
//! │        │                           │                                    │
//! │        ▼                           ▼                                    │
//! │   walk "vehicle" ─► "bestFor" ─► string leaf? ──no──► key itself        │
//! │                                      │                                  │
//! │                                     yes ──► translated string           │
//! │                                                                         │
//! │                   LocalizedText::resolve(active)                        │
//! │                                                                         │
//! │   active value ──(empty)──► "en" value ──(empty)──► first value ──► ""  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Neither lookup can fail. A missing translation is visible in the UI as
//! its raw key, a missing localized value as an empty string.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Language Codes
// =============================================================================

/// Language active on first start and whenever the persisted one is unusable.
pub const DEFAULT_LANGUAGE: &str = "tr";

/// Language whose table and values back up missing lookups.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Static metadata for a language offered in the language picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LanguageDescriptor {
    #[ts(type = "string")]
    pub code: &'static str,
    #[ts(type = "string")]
    pub name: &'static str,
    #[ts(type = "string")]
    pub flag: &'static str,
    pub rtl: bool,
}

/// Every language the picker offers, in display order.
pub const SUPPORTED_LANGUAGES: &[LanguageDescriptor] = &[
    LanguageDescriptor { code: "tr", name: "Türkçe", flag: "🇹🇷", rtl: false },
    LanguageDescriptor { code: "en", name: "English", flag: "🇬🇧", rtl: false },
    LanguageDescriptor { code: "de", name: "Deutsch", flag: "🇩🇪", rtl: false },
    LanguageDescriptor { code: "fr", name: "Français", flag: "🇫🇷", rtl: false },
    LanguageDescriptor { code: "es", name: "Español", flag: "🇪🇸", rtl: false },
    LanguageDescriptor { code: "it", name: "Italiano", flag: "🇮🇹", rtl: false },
    LanguageDescriptor { code: "nl", name: "Nederlands", flag: "🇳🇱", rtl: false },
    LanguageDescriptor { code: "pt", name: "Português", flag: "🇵🇹", rtl: false },
    LanguageDescriptor { code: "pl", name: "Polski", flag: "🇵🇱", rtl: false },
    LanguageDescriptor { code: "ar", name: "العربية", flag: "🇸🇦", rtl: true },
];

/// Writing direction of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// The value of the document's `dir` attribute.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// A short language identifier such as `"tr"` or `"en"`.
///
/// Any string is representable. Codes outside [`SUPPORTED_LANGUAGES`] are
/// legal to hold; they simply resolve through the fallback table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        LanguageCode(code.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Metadata for this code, if it is one of the supported languages.
    pub fn descriptor(&self) -> Option<&'static LanguageDescriptor> {
        SUPPORTED_LANGUAGES.iter().find(|l| l.code == self.0)
    }

    pub fn is_supported(&self) -> bool {
        self.descriptor().is_some()
    }

    /// Right-to-left only for languages flagged `rtl`; unknown codes are LTR.
    pub fn direction(&self) -> TextDirection {
        match self.descriptor() {
            Some(d) if d.rtl => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        LanguageCode::new(DEFAULT_LANGUAGE)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        LanguageCode::new(code)
    }
}

// =============================================================================
// Translation Catalog
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Node {
    Text(String),
    Group(BTreeMap<String, Node>),
}

/// Read-only tree of translations: `language -> group -> ... -> string`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable {
    languages: BTreeMap<String, Node>,
}

impl TranslationTable {
    /// Parses a catalog from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether the catalog carries a table for `code`.
    pub fn has_language(&self, code: &LanguageCode) -> bool {
        self.languages.contains_key(code.as_str())
    }

    /// Looks up a dotted key such as `"nav.home"`.
    ///
    /// Uses the table for `language`, or the fallback table when that
    /// language has none. Any missing segment, or a key that stops at a group
    /// instead of a string, yields the key itself.
    pub fn translate(&self, language: &LanguageCode, key: &str) -> String {
        let root = self
            .languages
            .get(language.as_str())
            .or_else(|| self.languages.get(FALLBACK_LANGUAGE));

        let Some(mut node) = root else {
            return key.to_string();
        };

        for segment in key.split('.') {
            node = match node {
                Node::Group(children) => match children.get(segment) {
                    Some(child) => child,
                    None => return key.to_string(),
                },
                Node::Text(_) => return key.to_string(),
            };
        }

        match node {
            Node::Text(text) if !text.is_empty() => text.clone(),
            _ => key.to_string(),
        }
    }
}

static CATALOG: OnceLock<TranslationTable> = OnceLock::new();

/// The translation catalog embedded in the binary.
///
/// Parsed on first use. A catalog that fails to parse is logged and replaced
/// by an empty one, so every lookup degrades to its key.
pub fn catalog() -> &'static TranslationTable {
    CATALOG.get_or_init(|| {
        TranslationTable::from_json(include_str!("translations.json")).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Embedded translation catalog is invalid");
            TranslationTable::default()
        })
    })
}

// =============================================================================
// Localized Text
// =============================================================================

/// One language's value in a [`LocalizedText`]: a string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum LocalizedValue {
    Text(String),
    List(Vec<String>),
}

impl LocalizedValue {
    pub fn is_empty(&self) -> bool {
        match self {
            LocalizedValue::Text(s) => s.is_empty(),
            LocalizedValue::List(items) => items.is_empty(),
        }
    }

    /// Display form. Lists are joined with `", "`.
    pub fn to_display(&self) -> String {
        match self {
            LocalizedValue::Text(s) => s.clone(),
            LocalizedValue::List(items) => items.join(", "),
        }
    }

    /// List form. A single string becomes a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            LocalizedValue::Text(s) => vec![s.clone()],
            LocalizedValue::List(items) => items.clone(),
        }
    }
}

/// Text supplied by the backend in several languages, e.g.
/// `{"tr": "Saf sürüş tutkunları", "en": "Pure driving enthusiasts"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct LocalizedText(IndexMap<String, LocalizedValue>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: &str, value: LocalizedValue) -> Self {
        self.0.insert(language.to_string(), value);
        self
    }

    pub fn get(&self, language: &str) -> Option<&LocalizedValue> {
        self.0.get(language)
    }

    /// Picks the value to show for `language`.
    ///
    /// Order: the language's own non-empty value, the fallback language's,
    /// then the first non-empty value in payload order.
    pub fn resolve(&self, language: &LanguageCode) -> Option<&LocalizedValue> {
        let usable = |v: &&LocalizedValue| !v.is_empty();

        self.0
            .get(language.as_str())
            .filter(usable)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE).filter(usable))
            .or_else(|| self.0.values().find(|v| !v.is_empty()))
    }

    /// Display string for `language`; `""` when nothing is usable.
    pub fn resolve_display(&self, language: &LanguageCode) -> String {
        self.resolve(language).map(LocalizedValue::to_display).unwrap_or_default()
    }

    /// List form for `language`; empty when nothing is usable.
    pub fn resolve_list(&self, language: &LanguageCode) -> Vec<String> {
        self.resolve(language).map(LocalizedValue::to_list).unwrap_or_default()
    }
}

impl FromIterator<(String, LocalizedValue)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (String, LocalizedValue)>>(iter: I) -> Self {
        LocalizedText(iter.into_iter().collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
