//! # Domain Types
//!
//! Core domain types shared by the stores and the REST client.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   Credential    │   │ VehicleSnapshot │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  bearer token   │   │  id             │       │
//! │  │  email          │   │  (opaque,       │   │  brand / model  │       │
//! │  │  is_admin       │   │   redacted in   │   │  year / segment │       │
//! │  │  favorites {}   │   │   Debug)        │   │  scores, extra  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `User` and `VehicleSnapshot` serialize with the camelCase field names the
//! view layer already reads (`isAdmin`, `bestFor`, ...).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::i18n::LocalizedText;

// =============================================================================
// User
// =============================================================================

/// An authenticated account as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_verified: bool,
    /// Ids of favorited vehicles. Order carries no meaning.
    #[serde(default)]
    pub favorites: BTreeSet<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_favorite(&self, vehicle_id: &str) -> bool {
        self.favorites.contains(vehicle_id)
    }
}

// =============================================================================
// Credential
// =============================================================================

/// Bearer token proving a session. Opaque to the client.
///
/// `Debug` never prints the token, so a `Credential` can sit inside structs
/// that end up in log fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// The raw token, for the `Authorization` header and durable storage.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

// =============================================================================
// Vehicle Snapshot
// =============================================================================

/// One scoring dimension of a vehicle review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreItem {
    pub score: f64,
    #[serde(default)]
    pub justification: LocalizedText,
}

/// Read-only copy of a vehicle as the backend returned it.
///
/// The fields the compare table reads are typed; everything else in the
/// payload is kept verbatim in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VehicleSnapshot {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub segment: String,
    #[serde(default)]
    pub image: String,
    /// Dimension name (`reliability`, `overall`, ...) to score. Dimensions
    /// without a score are `None`.
    #[serde(default)]
    pub scores: BTreeMap<String, Option<ScoreItem>>,
    #[serde(default)]
    pub strengths: LocalizedText,
    #[serde(default)]
    pub weaknesses: LocalizedText,
    #[serde(default)]
    pub best_for: LocalizedText,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VehicleSnapshot {
    /// Minimal snapshot with no scores or text.
    pub fn new(
        id: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        segment: impl Into<String>,
    ) -> Self {
        VehicleSnapshot {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            year,
            segment: segment.into(),
            image: String::new(),
            scores: BTreeMap::new(),
            strengths: LocalizedText::default(),
            weaknesses: LocalizedText::default(),
            best_for: LocalizedText::default(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn score(&self, dimension: &str) -> Option<f64> {
        self.scores.get(dimension)?.as_ref().map(|s| s.score)
    }

    /// The headline score shown on cards and in the compare table.
    pub fn overall_score(&self) -> Option<f64> {
        self.score("overall")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
