//! # Key/Value Storage
//!
//! The durable storage contract the stores persist into, and its two
//! implementations.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          DurableStore                                   │
//! │                                                                         │
//! │   get(key)        ──► Ok(Some(value)) | Ok(None) | Err                  │
//! │   set(key, value) ──► Ok(()) | Err          (overwrites)                │
//! │   remove(key)     ──► Ok(()) | Err          (absent key: Ok)            │
//! │                                                                         │
//! │   ┌──────────────────────────┐      ┌──────────────────────────┐       │
//! │   │ LocalStorageRepository   │      │ MemoryStore              │       │
//! │   │ SQLite `local_storage`   │      │ HashMap, process-local   │       │
//! │   └──────────────────────────┘      └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are plain strings, exactly as a browser's localStorage holds them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Keys the stores persist under.
pub mod keys {
    /// Active UI language code.
    pub const LANGUAGE: &str = "language";
    /// Cached seasonal theme flag, `"true"` or `"false"`.
    pub const CHRISTMAS_ENABLED: &str = "christmas_enabled";
    /// Bearer credential of the current session.
    pub const TOKEN: &str = "token";
}

/// String key/value storage that survives a restart.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove(&self, key: &str) -> StorageResult<()>;
}

// =============================================================================
// SQLite Implementation
// =============================================================================

/// Repository over the `local_storage` table.
#[derive(Debug, Clone)]
pub struct LocalStorageRepository {
    pool: SqlitePool,
}

impl LocalStorageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LocalStorageRepository { pool }
    }

    /// All stored keys, sorted. For diagnostics.
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl DurableStore for LocalStorageRepository {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM local_storage WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, "Writing local storage entry");

        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        debug!(key = %key, "Removing local storage entry");

        sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// Process-local store, for tests and the shell's ephemeral mode.
///
/// Can be switched to fail every operation, to exercise the stores'
/// degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MemoryStore {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.check()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.check()?;
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, StorageConfig};

    async fn sqlite_store() -> LocalStorageRepository {
        Database::open(StorageConfig::in_memory())
            .await
            .unwrap()
            .local_storage()
    }

    async fn exercise(store: &dyn DurableStore) {
        assert_eq!(store.get(keys::LANGUAGE).await.unwrap(), None);

        store.set(keys::LANGUAGE, "en").await.unwrap();
        assert_eq!(store.get(keys::LANGUAGE).await.unwrap().as_deref(), Some("en"));

        store.set(keys::LANGUAGE, "ar").await.unwrap();
        assert_eq!(store.get(keys::LANGUAGE).await.unwrap().as_deref(), Some("ar"));

        store.remove(keys::LANGUAGE).await.unwrap();
        assert_eq!(store.get(keys::LANGUAGE).await.unwrap(), None);

        // Removing an absent key is fine
        store.remove(keys::TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn test_sqlite_store_contract() {
        let store = sqlite_store().await;
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_memory_store_contract() {
        let store = MemoryStore::new();
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_keys_are_independent() {
        let store = sqlite_store().await;
        store.set(keys::TOKEN, "abc").await.unwrap();
        store.set(keys::CHRISTMAS_ENABLED, "true").await.unwrap();
        store.remove(keys::TOKEN).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec![keys::CHRISTMAS_ENABLED.to_string()]);
        assert_eq!(
            store.get(keys::CHRISTMAS_ENABLED).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_memory_store_failure_switch() {
        let store = MemoryStore::with_entries([(keys::LANGUAGE, "de")]);
        store.set_failing(true);

        assert!(matches!(store.get(keys::LANGUAGE).await, Err(StorageError::Unavailable(_))));
        assert!(store.set(keys::LANGUAGE, "en").await.is_err());

        store.set_failing(false);
        assert_eq!(store.get(keys::LANGUAGE).await.unwrap().as_deref(), Some("de"));
    }
}
