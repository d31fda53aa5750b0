// Books App - Book Search Core for Mobile
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Key-value storage backends
//!
//! Collections are stored whole, as one JSON array per key. The repositories
//! read the array, change it in memory and write it back; there are no partial
//! updates and no transactions spanning a read and the following write.

use crate::error::Result;
use crate::storage::database::Database;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key holding the favorites array
pub const FAVORITES_KEY: &str = "books-app-favorites";

/// Key holding the search-history array
pub const SEARCH_HISTORY_KEY: &str = "books-app-search-history";

/// String-keyed store of JSON blobs
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Outcome of decoding a stored collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionRead<T> {
    /// Key present and decoded
    Found(Vec<T>),
    /// Key never written (or removed)
    Missing,
    /// Key present but the blob does not decode
    Corrupt { reason: String },
}

impl<T> CollectionRead<T> {
    /// Items, with missing and corrupt both treated as empty
    pub fn into_items(self) -> Vec<T> {
        match self {
            CollectionRead::Found(items) => items,
            CollectionRead::Missing | CollectionRead::Corrupt { .. } => Vec::new(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, CollectionRead::Corrupt { .. })
    }
}

/// Read and decode the array stored under `key`
pub async fn read_collection<T>(store: &dyn KeyValueStore, key: &str) -> Result<CollectionRead<T>>
where
    T: DeserializeOwned,
{
    let raw = match store.get(key).await? {
        Some(raw) => raw,
        None => return Ok(CollectionRead::Missing),
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => Ok(CollectionRead::Found(items)),
        Err(e) => Ok(CollectionRead::Corrupt {
            reason: e.to_string(),
        }),
    }
}

/// Encode `items` and store them under `key`, replacing the previous array
pub async fn write_collection<T>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(items)?;
    store.set(key, &raw).await
}

// ============================================================================
// IN-MEMORY
// ============================================================================

/// Process-local store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| crate::error::BooksError::storage(format!("Memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

// ============================================================================
// SQLITE
// ============================================================================

/// Store backed by the `KeyValues` table
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM KeyValues WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO KeyValues (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM KeyValues WHERE key = ?")
            .bind(key)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::BooksError;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose next `get` can be made to fail once
    #[derive(Debug, Default)]
    pub(crate) struct FailingReadStore {
        pub(crate) inner: MemoryStore,
        fail_next_get: AtomicBool,
    }

    impl FailingReadStore {
        pub(crate) fn fail_next_get(&self) {
            self.fail_next_get.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl KeyValueStore for FailingReadStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_next_get.swap(false, Ordering::SeqCst) {
                return Err(BooksError::storage("database is locked"));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "[1,2]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[1,2]"));

        store.set("k", "[3]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[3]"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store() {
        exercise(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_sqlite_store() {
        let db = Database::new_in_memory().await.unwrap();
        exercise(&SqliteStore::new(db)).await;
    }

    #[tokio::test]
    async fn test_read_collection_outcomes() {
        let store = MemoryStore::new();

        let read: CollectionRead<u32> = read_collection(&store, "nums").await.unwrap();
        assert_eq!(read, CollectionRead::Missing);

        write_collection(&store, "nums", &[1u32, 2, 3]).await.unwrap();
        let read: CollectionRead<u32> = read_collection(&store, "nums").await.unwrap();
        assert_eq!(read, CollectionRead::Found(vec![1, 2, 3]));

        store.set("nums", "{not json").await.unwrap();
        let read: CollectionRead<u32> = read_collection(&store, "nums").await.unwrap();
        assert!(read.is_corrupt());
        assert!(read.into_items().is_empty());
    }
}
