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

//! Search history repository
//!
//! Distinct queries (case-insensitive), newest first, at most
//! [`MAX_HISTORY_ITEMS`] entries. Re-running a query moves it to the front
//! with the casing used the second time.

use crate::error::Result;
use crate::storage::models::SearchHistoryItem;
use crate::storage::store::{
    read_collection, write_collection, CollectionRead, KeyValueStore, SEARCH_HISTORY_KEY,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const MAX_HISTORY_ITEMS: usize = 20;

/// Queries shorter than this (after trimming) are not recorded
pub const MIN_QUERY_LEN: usize = 2;

const POPULAR_SEARCHES: [&str; 10] = [
    "science fiction",
    "mystery thriller",
    "romance novels",
    "fantasy adventure",
    "biography",
    "self help",
    "programming",
    "history",
    "psychology",
    "cooking recipes",
];

#[derive(Clone)]
pub struct SearchHistoryRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Raw read of the history blob, in stored order
    pub async fn load(&self) -> Result<CollectionRead<SearchHistoryItem>> {
        read_collection(self.store.as_ref(), SEARCH_HISTORY_KEY).await
    }

    /// History sorted newest first; never fails
    pub async fn get_search_history(&self) -> Vec<SearchHistoryItem> {
        let mut history = match self.load().await {
            Ok(CollectionRead::Corrupt { reason }) => {
                tracing::warn!(key = SEARCH_HISTORY_KEY, %reason, "Stored search history is corrupt, treating as empty");
                Vec::new()
            }
            Ok(read) => read.into_items(),
            Err(e) => {
                tracing::warn!(key = SEARCH_HISTORY_KEY, error = %e, "Failed to read search history");
                Vec::new()
            }
        };

        newest_first(&mut history);
        history
    }

    /// Current history for a read-modify-write; a failed read aborts the write
    ///
    /// A corrupt blob counts as empty so the next write replaces it.
    async fn load_for_update(&self) -> Result<Vec<SearchHistoryItem>> {
        let read = self.load().await?;
        if let CollectionRead::Corrupt { reason } = &read {
            tracing::warn!(key = SEARCH_HISTORY_KEY, %reason, "Overwriting corrupt search history");
        }
        let mut history = read.into_items();
        newest_first(&mut history);
        Ok(history)
    }

    /// Record an executed search
    ///
    /// Returns `Ok(None)` when the query is too short to record.
    pub async fn add_to_search_history(
        &self,
        query: &str,
        results_count: u32,
    ) -> Result<Option<SearchHistoryItem>> {
        self.add_to_search_history_at(query, results_count, Utc::now()).await
    }

    /// Same as [`add_to_search_history`](Self::add_to_search_history) with an explicit timestamp
    pub async fn add_to_search_history_at(
        &self,
        query: &str,
        results_count: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchHistoryItem>> {
        let trimmed = query.trim();
        let normalized = trimmed.to_lowercase();
        if normalized.chars().count() < MIN_QUERY_LEN {
            tracing::debug!(query, "Query too short for search history");
            return Ok(None);
        }

        let mut history = self.load_for_update().await?;
        history.retain(|item| item.normalized_query() != normalized);

        let item = SearchHistoryItem {
            id: unique_id(&history, now),
            query: trimmed.to_string(),
            timestamp: now,
            results_count,
        };

        history.insert(0, item.clone());
        history.truncate(MAX_HISTORY_ITEMS);
        write_collection(self.store.as_ref(), SEARCH_HISTORY_KEY, &history).await?;

        tracing::debug!(query = trimmed, results_count, "Recorded search");
        Ok(Some(item))
    }

    /// Remove one entry; absent ids are not an error
    pub async fn remove_from_search_history(&self, id: &str) -> Result<()> {
        let mut history = self.load_for_update().await?;
        history.retain(|item| item.id != id);
        write_collection(self.store.as_ref(), SEARCH_HISTORY_KEY, &history).await
    }

    /// Drop the whole history
    pub async fn clear_search_history(&self) -> Result<()> {
        self.store.remove(SEARCH_HISTORY_KEY).await?;
        tracing::info!("Cleared search history");
        Ok(())
    }

    /// Fixed suggestions shown when the history is empty
    pub fn popular_searches() -> Vec<String> {
        POPULAR_SEARCHES.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Debug for SearchHistoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistoryRepository").finish_non_exhaustive()
    }
}

/// Stable: equal timestamps keep stored (newest-first) order
fn newest_first(history: &mut [SearchHistoryItem]) {
    history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Epoch milliseconds, bumped past any id already in use
fn unique_id(history: &[SearchHistoryItem], now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !history.iter().any(|item| item.id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}
