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

//! Favorites repository
//!
//! Favorites are kept in insertion order under [`FAVORITES_KEY`]. Reads that
//! hit a missing or corrupt blob degrade to an empty list; [`FavoritesRepository::load`]
//! exposes which of the two happened.

use crate::error::{BooksError, Result};
use crate::storage::models::{Book, FavoriteBook};
use crate::storage::store::{read_collection, write_collection, CollectionRead, KeyValueStore, FAVORITES_KEY};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct FavoritesRepository {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Raw read of the favorites blob
    pub async fn load(&self) -> Result<CollectionRead<FavoriteBook>> {
        read_collection(self.store.as_ref(), FAVORITES_KEY).await
    }

    /// All favorites in insertion order; never fails
    pub async fn get_favorites(&self) -> Vec<FavoriteBook> {
        match self.load().await {
            Ok(CollectionRead::Corrupt { reason }) => {
                tracing::warn!(key = FAVORITES_KEY, %reason, "Stored favorites are corrupt, treating as empty");
                Vec::new()
            }
            Ok(read) => read.into_items(),
            Err(e) => {
                tracing::warn!(key = FAVORITES_KEY, error = %e, "Failed to read favorites");
                Vec::new()
            }
        }
    }

    /// Current list for a read-modify-write; a failed read aborts the write
    ///
    /// A corrupt blob counts as empty so the next write replaces it.
    async fn load_for_update(&self) -> Result<Vec<FavoriteBook>> {
        let read = self.load().await?;
        if let CollectionRead::Corrupt { reason } = &read {
            tracing::warn!(key = FAVORITES_KEY, %reason, "Overwriting corrupt favorites");
        }
        Ok(read.into_items())
    }

    /// Favorites newest first
    pub async fn get_favorites_by_recent(&self) -> Vec<FavoriteBook> {
        let mut favorites = self.get_favorites().await;
        favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        favorites
    }

    /// Store `book` as a favorite stamped with the current time
    ///
    /// # Errors
    /// `DuplicateFavorite` if a favorite with the same id exists; the
    /// collection is left untouched in that case.
    pub async fn add_to_favorites(&self, book: &Book) -> Result<FavoriteBook> {
        self.add_to_favorites_at(book, Utc::now()).await
    }

    /// Same as [`add_to_favorites`](Self::add_to_favorites) with an explicit timestamp
    pub async fn add_to_favorites_at(&self, book: &Book, added_at: DateTime<Utc>) -> Result<FavoriteBook> {
        let mut favorites = self.load_for_update().await?;

        if favorites.iter().any(|f| f.id() == book.id) {
            return Err(BooksError::DuplicateFavorite {
                book_id: book.id.clone(),
            });
        }

        let favorite = FavoriteBook::new(book.clone(), added_at);
        favorites.push(favorite.clone());
        write_collection(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;

        tracing::info!(book_id = %book.id, count = favorites.len(), "Added favorite");
        Ok(favorite)
    }

    /// Remove a favorite by id; absent ids are not an error
    pub async fn remove_from_favorites(&self, book_id: &str) -> Result<()> {
        let mut favorites = self.load_for_update().await?;
        favorites.retain(|f| f.id() != book_id);
        write_collection(self.store.as_ref(), FAVORITES_KEY, &favorites).await?;

        tracing::info!(book_id, count = favorites.len(), "Removed favorite");
        Ok(())
    }

    /// Existence check; any read failure reports `false`
    pub async fn is_book_in_favorites(&self, book_id: &str) -> bool {
        match self.load().await {
            Ok(CollectionRead::Found(favorites)) => favorites.iter().any(|f| f.id() == book_id),
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(book_id, error = %e, "Favorite check failed");
                false
            }
        }
    }

    /// Add the book if absent, remove it if present
    ///
    /// Returns whether the book is a favorite afterwards.
    pub async fn toggle_favorite(&self, book: &Book) -> Result<bool> {
        if self.is_book_in_favorites(&book.id).await {
            self.remove_from_favorites(&book.id).await?;
            Ok(false)
        } else {
            self.add_to_favorites(book).await?;
            Ok(true)
        }
    }
}

impl std::fmt::Debug for FavoritesRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesRepository").finish_non_exhaustive()
    }
}
