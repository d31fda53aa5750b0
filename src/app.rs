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

//! Application facade
//!
//! `BooksApp` wires the catalog client, both repositories and the
//! recommender together and exposes the operations behind the app's
//! screens (search, details, favorites). The bridges and the CLI talk to
//! this type only.

use crate::api::{BookCatalog, CatalogClient};
use crate::config::AppConfig;
use crate::error::{BooksError, Result};
use crate::recommend::Recommender;
use crate::share::{self, SharePayload, SocialPlatform};
use crate::storage::{
    Database, FavoriteBook, FavoritesRepository, KeyValueStore, SearchHistoryItem,
    SearchHistoryRepository, SqliteStore,
};
use crate::storage::models::Book;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;

pub struct BooksApp {
    config: AppConfig,
    catalog: Arc<dyn BookCatalog>,
    favorites: FavoritesRepository,
    history: SearchHistoryRepository,
    recommender: Recommender<dyn BookCatalog>,
}

impl BooksApp {
    /// HTTP catalog plus SQLite storage at the configured (or default) path
    pub async fn open(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let catalog = CatalogClient::new(config.client_config())?;
        let path = config
            .database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(Database::get_default_path);
        let db = Database::new(&path).await?;

        tracing::info!(catalog = %config.catalog_base_url, db = %path.display(), "Books core ready");
        Ok(Self::with_parts(Arc::new(catalog), Arc::new(SqliteStore::new(db)), config))
    }

    /// Assemble from explicit parts (tests, alternative backends)
    pub fn with_parts(catalog: Arc<dyn BookCatalog>, store: Arc<dyn KeyValueStore>, config: AppConfig) -> Self {
        Self {
            favorites: FavoritesRepository::new(Arc::clone(&store)),
            history: SearchHistoryRepository::new(store),
            recommender: Recommender::new(Arc::clone(&catalog)),
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn favorites_repository(&self) -> &FavoritesRepository {
        &self.favorites
    }

    pub fn history_repository(&self) -> &SearchHistoryRepository {
        &self.history
    }

    // ========================================================================
    // SEARCH / DETAILS
    // ========================================================================

    /// Run a search from the search screen and record it in the history
    ///
    /// # Errors
    /// `InvalidInput` for a blank query, `SearchFailed` from the catalog.
    /// History write failures are logged only.
    pub async fn search(&self, query: &str) -> Result<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(BooksError::invalid_input("Please enter a search term"));
        }

        let books = self
            .catalog
            .search(query, self.config.default_max_results)
            .await?;

        let count = u32::try_from(books.len()).unwrap_or(u32::MAX);
        if let Err(e) = self.history.add_to_search_history(query, count).await {
            tracing::warn!(query, error = %e, "Failed to record search history");
        }

        Ok(books)
    }

    pub async fn get_book(&self, id: &str) -> Result<Option<Book>> {
        self.catalog.lookup(id).await
    }

    /// Like [`get_book`](Self::get_book) but an unknown id is an error
    pub async fn require_book(&self, id: &str) -> Result<Book> {
        self.get_book(id)
            .await?
            .ok_or_else(|| BooksError::not_found(format!("book {}", id)))
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    pub async fn favorites(&self) -> Vec<FavoriteBook> {
        self.favorites.get_favorites().await
    }

    pub async fn favorites_by_recent(&self) -> Vec<FavoriteBook> {
        self.favorites.get_favorites_by_recent().await
    }

    pub async fn add_favorite(&self, book: &Book) -> Result<FavoriteBook> {
        self.favorites.add_to_favorites(book).await
    }

    /// Look the book up in the catalog, then store it as a favorite
    pub async fn add_favorite_by_id(&self, id: &str) -> Result<FavoriteBook> {
        let book = self.require_book(id).await?;
        self.favorites.add_to_favorites(&book).await
    }

    pub async fn remove_favorite(&self, id: &str) -> Result<()> {
        self.favorites.remove_from_favorites(id).await
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_book_in_favorites(id).await
    }

    pub async fn toggle_favorite(&self, book: &Book) -> Result<bool> {
        self.favorites.toggle_favorite(book).await
    }

    // ========================================================================
    // SEARCH HISTORY
    // ========================================================================

    pub async fn search_history(&self) -> Vec<SearchHistoryItem> {
        self.history.get_search_history().await
    }

    pub async fn record_search(&self, query: &str, results_count: u32) -> Result<Option<SearchHistoryItem>> {
        self.history.add_to_search_history(query, results_count).await
    }

    pub async fn remove_history_item(&self, id: &str) -> Result<()> {
        self.history.remove_from_search_history(id).await
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear_search_history().await
    }

    pub fn popular_searches(&self) -> Vec<String> {
        SearchHistoryRepository::popular_searches()
    }

    // ========================================================================
    // RECOMMENDATIONS
    // ========================================================================

    /// Similar books for the details screen, `similar_limit` at most
    pub async fn similar_books(&self, seed: &Book) -> Vec<Book> {
        self.recommender
            .similar_books_random(seed, self.config.similar_limit)
            .await
    }

    pub async fn similar_books_with<R: Rng + ?Sized>(&self, seed: &Book, limit: usize, rng: &mut R) -> Vec<Book> {
        self.recommender.similar_books(seed, limit, rng).await
    }

    /// Recommendations built from the stored favorites
    pub async fn recommended_for_favorites(&self) -> Vec<Book> {
        let favorites = self.favorite_books().await;
        self.recommender
            .recommended_books_random(&favorites, self.config.recommended_limit)
            .await
    }

    pub async fn recommended_for_favorites_with<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Book> {
        let favorites = self.favorite_books().await;
        self.recommender.recommended_books(&favorites, limit, rng).await
    }

    async fn favorite_books(&self) -> Vec<Book> {
        self.favorites
            .get_favorites()
            .await
            .into_iter()
            .map(|f| f.book)
            .collect()
    }

    // ========================================================================
    // SHARING
    // ========================================================================

    pub fn share_payload(&self, book: &Book) -> SharePayload {
        share::build_share_payload(book)
    }

    pub fn social_share_url(&self, book: &Book, platform: SocialPlatform) -> String {
        share::social_share_url(book, platform)
    }
}

impl std::fmt::Debug for BooksApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BooksApp")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
