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

//! Local persistence
//!
//! Two independent collections, favorites and search history, each stored
//! as one JSON array behind a [`KeyValueStore`]. The repositories take the
//! store as an injected `Arc<dyn KeyValueStore>`; production uses
//! [`SqliteStore`], tests use [`MemoryStore`].
//!
//! # Usage Example
//! ```no_run
//! use books_core::storage::{Database, FavoritesRepository, SqliteStore};
//! use books_core::storage::models::Book;
//! use std::sync::Arc;
//!
//! # async fn example() -> books_core::error::Result<()> {
//! let db = Database::new("./books.db").await?;
//! let favorites = FavoritesRepository::new(Arc::new(SqliteStore::new(db)));
//!
//! let book = Book::new("zyTCAlFPjgYC", "The Google Story", vec!["David A. Vise".into()]);
//! favorites.add_to_favorites(&book).await?;
//! assert!(favorites.is_book_in_favorites("zyTCAlFPjgYC").await);
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod favorites;
pub mod history;
pub mod migrations;
pub mod models;
pub mod store;

pub use database::Database;
pub use favorites::FavoritesRepository;
pub use history::{SearchHistoryRepository, MAX_HISTORY_ITEMS};
pub use models::{Book, FavoriteBook, SearchHistoryItem};
pub use store::{
    CollectionRead, KeyValueStore, MemoryStore, SqliteStore, FAVORITES_KEY, SEARCH_HISTORY_KEY,
};
