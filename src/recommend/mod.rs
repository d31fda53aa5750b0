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

//! Book recommendations
//!
//! Two entry points built from plain catalog searches:
//! - [`Recommender::similar_books`]: books related to one seed book
//!   (same author, same category, title keywords, popular titles in a
//!   similar rating band)
//! - [`Recommender::recommended_books`]: books related to the user's
//!   favorites, or trending titles when there are none
//!
//! Every catalog failure is logged and skipped; the worst case is an empty
//! list. Results are shuffled, not ranked. Randomness is passed in so tests
//! can use a seeded generator.

mod favorites;
mod similar;

use crate::api::BookCatalog;
use crate::storage::models::Book;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

pub use similar::title_keywords;

/// Recommendation engine over any [`BookCatalog`]
pub struct Recommender<C: ?Sized> {
    catalog: Arc<C>,
}

impl<C: ?Sized> Clone for Recommender<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<C> Recommender<C>
where
    C: BookCatalog + ?Sized,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// [`similar_books`](Self::similar_books) with an entropy-seeded generator
    pub async fn similar_books_random(&self, seed: &Book, limit: usize) -> Vec<Book> {
        let mut rng = StdRng::from_entropy();
        self.similar_books(seed, limit, &mut rng).await
    }

    /// [`recommended_books`](Self::recommended_books) with an entropy-seeded generator
    pub async fn recommended_books_random(&self, favorites: &[Book], limit: usize) -> Vec<Book> {
        let mut rng = StdRng::from_entropy();
        self.recommended_books(favorites, limit, &mut rng).await
    }
}

/// Books gathered so far plus every id that must not be added again
struct Picks {
    books: Vec<Book>,
    used: HashSet<String>,
}

impl Picks {
    fn excluding<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            books: Vec::new(),
            used: ids.into_iter().map(Into::into).collect(),
        }
    }

    fn len(&self) -> usize {
        self.books.len()
    }

    /// Take up to `max` unused books from `candidates`, returning how many were taken
    fn take_from<I>(&mut self, candidates: I, max: usize) -> usize
    where
        I: IntoIterator<Item = Book>,
    {
        let mut taken = 0;
        for book in candidates {
            if taken >= max {
                break;
            }
            if self.used.insert(book.id.clone()) {
                self.books.push(book);
                taken += 1;
            }
        }
        taken
    }

    /// Uniform shuffle, then cut to `limit`
    fn finish<R: Rng + ?Sized>(self, limit: usize, rng: &mut R) -> Vec<Book> {
        let mut books = self.books;
        books.shuffle(rng);
        books.truncate(limit);
        books
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::api::BookCatalog;
    use crate::error::{BooksError, Result};
    use crate::storage::models::Book;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Catalog double answering fixed results per exact query
    #[derive(Default)]
    pub struct FakeCatalog {
        pub responses: HashMap<String, Vec<Book>>,
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<(String, u32)>>,
    }

    impl FakeCatalog {
        pub fn with(mut self, query: &str, books: Vec<Book>) -> Self {
            self.responses.insert(query.to_string(), books);
            self
        }

        pub fn failing_on(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        pub fn queries(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(q, _)| q.clone()).collect()
        }
    }

    #[async_trait]
    impl BookCatalog for FakeCatalog {
        async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Book>> {
            self.calls.lock().unwrap().push((query.to_string(), max_results));
            if self.failing.iter().any(|q| q == query) {
                return Err(BooksError::search_failed("stubbed failure", Some(500)));
            }
            let mut books = self.responses.get(query).cloned().unwrap_or_default();
            books.truncate(max_results as usize);
            Ok(books)
        }

        async fn lookup(&self, id: &str) -> Result<Option<Book>> {
            Ok(self
                .responses
                .values()
                .flatten()
                .find(|b| b.id == id)
                .cloned())
        }
    }

    pub fn books(prefix: &str, n: usize) -> Vec<Book> {
        (0..n)
            .map(|i| Book::new(format!("{}-{}", prefix, i), format!("{} {}", prefix, i), vec!["Someone".to_string()]))
            .collect()
    }
}
