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

//! Recommendations from a set of favorite books

use super::{Picks, Recommender};
use crate::api::BookCatalog;
use crate::storage::models::Book;
use rand::seq::SliceRandom;
use rand::Rng;

const TRENDING_QUERIES: [&str; 3] = ["bestseller 2024", "popular fiction", "award winning books"];

const TOP_N: usize = 3;
const PER_QUERY_FETCH: u32 = 5;
const PER_QUERY_TAKE: usize = 2;

/// Distinct values in first-seen order
fn distinct<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen: Vec<&str> = Vec::new();
    for v in values {
        if !seen.contains(&v.as_str()) {
            seen.push(v.as_str());
        }
    }
    seen
}

impl<C> Recommender<C>
where
    C: BookCatalog + ?Sized,
{
    /// Books the user may like given their favorites
    ///
    /// With no favorites, returns one random trending search instead.
    pub async fn recommended_books<R: Rng + ?Sized>(&self, favorites: &[Book], limit: usize, rng: &mut R) -> Vec<Book> {
        if limit == 0 {
            return Vec::new();
        }

        if favorites.is_empty() {
            return self.trending(limit, rng).await;
        }

        let mut picks = Picks::excluding(favorites.iter().map(|b| b.id.clone()));

        let authors = distinct(favorites.iter().flat_map(|b| b.authors.iter()));
        let categories = distinct(
            favorites
                .iter()
                .filter_map(|b| b.categories.as_ref())
                .flatten(),
        );

        let queries = authors
            .iter()
            .take(TOP_N)
            .map(|a| format!("inauthor:\"{}\"", a))
            .chain(categories.iter().take(TOP_N).map(|c| format!("subject:\"{}\"", c)));

        for query in queries {
            if picks.len() >= limit {
                break;
            }

            match self.catalog.search(&query, PER_QUERY_FETCH).await {
                Ok(candidates) => {
                    picks.take_from(candidates, PER_QUERY_TAKE);
                }
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "Recommendation query failed, skipping");
                }
            }
        }

        tracing::debug!(favorites = favorites.len(), found = picks.len(), limit, "Recommendations collected");
        picks.finish(limit, rng)
    }

    async fn trending<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Book> {
        let query = match TRENDING_QUERIES.choose(rng) {
            Some(q) => *q,
            None => return Vec::new(),
        };

        let fetch = u32::try_from(limit).unwrap_or(u32::MAX);
        match self.catalog.search(query, fetch).await {
            Ok(books) => books,
            Err(e) => {
                tracing::error!(query, error = %e, "Trending books query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::test_support::{books, FakeCatalog};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn favorite(id: &str, authors: &[&str], categories: &[&str]) -> Book {
        let mut book = Book::new(id, id, authors.iter().map(|a| a.to_string()).collect());
        if !categories.is_empty() {
            book.categories = Some(categories.iter().map(|c| c.to_string()).collect());
        }
        book
    }

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let values: Vec<String> = ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(distinct(values.iter()), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_no_favorites_uses_trending() {
        let catalog = FakeCatalog::default()
            .with("bestseller 2024", books("t", 12))
            .with("popular fiction", books("t", 12))
            .with("award winning books", books("t", 12));
        let recommender = Recommender::new(Arc::new(catalog));

        let result = recommender
            .recommended_books(&[], 10, &mut StdRng::seed_from_u64(1))
            .await;
        assert_eq!(result.len(), 10);

        let calls = recommender.catalog().calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert!(TRENDING_QUERIES.contains(&calls[0].0.as_str()));
        assert_eq!(calls[0].1, 10);
    }

    #[tokio::test]
    async fn test_trending_failure_is_empty() {
        let catalog = FakeCatalog::default()
            .failing_on("bestseller 2024")
            .failing_on("popular fiction")
            .failing_on("award winning books");
        let recommender = Recommender::new(Arc::new(catalog));

        let result = recommender
            .recommended_books(&[], 10, &mut StdRng::seed_from_u64(1))
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_queries_top_three_authors_then_categories() {
        let favorites = vec![
            favorite("f1", &["A1", "A2"], &["C1"]),
            favorite("f2", &["A2", "A3", "A4"], &["C2", "C3", "C4"]),
        ];
        let recommender = Recommender::new(Arc::new(FakeCatalog::default()));

        let result = recommender
            .recommended_books(&favorites, 10, &mut StdRng::seed_from_u64(3))
            .await;
        assert!(result.is_empty());

        assert_eq!(
            recommender.catalog().queries(),
            vec![
                "inauthor:\"A1\"",
                "inauthor:\"A2\"",
                "inauthor:\"A3\"",
                "subject:\"C1\"",
                "subject:\"C2\"",
                "subject:\"C3\"",
            ]
        );
    }

    #[tokio::test]
    async fn test_excludes_favorites_and_duplicates() {
        let favorites = vec![favorite("fav", &["Ann"], &["Poetry"])];

        let mut by_author = books("x", 3);
        by_author.insert(0, favorites[0].clone());
        let catalog = FakeCatalog::default()
            .with("inauthor:\"Ann\"", by_author.clone())
            .with("subject:\"Poetry\"", by_author);
        let recommender = Recommender::new(Arc::new(catalog));

        let result = recommender
            .recommended_books(&favorites, 10, &mut StdRng::seed_from_u64(5))
            .await;

        let ids: HashSet<&str> = result.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), result.len());
        assert!(!ids.contains("fav"));
        // x-0, x-1 from the author query, x-2 from the category query
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_stops_once_limit_reached() {
        let favorites = vec![favorite("fav", &["A", "B", "C"], &[])];
        let catalog = FakeCatalog::default()
            .with("inauthor:\"A\"", books("a", 5))
            .with("inauthor:\"B\"", books("b", 5))
            .with("inauthor:\"C\"", books("c", 5));
        let recommender = Recommender::new(Arc::new(catalog));

        let result = recommender
            .recommended_books(&favorites, 3, &mut StdRng::seed_from_u64(9))
            .await;

        assert_eq!(result.len(), 3);
        assert_eq!(recommender.catalog().queries().len(), 2);
    }
}
