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

//! Similar books for one seed
//!
//! Strategies run in order and stop once `limit` books are collected:
//!
//! | # | Query                         | Fetch | Take                  |
//! |---|-------------------------------|-------|-----------------------|
//! | 1 | `inauthor:"<first author>"`   | 10    | 2                     |
//! | 2 | `subject:"<first category>"`  | 10    | min(2, remaining)     |
//! | 3 | two title keywords, `OR`ed    | 10    | min(2, remaining)     |
//! | 4 | random popularity query       | 8     | remaining, rating ±1  |

use super::{Picks, Recommender};
use crate::api::BookCatalog;
use crate::storage::models::Book;
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

const STRATEGY_FETCH: u32 = 10;
const RATING_FETCH: u32 = 8;
const PER_STRATEGY: usize = 2;
const MAX_RATING_DIFF: f64 = 1.0;

const RATING_QUERIES: [&str; 3] = ["bestseller", "popular", "award winning"];

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("static regex");
}

/// Up to two lower-cased title words longer than three characters
pub fn title_keywords(title: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(&title.to_lowercase(), "").into_owned();
    cleaned
        .split(' ')
        .filter(|w| w.chars().count() > 3)
        .take(2)
        .map(str::to_string)
        .collect()
}

impl<C> Recommender<C>
where
    C: BookCatalog + ?Sized,
{
    /// Books related to `seed`, never including the seed itself
    pub async fn similar_books<R: Rng + ?Sized>(&self, seed: &Book, limit: usize, rng: &mut R) -> Vec<Book> {
        let mut picks = Picks::excluding([seed.id.clone()]);

        if limit == 0 {
            return Vec::new();
        }

        if let Some(author) = seed.authors.first() {
            let query = format!("inauthor:\"{}\"", author);
            self.run_strategy(&mut picks, "author", &query, STRATEGY_FETCH, PER_STRATEGY)
                .await;
        }

        if let Some(category) = seed.primary_category() {
            if picks.len() < limit {
                let query = format!("subject:\"{}\"", category);
                let max = PER_STRATEGY.min(limit - picks.len());
                self.run_strategy(&mut picks, "category", &query, STRATEGY_FETCH, max)
                    .await;
            }
        }

        if picks.len() < limit {
            let keywords = title_keywords(&seed.title);
            if !keywords.is_empty() {
                let query = keywords.join(" OR ");
                let max = PER_STRATEGY.min(limit - picks.len());
                self.run_strategy(&mut picks, "title keywords", &query, STRATEGY_FETCH, max)
                    .await;
            }
        }

        if picks.len() < limit {
            if let Some(seed_rating) = seed.rating() {
                self.rating_strategy(&mut picks, seed_rating, limit, rng).await;
            }
        }

        tracing::debug!(seed = %seed.id, found = picks.len(), limit, "Similar books collected");
        picks.finish(limit, rng)
    }

    async fn run_strategy(&self, picks: &mut Picks, strategy: &str, query: &str, fetch: u32, max: usize) {
        match self.catalog.search(query, fetch).await {
            Ok(candidates) => {
                let taken = picks.take_from(candidates, max);
                tracing::debug!(strategy, query, taken, "Similar-books strategy done");
            }
            Err(e) => {
                tracing::warn!(strategy, query, error = %e, "Similar-books strategy failed, skipping");
            }
        }
    }

    async fn rating_strategy<R: Rng + ?Sized>(&self, picks: &mut Picks, seed_rating: f64, limit: usize, rng: &mut R) {
        let query = match RATING_QUERIES.choose(rng) {
            Some(q) => *q,
            None => return,
        };

        match self.catalog.search(query, RATING_FETCH).await {
            Ok(candidates) => {
                let in_band = candidates.into_iter().filter(|b| match b.rating() {
                    Some(r) => (r - seed_rating).abs() <= MAX_RATING_DIFF,
                    None => true,
                });
                let taken = picks.take_from(in_band, limit - picks.len());
                tracing::debug!(strategy = "rating", query, taken, "Similar-books strategy done");
            }
            Err(e) => {
                tracing::warn!(strategy = "rating", query, error = %e, "Similar-books strategy failed, skipping");
            }
        }
    }
}
