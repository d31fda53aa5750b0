//! Data models for the Books core
//!
//! These are the canonical records shared by the catalog client, the
//! persistence layer, the recommendation heuristic and the bridges.
//!
//! # JSON Shape
//! Field names are camelCase so the persisted blobs stay readable by the app
//! builds that wrote them before this core existed:
//! - `Book` optional fields are omitted when absent
//! - `FavoriteBook` is a `Book` with `addedAt` next to the book fields
//! - Timestamps are ISO 8601 strings (`DateTime<Utc>`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used when the catalog record has none
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author used when the catalog record lists none
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

// ============================================================================
// BOOK
// ============================================================================

/// Canonical book record
///
/// Built once by the catalog client and never mutated afterwards.
/// `authors` is never empty and `thumbnail`, when present, is an https URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalog volume id
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl Book {
    /// Create a book with only the required fields set
    ///
    /// An empty author list gets the `Unknown Author` placeholder.
    pub fn new<I: Into<String>, T: Into<String>>(id: I, title: T, authors: Vec<String>) -> Self {
        let authors = if authors.is_empty() {
            vec![UNKNOWN_AUTHOR.to_string()]
        } else {
            authors
        };

        Self {
            id: id.into(),
            title: title.into(),
            authors,
            description: None,
            published_date: None,
            page_count: None,
            categories: None,
            average_rating: None,
            thumbnail: None,
            language: None,
            publisher: None,
        }
    }

    /// First listed author (always present for normalized books)
    pub fn primary_author(&self) -> &str {
        self.authors
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    /// First listed category, if any
    pub fn primary_category(&self) -> Option<&str> {
        self.categories
            .as_ref()
            .and_then(|c| c.first())
            .map(String::as_str)
    }

    /// Rating usable for comparisons (a zero rating counts as unrated)
    pub fn rating(&self) -> Option<f64> {
        self.average_rating.filter(|r| *r > 0.0)
    }

    /// Authors joined for display ("A, B")
    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

// ============================================================================
// FAVORITES
// ============================================================================

/// A book saved locally as a favorite
///
/// Created when added, removed by id, never otherwise changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBook {
    #[serde(flatten)]
    pub book: Book,
    /// When the book was added to favorites
    pub added_at: DateTime<Utc>,
}

impl FavoriteBook {
    pub fn new(book: Book, added_at: DateTime<Utc>) -> Self {
        Self { book, added_at }
    }

    pub fn id(&self) -> &str {
        &self.book.id
    }
}

// ============================================================================
// SEARCH HISTORY
// ============================================================================

/// One executed search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    /// Time-derived token (epoch milliseconds), unique within the history
    pub id: String,
    /// Trimmed query in the casing the user typed
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub results_count: u32,
}

impl SearchHistoryItem {
    /// Lower-cased query used for duplicate detection
    pub fn normalized_query(&self) -> String {
        self.query.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_book_json_is_camel_case_and_skips_absent_fields() {
        let mut book = Book::new("vol1", "Dune", vec!["Frank Herbert".to_string()]);
        book.page_count = Some(412);
        book.average_rating = Some(4.5);

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["pageCount"], 412);
        assert_eq!(json["averageRating"], 4.5);
        assert!(json.get("description").is_none());
        assert!(json.get("publishedDate").is_none());
    }

    #[test]
    fn test_book_new_fills_author_placeholder() {
        let book = Book::new("x", "Anon", vec![]);
        assert_eq!(book.authors, vec![UNKNOWN_AUTHOR.to_string()]);
        assert_eq!(book.primary_author(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_zero_rating_counts_as_unrated() {
        let mut book = Book::new("x", "T", vec!["A".into()]);
        book.average_rating = Some(0.0);
        assert_eq!(book.rating(), None);
        book.average_rating = Some(3.5);
        assert_eq!(book.rating(), Some(3.5));
    }

    #[test]
    fn test_favorite_book_reads_legacy_blob() {
        // Shape written by the web build: book fields plus addedAt, millisecond precision
        let raw = r#"{
            "id": "zyTCAlFPjgYC",
            "title": "The Google Story",
            "authors": ["David A. Vise", "Mark Malseed"],
            "pageCount": 207,
            "categories": ["Browsers (Computer programs)"],
            "thumbnail": "https://books.google.com/thumb.jpg",
            "addedAt": "2024-03-01T10:15:30.123Z"
        }"#;

        let fav: FavoriteBook = serde_json::from_str(raw).unwrap();
        assert_eq!(fav.id(), "zyTCAlFPjgYC");
        assert_eq!(fav.book.authors.len(), 2);
        assert_eq!(fav.book.page_count, Some(207));
        assert_eq!(
            fav.added_at,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap()
                + chrono::Duration::milliseconds(123)
        );

        let back = serde_json::to_value(&fav).unwrap();
        assert!(back.get("addedAt").is_some());
        assert!(back.get("book").is_none());
    }

    #[test]
    fn test_search_history_item_json() {
        let item = SearchHistoryItem {
            id: "1700000000000".to_string(),
            query: "Rust Programming".to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap(),
            results_count: 20,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["resultsCount"], 20);
        assert_eq!(item.normalized_query(), "rust programming");
    }
}
