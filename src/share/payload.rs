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

//! Share text and link composition

use crate::storage::models::Book;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const HASHTAGS: &str = "#BooksApp #Reading #BookRecommendation";
pub const FALLBACK_DESCRIPTION: &str = "Great book recommendation!";

/// Description length in the share-sheet text
pub const SHARE_DESCRIPTION_CHARS: usize = 200;

const SEARCH_URL: &str = "https://www.google.com/search?q=";

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").expect("static regex");
}

/// What the native share surface receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// First `max_chars` characters of the description, tags stripped, with `...`
///
/// Falls back to a fixed line when the book has no description.
pub fn description_excerpt(book: &Book, max_chars: usize) -> String {
    match book.description.as_deref() {
        Some(desc) if !desc.is_empty() => {
            let head: String = desc.chars().take(max_chars).collect();
            format!("{}...", HTML_TAG.replace_all(&head, ""))
        }
        _ => FALLBACK_DESCRIPTION.to_string(),
    }
}

/// `"<title>" by <authors>` line used in share texts
pub fn title_line(book: &Book) -> String {
    format!("\"{}\" by {}", book.title, book.authors_display())
}

/// Text shown in the share sheet
pub fn share_text(book: &Book) -> String {
    format!(
        "📚 Check out this book: {}\n  \n{}\n\n{}",
        title_line(book),
        description_excerpt(book, SHARE_DESCRIPTION_CHARS),
        HASHTAGS
    )
}

/// Web search for the book's title and first author
pub fn search_link(book: &Book) -> String {
    let terms = format!("{} {} book", book.title, book.primary_author());
    format!("{}{}", SEARCH_URL, urlencoding::encode(&terms))
}

pub fn build_share_payload(book: &Book) -> SharePayload {
    SharePayload {
        title: format!("📚 {}", book.title),
        text: share_text(book),
        url: search_link(book),
    }
}

/// Text copied when no share sheet is available
pub fn clipboard_text(payload: &SharePayload) -> String {
    format!("{}\n\nMore info: {}", payload.text, payload.url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        let mut book = Book::new(
            "id1",
            "Dune",
            vec!["Frank Herbert".to_string(), "Brian Herbert".to_string()],
        );
        book.description = Some("<p>A <b>desert</b> planet.</p>".to_string());
        book
    }

    #[test]
    fn test_share_text_layout() {
        let text = share_text(&book());
        assert_eq!(
            text,
            "📚 Check out this book: \"Dune\" by Frank Herbert, Brian Herbert\n  \nA desert planet....\n\n#BooksApp #Reading #BookRecommendation"
        );
    }

    #[test]
    fn test_missing_description_uses_fallback() {
        let mut b = book();
        b.description = None;
        assert!(share_text(&b).contains("\n  \nGreat book recommendation!\n\n"));
    }

    #[test]
    fn test_description_truncated_to_char_count() {
        let mut b = book();
        b.description = Some("ä".repeat(500));
        let excerpt = description_excerpt(&b, SHARE_DESCRIPTION_CHARS);
        assert_eq!(excerpt.chars().count(), SHARE_DESCRIPTION_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_search_link_encodes_terms() {
        assert_eq!(
            search_link(&book()),
            "https://www.google.com/search?q=Dune%20Frank%20Herbert%20book"
        );
    }

    #[test]
    fn test_payload_and_clipboard_text() {
        let payload = build_share_payload(&book());
        assert_eq!(payload.title, "📚 Dune");
        assert_eq!(payload.url, search_link(&book()));

        let clip = clipboard_text(&payload);
        assert!(clip.starts_with(&payload.text));
        assert!(clip.ends_with(&format!("\n\nMore info: {}", payload.url)));
    }
}
