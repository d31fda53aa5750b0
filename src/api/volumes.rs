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

//! Catalog wire types and normalization
//!
//! # Endpoints
//! - `GET {base}/volumes?q={query}&maxResults={n}` → [`VolumesResponse`]
//! - `GET {base}/volumes/{id}` → [`VolumeItem`]
//!
//! Every upstream field is optional; [`VolumeItem::into_book`] maps one item
//! onto the canonical [`Book`]:
//! - missing or empty `title` → `"Unknown Title"`
//! - missing or empty `authors` → `["Unknown Author"]`
//! - `imageLinks.thumbnail` is preferred over `imageLinks.smallThumbnail`
//! - `http://` thumbnails are rewritten to `https://`

use crate::storage::models::{Book, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use serde::{Deserialize, Serialize};

/// Response of the search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    /// Absent when nothing matched
    #[serde(default)]
    pub items: Option<Vec<VolumeItem>>,
}

impl VolumesResponse {
    /// Normalize all items into books (empty when upstream had none)
    pub fn into_books(self) -> Vec<Book> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(VolumeItem::into_book)
            .collect()
    }
}

/// One catalog record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeItem {
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default)]
    pub small_thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl ImageLinks {
    /// Best available cover URL, forced to https
    pub fn best_thumbnail(&self) -> Option<String> {
        self.thumbnail
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.small_thumbnail.as_deref().filter(|s| !s.is_empty()))
            .map(force_https)
    }
}

/// Rewrite an insecure URL to https
pub fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

impl VolumeItem {
    pub fn into_book(self) -> Book {
        let info = self.volume_info;

        let title = info
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let authors = info
            .authors
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_string()]);

        let thumbnail = info.image_links.as_ref().and_then(ImageLinks::best_thumbnail);

        Book {
            id: self.id,
            title,
            authors,
            description: info.description,
            published_date: info.published_date,
            page_count: info.page_count,
            categories: info.categories.filter(|c| !c.is_empty()),
            average_rating: info.average_rating,
            thumbnail,
            language: info.language,
            publisher: info.publisher,
        }
    }
}

impl From<VolumeItem> for Book {
    fn from(item: VolumeItem) -> Self {
        item.into_book()
    }
}
