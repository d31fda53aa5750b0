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

//! HTTP client for the book catalog
//!
//! Thin wrapper over `reqwest::Client`:
//! - one GET per call, no retry, no partial results
//! - any non-2xx status or transport failure becomes a generic
//!   `SearchFailed` / `BookLookupFailed` (the cause is logged, not shown)
//! - a blank query short-circuits to an empty result without touching
//!   the network
//!
//! # Example
//! ```rust,no_run
//! use books_core::api::{CatalogClient, ClientConfig};
//!
//! # async fn example() -> books_core::error::Result<()> {
//! let client = CatalogClient::new(ClientConfig::default())?;
//! let books = client.search_books("dune", 10).await?;
//! for book in books {
//!     println!("{} by {}", book.title, book.authors_display());
//! }
//! # Ok(())
//! # }
//! ```

use crate::api::volumes::{VolumeItem, VolumesResponse};
use crate::api::BookCatalog;
use crate::config::{DEFAULT_CATALOG_BASE_URL, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECS};
use crate::error::{BooksError, Result};
use crate::storage::models::Book;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Configuration for [`CatalogClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog root, without the `/volumes` suffix
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Page size used by `search_books_default`
    pub default_max_results: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("BooksApp/{} (books-core)", env!("CARGO_PKG_VERSION")),
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn default_max_results(mut self, max_results: u32) -> Self {
        self.config.default_max_results = max_results;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Catalog client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    /// Base URL with any trailing slash removed
    base_url: String,
    config: ClientConfig,
}

impl CatalogClient {
    /// Build the client with default headers and timeout
    ///
    /// # Errors
    /// Returns `InvalidInput` for a user agent that is not a valid header value,
    /// or `ReqwestError` if the TLS backend cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| BooksError::InvalidInput(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search the catalog
    ///
    /// Returns an empty list without a request when `query` is blank.
    /// Otherwise the query is sent exactly as given, surrounding whitespace included.
    ///
    /// # Errors
    /// `SearchFailed` on transport failure, non-2xx status or an undecodable body.
    pub async fn search_books(&self, query: &str, max_results: u32) -> Result<Vec<Book>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/volumes?q={}&maxResults={}",
            self.base_url,
            urlencoding::encode(query),
            max_results
        );
        tracing::debug!(query, max_results, "Searching catalog");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(query, error = %e, "Catalog search request failed");
            BooksError::search_failed(e.to_string(), None)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(query, status = status.as_u16(), body = %snippet(&body), "Catalog search returned error status");
            return Err(BooksError::search_failed(
                format!("HTTP {}", status),
                Some(status.as_u16()),
            ));
        }

        let parsed: VolumesResponse = parse_body(response).await.map_err(|e| {
            tracing::error!(query, error = %e, "Catalog search response could not be decoded");
            BooksError::search_failed(e.to_string(), Some(status.as_u16()))
        })?;

        let books = parsed.into_books();
        tracing::debug!(query, count = books.len(), "Catalog search complete");
        Ok(books)
    }

    /// Search with the configured page size
    pub async fn search_books_default(&self, query: &str) -> Result<Vec<Book>> {
        self.search_books(query, self.config.default_max_results).await
    }

    /// Fetch one volume by id
    ///
    /// A 404 answer is `Ok(None)`.
    ///
    /// # Errors
    /// `InvalidInput` for a blank id, `BookLookupFailed` for any other failure.
    pub async fn get_book_by_id(&self, id: &str) -> Result<Option<Book>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BooksError::invalid_input("Book id must not be empty"));
        }

        let url = format!("{}/volumes/{}", self.base_url, urlencoding::encode(id));
        tracing::debug!(id, "Fetching book");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!(id, error = %e, "Book lookup request failed");
            BooksError::lookup_failed(e.to_string(), None)
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(id, "Book not found in catalog");
            return Ok(None);
        }
        if !status.is_success() {
            tracing::error!(id, status = status.as_u16(), "Book lookup returned error status");
            return Err(BooksError::lookup_failed(
                format!("HTTP {}", status),
                Some(status.as_u16()),
            ));
        }

        let item: VolumeItem = parse_body(response).await.map_err(|e| {
            tracing::error!(id, error = %e, "Book lookup response could not be decoded");
            BooksError::lookup_failed(e.to_string(), Some(status.as_u16()))
        })?;

        Ok(Some(item.into_book()))
    }
}

#[async_trait]
impl BookCatalog for CatalogClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Book>> {
        self.search_books(query, max_results).await
    }

    async fn lookup(&self, id: &str) -> Result<Option<Book>> {
        self.get_book_by_id(id).await
    }
}

/// Read the body as text first so a parse error can carry context
async fn parse_body<T>(response: Response) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let text = response.text().await?;

    serde_json::from_str::<T>(&text).map_err(|e| {
        let col = e.column();
        let start = floor_char_boundary(&text, col.saturating_sub(200));
        let end = floor_char_boundary(&text, (col + 200).min(text.len()));
        BooksError::InvalidApiResponse {
            message: format!("Parse error: {} at col {}. Context: ...{}...", e, col, &text[start..end]),
            response_body: Some(text.clone()),
        }
    })
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn snippet(body: &str) -> &str {
    &body[..floor_char_boundary(body, body.len().min(300))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8080/books/v1")
            .timeout(Duration::from_secs(5))
            .user_agent("TestAgent/1.0")
            .default_max_results(10)
            .build();

        assert_eq!(config.base_url, "http://localhost:8080/books/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert_eq!(config.default_max_results, 10);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = CatalogClient::new(
            ClientConfig::builder()
                .base_url("https://example.com/books/v1/")
                .build(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://example.com/books/v1");
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let result = CatalogClient::new(ClientConfig::builder().user_agent("bad\nagent").build());
        assert!(matches!(result, Err(BooksError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_blank_query_skips_network() {
        // Unroutable base URL: any request would fail
        let client = CatalogClient::new(
            ClientConfig::builder()
                .base_url("http://127.0.0.1:9")
                .timeout(Duration::from_millis(200))
                .build(),
        )
        .unwrap();

        assert!(client.search_books("", 20).await.unwrap().is_empty());
        assert!(client.search_books("   \t", 20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_id_is_invalid_input() {
        let client = CatalogClient::new(ClientConfig::default()).unwrap();
        assert!(matches!(
            client.get_book_by_id(" ").await,
            Err(BooksError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let body = "é".repeat(400);
        let s = snippet(&body);
        assert!(s.len() <= 300);
        assert!(body.starts_with(s));
    }
}
