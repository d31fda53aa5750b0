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

//! Remote book catalog
//!
//! `client` performs the HTTP calls, `volumes` holds the wire types and the
//! normalization into [`Book`]. Callers that only need "search" and "lookup"
//! should depend on the [`BookCatalog`] trait so tests can swap in a double.

pub mod client;
pub mod volumes;

use crate::error::Result;
use crate::storage::models::Book;
use async_trait::async_trait;

pub use client::{CatalogClient, ClientConfig, ClientConfigBuilder};
pub use volumes::{VolumeItem, VolumesResponse};

/// Search and lookup against a book catalog
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Up to `max_results` books for `query`; blank query yields an empty list
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Book>>;

    /// One book by id, `None` when the catalog does not know it
    async fn lookup(&self, id: &str) -> Result<Option<Book>>;
}
