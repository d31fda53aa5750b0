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

//! JSON bridge shared by the iOS and Android entry points
//!
//! Every operation takes one JSON object and returns one JSON string:
//! ```json
//! { "success": true, "data": ... }
//! ```
//! or
//! ```json
//! { "success": false, "error": "Failed to search books. Please try again." }
//! ```
//!
//! Operations that touch storage accept an optional `dbPath`. One
//! [`BooksApp`] is kept per database path; the first call for a path opens it
//! with default settings unless `initialize` ran before with an explicit
//! config. All async work runs on one lazily created multi-thread runtime.
//!
//! Functions here must not be called from inside a tokio runtime.

use crate::app::BooksApp;
use crate::config::AppConfig;
use crate::error::{BooksError, Result};
use crate::share::{self, SocialPlatform};
use crate::storage::models::Book;
use crate::storage::{Database, SearchHistoryRepository};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::panic;
use std::sync::Arc;
use tokio::sync::Mutex;

lazy_static::lazy_static! {
    static ref RUNTIME: tokio::runtime::Runtime =
        tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    static ref APPS: Mutex<HashMap<String, Arc<BooksApp>>> = Mutex::new(HashMap::new());
}

// ============================================================================
// RESPONSE HELPERS
// ============================================================================

/// Convert a result into the response envelope
pub fn result_to_json<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            tracing::debug!(error = %e, "Bridge call failed");
            error_response(&e.user_message())
        }
    }
}

pub fn success_response<T: Serialize>(data: T) -> String {
    serde_json::json!({
        "success": true,
        "data": data
    })
    .to_string()
}

pub fn error_response(error: &str) -> String {
    serde_json::json!({
        "success": false,
        "error": error
    })
    .to_string()
}

/// Envelope for an argument the host side could not hand over
pub fn input_error_response(error: &BooksError) -> String {
    error_response(&error.user_message())
}

/// Run `f`, turning errors and panics into error responses
pub fn catch_panic<F>(f: F) -> String
where
    F: FnOnce() -> Result<String>,
{
    match panic::catch_unwind(panic::AssertUnwindSafe(f)) {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => error_response(&e.user_message()),
        Err(panic_err) => {
            let panic_msg = if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic occurred".to_string()
            };
            tracing::error!(panic = %panic_msg, "Panic in bridge call");
            error_response(&format!("Rust panic: {}", panic_msg))
        }
    }
}

fn parse_params<'a, T: Deserialize<'a>>(params_json: &'a str) -> Result<T> {
    serde_json::from_str(params_json)
        .map_err(|e| BooksError::invalid_input(format!("Invalid parameters: {}", e)))
}

// ============================================================================
// APP CACHE
// ============================================================================

fn cache_key(db_path: Option<&str>) -> String {
    match db_path {
        Some(path) if !path.trim().is_empty() => path.to_string(),
        _ => Database::get_default_path().display().to_string(),
    }
}

/// Cached app for `db_path`, opening it with default settings on first use
async fn app_for(db_path: Option<&str>) -> Result<Arc<BooksApp>> {
    let key = cache_key(db_path);

    if let Some(app) = APPS.lock().await.get(&key) {
        return Ok(Arc::clone(app));
    }

    let mut config = AppConfig::default();
    config.apply_env_overrides()?;
    config.database_path = Some(key.clone());

    // Opened outside the lock; if two calls race, the first insert wins
    let opened = Arc::new(BooksApp::open(config).await?);
    let mut apps = APPS.lock().await;
    Ok(Arc::clone(apps.entry(key).or_insert(opened)))
}

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DbParams {
    #[serde(default)]
    db_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryParams {
    #[serde(default)]
    db_path: Option<String>,
    query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
    #[serde(default)]
    db_path: Option<String>,
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookParams {
    #[serde(default)]
    db_path: Option<String>,
    book: Book,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritesListParams {
    #[serde(default)]
    db_path: Option<String>,
    #[serde(default)]
    sort_by_recent: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryAddParams {
    #[serde(default)]
    db_path: Option<String>,
    query: String,
    #[serde(default)]
    results_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LimitParams {
    #[serde(default)]
    db_path: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialParams {
    book: Book,
    platform: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResponse {
    database_path: String,
    catalog_base_url: String,
}

/// Parameter objects that may name a database
trait DbTarget {
    fn db_path(&self) -> Option<&str>;
}

macro_rules! db_target {
    ($($t:ty),* $(,)?) => {
        $(impl DbTarget for $t {
            fn db_path(&self) -> Option<&str> {
                self.db_path.as_deref()
            }
        })*
    };
}

db_target!(DbParams, QueryParams, IdParams, BookParams, FavoritesListParams, HistoryAddParams, LimitParams);

/// Parse params, then run `op` against the app they point at
fn with_app<P, T, F, Fut>(params_json: &str, op: F) -> String
where
    P: DbTarget + for<'de> Deserialize<'de>,
    T: Serialize,
    F: FnOnce(Arc<BooksApp>, P) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    catch_panic(|| {
        let params: P = parse_params(params_json)?;
        let result = RUNTIME.block_on(async move {
            let app = app_for(params.db_path()).await?;
            op(app, params).await
        });
        Ok(result_to_json(result))
    })
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Open (or reopen) the app with an explicit config
///
/// `config_json` is an [`AppConfig`] object; missing fields take defaults.
pub fn initialize(config_json: &str) -> String {
    catch_panic(|| {
        let config = AppConfig::from_json(config_json)?;
        let key = cache_key(config.database_path.as_deref());

        let result = RUNTIME.block_on(async move {
            let mut config = config;
            config.database_path = Some(key.clone());
            let base_url = config.catalog_base_url.clone();

            let app = Arc::new(BooksApp::open(config).await?);
            APPS.lock().await.insert(key.clone(), app);

            Ok::<_, BooksError>(InitializeResponse {
                database_path: key,
                catalog_base_url: base_url,
            })
        });

        Ok(result_to_json(result))
    })
}

/// `{dbPath?, query}` → `Book[]`
pub fn search(params_json: &str) -> String {
    with_app(params_json, |app, p: QueryParams| async move { app.search(&p.query).await })
}

/// `{dbPath?, id}` → `Book | null`
pub fn get_book(params_json: &str) -> String {
    with_app(params_json, |app, p: IdParams| async move { app.get_book(&p.id).await })
}

/// `{dbPath?, sortByRecent?}` → `FavoriteBook[]`
pub fn get_favorites(params_json: &str) -> String {
    with_app(params_json, |app, p: FavoritesListParams| async move {
        if p.sort_by_recent {
            Ok(app.favorites_by_recent().await)
        } else {
            Ok(app.favorites().await)
        }
    })
}

/// `{dbPath?, book}` → `FavoriteBook`
pub fn add_favorite(params_json: &str) -> String {
    with_app(params_json, |app, p: BookParams| async move { app.add_favorite(&p.book).await })
}

/// `{dbPath?, id}` → `null`
pub fn remove_favorite(params_json: &str) -> String {
    with_app(params_json, |app, p: IdParams| async move { app.remove_favorite(&p.id).await })
}

/// `{dbPath?, id}` → `bool`
pub fn is_favorite(params_json: &str) -> String {
    with_app(params_json, |app, p: IdParams| async move { Ok(app.is_favorite(&p.id).await) })
}

/// `{dbPath?, book}` → `bool` (favorite state afterwards)
pub fn toggle_favorite(params_json: &str) -> String {
    with_app(params_json, |app, p: BookParams| async move { app.toggle_favorite(&p.book).await })
}

/// `{dbPath?}` → `SearchHistoryItem[]`
pub fn get_search_history(params_json: &str) -> String {
    with_app(params_json, |app, _: DbParams| async move { Ok(app.search_history().await) })
}

/// `{dbPath?, query, resultsCount}` → `SearchHistoryItem | null`
pub fn add_search_history(params_json: &str) -> String {
    with_app(params_json, |app, p: HistoryAddParams| async move {
        app.record_search(&p.query, p.results_count).await
    })
}

/// `{dbPath?, id}` → `null`
pub fn remove_search_history(params_json: &str) -> String {
    with_app(params_json, |app, p: IdParams| async move { app.remove_history_item(&p.id).await })
}

/// `{dbPath?}` → `null`
pub fn clear_search_history(params_json: &str) -> String {
    with_app(params_json, |app, _: DbParams| async move { app.clear_history().await })
}

/// → `string[]`
pub fn popular_searches() -> String {
    success_response(SearchHistoryRepository::popular_searches())
}

/// `{dbPath?, book, limit?}` → `Book[]`
pub fn similar_books(params_json: &str) -> String {
    with_app(params_json, |app, p: BookParams| async move {
        let limit = p.limit.unwrap_or(app.config().similar_limit);
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::from_entropy();
        Ok(app.similar_books_with(&p.book, limit, &mut rng).await)
    })
}

/// `{dbPath?, limit?}` → `Book[]`
pub fn recommended_books(params_json: &str) -> String {
    with_app(params_json, |app, p: LimitParams| async move {
        let limit = p.limit.unwrap_or(app.config().recommended_limit);
        let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::from_entropy();
        Ok(app.recommended_for_favorites_with(limit, &mut rng).await)
    })
}

/// `{book}` → `SharePayload`
pub fn share_payload(params_json: &str) -> String {
    catch_panic(|| {
        let params: BookParams = parse_params(params_json)?;
        Ok(success_response(share::build_share_payload(&params.book)))
    })
}

/// `{book, platform}` → deep-link URL
pub fn social_share_url(params_json: &str) -> String {
    catch_panic(|| {
        let params: SocialParams = parse_params(params_json)?;
        let platform: SocialPlatform = params.platform.parse()?;
        Ok(success_response(share::social_share_url(&params.book, platform)))
    })
}
