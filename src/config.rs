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

//! Application configuration
//!
//! The mobile host hands a JSON object across the bridge when it initializes
//! the core; every field is optional and falls back to the defaults below.
//! Desktop runs (CLI, tests) can override a few fields from the environment:
//!
//! | Variable             | Field                  |
//! |----------------------|------------------------|
//! | `BOOKS_CATALOG_URL`  | `catalog_base_url`     |
//! | `BOOKS_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `BOOKS_DB_PATH`      | `database_path`        |

use crate::api::client::ClientConfig;
use crate::error::{BooksError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public catalog endpoint
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://www.googleapis.com/books/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const DEFAULT_SIMILAR_LIMIT: usize = 6;
pub const DEFAULT_RECOMMENDED_LIMIT: usize = 10;

/// Catalog page size is capped upstream
const MAX_RESULTS_CEILING: u32 = 40;

pub const ENV_CATALOG_URL: &str = "BOOKS_CATALOG_URL";
pub const ENV_TIMEOUT_SECS: &str = "BOOKS_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "BOOKS_DB_PATH";

fn default_user_agent() -> String {
    format!("BooksApp/{} (books-core)", env!("CARGO_PKG_VERSION"))
}

/// Runtime configuration for [`crate::app::BooksApp`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub catalog_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Page size for plain searches
    pub default_max_results: u32,
    /// Target count for the "similar books" list on the detail screen
    pub similar_limit: usize,
    /// Target count for recommendations built from favorites
    pub recommended_limit: usize,
    /// SQLite file; `None` uses the platform default location
    pub database_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            default_max_results: DEFAULT_MAX_RESULTS,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
            recommended_limit: DEFAULT_RECOMMENDED_LIMIT,
            database_path: None,
        }
    }
}

impl AppConfig {
    /// Parse the JSON object sent by the mobile host
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)
            .map_err(|e| BooksError::InvalidConfiguration(format!("Malformed config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `BOOKS_*` environment variables onto this config
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CATALOG_URL) {
            self.catalog_base_url = url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|e| {
                BooksError::InvalidConfiguration(format!("{} must be an integer: {}", ENV_TIMEOUT_SECS, e))
            })?;
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            if !path.trim().is_empty() {
                self.database_path = Some(path);
            }
        }

        Ok(())
    }

    /// Reject configurations the client cannot work with
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.catalog_base_url).map_err(|e| {
            BooksError::InvalidConfiguration(format!(
                "Invalid catalog URL '{}': {}",
                self.catalog_base_url, e
            ))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(BooksError::InvalidConfiguration(format!(
                "Catalog URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(BooksError::InvalidConfiguration(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.default_max_results == 0 || self.default_max_results > MAX_RESULTS_CEILING {
            return Err(BooksError::InvalidConfiguration(format!(
                "defaultMaxResults must be between 1 and {}",
                MAX_RESULTS_CEILING
            )));
        }

        if self.similar_limit == 0 || self.recommended_limit == 0 {
            return Err(BooksError::InvalidConfiguration(
                "Recommendation limits must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(self.catalog_base_url.clone())
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .user_agent(self.user_agent.clone())
            .default_max_results(self.default_max_results)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
        assert_eq!(config.default_max_results, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = AppConfig::from_json(r#"{"similarLimit": 4, "databasePath": "/tmp/books.db"}"#).unwrap();
        assert_eq!(config.similar_limit, 4);
        assert_eq!(config.database_path.as_deref(), Some("/tmp/books.db"));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_json(r#"{"catalogBaseUrl": "ftp://example.com"}"#),
            Err(BooksError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"requestTimeoutSecs": 0}"#),
            Err(BooksError::InvalidConfiguration(_))
        ));
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_CATALOG_URL, "http://127.0.0.1:9000/books/v1"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_DB_PATH, "/data/books.db"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.catalog_base_url, "http://127.0.0.1:9000/books/v1");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.database_path.as_deref(), Some("/data/books.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert!(matches!(result, Err(BooksError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_client_config_mapping() {
        let config = AppConfig {
            request_timeout_secs: 12,
            ..AppConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(12));
        assert_eq!(client.base_url, DEFAULT_CATALOG_BASE_URL);
    }
}
