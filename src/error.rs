//! Error types for the Books core
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are grouped by the part of the app that raises them (catalog, storage,
//! favorites/history validation, sharing, configuration).
//!
//! ## Error kinds
//!
//! ### Network/transport (Remote Catalog Client)
//! - HTTP non-2xx or a failed request → `SearchFailed`, `BookLookupFailed`
//! - Undecodable catalog payload → `InvalidApiResponse`
//!
//! These always display a generic message; the status code and cause are kept
//! for logging only. Nothing here is retried automatically.
//!
//! ### Storage
//! - Backend read/write failure → `StorageError`, `SqlxError`
//! - Stored JSON that no longer parses → `CorruptData` (collection reads recover
//!   from this locally and return an empty collection)
//!
//! ### Domain validation
//! - Adding a book that is already a favorite → `DuplicateFavorite`
//! - Empty query / id, bad bridge parameters → `InvalidInput`
//!
//! ### Sharing
//! - User dismissed the share sheet → `ShareCancelled`
//! - Share sheet or link opener failed → `ShareFailed`
//! - No clipboard on this platform → `ClipboardUnavailable`

use thiserror::Error;

/// Result type alias using our BooksError type
pub type Result<T> = std::result::Result<T, BooksError>;

/// Main error type for the Books core
#[derive(Error, Debug)]
pub enum BooksError {
    // ===== Catalog Errors =====

    /// Catalog search failed (non-2xx status, transport failure or bad payload)
    #[error("Failed to search books. Please try again.")]
    SearchFailed {
        /// HTTP status code if the server answered
        status_code: Option<u16>,
        /// Underlying cause, for logs
        cause: String,
    },

    /// Single-volume lookup failed
    #[error("Failed to fetch book details. Please try again.")]
    BookLookupFailed {
        status_code: Option<u16>,
        cause: String,
    },

    /// Catalog returned a body we could not decode
    #[error("Invalid catalog response: {message}")]
    InvalidApiResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    // ===== Favorites / History Errors =====

    /// Book is already stored as a favorite
    #[error("This book is already in your favorites")]
    DuplicateFavorite {
        book_id: String,
    },

    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    // ===== Storage Errors =====

    /// Key-value backend failure
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A stored collection could not be decoded
    #[error("Stored data under '{key}' is corrupt: {reason}")]
    CorruptData {
        key: String,
        reason: String,
    },

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    // ===== Sharing Errors =====

    /// User dismissed the native share surface
    #[error("Sharing was cancelled")]
    ShareCancelled,

    /// Native share surface or link opener failed
    #[error("Sharing failed: {0}")]
    ShareFailed(String),

    /// No clipboard available on this platform
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    // ===== Input / Configuration Errors =====

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration is invalid or incomplete
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Internal error that should not normally occur
    #[error("Internal error: {0}")]
    InternalError(String),

    // ===== External Library Errors =====

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Database driver error from sqlx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JNI bridge error (Android only)
    #[error("JNI error: {0}")]
    #[cfg(target_os = "android")]
    JniError(String),
}

impl From<std::num::ParseIntError> for BooksError {
    fn from(err: std::num::ParseIntError) -> Self {
        BooksError::InvalidInput(format!("Failed to parse integer: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for BooksError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        BooksError::InternalError(format!("UTF-8 conversion error: {}", err))
    }
}

// Helper methods for creating common errors
impl BooksError {
    /// Create a RecordNotFound error with a resource name
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        BooksError::RecordNotFound(resource.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        BooksError::InvalidInput(message.into())
    }

    /// Create a StorageError with a message
    pub fn storage<S: Into<String>>(message: S) -> Self {
        BooksError::StorageError(message.into())
    }

    /// Create an InternalError with a message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        BooksError::InternalError(message.into())
    }

    /// Create a SearchFailed error
    pub fn search_failed<S: Into<String>>(cause: S, status_code: Option<u16>) -> Self {
        BooksError::SearchFailed {
            status_code,
            cause: cause.into(),
        }
    }

    /// Create a BookLookupFailed error
    pub fn lookup_failed<S: Into<String>>(cause: S, status_code: Option<u16>) -> Self {
        BooksError::BookLookupFailed {
            status_code,
            cause: cause.into(),
        }
    }

    /// Check if error came from the catalog or the transport under it
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            BooksError::SearchFailed { .. }
                | BooksError::BookLookupFailed { .. }
                | BooksError::InvalidApiResponse { .. }
                | BooksError::ReqwestError(_)
        )
    }

    /// Check if error is a domain validation failure shown as-is to the user
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            BooksError::DuplicateFavorite { .. } | BooksError::InvalidInput(_)
        )
    }

    /// Check if error is related to local persistence
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            BooksError::StorageError(_)
                | BooksError::CorruptData { .. }
                | BooksError::MigrationFailed(_)
                | BooksError::SqlxError(_)
        )
    }

    /// User dismissed a share surface; not a failure
    pub fn is_cancellation(&self) -> bool {
        matches!(self, BooksError::ShareCancelled)
    }

    /// Get user-friendly error message suitable for a transient notice
    ///
    /// Technical details (status codes, driver messages) are omitted.
    pub fn user_message(&self) -> String {
        match self {
            BooksError::SearchFailed { .. }
            | BooksError::BookLookupFailed { .. }
            | BooksError::DuplicateFavorite { .. } => self.to_string(),
            BooksError::InvalidApiResponse { .. } | BooksError::ReqwestError(_) => {
                "Could not reach the book catalog. Please try again.".to_string()
            }
            BooksError::InvalidInput(message) => message.clone(),
            BooksError::ShareCancelled => "Sharing cancelled.".to_string(),
            BooksError::ShareFailed(_) | BooksError::ClipboardUnavailable(_) => {
                "Could not share this book.".to_string()
            }
            e if e.is_storage_error() => {
                "Could not update your saved books. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
