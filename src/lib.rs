//! Books core
//!
//! Shared native core for the Books mobile app. Search a public book catalog,
//! keep favorites and a search history on device, suggest similar and
//! recommended books, and build share texts and links.
//!
//! Hosts reach the core through [`bridge`] (JSON in, JSON out), which the
//! C and JNI shims wrap for iOS and Android.

pub mod api;
pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod recommend;
pub mod share;
pub mod storage;

// C FFI bridge for iOS
pub mod ios_bridge;

// JNI bridge for Android
#[cfg(target_os = "android")]
mod jni_bridge;

pub use app::BooksApp;
pub use config::AppConfig;
pub use error::{BooksError, Result};
pub use storage::models::{Book, FavoriteBook, SearchHistoryItem};
