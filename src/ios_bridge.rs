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

//! C FFI bridge for iOS (and any other C host)
//!
//! JavaScript (React Native) → Swift (`BooksCoreModule`) → C FFI → Rust
//!
//! Each function takes one JSON C string and returns one JSON C string in
//! the envelope described in [`crate::bridge`].
//!
//! # Memory Management
//! Every returned pointer MUST be released with `rust_free_string()`.
//!
//! ```swift
//! let resultPtr = books_search(paramsJson)
//! defer { rust_free_string(resultPtr) }
//! let jsonString = String(cString: resultPtr)
//! ```

use crate::bridge;
use crate::error::BooksError;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Copy a C string into a Rust `String`
///
/// # Safety
/// `ptr` must be null or a valid null-terminated C string.
fn c_str_to_string(ptr: *const c_char) -> crate::Result<String> {
    if ptr.is_null() {
        return Err(BooksError::invalid_input("Null pointer received"));
    }
    unsafe {
        CStr::from_ptr(ptr)
            .to_str()
            .map(|s| s.to_string())
            .map_err(|e| BooksError::invalid_input(format!("Invalid UTF-8: {}", e)))
    }
}

/// Hand a Rust string to the caller, who frees it with `rust_free_string()`
fn string_to_c_str(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => {
            // The error envelope never contains interior nulls
            let error_json = bridge::error_response("String contains null bytes");
            CString::new(error_json)
                .map(CString::into_raw)
                .unwrap_or(std::ptr::null_mut())
        }
    }
}

fn call(params: *const c_char, op: fn(&str) -> String) -> *mut c_char {
    let response = match c_str_to_string(params) {
        Ok(json) => op(&json),
        Err(e) => bridge::input_error_response(&e),
    };
    string_to_c_str(response)
}

macro_rules! c_json_fn {
    ($($(#[$doc:meta])* $name:ident => $op:path),* $(,)?) => {
        $(
            $(#[$doc])*
            ///
            /// Caller must free the returned string with `rust_free_string()`.
            #[no_mangle]
            pub extern "C" fn $name(params_json: *const c_char) -> *mut c_char {
                call(params_json, $op)
            }
        )*
    };
}

c_json_fn! {
    /// `AppConfig` JSON → `{databasePath, catalogBaseUrl}`
    books_initialize => bridge::initialize,
    /// `{dbPath?, query}` → `Book[]`
    books_search => bridge::search,
    /// `{dbPath?, id}` → `Book | null`
    books_get_book => bridge::get_book,
    /// `{dbPath?, sortByRecent?}` → `FavoriteBook[]`
    books_get_favorites => bridge::get_favorites,
    /// `{dbPath?, book}` → `FavoriteBook`
    books_add_favorite => bridge::add_favorite,
    /// `{dbPath?, id}` → `null`
    books_remove_favorite => bridge::remove_favorite,
    /// `{dbPath?, id}` → `bool`
    books_is_favorite => bridge::is_favorite,
    /// `{dbPath?, book}` → `bool`
    books_toggle_favorite => bridge::toggle_favorite,
    /// `{dbPath?}` → `SearchHistoryItem[]`
    books_get_search_history => bridge::get_search_history,
    /// `{dbPath?, query, resultsCount}` → `SearchHistoryItem | null`
    books_add_search_history => bridge::add_search_history,
    /// `{dbPath?, id}` → `null`
    books_remove_search_history => bridge::remove_search_history,
    /// `{dbPath?}` → `null`
    books_clear_search_history => bridge::clear_search_history,
    /// `{dbPath?, book, limit?}` → `Book[]`
    books_similar_books => bridge::similar_books,
    /// `{dbPath?, limit?}` → `Book[]`
    books_recommended_books => bridge::recommended_books,
    /// `{book}` → `SharePayload`
    books_share_payload => bridge::share_payload,
    /// `{book, platform}` → URL string
    books_social_share_url => bridge::social_share_url,
}

/// Fixed search suggestions → `string[]`
///
/// Caller must free the returned string with `rust_free_string()`.
#[no_mangle]
pub extern "C" fn books_popular_searches() -> *mut c_char {
    string_to_c_str(bridge::popular_searches())
}

/// Free a string returned by any function in this module
#[no_mangle]
pub extern "C" fn rust_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(ptr: *mut c_char) -> serde_json::Value {
        assert!(!ptr.is_null());
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        rust_free_string(ptr);
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_string_conversions() {
        let c_str = CString::new("Hello, World!").unwrap();
        assert_eq!(c_str_to_string(c_str.as_ptr()).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_null_pointer_handling() {
        assert!(c_str_to_string(std::ptr::null()).is_err());

        let response = take(books_share_payload(std::ptr::null()));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"], "Null pointer received");
    }

    #[test]
    fn test_interior_null_becomes_error_envelope() {
        let response = take(string_to_c_str("bad\0string".to_string()));
        assert_eq!(response["success"], false);
    }

    #[test]
    fn test_social_share_url_over_ffi() {
        let params = CString::new(
            r#"{"book": {"id": "x", "title": "Emma", "authors": ["Jane Austen"]}, "platform": "twitter"}"#,
        )
        .unwrap();

        let response = take(books_social_share_url(params.as_ptr()));
        assert_eq!(response["success"], true);
        assert!(response["data"].as_str().unwrap().starts_with("https://twitter.com/intent/tweet?text="));
    }

    #[test]
    fn test_popular_searches_over_ffi() {
        let response = take(books_popular_searches());
        assert_eq!(response["data"][1], "mystery thriller");
    }

    #[test]
    fn test_free_null_is_safe() {
        rust_free_string(std::ptr::null_mut());
    }
}
