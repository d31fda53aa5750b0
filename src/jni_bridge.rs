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

//! JNI bridge for Android
//!
//! JavaScript (React Native) → Kotlin (`BooksCoreModule`) → JNI → Rust
//!
//! Every native method takes one JSON string and returns one JSON string in
//! the envelope described in [`crate::bridge`]. Parameter shapes are the same
//! as on iOS.

use crate::bridge;
use crate::error::BooksError;
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

fn jstring_to_string(env: &mut JNIEnv, jstr: &JString) -> crate::Result<String> {
    env.get_string(jstr)
        .map(|s| s.into())
        .map_err(|e| BooksError::JniError(format!("JNI string conversion failed: {}", e)))
}

/// Hand a Rust string back to Java; null if the JVM refuses it
fn to_jstring(env: &mut JNIEnv, value: String) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Java string");
            std::ptr::null_mut()
        }
    }
}

/// Read the JSON argument, run `op`, return its response
fn call(env: &mut JNIEnv, params: &JString, op: fn(&str) -> String) -> jstring {
    let response = match jstring_to_string(env, params) {
        Ok(json) => op(&json),
        Err(e) => bridge::input_error_response(&e),
    };
    to_jstring(env, response)
}

macro_rules! jni_json_fn {
    ($($name:ident => $op:path),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name(mut env: JNIEnv, _class: JClass, params_json: JString) -> jstring {
                call(&mut env, &params_json, $op)
            }
        )*
    };
}

jni_json_fn! {
    Java_com_booksapp_core_BooksCoreModule_nativeInitialize => bridge::initialize,
    Java_com_booksapp_core_BooksCoreModule_nativeSearchBooks => bridge::search,
    Java_com_booksapp_core_BooksCoreModule_nativeGetBook => bridge::get_book,
    Java_com_booksapp_core_BooksCoreModule_nativeGetFavorites => bridge::get_favorites,
    Java_com_booksapp_core_BooksCoreModule_nativeAddFavorite => bridge::add_favorite,
    Java_com_booksapp_core_BooksCoreModule_nativeRemoveFavorite => bridge::remove_favorite,
    Java_com_booksapp_core_BooksCoreModule_nativeIsFavorite => bridge::is_favorite,
    Java_com_booksapp_core_BooksCoreModule_nativeToggleFavorite => bridge::toggle_favorite,
    Java_com_booksapp_core_BooksCoreModule_nativeGetSearchHistory => bridge::get_search_history,
    Java_com_booksapp_core_BooksCoreModule_nativeAddSearchHistory => bridge::add_search_history,
    Java_com_booksapp_core_BooksCoreModule_nativeRemoveSearchHistory => bridge::remove_search_history,
    Java_com_booksapp_core_BooksCoreModule_nativeClearSearchHistory => bridge::clear_search_history,
    Java_com_booksapp_core_BooksCoreModule_nativeSimilarBooks => bridge::similar_books,
    Java_com_booksapp_core_BooksCoreModule_nativeRecommendedBooks => bridge::recommended_books,
    Java_com_booksapp_core_BooksCoreModule_nativeSharePayload => bridge::share_payload,
    Java_com_booksapp_core_BooksCoreModule_nativeSocialShareUrl => bridge::social_share_url,
}

#[no_mangle]
pub extern "C" fn Java_com_booksapp_core_BooksCoreModule_nativePopularSearches(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    to_jstring(&mut env, bridge::popular_searches())
}
