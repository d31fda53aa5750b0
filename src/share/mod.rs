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

//! Sharing
//!
//! The core only composes texts and links. Showing a share sheet, writing
//! the clipboard and opening URLs belong to the host and plug in through
//! [`ShareSheet`], [`Clipboard`] and [`LinkOpener`].
//!
//! # Flow
//! 1. Build a [`SharePayload`] from the book
//! 2. If the platform has a share sheet, hand it the payload
//! 3. Otherwise copy the text plus the link to the clipboard

pub mod payload;
pub mod social;

use crate::error::{BooksError, Result};
use crate::storage::models::Book;
use serde::{Deserialize, Serialize};

pub use payload::{build_share_payload, clipboard_text, search_link, share_text, SharePayload};
pub use social::{social_share_url, SocialPlatform};

/// Native share surface
pub trait ShareSheet: Send + Sync {
    /// Show the sheet; `Err(BooksError::ShareCancelled)` when the user dismisses it
    fn share(&self, payload: &SharePayload) -> Result<()>;
}

/// System clipboard
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Opens a URL in a browser or the matching app
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// How a share attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareOutcome {
    Shared,
    CopiedToClipboard,
    Cancelled,
    Failed,
}

impl ShareOutcome {
    /// Whether the book actually left the app
    pub fn is_success(&self) -> bool {
        matches!(self, ShareOutcome::Shared | ShareOutcome::CopiedToClipboard)
    }
}

/// Share through the share sheet when present, else the clipboard
pub fn share_book(book: &Book, sheet: Option<&dyn ShareSheet>, clipboard: &dyn Clipboard) -> ShareOutcome {
    let payload = build_share_payload(book);

    if let Some(sheet) = sheet {
        return match sheet.share(&payload) {
            Ok(()) => ShareOutcome::Shared,
            Err(e) if e.is_cancellation() => {
                tracing::debug!(book_id = %book.id, "Share cancelled by user");
                ShareOutcome::Cancelled
            }
            Err(e) => {
                tracing::error!(book_id = %book.id, error = %e, "Share sheet failed");
                ShareOutcome::Failed
            }
        };
    }

    match clipboard.set_text(&clipboard_text(&payload)) {
        Ok(()) => ShareOutcome::CopiedToClipboard,
        Err(e) => {
            tracing::warn!(book_id = %book.id, error = %e, "Clipboard fallback failed");
            ShareOutcome::Failed
        }
    }
}

/// Open a prefilled post for `platform`
pub fn share_to_social_media(book: &Book, platform: SocialPlatform, opener: &dyn LinkOpener) -> Result<()> {
    let url = social_share_url(book, platform);
    tracing::debug!(book_id = %book.id, %platform, "Opening social share link");
    opener.open(&url).map_err(|e| match e {
        BooksError::ShareFailed(_) => e,
        other => BooksError::ShareFailed(other.to_string()),
    })
}
