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

//! Social network deep links
//!
//! Each platform has a fixed URL template; every fragment put into it is
//! percent-encoded. The search link is encoded a second time since it is
//! itself a query parameter.

use super::payload::{description_excerpt, search_link, title_line, HASHTAGS};
use crate::error::{BooksError, Result};
use crate::storage::models::Book;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Description length in social posts
pub const SOCIAL_DESCRIPTION_CHARS: usize = 150;

/// Encoded blank line
const BREAK: &str = "%0A%0A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Twitter,
    Facebook,
    WhatsApp,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [Self::Twitter, Self::Facebook, Self::WhatsApp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::WhatsApp => "whatsapp",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = BooksError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "twitter" | "x" => Ok(Self::Twitter),
            "facebook" => Ok(Self::Facebook),
            "whatsapp" => Ok(Self::WhatsApp),
            other => Err(BooksError::invalid_input(format!("Unknown social platform: {}", other))),
        }
    }
}

/// Deep link that opens a prefilled post on `platform`
pub fn social_share_url(book: &Book, platform: SocialPlatform) -> String {
    let title = urlencoding::encode(&format!("📚 {}", title_line(book))).into_owned();
    let description =
        urlencoding::encode(&description_excerpt(book, SOCIAL_DESCRIPTION_CHARS)).into_owned();
    let link = urlencoding::encode(&search_link(book)).into_owned();
    let hashtags = urlencoding::encode(HASHTAGS).into_owned();

    match platform {
        SocialPlatform::Twitter => format!(
            "https://twitter.com/intent/tweet?text={t}{br}{d}{br}{u}{br}{h}",
            t = title,
            d = description,
            u = link,
            h = hashtags,
            br = BREAK
        ),
        SocialPlatform::Facebook => format!(
            "https://www.facebook.com/sharer/sharer.php?u={u}&quote={t}{br}{d}",
            u = link,
            t = title,
            d = description,
            br = BREAK
        ),
        SocialPlatform::WhatsApp => format!(
            "https://wa.me/?text={t}{br}{d}{br}{more}{u}",
            t = title,
            d = description,
            more = urlencoding::encode("More info: "),
            u = link,
            br = BREAK
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book::new("id", "Emma", vec!["Jane Austen".to_string()])
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("Twitter".parse::<SocialPlatform>().unwrap(), SocialPlatform::Twitter);
        assert_eq!(" whatsapp ".parse::<SocialPlatform>().unwrap(), SocialPlatform::WhatsApp);
        assert!("myspace".parse::<SocialPlatform>().is_err());
        for p in SocialPlatform::ALL {
            assert_eq!(p.as_str().parse::<SocialPlatform>().unwrap(), p);
        }
    }

    #[test]
    fn test_twitter_url() {
        let url = social_share_url(&book(), SocialPlatform::Twitter);
        assert!(url.starts_with("https://twitter.com/intent/tweet?text=%F0%9F%93%9A%20%22Emma%22%20by%20Jane%20Austen%0A%0A"));
        assert!(url.contains("Great%20book%20recommendation%21%0A%0A"));
        // Search link is double-encoded
        assert!(url.contains("https%3A%2F%2Fwww.google.com%2Fsearch%3Fq%3DEmma%2520Jane%2520Austen%2520book"));
        assert!(url.ends_with("%23BooksApp%20%23Reading%20%23BookRecommendation"));
    }

    #[test]
    fn test_facebook_url() {
        let url = social_share_url(&book(), SocialPlatform::Facebook);
        assert!(url.starts_with("https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fwww.google.com"));
        assert!(url.contains("&quote=%F0%9F%93%9A%20%22Emma%22"));
        assert!(!url.contains("%23BooksApp"));
    }

    #[test]
    fn test_whatsapp_url() {
        let url = social_share_url(&book(), SocialPlatform::WhatsApp);
        assert!(url.starts_with("https://wa.me/?text="));
        assert!(url.contains("%0A%0AMore%20info%3A%20https%3A%2F%2F"));
    }

    #[test]
    fn test_description_capped_at_150_chars() {
        let mut b = book();
        b.description = Some("a".repeat(400));
        let url = social_share_url(&b, SocialPlatform::Twitter);
        assert!(url.contains(&format!("{}...", "a".repeat(150))));
        assert!(!url.contains(&"a".repeat(151)));
    }
}
