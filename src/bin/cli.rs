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

use anyhow::Context;
use books_core::share::{self, Clipboard, ShareOutcome, SocialPlatform};
use books_core::{AppConfig, Book, BooksApp, BooksError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "books-cli")]
#[command(about = "Books CLI - Desktop testing tool", long_about = None)]
struct Cli {
    /// SQLite database to use instead of the platform default
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog (recorded in the search history)
    Search {
        /// Search terms, joined with spaces
        #[arg(required = true)]
        query: Vec<String>,
        /// Page size (1-40)
        #[arg(short, long)]
        max: Option<u32>,
    },
    /// Show one book
    Show {
        /// Catalog volume id
        id: String,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
    /// Manage the search history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// Books similar to a given book
    Similar {
        /// Catalog volume id
        id: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Recommendations based on the stored favorites
    Recommend {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Share a book (clipboard, or a social media link with --platform)
    Share {
        /// Catalog volume id
        id: String,
        /// twitter, facebook or whatsapp
        #[arg(short, long)]
        platform: Option<SocialPlatform>,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List favorites
    List {
        /// Newest first
        #[arg(long)]
        recent: bool,
    },
    /// Add a book by id
    Add { id: String },
    /// Remove a book by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent searches
    List,
    /// Remove one entry
    Remove { id: String },
    /// Remove everything
    Clear,
}

/// System clipboard through arboard
struct SystemClipboard(Mutex<arboard::Clipboard>);

impl SystemClipboard {
    fn new() -> Result<Self, BooksError> {
        arboard::Clipboard::new()
            .map(|c| Self(Mutex::new(c)))
            .map_err(|e| BooksError::ClipboardUnavailable(e.to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> books_core::Result<()> {
        let mut clipboard = self
            .0
            .lock()
            .map_err(|_| BooksError::ClipboardUnavailable("clipboard lock poisoned".to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| BooksError::ClipboardUnavailable(e.to_string()))
    }
}

fn print_book_line(book: &Book) {
    let year = book
        .published_date
        .as_deref()
        .and_then(|d| d.get(..4))
        .unwrap_or("----");
    println!("{:<14} {}  {} ({})", book.id, year, book.title, book.authors_display());
}

fn print_book(book: &Book) {
    println!("📖 {}", book.title);
    println!("   by {}", book.authors_display());
    println!("   id:        {}", book.id);
    if let Some(date) = &book.published_date {
        println!("   published: {}", date);
    }
    if let Some(publisher) = &book.publisher {
        println!("   publisher: {}", publisher);
    }
    if let Some(pages) = book.page_count {
        println!("   pages:     {}", pages);
    }
    if let Some(rating) = book.rating() {
        println!("   rating:    {:.1}", rating);
    }
    if let Some(categories) = &book.categories {
        println!("   genres:    {}", categories.join(", "));
    }
    if let Some(description) = &book.description {
        println!();
        println!("{}", description);
    }
}

fn print_list(books: &[Book], empty: &str) {
    if books.is_empty() {
        println!("{}", empty);
    }
    for book in books {
        print_book_line(book);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("books_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid environment configuration")?;
    if let Some(db) = &cli.db {
        config.database_path = Some(db.to_string_lossy().into_owned());
    }
    if let Commands::Search { max: Some(max), .. } = &cli.command {
        config.default_max_results = *max;
    }
    let app = BooksApp::open(config).await.context("failed to open books core")?;

    match cli.command {
        Commands::Search { query, .. } => {
            let query = query.join(" ");
            let books = app.search(&query).await?;
            println!("🔍 {} result(s) for \"{}\"", books.len(), query.trim());
            print_list(&books, "No books found.");
        }
        Commands::Show { id } => {
            let book = app.require_book(&id).await?;
            print_book(&book);
            if app.is_favorite(&book.id).await {
                println!();
                println!("❤️  In your favorites");
            }
        }
        Commands::Favorites { action } => match action {
            FavoritesCommand::List { recent } => {
                let favorites = if recent {
                    app.favorites_by_recent().await
                } else {
                    app.favorites().await
                };
                if favorites.is_empty() {
                    println!("No favorites yet.");
                }
                for fav in &favorites {
                    print!("{}  ", fav.added_at.format("%Y-%m-%d"));
                    print_book_line(&fav.book);
                }
            }
            FavoritesCommand::Add { id } => {
                let fav = app.add_favorite_by_id(&id).await?;
                println!("✅ Added \"{}\" to favorites", fav.book.title);
            }
            FavoritesCommand::Remove { id } => {
                app.remove_favorite(&id).await?;
                println!("🗑️  Removed {} from favorites", id);
            }
        },
        Commands::History { action } => match action {
            HistoryCommand::List => {
                let history = app.search_history().await;
                if history.is_empty() {
                    println!("No recent searches. Try one of:");
                    for suggestion in app.popular_searches() {
                        println!("  {}", suggestion);
                    }
                }
                for item in &history {
                    println!(
                        "{:<16} {}  {} ({} results)",
                        item.id,
                        item.timestamp.format("%Y-%m-%d %H:%M"),
                        item.query,
                        item.results_count
                    );
                }
            }
            HistoryCommand::Remove { id } => {
                app.remove_history_item(&id).await?;
                println!("🗑️  Removed {}", id);
            }
            HistoryCommand::Clear => {
                app.clear_history().await?;
                println!("🧹 Search history cleared");
            }
        },
        Commands::Similar { id, limit } => {
            let book = app.require_book(&id).await?;
            let books = match limit {
                Some(limit) => {
                    app.similar_books_with(&book, limit, &mut rand::thread_rng())
                        .await
                }
                None => app.similar_books(&book).await,
            };
            println!("📚 Similar to \"{}\"", book.title);
            print_list(&books, "Nothing similar found.");
        }
        Commands::Recommend { limit } => {
            let books = match limit {
                Some(limit) => {
                    app.recommended_for_favorites_with(limit, &mut rand::thread_rng())
                        .await
                }
                None => app.recommended_for_favorites().await,
            };
            println!("✨ Recommended for you");
            print_list(&books, "No recommendations available.");
        }
        Commands::Share { id, platform } => {
            let book = app.require_book(&id).await?;
            if let Some(platform) = platform {
                println!("{}", app.social_share_url(&book, platform));
                return Ok(());
            }

            let payload = app.share_payload(&book);
            let outcome = match SystemClipboard::new() {
                Ok(clipboard) => share::share_book(&book, None, &clipboard),
                Err(e) => {
                    tracing::warn!(error = %e, "No clipboard, printing share text");
                    ShareOutcome::Failed
                }
            };
            if outcome == ShareOutcome::CopiedToClipboard {
                println!("📋 Copied to clipboard:");
            }
            println!("{}", share::clipboard_text(&payload));
        }
    }

    Ok(())
}
