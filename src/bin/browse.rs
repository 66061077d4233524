//! Line-oriented terminal client for the search endpoint.
//!
//! Every line typed is treated as the new content of the search box; a line
//! starting with `:` is a command:
//!
//! ```text
//! :genre <name>       :condition <name>    :location <text>   (empty value clears)
//! :more               :retry               :refresh           :quit
//! ```

use book_exchange::client::controller::{ControllerEvent, SearchController};
use book_exchange::client::render::RenderAdapter;
use book_exchange::client::session::SearchState;
use book_exchange::client::transport::HttpTransport;
use book_exchange::client::window::PaginationWindow;
use book_exchange::config::ClientConfig;
use book_exchange::search::criteria::RawFilters;
use book_exchange::search::types::BookView;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

struct TerminalRenderer;

impl TerminalRenderer {
    fn print_books(books: &[BookView]) {
        for view in books {
            let book = &view.book;
            println!(
                "  #{:<5} {} by {} [{} | {} | {}] owner: {}{}",
                book.book_id.0,
                book.title,
                book.author,
                book.genre,
                book.book_condition,
                book.location,
                view.owner_name,
                view.owner_email
                    .as_deref()
                    .map(|email| format!(" <{}>", email))
                    .unwrap_or_default()
            );
        }
    }

    fn print_footer(shown: usize, window: &PaginationWindow) {
        let more = if window.has_more { " (:more for next page)" } else { "" };
        println!(
            "-- {} of {} book{}{}",
            shown,
            window.total,
            if window.total == 1 { "" } else { "s" },
            more
        );
    }
}

impl RenderAdapter for TerminalRenderer {
    fn replace(&mut self, books: &[BookView], window: &PaginationWindow) {
        println!();
        if books.is_empty() {
            println!("No books found matching your search criteria. Try adjusting your filters.");
            return;
        }
        Self::print_books(books);
        Self::print_footer(books.len(), window);
    }

    fn append(&mut self, books: &[BookView], window: &PaginationWindow) {
        Self::print_books(books);
        Self::print_footer(window.offset.min(window.total), window);
    }

    fn state_changed(&mut self, state: &SearchState) {
        match state {
            SearchState::Loading => println!("Loading..."),
            SearchState::Error { message } => {
                println!("Failed to load books: {} (:retry to try again)", message)
            }
            SearchState::Idle | SearchState::Loaded => {}
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    let mut transport = HttpTransport::new(&config.server_url);
    if let Ok(token) = std::env::var("BOOKX_TOKEN") {
        transport = transport.with_session_token(token);
    }

    tracing::info!("Browsing {} (page size {})", config.server_url, config.page_size);

    let controller = SearchController::new(Arc::new(transport), TerminalRenderer, config.page_size)
        .with_debounce(config.debounce);
    let (events, handle) = controller.spawn();

    events.send(ControllerEvent::Refresh).await?;

    let mut filters = RawFilters::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let event = match line.strip_prefix(':') {
            None => {
                filters.search = line.clone();
                ControllerEvent::Input(filters.clone())
            }
            Some(command) => {
                let (name, value) = command.split_once(' ').unwrap_or((command, ""));
                match name {
                    "genre" => {
                        filters.genre = value.to_string();
                        ControllerEvent::Input(filters.clone())
                    }
                    "condition" => {
                        filters.condition = value.to_string();
                        ControllerEvent::Input(filters.clone())
                    }
                    "location" => {
                        filters.location = value.to_string();
                        ControllerEvent::Input(filters.clone())
                    }
                    "more" => ControllerEvent::LoadMore,
                    "retry" => ControllerEvent::Retry,
                    "refresh" => ControllerEvent::Refresh,
                    "quit" | "q" => break,
                    other => {
                        eprintln!("Unknown command :{}", other);
                        continue;
                    }
                }
            }
        };
        events.send(event).await?;
    }

    drop(events);
    handle.await?;
    Ok(())
}
