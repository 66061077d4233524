//! Catalog Data Types
//!
//! Records owned by the marketplace's relational store. The search core only
//! ever reads them; creation and editing belong to the admin workflow.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of a book listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BookId(pub u64);

/// Identifier of a registered user (book owner).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Physical condition of a listed book.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Condition {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Excellent,
        Condition::VeryGood,
        Condition::Good,
        Condition::Fair,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::VeryGood => "Very Good",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }

    /// Case-insensitive lookup by display name. Returns `None` for anything
    /// outside the enumeration.
    pub fn parse(value: &str) -> Option<Condition> {
        let value = value.trim();
        Condition::ALL
            .into_iter()
            .find(|condition| condition.label().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A book listing as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub book_id: BookId,
    pub user_id: UserId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    pub genre: String,
    pub book_condition: Condition,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exchange_preference: String,
    pub location: String,
    #[serde(default)]
    pub cover_color: Option<String>,
    pub is_available: bool,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// A registered user. Only the fields joined into search results are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
}

/// A book joined with its owner's public details.
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub book: Book,
    pub owner_name: String,
    pub owner_email: String,
}

/// A logged-in session issued by the marketplace's login flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: UserId,
}

/// One book on one user's wishlist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WishlistEntry {
    pub user_id: UserId,
    pub book_id: BookId,
}

/// On-disk seed format:
/// `{ "users": [...], "books": [...], "sessions": [...], "wishlists": [...] }`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub wishlists: Vec<WishlistEntry>,
}

impl CatalogSeed {
    /// Reads and parses a JSON seed file.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let seed: CatalogSeed = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", path.display()))?;

        tracing::info!(
            "Read catalog {}: {} users, {} books, {} sessions, {} wishlist entries",
            path.display(),
            seed.users.len(),
            seed.books.len(),
            seed.sessions.len(),
            seed.wishlists.len()
        );
        Ok(seed)
    }
}
