//! Viewer Directory
//!
//! Stand-in for the marketplace's login and wishlist services. The search
//! endpoint only asks two advisory questions: who is the viewer behind a
//! session token, and is a given book on that viewer's wishlist.

use crate::catalog::types::{BookId, CatalogSeed, UserId};

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header carrying the viewer's session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Who may see an owner's email address in search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPolicy {
    /// Everyone, including anonymous callers.
    Public,
    /// Only logged-in viewers.
    #[default]
    Authenticated,
    /// Nobody; owner names only.
    Hidden,
}

impl ContactPolicy {
    pub fn reveals_email(&self, viewer: Option<UserId>) -> bool {
        match self {
            ContactPolicy::Public => true,
            ContactPolicy::Authenticated => viewer.is_some(),
            ContactPolicy::Hidden => false,
        }
    }
}

impl FromStr for ContactPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(ContactPolicy::Public),
            "authenticated" => Ok(ContactPolicy::Authenticated),
            "hidden" => Ok(ContactPolicy::Hidden),
            other => Err(anyhow::anyhow!("unknown contact policy: {}", other)),
        }
    }
}

#[derive(Default)]
pub struct ViewerDirectory {
    sessions: DashMap<String, UserId>,
    wishlists: DashMap<UserId, DashSet<BookId>>,
}

impl ViewerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the sessions and wishlists carried by a catalog seed.
    pub fn from_seed(seed: &CatalogSeed) -> Self {
        let directory = Self::new();
        for session in &seed.sessions {
            directory.open_session(session.token.clone(), session.user_id);
        }
        for entry in &seed.wishlists {
            if !directory.add_to_wishlist(entry.user_id, entry.book_id) {
                tracing::warn!(
                    "Duplicate wishlist entry for user {} and book {}",
                    entry.user_id.0,
                    entry.book_id.0
                );
            }
        }
        directory
    }

    pub fn open_session(&self, token: impl Into<String>, user: UserId) {
        self.sessions.insert(token.into(), user);
    }

    /// Resolves a session token. Unknown or blank tokens are anonymous.
    pub fn viewer(&self, token: Option<&str>) -> Option<UserId> {
        let token = token?.trim();
        if token.is_empty() {
            return None;
        }
        self.sessions.get(token).map(|entry| *entry.value())
    }

    /// Returns false if the book was already on the list.
    pub fn add_to_wishlist(&self, user: UserId, book: BookId) -> bool {
        self.wishlists.entry(user).or_default().insert(book)
    }

    pub fn is_wishlisted(&self, user: UserId, book: BookId) -> bool {
        self.wishlists
            .get(&user)
            .map(|list| list.contains(&book))
            .unwrap_or(false)
    }
}
