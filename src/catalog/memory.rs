use super::types::*;
use crate::error::{SearchError, SearchResult};

use dashmap::DashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// One window of a filtered, ordered scan plus the size of the full match set.
#[derive(Debug, Clone, Default)]
pub struct CollectionPage {
    pub listings: Vec<BookListing>,
    pub total: usize,
}

/// Read-only access to the book collection.
///
/// Implementations keep books accepted by `predicate`, join each book with its
/// owner (books without a known owner never match), order by creation time
/// descending and slice `[offset, offset + limit)`. `total` counts every match
/// before slicing.
pub trait BookCollection: Send + Sync {
    fn query(
        &self,
        predicate: &dyn Fn(&Book) -> bool,
        offset: usize,
        limit: usize,
    ) -> SearchResult<CollectionPage>;

    fn get(&self, id: BookId) -> SearchResult<Option<BookListing>>;
}

/// In-memory catalog backed by concurrent maps.
pub struct MemoryCatalog {
    books: DashMap<BookId, Book>,
    users: DashMap<UserId, User>,
    online: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            users: DashMap::new(),
            online: AtomicBool::new(true),
        }
    }

    pub fn from_seed(seed: CatalogSeed) -> Self {
        let catalog = Self::new();
        for user in seed.users {
            catalog.put_user(user);
        }
        for book in seed.books {
            catalog.put_book(book);
        }
        catalog
    }

    /// Loads a JSON seed file (see [`CatalogSeed`]).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::from_seed(CatalogSeed::read(path)?))
    }

    pub fn put_user(&self, user: User) {
        self.users.insert(user.user_id, user);
    }

    pub fn put_book(&self, book: Book) {
        if !self.users.contains_key(&book.user_id) {
            tracing::warn!(
                "Book {} references unknown owner {}; it will not be searchable",
                book.book_id.0,
                book.user_id.0
            );
        }
        self.books.insert(book.book_id, book);
    }

    /// Marks the backing store reachable or not. While offline every read
    /// fails with `StorageUnavailable`.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        tracing::info!("Catalog marked {}", if online { "online" } else { "offline" });
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn ensure_online(&self) -> SearchResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchError::StorageUnavailable(
                "book catalog is offline".to_string(),
            ))
        }
    }

    fn join_owner(&self, book: &Book) -> Option<BookListing> {
        let owner = self.users.get(&book.user_id)?;
        Some(BookListing {
            book: book.clone(),
            owner_name: owner.full_name.clone(),
            owner_email: owner.email.clone(),
        })
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BookCollection for MemoryCatalog {
    fn query(
        &self,
        predicate: &dyn Fn(&Book) -> bool,
        offset: usize,
        limit: usize,
    ) -> SearchResult<CollectionPage> {
        self.ensure_online()?;

        let mut matches: Vec<BookListing> = self
            .books
            .iter()
            .filter(|entry| predicate(entry.value()))
            .filter_map(|entry| self.join_owner(entry.value()))
            .collect();

        matches.sort_by(|a, b| {
            b.book
                .created_at
                .cmp(&a.book.created_at)
                .then_with(|| b.book.book_id.cmp(&a.book.book_id))
        });

        let total = matches.len();
        let listings = matches.into_iter().skip(offset).take(limit).collect();

        Ok(CollectionPage { listings, total })
    }

    fn get(&self, id: BookId) -> SearchResult<Option<BookListing>> {
        self.ensure_online()?;

        Ok(self
            .books
            .get(&id)
            .and_then(|entry| self.join_owner(entry.value())))
    }
}
