use super::criteria::FilterCriteria;
use super::types::{CatalogStats, Facets, SearchPage};
use crate::catalog::memory::BookCollection;
use crate::catalog::types::{Book, BookId, BookListing, Condition};
use crate::error::{SearchError, SearchResult};

use std::collections::BTreeSet;
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 9;
pub const DEFAULT_MAX_LIMIT: usize = 100;

/// Executes filter criteria against the book collection.
///
/// Holds no mutable state of its own, so one instance is shared by every
/// request handler.
pub struct BookQueryService {
    collection: Arc<dyn BookCollection>,
    max_limit: usize,
}

impl BookQueryService {
    pub fn new(collection: Arc<dyn BookCollection>) -> Self {
        Self::with_max_limit(collection, DEFAULT_MAX_LIMIT)
    }

    pub fn with_max_limit(collection: Arc<dyn BookCollection>, max_limit: usize) -> Self {
        Self {
            collection,
            max_limit: max_limit.max(1),
        }
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Runs one windowed search.
    ///
    /// `offset` and `limit` are signed so that callers can pass untrusted values
    /// straight through; anything negative (or a zero/oversized limit) is
    /// rejected before the collection is queried.
    pub fn search(&self, criteria: &FilterCriteria, offset: i64, limit: i64) -> SearchResult<SearchPage> {
        let (offset, limit) = self.validate_window(offset, limit)?;
        let predicate = BookPredicate::new(criteria);

        let page = self
            .collection
            .query(&|book| predicate.matches(book), offset, limit)?;

        tracing::debug!(
            "search {:?} offset={} limit={} -> {} of {}",
            criteria,
            offset,
            limit,
            page.listings.len(),
            page.total
        );

        Ok(SearchPage {
            books: page.listings,
            total: page.total,
        })
    }

    pub fn book(&self, id: BookId) -> SearchResult<Option<BookListing>> {
        Ok(self
            .collection
            .get(id)?
            .filter(|listing| listing.book.is_available))
    }

    /// Distinct genres and locations across available books, sorted, plus the
    /// condition enumeration in its natural order.
    pub fn facets(&self) -> SearchResult<Facets> {
        let page = self.collection.query(&|book| book.is_available, 0, usize::MAX)?;

        let genres: BTreeSet<String> = page.listings.iter().map(|l| l.book.genre.clone()).collect();
        let locations: BTreeSet<String> = page
            .listings
            .iter()
            .map(|l| l.book.location.clone())
            .collect();

        Ok(Facets {
            genres: genres.into_iter().collect(),
            locations: locations.into_iter().collect(),
            conditions: Condition::ALL.iter().map(|c| c.label().to_string()).collect(),
        })
    }

    pub fn stats(&self) -> SearchResult<CatalogStats> {
        let page = self.collection.query(&|book| book.is_available, 0, usize::MAX)?;
        let owners: BTreeSet<_> = page.listings.iter().map(|l| l.book.user_id).collect();

        Ok(CatalogStats {
            available_books: page.total,
            owners: owners.len(),
        })
    }

    fn validate_window(&self, offset: i64, limit: i64) -> SearchResult<(usize, usize)> {
        if limit <= 0 {
            return Err(SearchError::InvalidArgument(format!(
                "limit must be positive, got {}",
                limit
            )));
        }
        if limit as u64 > self.max_limit as u64 {
            return Err(SearchError::InvalidArgument(format!(
                "limit must not exceed {}, got {}",
                self.max_limit, limit
            )));
        }
        if offset < 0 {
            return Err(SearchError::InvalidArgument(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        let offset = usize::try_from(offset).map_err(|_| {
            SearchError::InvalidArgument(format!("offset {} is out of range", offset))
        })?;

        Ok((offset, limit as usize))
    }
}

/// Conjunctive predicate built once per query from normalized criteria.
pub struct BookPredicate {
    genre: Option<String>,
    condition: Option<Condition>,
    location: Option<String>,
    text: Option<String>,
}

impl BookPredicate {
    pub fn new(criteria: &FilterCriteria) -> Self {
        Self {
            genre: criteria.genre.as_ref().map(|g| g.to_lowercase()),
            condition: criteria.condition,
            location: criteria.location.as_ref().map(|l| l.to_lowercase()),
            text: (!criteria.search_text.is_empty()).then(|| criteria.search_text.to_lowercase()),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        if !book.is_available {
            return false;
        }
        if let Some(genre) = &self.genre
            && book.genre.to_lowercase() != *genre
        {
            return false;
        }
        if let Some(condition) = self.condition
            && book.book_condition != condition
        {
            return false;
        }
        if let Some(location) = &self.location
            && !book.location.to_lowercase().contains(location.as_str())
        {
            return false;
        }
        if let Some(text) = &self.text {
            let text = text.as_str();
            return book.title.to_lowercase().contains(text)
                || book.author.to_lowercase().contains(text)
                || book.description.to_lowercase().contains(text);
        }
        true
    }
}
