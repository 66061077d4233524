use crate::catalog::types::{Book, BookListing};
use serde::{Deserialize, Serialize};

/// Query-string parameters of the search endpoint.
///
/// Offset and limit arrive as raw strings so that malformed values are reported
/// as `InvalidArgument` in the JSON failure body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// One window of matching listings, as produced by the query service.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub books: Vec<BookListing>,
    pub total: usize,
}

/// A book as sent over the wire: the stored record plus the joined owner details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub owner_name: String,
    /// `None` when the contact policy withholds it from this viewer.
    pub owner_email: Option<String>,
    /// Only present when the viewer is logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_wishlist: Option<bool>,
}

impl BookView {
    pub fn from_listing(listing: BookListing, reveal_email: bool, in_wishlist: Option<bool>) -> Self {
        Self {
            book: listing.book,
            owner_name: listing.owner_name,
            owner_email: reveal_email.then_some(listing.owner_email),
            in_wishlist,
        }
    }
}

/// Successful search response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub success: bool,
    pub books: Vec<BookView>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
    pub count: usize,
}

/// Failure body shared by every endpoint. Never carries a partial book list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

/// What a client may receive from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchReply {
    Page(SearchResponse),
    Failure(FailureResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub success: bool,
    pub book: BookView,
}

/// Values for the filter dropdowns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Facets {
    pub genres: Vec<String>,
    pub locations: Vec<String>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogStats {
    pub available_books: usize,
    pub owners: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}
