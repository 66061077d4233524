//! HTTP API Endpoints
//!
//! Paths shared by the server router and the client transport.

/// Windowed, filtered listing of available books.
pub const ENDPOINT_SEARCH: &str = "/api/search_books";
/// Single available book by id (`/api/books/:id`).
pub const ENDPOINT_BOOK: &str = "/api/books";
/// Distinct genres, locations and conditions for the filter dropdowns.
pub const ENDPOINT_FACETS: &str = "/api/facets";
/// Available book and owner counts.
pub const ENDPOINT_STATS: &str = "/api/stats";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";
