//! Search Service Module
//!
//! The server half of the incremental search protocol: it turns a query string
//! into normalized criteria, runs it against the book collection and returns
//! one window of results with an accurate total.
//!
//! ## Responsibilities
//! - **Normalization**: Trimming raw inputs into `FilterCriteria`; blanks mean "no constraint".
//! - **Filtering**: A conjunctive predicate over availability, facets and free text.
//! - **Windowing**: Ordering by creation time and slicing by offset/limit, with the total counted first.
//! - **API**: Exposing the query endpoint and the facet/stats/book lookups via Axum.
//!
//! ## Submodules
//! - **`criteria`**: `RawFilters` and `FilterCriteria`.
//! - **`engine`**: `BookQueryService` and the book predicate.
//! - **`handlers`**: HTTP request handlers and the router.
//! - **`protocol`**: Endpoint paths shared with the client transport.
//! - **`types`**: Data Transfer Objects (DTOs) for API communication.

pub mod criteria;
pub mod engine;
pub mod handlers;
pub mod protocol;
pub mod types;

#[cfg(test)]
mod tests;
