//! Book Exchange Search Library
//!
//! The incremental search and pagination engine of a community book exchange.
//! The binaries (`main.rs` for the server, `bin/browse.rs` for the terminal
//! client) are thin wrappers around these modules.
//!
//! ## Architecture Modules
//! - **`catalog`**: The read-only book/user collection the search runs against,
//!   with an in-memory backend seeded from JSON.
//! - **`search`**: Server side. Normalizes filters, runs the windowed query and
//!   exposes it (plus facet/stats/book lookups) over HTTP.
//! - **`client`**: Client side. The debounced `SearchController`, its pure
//!   `SearchSession` state machine and the transports that reach the server.
//! - **`viewer`**: The login/wishlist facts and owner-contact policy applied to results.
//! - **`config`**: Command-line and environment configuration for both binaries.
//! - **`error`**: The `SearchError` taxonomy shared by both sides.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod search;
pub mod viewer;
