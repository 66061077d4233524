//! Search Client Module
//!
//! The client half of the incremental search protocol: a debounced controller
//! that keeps one page view's result list consistent while the user types,
//! changes facets and asks for more.
//!
//! ## Submodules
//! - **`window`**: `PaginationWindow`, the pure offset/limit/has-more bookkeeping.
//! - **`session`**: `SearchSession`, the pure state machine (no timers, no I/O).
//! - **`controller`**: `SearchController`, the async driver (debounce, dispatch, stale-drop).
//! - **`transport`**: How requests reach the query service (HTTP or in-process).
//! - **`render`**: The `RenderAdapter` seam towards whatever displays results.

pub mod controller;
pub mod render;
pub mod session;
pub mod transport;
pub mod window;
