//! Book Catalog Module
//!
//! The read-only view of the marketplace's book and user records consumed by the
//! search core.
//!
//! ## Core Concepts
//! - **Records**: `Book` listings owned by `User`s; only available books are searchable.
//! - **Collection**: `BookCollection` is the query seam (predicate, ordering, windowing, total).
//! - **Memory backend**: `MemoryCatalog` keeps records in concurrent maps and is seeded from JSON.

pub mod memory;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;
