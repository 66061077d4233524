//! Shared test data for catalog-backed tests.

use super::memory::MemoryCatalog;
use super::types::*;

pub fn owner(id: u64) -> User {
    User {
        user_id: UserId(id),
        full_name: format!("Owner {}", id),
        email: format!("owner{}@example.org", id),
    }
}

pub fn book(id: u64, title: &str, author: &str, genre: &str, condition: Condition) -> Book {
    Book {
        book_id: BookId(id),
        user_id: UserId(1 + id % 2),
        title: title.to_string(),
        author: author.to_string(),
        isbn: None,
        genre: genre.to_string(),
        book_condition: condition,
        description: format!("A copy of {}", title),
        exchange_preference: "Swap for anything".to_string(),
        location: "Las Palmas".to_string(),
        cover_color: None,
        is_available: true,
        created_at: 1_700_000_000_000 + id * 1_000,
    }
}

/// Two owners and `available` available books, plus one unavailable book that
/// must never show up in search.
pub fn catalog_with(available: u64) -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog.put_user(owner(1));
    catalog.put_user(owner(2));

    for id in 1..=available {
        catalog.put_book(book(
            id,
            &format!("Volume {}", id),
            "Various",
            "Fiction",
            Condition::Good,
        ));
    }

    let mut hidden = book(1000, "Hidden Volume", "Various", "Fiction", Condition::Good);
    hidden.is_available = false;
    catalog.put_book(hidden);

    catalog
}

/// A small, varied catalog for facet and predicate tests.
pub fn varied_catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog.put_user(owner(1));
    catalog.put_user(owner(2));

    let mut dune = book(1, "Dune", "Frank Herbert", "Science Fiction", Condition::Excellent);
    dune.location = "Madrid".to_string();
    dune.description = "Desert planet politics and spice".to_string();
    dune.isbn = Some("9780441013593".to_string());

    let mut emma = book(2, "Emma", "Jane Austen", "Romance", Condition::VeryGood);
    emma.location = "Las Palmas de Gran Canaria".to_string();

    let mut hobbit = book(3, "The Hobbit", "J. R. R. Tolkien", "Fantasy", Condition::Fair);
    hobbit.location = "Barcelona".to_string();
    hobbit.description = "There and back again, with a dragon".to_string();

    let mut atonement = book(4, "Atonement", "Ian McEwan", "Fiction", Condition::Good);
    atonement.location = "madrid centro".to_string();

    let mut withdrawn = book(5, "Dracula", "Bram Stoker", "Horror", Condition::Good);
    withdrawn.is_available = false;

    for b in [dune, emma, hobbit, atonement, withdrawn] {
        catalog.put_book(b);
    }
    catalog
}
