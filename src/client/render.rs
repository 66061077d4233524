use super::session::SearchState;
use super::window::PaginationWindow;
use crate::search::types::BookView;

/// Receives display updates from the controller.
///
/// Implementations turn books into whatever fragments the front end needs; the
/// controller only guarantees that calls arrive in session order and that a
/// failed or stale request never produces a `replace` or `append`.
pub trait RenderAdapter: Send {
    /// The displayed list is now exactly `books`.
    fn replace(&mut self, books: &[BookView], window: &PaginationWindow);

    /// `books` were added to the end of the displayed list.
    fn append(&mut self, books: &[BookView], window: &PaginationWindow);

    fn state_changed(&mut self, state: &SearchState);
}

/// Discards every update.
pub struct NullRenderer;

impl RenderAdapter for NullRenderer {
    fn replace(&mut self, _books: &[BookView], _window: &PaginationWindow) {}

    fn append(&mut self, _books: &[BookView], _window: &PaginationWindow) {}

    fn state_changed(&mut self, _state: &SearchState) {}
}
