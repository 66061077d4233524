//! Search Session State Machine
//!
//! `SearchSession` holds everything one page view knows about its search and
//! implements every state transition as a plain method. It performs no I/O:
//! the controller asks it for a `QueryRequest`, sends that request however it
//! likes, and feeds the outcome back through [`SearchSession::apply`].
//!
//! ```text
//! Idle --> Loading --> Loaded --+
//!             ^    \-> Error ---+
//!             +-----------------+
//! ```

use super::window::PaginationWindow;
use crate::error::SearchError;
use crate::search::criteria::FilterCriteria;
use crate::search::types::{BookView, SearchResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing requested yet.
    Idle,
    /// The latest request has not answered yet.
    Loading,
    Loaded,
    /// The latest request failed; results on display are from before it.
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First page for new criteria; results replace the display.
    Reset,
    /// Next page for the current criteria; results are appended.
    LoadMore,
}

/// One query as issued by the session.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub seq: u64,
    pub kind: RequestKind,
    pub criteria: FilterCriteria,
    pub offset: usize,
    pub limit: usize,
}

/// What applying a response did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Replaced { count: usize },
    Appended { count: usize },
    Failed,
    /// A newer request was issued in the meantime; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    criteria: FilterCriteria,
    window: PaginationWindow,
    books: Vec<BookView>,
    seq: u64,
    state: SearchState,
    in_flight: Option<u64>,
    last_request: Option<QueryRequest>,
}

impl SearchSession {
    pub fn new(limit: usize) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            window: PaginationWindow::reset(limit.max(1)),
            books: Vec::new(),
            seq: 0,
            state: SearchState::Idle,
            in_flight: None,
            last_request: None,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn window(&self) -> &PaginationWindow {
        &self.window
    }

    pub fn books(&self) -> &[BookView] {
        &self.books
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Sequence number of the most recently issued request.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_load_more(&self) -> bool {
        self.state == SearchState::Loaded && self.window.has_more && self.in_flight.is_none()
    }

    /// New criteria from the (debounced) input. Issues a reset request unless
    /// the criteria are unchanged and something has already been requested.
    pub fn change_filters(&mut self, criteria: FilterCriteria) -> Option<QueryRequest> {
        if self.state != SearchState::Idle && FilterCriteria::equals(&criteria, &self.criteria) {
            return None;
        }
        Some(self.issue_reset(criteria))
    }

    /// Re-runs the first page of the current criteria unconditionally.
    pub fn refresh(&mut self) -> QueryRequest {
        let criteria = self.criteria.clone();
        self.issue_reset(criteria)
    }

    pub fn load_more(&mut self) -> Option<QueryRequest> {
        if !self.can_load_more() {
            return None;
        }
        let request = QueryRequest {
            seq: self.next_seq(),
            kind: RequestKind::LoadMore,
            criteria: self.criteria.clone(),
            offset: self.window.offset,
            limit: self.window.limit,
        };
        Some(self.begin(request))
    }

    /// Re-issues the request that failed, under a fresh sequence number.
    pub fn retry(&mut self) -> Option<QueryRequest> {
        if !matches!(self.state, SearchState::Error { .. }) {
            return None;
        }
        let mut request = self.last_request.clone()?;
        request.seq = self.next_seq();
        Some(self.begin(request))
    }

    /// Feeds back the outcome of request `seq`. Outcomes of anything but the
    /// latest request are dropped without touching the session.
    pub fn apply(&mut self, seq: u64, outcome: Result<SearchResponse, SearchError>) -> Applied {
        if seq != self.seq || self.in_flight != Some(seq) {
            return Applied::Stale;
        }
        self.in_flight = None;

        let kind = self
            .last_request
            .as_ref()
            .map(|request| request.kind)
            .unwrap_or(RequestKind::Reset);

        match outcome {
            Ok(response) => {
                let count = response.books.len();
                self.window = PaginationWindow::advance(self.window, count, response.total);
                self.state = SearchState::Loaded;
                match kind {
                    RequestKind::Reset => {
                        self.books = response.books;
                        Applied::Replaced { count }
                    }
                    RequestKind::LoadMore => {
                        self.books.extend(response.books);
                        Applied::Appended { count }
                    }
                }
            }
            Err(e) => {
                self.state = SearchState::Error {
                    message: e.to_string(),
                };
                Applied::Failed
            }
        }
    }

    fn issue_reset(&mut self, criteria: FilterCriteria) -> QueryRequest {
        self.criteria = criteria;
        self.window = PaginationWindow::reset(self.window.limit);
        let request = QueryRequest {
            seq: self.next_seq(),
            kind: RequestKind::Reset,
            criteria: self.criteria.clone(),
            offset: 0,
            limit: self.window.limit,
        };
        self.begin(request)
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn begin(&mut self, request: QueryRequest) -> QueryRequest {
        self.state = SearchState::Loading;
        self.in_flight = Some(request.seq);
        self.last_request = Some(request.clone());
        request
    }
}
