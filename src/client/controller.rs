//! Search Controller
//!
//! Drives a `SearchSession` from user events. The controller is a single tokio
//! task: it waits on the event channel, the debounce deadline and the requests
//! still in flight, and hands every wake-up to the session.
//!
//! ## Responsibilities
//! - **Debounce**: Each input replaces the pending deadline; only the last input
//!   of a quiet period reaches the session.
//! - **Dispatch**: Requests issued by the session are sent through the transport
//!   and polled inside the controller task.
//! - **Staleness**: Superseded requests are not cancelled; the session drops
//!   their responses on arrival.

use super::render::RenderAdapter;
use super::session::{Applied, QueryRequest, SearchSession, SearchState};
use super::transport::SearchTransport;
use crate::error::SearchError;
use crate::search::criteria::{FilterCriteria, RawFilters};
use crate::search::types::SearchResponse;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// The search box or a facet changed. Debounced.
    Input(RawFilters),
    /// Load the first page of the current criteria now (initial page load).
    Refresh,
    LoadMore,
    /// Re-issue the request that failed.
    Retry,
}

type InFlight = Pin<Box<dyn Future<Output = (u64, Result<SearchResponse, SearchError>)> + Send>>;

pub struct SearchController<R> {
    session: SearchSession,
    transport: Arc<dyn SearchTransport>,
    renderer: R,
    debounce: Duration,
    pending: Option<(RawFilters, Instant)>,
    in_flight: FuturesUnordered<InFlight>,
}

impl<R: RenderAdapter + 'static> SearchController<R> {
    pub fn new(transport: Arc<dyn SearchTransport>, renderer: R, limit: usize) -> Self {
        Self {
            session: SearchSession::new(limit),
            transport,
            renderer,
            debounce: DEFAULT_DEBOUNCE,
            pending: None,
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Runs the controller on its own task. Dropping every sender ends the
    /// session once pending input and in-flight requests have settled.
    pub fn spawn(self) -> (mpsc::Sender<ControllerEvent>, JoinHandle<(SearchSession, R)>) {
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<ControllerEvent>) -> (SearchSession, R) {
        let mut closed = false;

        loop {
            if closed && self.pending.is_none() && self.in_flight.is_empty() {
                break;
            }
            let deadline = self.pending.as_ref().map(|(_, at)| *at);

            tokio::select! {
                event = events.recv(), if !closed => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        tracing::debug!("Event channel closed; settling session");
                        closed = true;
                    }
                },
                _ = wait_until(deadline), if deadline.is_some() => self.fire_debounced(),
                Some((seq, outcome)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(seq, outcome)
                }
            }
        }

        (self.session, self.renderer)
    }

    fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Input(raw) => {
                self.pending = Some((raw, Instant::now() + self.debounce));
            }
            ControllerEvent::Refresh => {
                let request = self.session.refresh();
                self.dispatch(request);
            }
            ControllerEvent::LoadMore => match self.session.load_more() {
                Some(request) => self.dispatch(request),
                None => tracing::debug!(
                    "Load-more ignored (state={:?}, has_more={}, in_flight={})",
                    self.session.state(),
                    self.session.window().has_more,
                    self.session.is_in_flight()
                ),
            },
            ControllerEvent::Retry => match self.session.retry() {
                Some(request) => self.dispatch(request),
                None => tracing::debug!("Retry ignored; last request did not fail"),
            },
        }
    }

    fn fire_debounced(&mut self) {
        let Some((raw, _)) = self.pending.take() else {
            return;
        };
        let criteria = FilterCriteria::normalize(&raw);
        match self.session.change_filters(criteria) {
            Some(request) => self.dispatch(request),
            None => tracing::debug!("Criteria unchanged; no request"),
        }
    }

    fn dispatch(&mut self, request: QueryRequest) {
        tracing::debug!(
            "Request #{} {:?} offset={} limit={}",
            request.seq,
            request.kind,
            request.offset,
            request.limit
        );
        self.renderer.state_changed(self.session.state());

        let seq = request.seq;
        let fetch = self.transport.fetch(&request);
        self.in_flight.push(Box::pin(async move { (seq, fetch.await) }));
    }

    fn complete(&mut self, seq: u64, outcome: Result<SearchResponse, SearchError>) {
        match self.session.apply(seq, outcome) {
            Applied::Stale => {
                tracing::debug!("Dropping stale response #{} (latest #{})", seq, self.session.seq());
                return;
            }
            Applied::Replaced { .. } => {
                self.renderer
                    .replace(self.session.books(), self.session.window());
            }
            Applied::Appended { count } => {
                let books = self.session.books();
                self.renderer
                    .append(&books[books.len() - count..], self.session.window());
            }
            Applied::Failed => {
                if let SearchState::Error { message } = self.session.state() {
                    tracing::warn!("Request #{} failed: {}", seq, message);
                }
            }
        }
        self.renderer.state_changed(self.session.state());
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
