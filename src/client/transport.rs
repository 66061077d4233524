//! Query Transports
//!
//! The controller's only way of reaching the query service. A transport turns a
//! `QueryRequest` into a future resolving to the service's response; every
//! failure the controller can see is a `NetworkFailure`.

use super::session::QueryRequest;
use crate::error::SearchError;
use crate::search::engine::BookQueryService;
use crate::search::protocol::ENDPOINT_SEARCH;
use crate::search::types::{BookView, SearchReply, SearchResponse};
use crate::viewer::{ContactPolicy, SESSION_HEADER};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Type-erased, sendable future produced by a transport.
pub type QueryFuture = Pin<Box<dyn Future<Output = Result<SearchResponse, SearchError>> + Send>>;

pub trait SearchTransport: Send + Sync {
    fn fetch(&self, request: &QueryRequest) -> QueryFuture;
}

/// Talks to the search endpoint over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    session_token: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: None,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn url_for(&self, request: &QueryRequest) -> String {
        let raw = request.criteria.to_raw();
        format!(
            "{}{}?search={}&genre={}&condition={}&location={}&offset={}&limit={}",
            self.base_url,
            ENDPOINT_SEARCH,
            urlencoding::encode(&raw.search),
            urlencoding::encode(&raw.genre),
            urlencoding::encode(&raw.condition),
            urlencoding::encode(&raw.location),
            request.offset,
            request.limit
        )
    }
}

impl SearchTransport for HttpTransport {
    fn fetch(&self, request: &QueryRequest) -> QueryFuture {
        let url = self.url_for(request);
        let mut builder = self.client.get(url).timeout(self.timeout);
        if let Some(token) = &self.session_token {
            builder = builder.header(SESSION_HEADER, token);
        }

        Box::pin(async move {
            let response = builder
                .send()
                .await
                .map_err(|e| SearchError::NetworkFailure(e.to_string()))?;

            let status = response.status();
            let reply = response.json::<SearchReply>().await;

            match reply {
                Ok(SearchReply::Page(page)) if status.is_success() && page.success => Ok(page),
                Ok(SearchReply::Failure(failure)) => Err(SearchError::NetworkFailure(format!(
                    "server returned {}: {}",
                    status, failure.message
                ))),
                Ok(SearchReply::Page(_)) => Err(SearchError::NetworkFailure(format!(
                    "server returned {}",
                    status
                ))),
                Err(e) => Err(SearchError::NetworkFailure(format!(
                    "unreadable response ({}): {}",
                    status, e
                ))),
            }
        })
    }
}

/// Calls a `BookQueryService` in-process, shaping its result exactly like the
/// HTTP endpoint does for an anonymous viewer.
pub struct LocalTransport {
    service: Arc<BookQueryService>,
    contact_policy: ContactPolicy,
}

impl LocalTransport {
    pub fn new(service: Arc<BookQueryService>, contact_policy: ContactPolicy) -> Self {
        Self {
            service,
            contact_policy,
        }
    }
}

impl SearchTransport for LocalTransport {
    fn fetch(&self, request: &QueryRequest) -> QueryFuture {
        let outcome = self
            .service
            .search(&request.criteria, request.offset as i64, request.limit as i64);
        let reveal = self.contact_policy.reveals_email(None);
        let (offset, limit) = (request.offset, request.limit);

        Box::pin(async move {
            let page = outcome.map_err(|e| SearchError::NetworkFailure(e.to_string()))?;
            let books: Vec<BookView> = page
                .books
                .into_iter()
                .map(|listing| BookView::from_listing(listing, reveal, None))
                .collect();
            let count = books.len();

            Ok(SearchResponse {
                success: true,
                books,
                total: page.total,
                offset,
                limit,
                has_more: offset + count < page.total,
                count,
            })
        })
    }
}
