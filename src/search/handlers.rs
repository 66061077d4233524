use super::criteria::{FilterCriteria, RawFilters};
use super::engine::{BookQueryService, DEFAULT_LIMIT};
use super::protocol::*;
use super::types::*;
use crate::catalog::types::{BookId, BookListing, UserId};
use crate::error::SearchError;
use crate::viewer::{ContactPolicy, SESSION_HEADER, ViewerDirectory};

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;

/// Everything the search endpoints need, shared across requests.
pub struct SearchContext {
    pub service: Arc<BookQueryService>,
    pub viewers: Arc<ViewerDirectory>,
    pub contact_policy: ContactPolicy,
}

impl SearchContext {
    fn present(&self, listing: BookListing, viewer: Option<UserId>) -> BookView {
        let reveal = self.contact_policy.reveals_email(viewer);
        let in_wishlist = viewer.map(|user| self.viewers.is_wishlisted(user, listing.book.book_id));
        BookView::from_listing(listing, reveal, in_wishlist)
    }

    fn viewer(&self, headers: &HeaderMap) -> Option<UserId> {
        let token = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok());
        self.viewers.viewer(token)
    }
}

pub fn router(ctx: Arc<SearchContext>) -> Router {
    Router::new()
        .route(ENDPOINT_SEARCH, get(handle_search))
        .route(&format!("{}/:id", ENDPOINT_BOOK), get(handle_get_book))
        .route(ENDPOINT_FACETS, get(handle_facets))
        .route(ENDPOINT_STATS, get(handle_stats))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(ctx))
}

pub async fn handle_search(
    Extension(ctx): Extension<Arc<SearchContext>>,
    headers: HeaderMap,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            let e = SearchError::InvalidArgument(rejection.body_text());
            return failure(&e).into_response();
        }
    };
    let offset = match parse_integer("offset", params.offset.as_deref(), 0) {
        Ok(offset) => offset,
        Err(e) => return failure(&e).into_response(),
    };
    let limit = match parse_integer("limit", params.limit.as_deref(), DEFAULT_LIMIT as i64) {
        Ok(limit) => limit,
        Err(e) => return failure(&e).into_response(),
    };

    let criteria = FilterCriteria::normalize(&RawFilters {
        search: params.search.unwrap_or_default(),
        genre: params.genre.unwrap_or_default(),
        condition: params.condition.unwrap_or_default(),
        location: params.location.unwrap_or_default(),
    });

    let page = match ctx.service.search(&criteria, offset, limit) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Search failed: {}", e);
            return failure(&e).into_response();
        }
    };

    // Both values were validated by the service.
    let offset = offset as usize;
    let limit = limit as usize;
    let viewer = ctx.viewer(&headers);
    let books: Vec<BookView> = page
        .books
        .into_iter()
        .map(|listing| ctx.present(listing, viewer))
        .collect();
    let count = books.len();

    (
        StatusCode::OK,
        Json(SearchResponse {
            success: true,
            books,
            total: page.total,
            offset,
            limit,
            has_more: offset + count < page.total,
            count,
        }),
    )
        .into_response()
}

pub async fn handle_get_book(
    Extension(ctx): Extension<Arc<SearchContext>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let id = match id.trim().parse::<u64>() {
        Ok(id) => BookId(id),
        Err(_) => {
            let e = SearchError::InvalidArgument(format!("book id must be an integer, got {}", id));
            return failure(&e).into_response();
        }
    };

    match ctx.service.book(id) {
        Ok(Some(listing)) => {
            let book = ctx.present(listing, ctx.viewer(&headers));
            (StatusCode::OK, Json(BookResponse { success: true, book })).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(FailureResponse {
                success: false,
                error: "not_found".to_string(),
                message: format!("Book {} is not available", id.0),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Book lookup failed: {}", e);
            failure(&e).into_response()
        }
    }
}

pub async fn handle_facets(Extension(ctx): Extension<Arc<SearchContext>>) -> Response {
    match ctx.service.facets() {
        Ok(facets) => (StatusCode::OK, Json(facets)).into_response(),
        Err(e) => {
            tracing::error!("Facet listing failed: {}", e);
            failure(&e).into_response()
        }
    }
}

pub async fn handle_stats(Extension(ctx): Extension<Arc<SearchContext>>) -> Response {
    match ctx.service.stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            tracing::error!("Stats failed: {}", e);
            failure(&e).into_response()
        }
    }
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "book-exchange".to_string(),
        status: "ok".to_string(),
    })
}

fn failure(err: &SearchError) -> (StatusCode, Json<FailureResponse>) {
    let status = match err {
        SearchError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        SearchError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(FailureResponse {
            success: false,
            error: err.kind().to_string(),
            message: err.to_string(),
        }),
    )
}

/// Missing or blank means `default`; anything else must be an integer.
fn parse_integer(name: &str, raw: Option<&str>, default: i64) -> Result<i64, SearchError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse::<i64>().map_err(|_| {
            SearchError::InvalidArgument(format!("{} must be an integer, got {:?}", name, value))
        }),
    }
}
