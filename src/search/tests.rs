//! Search Module Tests
//!
//! Validates the server half of the search protocol.
//!
//! ## Test Scopes
//! - **Criteria**: Normalization and equality of raw filter inputs.
//! - **Engine**: Predicate semantics, windowing, argument validation and failure propagation.
//! - **Handlers**: The JSON contract of the HTTP endpoints, driven through the router.

#[cfg(test)]
mod tests {
    use crate::catalog::fixtures::{catalog_with, varied_catalog};
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::types::{BookId, CatalogSeed, Condition, UserId};
    use crate::error::SearchError;
    use crate::search::criteria::{FilterCriteria, RawFilters};
    use crate::search::engine::BookQueryService;
    use crate::search::handlers::{SearchContext, router};
    use crate::search::types::{SearchReply, SearchResponse};
    use crate::viewer::{ContactPolicy, SESSION_HEADER, ViewerDirectory};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn service(catalog: MemoryCatalog) -> BookQueryService {
        BookQueryService::new(Arc::new(catalog))
    }

    fn criteria(raw: RawFilters) -> FilterCriteria {
        FilterCriteria::normalize(&raw)
    }

    fn titles(service: &BookQueryService, raw: RawFilters) -> Vec<String> {
        service
            .search(&criteria(raw), 0, 20)
            .unwrap()
            .books
            .into_iter()
            .map(|l| l.book.title)
            .collect()
    }

    // ============================================================
    // CRITERIA TESTS
    // ============================================================

    #[test]
    fn test_normalize_trims_and_drops_blanks() {
        let c = criteria(
            RawFilters::default()
                .with_search("  dune ")
                .with_genre("   ")
                .with_location(" Madrid "),
        );

        assert_eq!(c.search_text, "dune");
        assert_eq!(c.genre, None);
        assert_eq!(c.location.as_deref(), Some("Madrid"));
        assert_eq!(c.condition, None);
    }

    #[test]
    fn test_normalize_unknown_condition_is_no_constraint() {
        let c = criteria(RawFilters::default().with_condition("Like New"));
        assert_eq!(c, FilterCriteria::default());

        let c = criteria(RawFilters::default().with_condition("very good"));
        assert_eq!(c.condition, Some(Condition::VeryGood));
    }

    #[test]
    fn test_equality_ignores_surrounding_whitespace() {
        let a = criteria(RawFilters::default().with_search("ato").with_genre("Fiction"));
        let b = criteria(RawFilters::default().with_search(" ato  ").with_genre("Fiction "));
        let c = criteria(RawFilters::default().with_search("atom").with_genre("Fiction"));

        assert!(FilterCriteria::equals(&a, &b));
        assert!(!FilterCriteria::equals(&a, &c));
    }

    #[test]
    fn test_to_raw_round_trips() {
        let c = criteria(
            RawFilters::default()
                .with_search("hobbit")
                .with_condition("fair")
                .with_location("Barcelona"),
        );

        assert_eq!(FilterCriteria::normalize(&c.to_raw()), c);
        assert_eq!(c.to_raw().condition, "Fair");
    }

    // ============================================================
    // ENGINE TESTS - predicate
    // ============================================================

    #[test]
    fn test_unconstrained_total_counts_available_books() {
        let service = service(catalog_with(11));

        let page = service.search(&FilterCriteria::default(), 0, 9).unwrap();

        assert_eq!(page.total, 11, "the unavailable book must not be counted");
    }

    #[test]
    fn test_genre_match_is_case_insensitive_equality() {
        let service = service(varied_catalog());

        assert_eq!(titles(&service, RawFilters::default().with_genre("fantasy")), vec!["The Hobbit"]);
        // "Fiction" must not match "Science Fiction".
        assert_eq!(titles(&service, RawFilters::default().with_genre("Fiction")), vec!["Atonement"]);
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let service = service(varied_catalog());

        let found = titles(&service, RawFilters::default().with_location("MADRID"));

        assert_eq!(found, vec!["Atonement", "Dune"]);
    }

    #[test]
    fn test_text_matches_title_author_or_description() {
        let service = service(varied_catalog());

        assert_eq!(titles(&service, RawFilters::default().with_search("hobbit")), vec!["The Hobbit"]);
        assert_eq!(titles(&service, RawFilters::default().with_search("AUSTEN")), vec!["Emma"]);
        assert_eq!(titles(&service, RawFilters::default().with_search("dragon")), vec!["The Hobbit"]);
    }

    #[test]
    fn test_facets_combine_conjunctively() {
        let service = service(varied_catalog());

        let hit = titles(
            &service,
            RawFilters::default()
                .with_search("spice")
                .with_condition("Excellent")
                .with_location("madrid"),
        );
        assert_eq!(hit, vec!["Dune"]);

        let miss = titles(
            &service,
            RawFilters::default().with_search("spice").with_condition("Fair"),
        );
        assert!(miss.is_empty());
    }

    #[test]
    fn test_unavailable_books_never_match() {
        let service = service(varied_catalog());

        assert!(titles(&service, RawFilters::default().with_search("Dracula")).is_empty());
        assert!(titles(&service, RawFilters::default().with_genre("Horror")).is_empty());
    }

    #[test]
    fn test_unknown_genre_matches_nothing() {
        let service = service(catalog_with(4));

        let page = service
            .search(&criteria(RawFilters::default().with_genre("Mystery")), 0, 9)
            .unwrap();

        assert!(page.books.is_empty());
        assert_eq!(page.total, 0);
    }

    // ============================================================
    // ENGINE TESTS - windowing
    // ============================================================

    #[test]
    fn test_eleven_books_two_pages() {
        let service = service(catalog_with(11));
        let all = FilterCriteria::default();

        let first = service.search(&all, 0, 9).unwrap();
        assert_eq!(first.books.len(), 9);
        assert_eq!(first.total, 11);

        let second = service.search(&all, 9, 9).unwrap();
        assert_eq!(second.books.len(), 2);
        assert_eq!(second.total, 11);

        let first_ids: Vec<BookId> = first.books.iter().map(|l| l.book.book_id).collect();
        assert!(second.books.iter().all(|l| !first_ids.contains(&l.book.book_id)));
    }

    #[test]
    fn test_offset_past_total_is_empty_with_total() {
        let service = service(catalog_with(5));

        let page = service.search(&FilterCriteria::default(), 18, 9).unwrap();

        assert!(page.books.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_repeated_search_is_idempotent() {
        let service = service(varied_catalog());
        let c = criteria(RawFilters::default().with_search("a"));

        let first = service.search(&c, 0, 9).unwrap();
        let second = service.search(&c, 0, 9).unwrap();

        assert_eq!(first.books, second.books);
        assert_eq!(first.total, second.total);
    }

    #[test]
    fn test_invalid_windows_are_rejected() {
        let service = BookQueryService::with_max_limit(Arc::new(catalog_with(3)), 50);
        let all = FilterCriteria::default();

        for (offset, limit) in [(0, 0), (0, -3), (-1, 9), (0, 51)] {
            let err = service.search(&all, offset, limit).unwrap_err();
            assert!(
                matches!(err, SearchError::InvalidArgument(_)),
                "offset={} limit={} should be rejected, got {:?}",
                offset,
                limit,
                err
            );
        }
        assert!(service.search(&all, 0, 50).is_ok());
    }

    #[test]
    fn test_storage_failure_is_not_an_empty_result() {
        let catalog = catalog_with(3);
        catalog.set_online(false);
        let service = service(catalog);

        let err = service.search(&FilterCriteria::default(), 0, 9).unwrap_err();

        assert!(matches!(err, SearchError::StorageUnavailable(_)));
    }

    // ============================================================
    // ENGINE TESTS - supplementary lookups
    // ============================================================

    #[test]
    fn test_facets_are_sorted_and_exclude_unavailable() {
        let service = service(varied_catalog());

        let facets = service.facets().unwrap();

        assert_eq!(facets.genres, vec!["Fantasy", "Fiction", "Romance", "Science Fiction"]);
        assert_eq!(
            facets.locations,
            vec!["Barcelona", "Las Palmas de Gran Canaria", "Madrid", "madrid centro"]
        );
        assert_eq!(facets.conditions, vec!["Excellent", "Very Good", "Good", "Fair"]);
    }

    #[test]
    fn test_stats_count_available_books_and_owners() {
        let service = service(varied_catalog());

        let stats = service.stats().unwrap();

        assert_eq!(stats.available_books, 4);
        assert_eq!(stats.owners, 2);
    }

    #[test]
    fn test_book_lookup_hides_unavailable() {
        let service = service(varied_catalog());

        assert!(service.book(BookId(1)).unwrap().is_some());
        assert!(service.book(BookId(5)).unwrap().is_none());
        assert!(service.book(BookId(99)).unwrap().is_none());
    }

    // ============================================================
    // HANDLER TESTS
    // ============================================================

    fn app(catalog: MemoryCatalog, policy: ContactPolicy) -> (Router, Arc<ViewerDirectory>) {
        let viewers = Arc::new(ViewerDirectory::new());
        let ctx = Arc::new(SearchContext {
            service: Arc::new(service(catalog)),
            viewers: viewers.clone(),
            contact_policy: policy,
        });
        (router(ctx), viewers)
    }

    async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(SESSION_HEADER, token);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_endpoint_pages_through_eleven_books() {
        let (app, _) = app(catalog_with(11), ContactPolicy::Authenticated);

        let (status, body) = get_json(app.clone(), "/api/search_books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 9);
        assert_eq!(body["total"], 11);
        assert_eq!(body["limit"], 9);
        assert_eq!(body["hasMore"], true);

        let (_, body) = get_json(app, "/api/search_books?offset=9&limit=9", None).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["offset"], 9);
        assert_eq!(body["hasMore"], false);
    }

    #[tokio::test]
    async fn test_search_endpoint_empty_result_is_success() {
        let (app, _) = app(catalog_with(11), ContactPolicy::Authenticated);

        let (status, body) = get_json(app, "/api/search_books?genre=Mystery", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["books"], serde_json::json!([]));
        assert_eq!(body["total"], 0);
        assert_eq!(body["hasMore"], false);
    }

    #[tokio::test]
    async fn test_search_endpoint_rejects_zero_limit() {
        let (app, _) = app(catalog_with(3), ContactPolicy::Authenticated);

        let (status, body) = get_json(app, "/api/search_books?limit=0", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "invalid_argument");
        assert!(body.get("books").is_none(), "no partial book list on failure");
    }

    #[tokio::test]
    async fn test_search_endpoint_rejects_non_integer_offset() {
        let (app, _) = app(catalog_with(3), ContactPolicy::Authenticated);

        let (status, body) = get_json(app, "/api/search_books?offset=abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_argument");
    }

    #[tokio::test]
    async fn test_search_endpoint_reports_storage_failure() {
        let catalog = catalog_with(3);
        catalog.set_online(false);
        let (app, _) = app(catalog, ContactPolicy::Authenticated);

        let (status, body) = get_json(app, "/api/search_books", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "storage_unavailable");
    }

    #[tokio::test]
    async fn test_search_endpoint_applies_filters_from_query_string() {
        let (app, _) = app(varied_catalog(), ContactPolicy::Public);

        let (_, body) = get_json(
            app,
            "/api/search_books?search=%20spice%20&condition=excellent&location=madrid",
            None,
        )
        .await;

        assert_eq!(body["total"], 1);
        assert_eq!(body["books"][0]["title"], "Dune");
        assert_eq!(body["books"][0]["book_condition"], "Excellent");
        assert_eq!(body["books"][0]["owner_email"], "owner2@example.org");
    }

    #[tokio::test]
    async fn test_owner_email_withheld_from_anonymous_viewers() {
        let (app, viewers) = app(varied_catalog(), ContactPolicy::Authenticated);
        viewers.open_session("token-1", UserId(1));
        viewers.add_to_wishlist(UserId(1), BookId(3));

        let (_, anonymous) = get_json(app.clone(), "/api/search_books?search=hobbit", None).await;
        let book = &anonymous["books"][0];
        assert_eq!(book["owner_name"], "Owner 2");
        assert!(book["owner_email"].is_null());
        assert!(book.get("in_wishlist").is_none());

        let (_, known) = get_json(app, "/api/search_books?search=hobbit", Some("token-1")).await;
        let book = &known["books"][0];
        assert_eq!(book["owner_email"], "owner2@example.org");
        assert_eq!(book["in_wishlist"], true);
    }

    #[tokio::test]
    async fn test_seeded_session_reveals_contact_and_wishlist() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json");
        let seed = CatalogSeed::read(&path).unwrap();
        let viewers = Arc::new(ViewerDirectory::from_seed(&seed));
        let ctx = Arc::new(SearchContext {
            service: Arc::new(service(MemoryCatalog::from_seed(seed))),
            viewers,
            contact_policy: ContactPolicy::Authenticated,
        });
        let app = router(ctx);

        let (_, anonymous) = get_json(app.clone(), "/api/search_books?search=left%20hand", None).await;
        assert!(anonymous["books"][0]["owner_email"].is_null());

        let (_, body) =
            get_json(app.clone(), "/api/search_books?search=left%20hand", Some("demo-lucia")).await;
        let book = &body["books"][0];
        assert_eq!(book["title"], "The Left Hand of Darkness");
        assert_eq!(book["owner_email"], "ana@example.org");
        assert_eq!(book["in_wishlist"], true);

        let (_, body) = get_json(app, "/api/search_books?search=middlemarch", Some("demo-lucia")).await;
        assert_eq!(body["books"][0]["in_wishlist"], false);
    }

    #[tokio::test]
    async fn test_search_endpoint_malformed_query_is_json_failure() {
        let (app, _) = app(catalog_with(3), ContactPolicy::Authenticated);

        let (status, body) = get_json(app, "/api/search_books?offset=1&offset=2", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "invalid_argument");
        assert!(body.get("books").is_none());
    }

    #[tokio::test]
    async fn test_hidden_policy_withholds_email_from_everyone() {
        let (app, viewers) = app(varied_catalog(), ContactPolicy::Hidden);
        viewers.open_session("token-1", UserId(1));

        let (_, body) = get_json(app, "/api/search_books", Some("token-1")).await;

        let books = body["books"].as_array().unwrap();
        assert_eq!(books.len(), 4);
        assert!(books.iter().all(|b| b["owner_email"].is_null()));
    }

    #[tokio::test]
    async fn test_search_response_parses_as_client_reply() {
        let (app, _) = app(catalog_with(2), ContactPolicy::Public);

        let (_, body) = get_json(app, "/api/search_books", None).await;

        let reply: SearchReply = serde_json::from_value(body).unwrap();
        match reply {
            SearchReply::Page(SearchResponse { books, total, .. }) => {
                assert_eq!(total, 2);
                assert_eq!(books[0].book.title, "Volume 2");
            }
            SearchReply::Failure(f) => panic!("unexpected failure: {:?}", f),
        }
    }

    #[tokio::test]
    async fn test_book_endpoint() {
        let (app, _) = app(varied_catalog(), ContactPolicy::Authenticated);

        let (status, body) = get_json(app.clone(), "/api/books/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["book"]["title"], "Emma");

        let (status, body) = get_json(app.clone(), "/api/books/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, _) = get_json(app, "/api/books/five", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_facets_and_stats_endpoints() {
        let (app, _) = app(varied_catalog(), ContactPolicy::Authenticated);

        let (_, facets) = get_json(app.clone(), "/api/facets", None).await;
        assert_eq!(facets["genres"].as_array().unwrap().len(), 4);

        let (_, stats) = get_json(app.clone(), "/api/stats", None).await;
        assert_eq!(stats["available_books"], 4);

        let (status, health) = get_json(app, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "ok");
    }
}
