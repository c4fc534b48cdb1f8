use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use async_trait::async_trait;
use content_service::{
    application::{
        catalog::{CacheTtls, CatalogService},
        metrics::ServiceMetrics,
        repos::{ContentRepo, RepoError},
    },
    cache::{CacheAdapter, CacheConfig},
    domain::entities::ContentRecord,
    infra::{
        http::{HttpState, PROMETHEUS_CONTENT_TYPE, build_router},
        memory::InMemoryContentStore,
    },
};
use serde_json::Value;
use tower::ServiceExt;

fn state_with(cache: CacheAdapter, metrics: Arc<ServiceMetrics>) -> HttpState {
    let store = InMemoryContentStore::seeded().expect("seed catalog is valid");
    state_over(Arc::new(store), cache, metrics)
}

fn state_over(
    repo: Arc<dyn ContentRepo>,
    cache: CacheAdapter,
    metrics: Arc<ServiceMetrics>,
) -> HttpState {
    let catalog = CatalogService::new(
        repo,
        cache.clone(),
        Arc::clone(&metrics),
        CacheTtls::default(),
    );
    HttpState {
        catalog: Arc::new(catalog),
        metrics,
        cache,
        debug: false,
    }
}

fn cached_app() -> (Router, Arc<ServiceMetrics>) {
    let metrics = Arc::new(ServiceMetrics::new());
    let cache = CacheAdapter::from_config(&CacheConfig::memory(), Arc::clone(&metrics));
    (build_router(state_with(cache, Arc::clone(&metrics))), metrics)
}

fn uncached_app() -> Router {
    let metrics = Arc::new(ServiceMetrics::new());
    let cache = CacheAdapter::disabled(Arc::clone(&metrics));
    build_router(state_with(cache, metrics))
}

/// Store whose reads fail, or panic when `panics` is set.
struct BrokenRepo {
    panics: bool,
}

impl BrokenRepo {
    fn fail(&self) -> RepoError {
        if self.panics {
            panic!("store exploded");
        }
        RepoError::from_persistence("connection reset")
    }
}

#[async_trait]
impl ContentRepo for BrokenRepo {
    async fn list_all(&self) -> Result<Vec<ContentRecord>, RepoError> {
        Err(self.fail())
    }

    async fn find_by_id(&self, _id: u64) -> Result<Option<ContentRecord>, RepoError> {
        Err(self.fail())
    }

    async fn count(&self) -> Result<usize, RepoError> {
        Err(self.fail())
    }
}

fn broken_app(panics: bool) -> (Router, Arc<ServiceMetrics>) {
    let metrics = Arc::new(ServiceMetrics::new());
    let cache = CacheAdapter::disabled(Arc::clone(&metrics));
    let state = state_over(Arc::new(BrokenRepo { panics }), cache, Arc::clone(&metrics));
    (build_router(state), metrics)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router is infallible");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec();
    (status, body, content_type)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body, _) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("json body");
    (status, json)
}

fn ids(listing: &Value) -> Vec<u64> {
    listing["content"]
        .as_array()
        .expect("content array")
        .iter()
        .map(|item| item["id"].as_u64().expect("numeric id"))
        .collect()
}

#[tokio::test]
async fn listing_filters_sorts_and_paginates() {
    let (app, _) = cached_app();
    let (status, body) = get_json(&app, "/content?genre=DevOps&sort=views&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3, 5]);
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["pagination"]["has_more"], false);
    assert_eq!(body["filters"]["genre"], "DevOps");
    assert_eq!(body["filters"]["sort_by"], "views");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn default_listing_sorts_by_title() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![4, 5, 3, 2, 1]);
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["filters"]["genre"], Value::Null);
    assert_eq!(body["filters"]["search"], "");
    assert_eq!(body["filters"]["sort_by"], "title");
}

#[tokio::test]
async fn genre_filter_ignores_case() {
    let app = uncached_app();
    let (_, lower) = get_json(&app, "/content?genre=devops").await;
    let (_, exact) = get_json(&app, "/content?genre=DevOps").await;
    assert_eq!(ids(&lower), ids(&exact));
    assert_eq!(lower["filters"]["genre"], "devops");
}

#[tokio::test]
async fn search_matches_description_text() {
    let app = uncached_app();
    let (_, body) = get_json(&app, "/content?search=KUBERNETES").await;
    assert_eq!(ids(&body), vec![3]);
    assert_eq!(body["filters"]["search"], "kubernetes");
}

#[tokio::test]
async fn oversized_limit_is_capped() {
    let app = uncached_app();
    let (_, body) = get_json(&app, "/content?limit=500").await;
    assert_eq!(body["pagination"]["limit"], 100);
    assert_eq!(ids(&body).len(), 5);
}

#[tokio::test]
async fn offset_past_the_end_yields_an_empty_page() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content?offset=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["has_more"], false);
}

#[tokio::test]
async fn malformed_numbers_fall_back_to_defaults() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content?limit=abc&offset=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["pagination"]["offset"], 0);
}

#[tokio::test]
async fn repeated_listing_is_served_from_cache() {
    let (app, metrics) = cached_app();
    let uri = "/content?genre=Educational&sort=likes";

    let (_, first, _) = get(&app, uri).await;
    let (_, second, _) = get(&app, uri).await;

    assert_eq!(first, second);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.cache_hits, 1);
    assert_eq!(snapshot.requests_total, 2);
    assert_eq!(snapshot.content_served, 8);
}

#[tokio::test]
async fn detail_includes_related_content() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 3);
    assert_eq!(body["title"], "Kubernetes in Action");
    let related: Vec<u64> = body["related_content"]
        .as_array()
        .expect("related array")
        .iter()
        .map(|item| item["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(related, vec![2, 4, 5]);
    assert_eq!(
        body["streaming_urls"]["1080p"],
        "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x1080_5mb.mp4"
    );
    assert_eq!(body["accessibility"]["closed_captions"], true);
    assert!(body["accessed_at"].is_string());
}

#[tokio::test]
async fn unknown_content_is_not_found() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({ "error": "Content not found" }));

    let (status, body) = get_json(&app, "/content/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({ "error": "Content not found" }));
}

#[tokio::test]
async fn genres_are_sorted_and_counted() {
    let (app, _) = cached_app();
    let (status, body) = get_json(&app, "/genres").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["genres"],
        serde_json::json!([
            "Cloud",
            "DevOps",
            "Documentary",
            "Educational",
            "Programming",
            "Technology"
        ])
    );
    assert_eq!(body["genre_counts"]["Educational"], 4);
    assert_eq!(body["total_genres"], 6);
}

#[tokio::test]
async fn short_suggestion_queries_return_nothing() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/search/suggestions?q=k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"], serde_json::json!([]));
    assert_eq!(body["query"], "k");

    let (_, body) = get_json(&app, "/search/suggestions").await;
    assert_eq!(body["suggestions"], serde_json::json!([]));
}

#[tokio::test]
async fn suggestions_list_titles_before_genres() {
    let app = uncached_app();
    let (_, body) = get_json(&app, "/search/suggestions?q=Dev").await;
    assert_eq!(body["query"], "dev");
    assert_eq!(
        body["suggestions"],
        serde_json::json!([
            { "type": "title", "text": "DevOps Best Practices", "content_id": 5 },
            { "type": "genre", "text": "DevOps" }
        ])
    );
}

#[tokio::test]
async fn stats_summarize_the_catalog() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_content"], 5);
    assert_eq!(body["total_views"], 66_520);
    assert_eq!(body["total_likes"], 6_080);
    assert_eq!(body["average_duration_minutes"], 99.0);
    let popular: Vec<u64> = body["most_popular"]
        .as_array()
        .expect("popular array")
        .iter()
        .map(|item| item["id"].as_u64().expect("id"))
        .collect();
    assert_eq!(popular, vec![4, 1, 3]);
}

#[tokio::test]
async fn health_reports_cache_state() {
    let (app, _) = cached_app();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "content-service");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["dependencies"]["redis"], "healthy");
    assert_eq!(body["dependencies"]["database"], "mock");

    let (_, body) = get_json(&uncached_app(), "/health").await;
    assert_eq!(body["dependencies"]["redis"], "disconnected");
}

#[tokio::test]
async fn metrics_render_prometheus_text() {
    let (app, _) = cached_app();
    let _ = get(&app, "/content").await;
    let (status, body, content_type) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(PROMETHEUS_CONTENT_TYPE));
    let text = String::from_utf8(body).expect("utf-8 exposition");
    assert!(text.contains("# TYPE content_service_requests_total counter\n"));
    assert!(text.contains("content_service_requests_total 2\n"));
    assert!(text.contains("content_service_content_served_total 5\n"));
    assert!(text.contains("content_service_cache_misses_total 1\n"));
    assert!(text.contains("content_service_content_total 5\n"));
}

#[tokio::test]
async fn unmatched_routes_use_the_json_fallback() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let app = uncached_app();
    let (status, body) = get_json(&app, "/content?limit=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["limit"], 1);
    assert_eq!(ids(&body), vec![4]);

    let (status, body) = get_json(&app, "/search/suggestions?q=ku&q=de").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "ku");
    assert_eq!(
        body["suggestions"],
        serde_json::json!([
            { "type": "title", "text": "Kubernetes in Action", "content_id": 3 }
        ])
    );
}

#[tokio::test]
async fn store_failures_render_the_generic_500() {
    let (app, metrics) = broken_app(false);
    let (status, body) = get_json(&app, "/content").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({
            "error": "Internal server error",
            "message": "Something went wrong"
        })
    );
    assert_eq!(metrics.snapshot().errors, 1);
    assert_eq!(metrics.snapshot().requests_total, 1);
}

#[tokio::test]
async fn suggestions_survive_store_failures() {
    let (app, metrics) = broken_app(false);
    let (status, body) = get_json(&app, "/search/suggestions?q=dev").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"], serde_json::json!([]));
    assert_eq!(metrics.snapshot().errors, 0);
}

#[tokio::test]
async fn handler_panics_become_counted_500s() {
    let (app, metrics) = broken_app(true);
    let (status, body) = get_json(&app, "/stats").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "Something went wrong");
    assert_eq!(metrics.snapshot().errors, 1);

    let (status, _) = get_json(&app, "/content/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(metrics.snapshot().errors, 2);
}
