use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use metrics::gauge;
use serde::Serialize;
use tracing::warn;

use crate::application::insights::{CatalogStats, GenreSummary, SuggestionList};
use crate::application::metrics::{CONTENT_TOTAL, UPTIME_SECONDS};
use crate::application::query::{ContentListing, ContentQuery};
use crate::cache::CacheHealth;
use crate::domain::entities::EnhancedDetail;
use crate::util::clock::now_rfc3339;

use super::error::{ApiError, messages};
use super::state::HttpState;

pub const SERVICE_NAME: &str = "content-service";
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub dependencies: HealthDependencies,
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthDependencies {
    pub redis: CacheHealth,
    pub database: &'static str,
}

pub async fn health(State(state): State<HttpState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: now_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        dependencies: HealthDependencies {
            redis: state.cache.health().await,
            database: "mock",
        },
        uptime: state.metrics.uptime_seconds(),
    })
}

pub async fn metrics(State(state): State<HttpState>) -> Result<Response, ApiError> {
    let content_total = state
        .catalog
        .content_total()
        .await
        .map_err(|err| ApiError::from_catalog("infra::http::metrics", err, state.debug))?;
    let snapshot = state.metrics.snapshot();

    gauge!(UPTIME_SECONDS).set(snapshot.uptime_seconds as f64);
    gauge!(CONTENT_TOTAL).set(content_total as f64);

    let mut response = snapshot.render_prometheus(content_total).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(PROMETHEUS_CONTENT_TYPE),
    );
    Ok(response)
}

/// Query pairs in request order. Decoding into pairs never rejects, so
/// repeated or malformed keys can be resolved leniently afterwards.
type QueryPairs = Query<Vec<(String, String)>>;

/// First value of `key`, mirroring form frameworks that ignore repeats.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Raw listing parameters. Numbers stay strings so malformed values fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ContentParams {
    pub genre: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ContentParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            genre: first_value(pairs, "genre"),
            search: first_value(pairs, "search"),
            sort: first_value(pairs, "sort"),
            limit: first_value(pairs, "limit"),
            offset: first_value(pairs, "offset"),
        }
    }

    pub fn into_query(self) -> ContentQuery {
        ContentQuery {
            genre: self.genre,
            search: self.search,
            sort_by: self.sort,
            limit: parse_lenient(self.limit.as_deref()),
            offset: parse_lenient(self.offset.as_deref()),
        }
    }
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

pub async fn list_content(
    State(state): State<HttpState>,
    Query(pairs): QueryPairs,
) -> Result<Json<ContentListing>, ApiError> {
    let query = ContentParams::from_pairs(&pairs).into_query();
    state
        .catalog
        .list(&query)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_catalog("infra::http::list_content", err, state.debug))
}

pub async fn content_detail(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
) -> Result<Json<EnhancedDetail>, ApiError> {
    let Ok(id) = raw_id.parse::<u64>() else {
        return Err(ApiError::content_not_found(raw_id));
    };
    state
        .catalog
        .detail(id)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_catalog("infra::http::content_detail", err, state.debug))
}

pub async fn genres(State(state): State<HttpState>) -> Result<Json<GenreSummary>, ApiError> {
    state
        .catalog
        .genres()
        .await
        .map(Json)
        .map_err(|err| ApiError::from_catalog("infra::http::genres", err, state.debug))
}


/// Suggestions never fail the request; a store error yields an empty list.
pub async fn search_suggestions(
    State(state): State<HttpState>,
    Query(pairs): QueryPairs,
) -> Json<SuggestionList> {
    let raw = first_value(&pairs, "q").unwrap_or_default();
    match state.catalog.suggestions(&raw).await {
        Ok(list) => Json(list),
        Err(err) => {
            warn!(
                target: "content_service::http",
                error = %err,
                "search suggestions unavailable"
            );
            Json(SuggestionList {
                suggestions: Vec::new(),
                query: raw.to_lowercase(),
            })
        }
    }
}

pub async fn stats(State(state): State<HttpState>) -> Result<Json<CatalogStats>, ApiError> {
    state
        .catalog
        .stats()
        .await
        .map(Json)
        .map_err(|err| ApiError::from_catalog("infra::http::stats", err, state.debug))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found(
        "infra::http::fallback",
        messages::ROUTE_NOT_FOUND,
        "no route matched",
    )
}
