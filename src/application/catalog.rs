//! Catalog queries behind the read-through cache.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::debug;

use crate::application::detail::enhance;
use crate::application::insights::{
    CatalogStats, GenreSummary, SuggestionList, catalog_stats, genre_summary, suggestions,
};
use crate::application::metrics::ServiceMetrics;
use crate::application::query::{ContentListing, ContentQuery};
use crate::application::repos::{ContentRepo, RepoError};
use crate::cache::{CacheAdapter, CacheConfig, CacheKey, CacheLookup};
use crate::domain::entities::EnhancedDetail;
use crate::util::clock::now_rfc3339;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("content `{id}` not found")]
    NotFound { id: u64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Expiry applied to each cached payload family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub list: Duration,
    pub detail: Duration,
    pub genres: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            list: config.list_ttl,
            detail: config.detail_ttl,
            genres: config.genres_ttl,
        }
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ContentRepo>,
    cache: CacheAdapter,
    metrics: Arc<ServiceMetrics>,
    ttls: CacheTtls,
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn ContentRepo>,
        cache: CacheAdapter,
        metrics: Arc<ServiceMetrics>,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            repo,
            cache,
            metrics,
            ttls,
        }
    }

    /// Filtered, sorted and paginated listing.
    ///
    /// A cache hit returns the stored envelope untouched, timestamp included.
    pub async fn list(&self, query: &ContentQuery) -> Result<ContentListing, CatalogError> {
        let normalized = query.normalize();
        let key = CacheKey::ContentList(normalized.clone());

        if let CacheLookup::Hit(listing) = self.cache.get::<ContentListing>(&key).await {
            self.metrics.record_served(listing.content.len());
            return Ok(listing);
        }

        let records = self.repo.list_all().await?;
        let page = normalized.execute(records);
        let listing = ContentListing::new(page, normalized.filters(), now_rfc3339());

        self.cache.set(&key, &listing, self.ttls.list).await;
        self.metrics.record_served(listing.content.len());
        debug!(
            target: "content_service::catalog",
            total = listing.pagination.total,
            returned = listing.content.len(),
            "content listing computed"
        );
        Ok(listing)
    }

    /// One record with related items and streaming variants.
    pub async fn detail(&self, id: u64) -> Result<EnhancedDetail, CatalogError> {
        let key = CacheKey::ContentDetail(id);

        if let CacheLookup::Hit(detail) = self.cache.get::<EnhancedDetail>(&key).await {
            self.metrics.record_served(1);
            return Ok(detail);
        }

        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound { id })?;
        let records = self.repo.list_all().await?;
        let detail = enhance(target, &records, now_rfc3339());

        self.cache.set(&key, &detail, self.ttls.detail).await;
        self.metrics.record_served(1);
        Ok(detail)
    }

    pub async fn genres(&self) -> Result<GenreSummary, CatalogError> {
        let key = CacheKey::Genres;

        if let CacheLookup::Hit(summary) = self.cache.get::<GenreSummary>(&key).await {
            return Ok(summary);
        }

        let records = self.repo.list_all().await?;
        let summary = genre_summary(&records);
        self.cache.set(&key, &summary, self.ttls.genres).await;
        Ok(summary)
    }

    /// Uncached; the catalog is small and suggestions are typed per keystroke.
    pub async fn suggestions(&self, raw_query: &str) -> Result<SuggestionList, CatalogError> {
        let records = self.repo.list_all().await?;
        Ok(suggestions(&records, raw_query))
    }

    pub async fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let records = self.repo.list_all().await?;
        Ok(catalog_stats(&records, &self.metrics.snapshot()))
    }

    pub async fn content_total(&self) -> Result<usize, CatalogError> {
        Ok(self.repo.count().await?)
    }
}
