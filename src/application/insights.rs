//! Catalog-wide aggregates: genre index, search suggestions and stats.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::application::metrics::MetricsSnapshot;
use crate::domain::entities::ContentRecord;

pub const MAX_SUGGESTIONS: usize = 8;
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;
const MOST_POPULAR_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub genres: Vec<String>,
    pub genre_counts: BTreeMap<String, usize>,
    pub total_genres: usize,
}

/// Number of records carrying each genre, keyed by the genre's exact spelling.
pub fn genre_counts(records: &[ContentRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        for genre in &record.genre {
            *counts.entry(genre.clone()).or_insert(0) += 1;
        }
    }
    counts
}

pub fn genre_summary(records: &[ContentRecord]) -> GenreSummary {
    let genre_counts = genre_counts(records);
    let genres: Vec<String> = genre_counts.keys().cloned().collect();
    GenreSummary {
        total_genres: genres.len(),
        genres,
        genre_counts,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    Title { text: String, content_id: u64 },
    Genre { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
    pub query: String,
}

/// Title matches in store order, then genre matches in alphabetical order,
/// capped at [`MAX_SUGGESTIONS`]. Queries shorter than
/// [`MIN_SUGGESTION_QUERY_CHARS`] produce no suggestions.
pub fn suggestions(records: &[ContentRecord], raw_query: &str) -> SuggestionList {
    let query = raw_query.to_lowercase();
    if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
        return SuggestionList {
            suggestions: Vec::new(),
            query,
        };
    }

    let titles = records
        .iter()
        .filter(|record| record.title.to_lowercase().contains(&query))
        .map(|record| Suggestion::Title {
            text: record.title.clone(),
            content_id: record.id,
        });

    let genres: BTreeSet<&String> = records.iter().flat_map(|record| &record.genre).collect();
    let genres = genres
        .into_iter()
        .filter(|genre| genre.to_lowercase().contains(&query))
        .map(|genre| Suggestion::Genre {
            text: genre.clone(),
        });

    SuggestionList {
        suggestions: titles.chain(genres).take(MAX_SUGGESTIONS).collect(),
        query,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePerformance {
    pub hits: u64,
    pub misses: u64,
    /// Percentage of lookups served from cache, rounded to two decimals.
    pub hit_ratio: f64,
}

impl CachePerformance {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        let lookups = (snapshot.cache_hits + snapshot.cache_misses).max(1);
        Self {
            hits: snapshot.cache_hits,
            misses: snapshot.cache_misses,
            hit_ratio: round2(snapshot.cache_hits as f64 / lookups as f64 * 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_content: usize,
    pub total_views: u64,
    pub total_likes: u64,
    pub average_duration_minutes: f64,
    pub content_by_genre: BTreeMap<String, usize>,
    pub most_popular: Vec<ContentRecord>,
    pub cache_performance: CachePerformance,
}

pub fn catalog_stats(records: &[ContentRecord], metrics: &MetricsSnapshot) -> CatalogStats {
    let total_content = records.len();
    let total_views = records.iter().map(|record| record.views).sum();
    let total_likes = records.iter().map(|record| record.likes).sum();
    let total_seconds: u64 = records.iter().map(|record| u64::from(record.duration)).sum();
    let average_duration_minutes = if total_content == 0 {
        0.0
    } else {
        round2(total_seconds as f64 / total_content as f64 / 60.0)
    };

    let mut most_popular = records.to_vec();
    most_popular.sort_by(|a, b| b.views.cmp(&a.views));
    most_popular.truncate(MOST_POPULAR_LIMIT);

    CatalogStats {
        total_content,
        total_views,
        total_likes,
        average_duration_minutes,
        content_by_genre: genre_counts(records),
        most_popular,
        cache_performance: CachePerformance::from_snapshot(metrics),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
