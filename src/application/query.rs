//! Filter → sort → paginate pipeline over the content snapshot.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::application::pagination::{OffsetPage, PageWindow};
use crate::domain::entities::ContentRecord;

/// Sort order for content listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Title,
    Views,
    ReleaseDate,
    Likes,
}

impl SortKey {
    /// Unrecognized values fall back to [`SortKey::Title`].
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim() {
            "views" => SortKey::Views,
            "release_date" => SortKey::ReleaseDate,
            "likes" => SortKey::Likes,
            _ => SortKey::Title,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Views => "views",
            SortKey::ReleaseDate => "release_date",
            SortKey::Likes => "likes",
        }
    }

    /// Title ascends; every counter and the release date descend.
    fn compare(&self, a: &ContentRecord, b: &ContentRecord) -> Ordering {
        match self {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Views => b.views.cmp(&a.views),
            SortKey::ReleaseDate => b.release_date.cmp(&a.release_date),
            SortKey::Likes => b.likes.cmp(&a.likes),
        }
    }
}

/// Listing parameters as they arrive from the request.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    pub genre: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ContentQuery {
    pub fn normalize(&self) -> NormalizedQuery {
        let genre = self
            .genre
            .as_deref()
            .filter(|genre| !genre.is_empty())
            .map(str::to_string);
        let search = self
            .search
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let sort_by = self
            .sort_by
            .as_deref()
            .map(SortKey::parse_lossy)
            .unwrap_or_default();

        NormalizedQuery {
            genre,
            search,
            sort_by,
            window: PageWindow::from_raw(self.limit, self.offset),
        }
    }
}

/// Fully defaulted and clamped listing parameters.
///
/// An empty `search` keeps every record: the empty string is a substring of
/// any title, so no special case is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedQuery {
    pub genre: Option<String>,
    pub search: String,
    pub sort_by: SortKey,
    pub window: PageWindow,
}

impl NormalizedQuery {
    pub fn execute(&self, records: Vec<ContentRecord>) -> OffsetPage<ContentRecord> {
        let genre = self.genre.as_deref().map(str::to_lowercase);

        let mut matched: Vec<ContentRecord> = records
            .into_iter()
            .filter(|record| genre.as_deref().is_none_or(|genre| record.has_genre(genre)))
            .filter(|record| record.matches_search(&self.search))
            .collect();

        // `sort_by` is stable, so equal keys keep store order.
        matched.sort_by(|a, b| self.sort_by.compare(a, b));

        self.window.apply(matched)
    }

    pub fn filters(&self) -> AppliedFilters {
        AppliedFilters {
            genre: self.genre.clone(),
            search: self.search.clone(),
            sort_by: self.sort_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub genre: Option<String>,
    pub search: String,
    pub sort_by: SortKey,
}

/// Response envelope for content listings; cached as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentListing {
    pub content: Vec<ContentRecord>,
    pub pagination: PaginationMeta,
    pub filters: AppliedFilters,
    pub timestamp: String,
}

impl ContentListing {
    pub fn new(
        page: OffsetPage<ContentRecord>,
        filters: AppliedFilters,
        timestamp: String,
    ) -> Self {
        Self {
            pagination: PaginationMeta {
                total: page.total,
                limit: page.limit,
                offset: page.offset,
                has_more: page.has_more,
            },
            content: page.items,
            filters,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::seed_catalog;

    fn ids(page: &OffsetPage<ContentRecord>) -> Vec<u64> {
        page.items.iter().map(|record| record.id).collect()
    }

    fn query(genre: Option<&str>, search: Option<&str>, sort: Option<&str>) -> NormalizedQuery {
        ContentQuery {
            genre: genre.map(str::to_string),
            search: search.map(str::to_string),
            sort_by: sort.map(str::to_string),
            ..Default::default()
        }
        .normalize()
    }

    #[test]
    fn default_sort_is_title_ascending() {
        let page = query(None, None, None).execute(seed_catalog());
        assert_eq!(ids(&page), vec![4, 5, 3, 2, 1]);
        assert_eq!(page.total, 5);
        assert!(!page.has_more);
    }

    #[test]
    fn unknown_sort_falls_back_to_title() {
        let normalized = query(None, None, Some("rating"));
        assert_eq!(normalized.sort_by, SortKey::Title);
    }

    #[test]
    fn counters_and_dates_sort_descending() {
        let views = query(None, None, Some("views")).execute(seed_catalog());
        assert_eq!(ids(&views), vec![4, 1, 3, 5, 2]);

        let likes = query(None, None, Some("likes")).execute(seed_catalog());
        assert_eq!(ids(&likes), vec![4, 1, 3, 5, 2]);

        let released = query(None, None, Some("release_date")).execute(seed_catalog());
        assert_eq!(ids(&released), vec![4, 5, 2, 3, 1]);
    }

    #[test]
    fn equal_keys_keep_store_order() {
        let mut records = seed_catalog();
        for record in &mut records {
            record.views = 10;
        }
        let page = query(None, None, Some("views")).execute(records);
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn genre_filter_is_case_insensitive() {
        let lower = query(Some("devops"), None, None).execute(seed_catalog());
        let mixed = query(Some("DevOps"), None, None).execute(seed_catalog());
        assert_eq!(lower, mixed);
        assert_eq!(ids(&lower), vec![5, 3]);
    }

    #[test]
    fn devops_by_views_returns_both_matches() {
        let normalized = ContentQuery {
            genre: Some("DevOps".to_string()),
            sort_by: Some("views".to_string()),
            limit: Some(2),
            offset: Some(0),
            ..Default::default()
        }
        .normalize();
        let page = normalized.execute(seed_catalog());
        assert_eq!(ids(&page), vec![3, 5]);
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
    }

    #[test]
    fn search_matches_title_or_description() {
        let page = query(None, Some("KUBERNETES"), None).execute(seed_catalog());
        assert_eq!(ids(&page), vec![3]);

        let page = query(None, Some("serverless"), None).execute(seed_catalog());
        assert_eq!(ids(&page), vec![4]);
    }

    #[test]
    fn empty_search_and_genre_keep_everything() {
        let page = query(Some(""), Some(""), None).execute(seed_catalog());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn pagination_reports_more_pages() {
        let normalized = ContentQuery {
            limit: Some(2),
            offset: Some(2),
            ..Default::default()
        }
        .normalize();
        let page = normalized.execute(seed_catalog());
        assert_eq!(ids(&page), vec![3, 2]);
        assert!(page.has_more);
    }

    #[test]
    fn listing_envelope_serializes_pagination_block() {
        let normalized = query(Some("Cloud"), None, Some("likes"));
        let listing = ContentListing::new(
            normalized.execute(seed_catalog()),
            normalized.filters(),
            "2024-01-01T00:00:00Z".to_string(),
        );
        let value = serde_json::to_value(&listing).expect("serialize listing");
        assert_eq!(value["pagination"]["total"], 1);
        assert_eq!(value["filters"]["sort_by"], "likes");
        assert_eq!(value["filters"]["genre"], "Cloud");
        assert_eq!(value["content"][0]["id"], 4);
    }
}
