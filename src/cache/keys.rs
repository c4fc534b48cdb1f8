//! Cache key derivation.

use serde_json::json;

use crate::application::query::NormalizedQuery;

/// Identifies one cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A listing page, keyed by every normalized query parameter.
    ContentList(NormalizedQuery),
    /// An enhanced detail document.
    ContentDetail(u64),
    /// The genre index.
    Genres,
}

impl CacheKey {
    /// Render the storage key.
    ///
    /// Listing parameters are embedded as compact JSON with sorted fields, so
    /// an absent genre (`null`) never collides with any literal value and
    /// separators inside search text cannot shift field boundaries.
    pub fn render(&self) -> String {
        match self {
            CacheKey::ContentList(query) => {
                let params = json!({
                    "genre": query.genre,
                    "search": query.search,
                    "sort_by": query.sort_by,
                    "limit": query.window.limit,
                    "offset": query.window.offset,
                });
                format!("content_list:{params}")
            }
            CacheKey::ContentDetail(id) => format!("content_detail:{id}"),
            CacheKey::Genres => "available_genres".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::ContentList(_) => "content_list",
            CacheKey::ContentDetail(_) => "content_detail",
            CacheKey::Genres => "available_genres",
        }
    }
}
