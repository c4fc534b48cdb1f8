//! Catalog entities served by the content endpoints.

use serde::{Deserialize, Serialize};

/// One catalog entry. Immutable once the store has been seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Running time in seconds.
    pub duration: u32,
    pub genre: Vec<String>,
    pub thumbnail: String,
    pub video_url: String,
    pub rating: String,
    /// ISO-8601 calendar date; lexicographic order equals chronological order.
    pub release_date: String,
    pub director: String,
    pub cast: Vec<String>,
    pub language: String,
    pub subtitles: Vec<String>,
    pub views: u64,
    pub likes: u64,
    pub quality: Vec<String>,
}

impl ContentRecord {
    /// Case-insensitive genre membership. `needle` must already be lower-cased.
    pub fn has_genre(&self, needle: &str) -> bool {
        self.genre.iter().any(|genre| genre.to_lowercase() == needle)
    }

    /// Substring match over title and description. `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    pub fn shares_genre_with(&self, other: &ContentRecord) -> bool {
        other.genre.iter().any(|genre| self.genre.contains(genre))
    }

    pub fn streaming_urls(&self) -> StreamingUrls {
        StreamingUrls {
            hd: self.video_url.clone(),
            full_hd: self.video_url.replace("720", "1080"),
            uhd: self.video_url.replace("720", "2160"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingUrls {
    #[serde(rename = "720p")]
    pub hd: String,
    #[serde(rename = "1080p")]
    pub full_hd: String,
    #[serde(rename = "4K")]
    pub uhd: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessibility {
    pub closed_captions: bool,
    pub audio_description: bool,
}

impl Default for Accessibility {
    fn default() -> Self {
        Self {
            closed_captions: true,
            audio_description: true,
        }
    }
}

/// A record enriched with derived fields for the detail endpoint.
///
/// `accessed_at` is stamped when the detail is computed; a cached copy keeps
/// the timestamp of the original computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedDetail {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub related_content: Vec<ContentRecord>,
    pub streaming_urls: StreamingUrls,
    pub accessibility: Accessibility,
    pub accessed_at: String,
}
