//! Detail enrichment: related items and streaming variants.

use crate::domain::entities::{Accessibility, ContentRecord, EnhancedDetail};

pub const MAX_RELATED: usize = 3;

/// Records sharing at least one genre with `target`, in store order,
/// excluding `target` itself and truncated to [`MAX_RELATED`].
pub fn related_content(target: &ContentRecord, records: &[ContentRecord]) -> Vec<ContentRecord> {
    records
        .iter()
        .filter(|candidate| candidate.id != target.id && target.shares_genre_with(candidate))
        .take(MAX_RELATED)
        .cloned()
        .collect()
}

pub fn enhance(
    target: ContentRecord,
    records: &[ContentRecord],
    accessed_at: String,
) -> EnhancedDetail {
    let related_content = related_content(&target, records);
    let streaming_urls = target.streaming_urls();
    EnhancedDetail {
        record: target,
        related_content,
        streaming_urls,
        accessibility: Accessibility::default(),
        accessed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::seed_catalog;

    fn related_ids(id: u64) -> Vec<u64> {
        let records = seed_catalog();
        let target = records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .expect("seeded record");
        related_content(&target, &records)
            .iter()
            .map(|record| record.id)
            .collect()
    }

    #[test]
    fn related_excludes_self_and_keeps_store_order() {
        // Microservices shares Technology with 1 and Educational/Programming with 3, 4, 5.
        assert_eq!(related_ids(2), vec![1, 3, 4]);
        assert_eq!(related_ids(5), vec![2, 3, 4]);
    }

    #[test]
    fn related_is_capped_at_three() {
        for id in 1..=5 {
            let related = related_ids(id);
            assert!(related.len() <= MAX_RELATED);
            assert!(!related.contains(&id));
        }
    }

    #[test]
    fn record_without_shared_genre_has_no_related() {
        let mut records = seed_catalog();
        records[0].genre = vec!["Anime".to_string()];
        let target = records[0].clone();
        assert!(related_content(&target, &records).is_empty());
    }

    #[test]
    fn enhance_keeps_timestamp_and_urls() {
        let records = seed_catalog();
        let detail = enhance(records[3].clone(), &records, "stamp".to_string());
        assert_eq!(detail.record.id, 4);
        assert_eq!(detail.accessed_at, "stamp");
        assert_eq!(detail.streaming_urls.hd, records[3].video_url);
        assert_eq!(
            detail
                .related_content
                .iter()
                .map(|record| record.id)
                .collect::<Vec<_>>(),
            vec![2, 3, 5]
        );
    }
}
