//! Seed catalog loaded at process start.

use std::collections::HashSet;

use super::entities::ContentRecord;
use super::error::DomainError;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// The fixed content set the service boots with, in store order.
pub fn seed_catalog() -> Vec<ContentRecord> {
    vec![
        ContentRecord {
            id: 1,
            title: "The Future of Cloud Computing".to_string(),
            description: "Un documental fascinante sobre la evolución de la computación en la nube y su impacto en la tecnología moderna.".to_string(),
            duration: 7200,
            genre: strings(&["Documentary", "Technology"]),
            thumbnail: "https://images.unsplash.com/photo-1451187580459-43490279c0fa?w=400&h=600&fit=crop".to_string(),
            video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_1mb.mp4".to_string(),
            rating: "PG".to_string(),
            release_date: "2024-01-15".to_string(),
            director: "Tech Films Studio".to_string(),
            cast: strings(&["Dr. Sarah Chen", "Prof. Michael Rodriguez"]),
            language: "Spanish".to_string(),
            subtitles: strings(&["English", "Portuguese"]),
            views: 15420,
            likes: 1240,
            quality: strings(&["720p", "1080p", "4K"]),
        },
        ContentRecord {
            id: 2,
            title: "Microservices Architecture".to_string(),
            description: "Serie educativa sobre arquitecturas de microservicios, desde conceptos básicos hasta implementaciones avanzadas.".to_string(),
            duration: 3600,
            genre: strings(&["Educational", "Technology", "Programming"]),
            thumbnail: "https://images.unsplash.com/photo-1555066931-4365d14bab8c?w=400&h=600&fit=crop".to_string(),
            video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_2mb.mp4".to_string(),
            rating: "G".to_string(),
            release_date: "2024-02-01".to_string(),
            director: "DevOps Academy".to_string(),
            cast: strings(&["Alex Johnson", "Maria Garcia"]),
            language: "Spanish".to_string(),
            subtitles: strings(&["English"]),
            views: 8730,
            likes: 890,
            quality: strings(&["720p", "1080p"]),
        },
        ContentRecord {
            id: 3,
            title: "Kubernetes in Action".to_string(),
            description: "Guía práctica para implementar y gestionar aplicaciones en Kubernetes, desde desarrollo hasta producción.".to_string(),
            duration: 5400,
            genre: strings(&["Educational", "DevOps"]),
            thumbnail: "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400&h=600&fit=crop".to_string(),
            video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_5mb.mp4".to_string(),
            rating: "PG-13".to_string(),
            release_date: "2024-01-30".to_string(),
            director: "Cloud Native Studios".to_string(),
            cast: strings(&["David Kim", "Lisa Wang"]),
            language: "Spanish".to_string(),
            subtitles: strings(&["English", "French"]),
            views: 12350,
            likes: 1120,
            quality: strings(&["720p", "1080p", "4K"]),
        },
        ContentRecord {
            id: 4,
            title: "AWS Deep Dive".to_string(),
            description: "Curso completo sobre servicios de Amazon Web Services, desde EC2 hasta servicios serverless avanzados.".to_string(),
            duration: 9000,
            genre: strings(&["Educational", "Cloud"]),
            thumbnail: "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=400&h=600&fit=crop".to_string(),
            video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_1mb.mp4".to_string(),
            rating: "PG".to_string(),
            release_date: "2024-03-01".to_string(),
            director: "AWS Training".to_string(),
            cast: strings(&["Jennifer Park", "Carlos Rodriguez"]),
            language: "Spanish".to_string(),
            subtitles: strings(&["English"]),
            views: 20150,
            likes: 1850,
            quality: strings(&["720p", "1080p", "4K"]),
        },
        ContentRecord {
            id: 5,
            title: "DevOps Best Practices".to_string(),
            description: "Serie sobre las mejores prácticas en DevOps, incluyendo CI/CD, monitoreo y automatización.".to_string(),
            duration: 4500,
            genre: strings(&["Educational", "DevOps", "Programming"]),
            thumbnail: "https://images.unsplash.com/photo-1504639725590-34d0984388bd?w=400&h=600&fit=crop".to_string(),
            video_url: "https://sample-videos.com/zip/10/mp4/SampleVideo_1280x720_2mb.mp4".to_string(),
            rating: "G".to_string(),
            release_date: "2024-02-15".to_string(),
            director: "DevOps Institute".to_string(),
            cast: strings(&["Robert Chen", "Amanda Silva"]),
            language: "Spanish".to_string(),
            subtitles: strings(&["English", "Portuguese"]),
            views: 9870,
            likes: 980,
            quality: strings(&["720p", "1080p"]),
        },
    ]
}

/// Check the invariants every store relies on: positive unique ids, a
/// positive duration and at least one genre per record.
pub fn validate_catalog(records: &[ContentRecord]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.id == 0 {
            return Err(DomainError::ZeroId);
        }
        if !seen.insert(record.id) {
            return Err(DomainError::DuplicateId { id: record.id });
        }
        if record.duration == 0 {
            return Err(DomainError::invalid_record(record.id, "zero duration"));
        }
        if record.genre.is_empty() {
            return Err(DomainError::invalid_record(record.id, "no genre"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_catalog_is_valid() {
        let records = seed_catalog();
        assert_eq!(records.len(), 5);
        validate_catalog(&records).expect("seed catalog satisfies invariants");
        let ids: Vec<u64> = records.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records = seed_catalog();
        records[1].id = 1;
        let err = validate_catalog(&records).expect_err("duplicate id");
        assert!(err.to_string().contains("duplicate content id 1"));
    }

    #[test]
    fn empty_genre_is_rejected() {
        let mut records = seed_catalog();
        records[4].genre.clear();
        assert!(matches!(
            validate_catalog(&records),
            Err(DomainError::InvalidRecord { id: 5, .. })
        ));
    }
}
