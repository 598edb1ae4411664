//! Citation extraction from grounding metadata

use pulse_core::GroundingChunk;

use crate::model::Source;

/// Title used when a web chunk carries none
pub const DEFAULT_SOURCE_TITLE: &str = "Source";

/// Map grounding chunks to sources, keeping provider order.
///
/// Only chunks with a web reference and a non-empty uri contribute.
pub fn extract_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            let title = web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_SOURCE_TITLE);

            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::WebReference;

    #[test]
    fn test_chunk_without_web_is_dropped() {
        let chunks = vec![
            GroundingChunk::web("https://news.example/btc", None),
            GroundingChunk::default(),
        ];

        let sources = extract_sources(&chunks);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Source");
        assert_eq!(sources[0].uri, "https://news.example/btc");
    }

    #[test]
    fn test_order_and_titles_kept() {
        let chunks = vec![
            GroundingChunk::web("https://a.example", Some("A")),
            GroundingChunk::web("https://b.example", Some("  ")),
            GroundingChunk::web("https://c.example", Some("C")),
        ];

        let titles: Vec<_> = extract_sources(&chunks).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["A", "Source", "C"]);
    }

    #[test]
    fn test_web_without_uri_is_dropped() {
        let chunks = vec![GroundingChunk {
            web: Some(WebReference {
                uri: None,
                title: Some("Orphan".into()),
            }),
        }];
        assert!(extract_sources(&chunks).is_empty());
        assert!(extract_sources(&[]).is_empty());
    }
}
