use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extract::{extract, extract_i64, extract_str};
use crate::jpath;

/// One resolution-specific stream URL among several for the same item.
/// Consumed only by [`select_stream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    pub max_height_px: Option<i64>,
    pub url: String,
}

/// Pulls the variant list out of an embedded `playerMediaCollection`
/// document. Entries without a URL are not variants and are dropped here,
/// which keeps the non-empty-playback invariant downstream.
pub fn parse_variants(collection: &Value) -> Vec<StreamVariant> {
    let Some(media) = extract(collection, jpath!["streams", 0, "media"]).and_then(Value::as_array)
    else {
        return Vec::new();
    };
    media
        .iter()
        .filter_map(|m| {
            let url = extract_str(m, jpath!["url"])?.to_string();
            let max_height_px = extract_i64(m, jpath!["maxHResolutionPx"]);
            Some(StreamVariant { max_height_px, url })
        })
        .collect()
}

/// Picks the playback URL from a variant list.
///
/// Variants are stable-sorted by the lexical ordering of their present field
/// names (a variant carrying a resolution sorts under
/// `["maxHeightPx", "url"]`, one without under `["url"]`) and the first entry
/// wins. The resolution values themselves are never compared.
pub fn select_stream(variants: &[StreamVariant]) -> Result<&str> {
    if variants.is_empty() {
        return Err(Error::NoVariants);
    }
    let mut ordered: Vec<&StreamVariant> = variants.iter().collect();
    ordered.sort_by_key(|v| field_names(v));
    let picked = &ordered[0].url;
    debug!(url = picked.as_str(), candidates = variants.len(), "selected stream");
    Ok(picked)
}

fn field_names(v: &StreamVariant) -> Vec<&'static str> {
    let mut keys = vec!["url"];
    if v.max_height_px.is_some() {
        keys.push("maxHeightPx");
    }
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variant(px: Option<i64>, url: &str) -> StreamVariant {
        StreamVariant { max_height_px: px, url: url.to_string() }
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(matches!(select_stream(&[]), Err(Error::NoVariants)));
    }

    #[test]
    fn equal_key_sets_keep_source_order() {
        // Both variants expose the same field names, so the stable sort
        // leaves them untouched and the first one wins regardless of px.
        let variants = [variant(Some(720), "a"), variant(Some(480), "b")];
        assert_eq!(select_stream(&variants).unwrap(), "a");

        let variants = [variant(Some(480), "b"), variant(Some(720), "a")];
        assert_eq!(select_stream(&variants).unwrap(), "b");
    }

    #[test]
    fn shorter_key_set_sorts_first() {
        // ["maxHeightPx", "url"] orders before ["url"].
        let variants = [variant(None, "bare"), variant(Some(1080), "full")];
        assert_eq!(select_stream(&variants).unwrap(), "full");
    }

    #[test]
    fn parses_media_list() {
        let collection = json!({
            "streams": [{
                "media": [
                    {"maxHResolutionPx": 720, "url": "https://cdn/high.mp4"},
                    {"maxHResolutionPx": "480", "url": "https://cdn/low.mp4"},
                    {"maxHResolutionPx": 360}
                ]
            }]
        });
        let variants = parse_variants(&collection);
        assert_eq!(
            variants,
            vec![
                variant(Some(720), "https://cdn/high.mp4"),
                variant(Some(480), "https://cdn/low.mp4"),
            ]
        );
    }

    #[test]
    fn missing_streams_is_empty() {
        assert!(parse_variants(&json!({})).is_empty());
        assert!(parse_variants(&json!({"streams": []})).is_empty());
    }
}
