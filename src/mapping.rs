use chrono::DateTime;
use serde_json::Value;

use crate::avfeed::AvItem;
use crate::error::{Error, Result};
use crate::extract::{extract_i64, extract_str};
use crate::jpath;
use crate::streams::{parse_variants, select_stream};
use crate::types::{MediaRecord, MenuNode, SubcategoryNode};

/// Timestamp layout of the feed's `app:stand` field.
const STAND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S %z";

/// Maps one root-menu item. All fields are soft.
pub fn menu_node_from(item: &Value) -> MenuNode {
    MenuNode {
        url: extract_str(item, jpath!["url"]).map(str::to_string),
        name: extract_str(item, jpath!["name"]).map(str::to_string),
        path: extract_str(item, jpath!["path"]).map(str::to_string),
        position: extract_i64(item, jpath!["position"]),
        target_type: extract_str(item, jpath!["_links", "target", "type"]).map(str::to_string),
        href: extract_str(item, jpath!["_links", "target", "href"]).map(str::to_string),
    }
}

/// Maps a sub-category link target. A target without title or href is not
/// navigable and yields `None`.
pub fn subcategory_from(target: &Value) -> Option<SubcategoryNode> {
    Some(SubcategoryNode {
        name: extract_str(target, jpath!["title"])?.to_string(),
        href: extract_str(target, jpath!["href"])?.to_string(),
    })
}

/// Builds a playable record from an inline video teaser. Required fields
/// missing from the node fail this item only.
pub fn inline_record_from(teaser: &Value) -> Result<MediaRecord> {
    let name = extract_str(teaser, jpath!["title"])
        .ok_or_else(|| Error::parse("teaser has no title"))?
        .to_string();
    let pub_date_ms = extract_i64(teaser, jpath!["pubDate"])
        .ok_or_else(|| Error::parse("teaser has no pubDate"))?;
    let duration_secs = extract_i64(teaser, jpath!["app", "duration"])
        .ok_or_else(|| Error::parse("teaser has no duration"))?;
    let collection_raw = extract_str(teaser, jpath!["app", "playerMediaCollection"])
        .ok_or_else(|| Error::parse("teaser has no playerMediaCollection"))?;
    let collection: Value = serde_json::from_str(collection_raw)?;
    let playback_url = select_stream(&parse_variants(&collection))?.to_string();

    Ok(MediaRecord {
        name,
        // Upstream publishes milliseconds.
        published_at: pub_date_ms / 1000,
        duration_secs,
        recorded_at: extract_i64(teaser, jpath!["app", "beitragszeit"]),
        description: extract_str(teaser, jpath!["description"]).unwrap_or_default().to_string(),
        image_url: extract_str(teaser, jpath!["image", "images", 0, "imageUrl"])
            .unwrap_or_default()
            .to_string(),
        playback_url,
        group_title: None,
    })
}

/// Builds a playable record from a fetched av feed item. The `stand` time
/// doubles as publish and recording time.
pub fn av_record_from(item: &AvItem) -> Result<MediaRecord> {
    let name = item
        .title
        .clone()
        .ok_or_else(|| Error::parse("feed item has no title"))?;
    let stand = item
        .stand
        .as_deref()
        .ok_or_else(|| Error::parse("feed item has no stand time"))?;
    let epoch = parse_stand(stand)?;
    let duration_secs = item
        .duration
        .as_deref()
        .ok_or_else(|| Error::parse("feed item has no duration"))?
        .trim()
        .parse::<i64>()
        .map_err(|e| Error::Parse(format!("bad feed duration: {e}")))?;
    let description = item
        .description()
        .ok_or_else(|| Error::parse("feed has no description"))?
        .to_string();
    let collection_raw = item
        .player_media_collection
        .as_deref()
        .ok_or_else(|| Error::parse("feed item has no playerMediaCollection"))?;
    let collection: Value = serde_json::from_str(collection_raw)?;
    let playback_url = select_stream(&parse_variants(&collection))?.to_string();

    Ok(MediaRecord {
        name,
        published_at: epoch,
        duration_secs,
        recorded_at: Some(epoch),
        description,
        image_url: item.image.clone().unwrap_or_default(),
        playback_url,
        group_title: None,
    })
}

/// Parses a `Stand` timestamp like `2024-03-02T17:15:00 +0100` to epoch
/// seconds.
pub fn parse_stand(s: &str) -> Result<i64> {
    DateTime::parse_from_str(s.trim(), STAND_FORMAT)
        .map(|dt| dt.timestamp())
        .map_err(|e| Error::Parse(format!("bad stand timestamp {s:?}: {e}")))
}
