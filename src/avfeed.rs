//! Parsing of the secondary XML feed an `app.avlink` teaser points at.
//!
//! The feed is RSS-shaped: one `channel` wrapping one `item`, with the
//! interesting fields spread over two vendor namespaces.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::{Error, Result};

/// Namespace table for the item feed.
const NS_APP: &[u8] = b"http://www.wdr.de/rss/1.0/modules/app/1.0/";
const NS_MP: &[u8] = b"http://www.wdr.de/rss/1.0/modules/mp";

/// Raw field set of one feed item. Values are captured as written; the
/// mapping layer owns conversion and required-field policy.
#[derive(Debug, Default)]
pub struct AvItem {
    pub title: Option<String>,
    /// `app:stand`, an "as of" timestamp string.
    pub stand: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub channel_description: Option<String>,
    pub image: Option<String>,
    /// Embedded JSON document with the stream variants.
    pub player_media_collection: Option<String>,
}

impl AvItem {
    /// Item description, falling back to the channel description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().or(self.channel_description.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Title,
    Stand,
    Duration,
    Description,
    ChannelDescription,
    Image,
    Collection,
}

/// Event-driven parse over the namespace-resolving reader. The first
/// occurrence of each field wins; unknown elements are ignored.
pub fn parse_av_feed(xml: &[u8]) -> Result<AvItem> {
    let mut reader = NsReader::from_reader(xml);
    let mut buf = Vec::new();
    let mut item = AvItem::default();
    let mut in_item = false;
    let mut in_image = false;
    let mut slot: Option<Slot> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::Parse(format!("bad feed xml: {e}")))?;
        match event {
            Event::Start(e) => {
                let (res, local) = reader.resolve_element(e.name());
                let ns: Option<&[u8]> = match res {
                    ResolveResult::Bound(Namespace(n)) => Some(n),
                    _ => None,
                };
                slot = match (ns, local.as_ref()) {
                    (None, b"item") => {
                        in_item = true;
                        None
                    }
                    (None, b"title") if in_item => Some(Slot::Title),
                    (None, b"description") => {
                        if in_item {
                            Some(Slot::Description)
                        } else {
                            Some(Slot::ChannelDescription)
                        }
                    }
                    (Some(NS_APP), b"stand") if in_item => Some(Slot::Stand),
                    (Some(NS_APP), b"duration") if in_item => Some(Slot::Duration),
                    (Some(NS_APP), b"playerMediaCollection") if in_item => Some(Slot::Collection),
                    (Some(NS_MP), b"image") if in_item => {
                        in_image = true;
                        None
                    }
                    (Some(NS_MP), b"data") if in_image => Some(Slot::Image),
                    _ => None,
                };
            }
            Event::Text(t) => {
                if let Some(s) = slot {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::Parse(format!("bad feed text: {e}")))?;
                    store(&mut item, s, text.trim());
                }
            }
            Event::CData(t) => {
                if let Some(s) = slot {
                    let raw = t.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    store(&mut item, s, text.trim());
                }
            }
            Event::End(e) => {
                let (_, local) = reader.resolve_element(e.name());
                match local.as_ref() {
                    b"item" => in_item = false,
                    b"image" => in_image = false,
                    _ => {}
                }
                slot = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(item)
}

fn store(item: &mut AvItem, slot: Slot, text: &str) {
    if text.is_empty() {
        return;
    }
    let field = match slot {
        Slot::Title => &mut item.title,
        Slot::Stand => &mut item.stand,
        Slot::Duration => &mut item.duration,
        Slot::Description => &mut item.description,
        Slot::ChannelDescription => &mut item.channel_description,
        Slot::Image => &mut item.image,
        Slot::Collection => &mut item.player_media_collection,
    };
    if field.is_none() {
        *field = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:app="http://www.wdr.de/rss/1.0/modules/app/1.0/"
     xmlns:mp="http://www.wdr.de/rss/1.0/modules/mp">
  <channel>
    <title>Sportschau</title>
    <description>Channel description</description>
    <item>
      <title>Relegation: das Hinspiel</title>
      <description>Item description</description>
      <app:stand>2024-03-02T17:15:00 +0100</app:stand>
      <app:duration>312</app:duration>
      <app:playerMediaCollection><![CDATA[{"streams":[{"media":[{"maxHResolutionPx":720,"url":"https://cdn/video.mp4"}]}]}]]></app:playerMediaCollection>
      <mp:image>
        <mp:data>https://cdn/image.jpg</mp:data>
      </mp:image>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn captures_namespaced_fields() {
        let item = parse_av_feed(FEED.as_bytes()).unwrap();
        assert_eq!(item.title.as_deref(), Some("Relegation: das Hinspiel"));
        assert_eq!(item.stand.as_deref(), Some("2024-03-02T17:15:00 +0100"));
        assert_eq!(item.duration.as_deref(), Some("312"));
        assert_eq!(item.description(), Some("Item description"));
        assert_eq!(item.image.as_deref(), Some("https://cdn/image.jpg"));
        assert!(item.player_media_collection.as_deref().unwrap().contains("maxHResolutionPx"));
    }

    #[test]
    fn falls_back_to_channel_description() {
        let feed = FEED.replace("<description>Item description</description>", "");
        let item = parse_av_feed(feed.as_bytes()).unwrap();
        assert_eq!(item.description(), Some("Channel description"));
    }

    #[test]
    fn channel_title_does_not_shadow_item_title() {
        let item = parse_av_feed(FEED.as_bytes()).unwrap();
        assert_ne!(item.title.as_deref(), Some("Sportschau"));
    }

    #[test]
    fn truncated_xml_is_a_parse_error() {
        let feed = &FEED.as_bytes()[..120];
        assert!(matches!(parse_av_feed(feed), Err(Error::Parse(_))));
    }

    #[test]
    fn foreign_namespace_elements_are_ignored() {
        let feed = FEED.replace(
            "<app:duration>312</app:duration>",
            "<mp:duration>999</mp:duration><app:duration>312</app:duration>",
        );
        let item = parse_av_feed(feed.as_bytes()).unwrap();
        assert_eq!(item.duration.as_deref(), Some("312"));
    }
}
