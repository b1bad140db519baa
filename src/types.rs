use serde::{Deserialize, Serialize};

/// Navigable root-menu entry. Every field is soft: whatever the upstream
/// item carries is carried over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuNode {
    pub url: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub position: Option<i64>,
    pub target_type: Option<String>,
    pub href: Option<String>,
}

/// Browsable sub-category link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcategoryNode {
    pub name: String,
    pub href: String,
}

/// Playable media item with a resolved stream URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub name: String,
    /// Publish time, epoch seconds.
    pub published_at: i64,
    pub duration_secs: i64,
    /// Recording time where the upstream carries one.
    pub recorded_at: Option<i64>,
    pub description: String,
    pub image_url: String,
    /// Always non-empty and resolved, never a template or a variant list.
    pub playback_url: String,
    /// Section heading of the enclosing teaser group.
    pub group_title: Option<String>,
}

/// One entry of a sub-category or flat page, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageEntry {
    Category(SubcategoryNode),
    Playable(MediaRecord),
}

impl PageEntry {
    /// Display name, the deduplication key.
    pub fn name(&self) -> &str {
        match self {
            PageEntry::Category(c) => &c.name,
            PageEntry::Playable(r) => &r.name,
        }
    }
}
