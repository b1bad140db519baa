pub mod avfeed;
pub mod dedupe;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod mapping;
pub mod settings;
pub mod storage;
pub mod streams;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fetcher::{AbortHandle, Fetch, HttpFetcher};
    pub use crate::settings::Settings;
    pub use crate::storage::{FileStore, Store};
    pub use crate::types::{MediaRecord, MenuNode, PageEntry, SubcategoryNode};
    pub use crate::Catalog;
}

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::dedupe::dedupe_by;
use crate::error::{Error, Result};
use crate::extract::{extract, extract_str};
use crate::fetcher::{Fetch, HttpFetcher};
use crate::settings::Settings;
use crate::storage::{FileStore, Store};
use crate::types::{MediaRecord, MenuNode, PageEntry};

/// Library entry point. Owns the cache store and the fetcher and exposes the
/// three page-level operations: root menu, sub-category page, flat page.
pub struct Catalog {
    store: Box<dyn Store>,
    fetcher: Arc<dyn Fetch>,
    settings: Settings,
}

impl Catalog {
    /// Wires a catalog from explicit collaborators.
    pub fn new(settings: Settings, fetcher: Arc<dyn Fetch>) -> Result<Self> {
        let dir = settings.resolve_data_dir()?;
        let store = Box::new(FileStore::new(dir)?);
        Ok(Self { store, fetcher, settings })
    }

    /// Convenience constructor using the default HTTP fetcher.
    pub fn open(settings: Settings) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&settings.user_agent)?);
        Self::new(settings, fetcher)
    }

    /// Root menu: one navigable node per second-level entry, in source
    /// order.
    pub async fn root(&self) -> Result<Vec<MenuNode>> {
        let data = self.load_json(&self.settings.menu_url).await?;
        let mut nodes = Vec::new();
        if let Some(categories) = extract(&data, jpath!["items", 1, "items"]).and_then(Value::as_array)
        {
            for item in categories {
                nodes.push(mapping::menu_node_from(item));
            }
        }
        debug!(count = nodes.len(), "root menu");
        Ok(nodes)
    }

    /// Sub-category page: subcategory links first, then playable teasers,
    /// deduplicated by display name.
    pub async fn subcategory(&self, url: &str) -> Result<Vec<PageEntry>> {
        let data = self.load_json(url).await?;
        let mut entries = Vec::new();
        if let Some(subs) = extract(&data, jpath!["subCategories"]).and_then(Value::as_array) {
            for sub in subs {
                match extract(sub, jpath!["_links", "target"]).and_then(mapping::subcategory_from) {
                    Some(node) => entries.push(PageEntry::Category(node)),
                    None => warn!("skipping subcategory without title or href"),
                }
            }
        }
        entries.extend(self.teaser_records(&data).await?.into_iter().map(PageEntry::Playable));
        Ok(dedupe_by(entries, |e| e.name().to_string()))
    }

    /// Flat page, following the single-item news indirection when present.
    pub async fn page(&self, url: &str) -> Result<Vec<PageEntry>> {
        let mut data = self.load_json(url).await?;
        if let Some(news) = extract_str(&data, jpath!["content", "item", 0, "_links", "news", "href"])
        {
            let news = news.to_string();
            debug!(url = news.as_str(), "following news link");
            data = self.load_json(&news).await?;
        }
        let entries: Vec<PageEntry> =
            self.teaser_records(&data).await?.into_iter().map(PageEntry::Playable).collect();
        Ok(dedupe_by(entries, |e| e.name().to_string()))
    }

    // --- classification ---

    /// Walks the `items` groups and classifies every teaser. A bad teaser is
    /// logged and skipped so one broken entry cannot poison the page; an
    /// abort always propagates.
    async fn teaser_records(&self, data: &Value) -> Result<Vec<MediaRecord>> {
        let mut records = Vec::new();
        let Some(items) = extract(data, jpath!["items"]).and_then(Value::as_array) else {
            return Ok(records);
        };
        let mut group_title: Option<String> = None;
        for item in items {
            // A group without a title inherits the previous group's title.
            if let Some(title) = extract_str(item, jpath!["title"]).filter(|t| !t.is_empty()) {
                group_title = Some(title.to_string());
            }
            let Some(teasers) = extract(item, jpath!["teasers"]).and_then(Value::as_array) else {
                continue;
            };
            for teaser in teasers {
                match self.classify_teaser(teaser).await {
                    Ok(Some(mut record)) => {
                        record.group_title = group_title.clone();
                        records.push(record);
                    }
                    Ok(None) => {}
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => warn!(group = group_title.as_deref(), "skipping teaser: {e}"),
                }
            }
        }
        Ok(records)
    }

    /// Decides the teaser shape from its discriminator fields. Non-video
    /// teasers yield `None`, which is not an error.
    async fn classify_teaser(&self, teaser: &Value) -> Result<Option<MediaRecord>> {
        let document_type = extract_str(teaser, jpath!["dokumenttyp"]);
        let media_category = extract_str(teaser, jpath!["mediaCategory"]);
        if document_type == Some("video") || media_category == Some("video") {
            return mapping::inline_record_from(teaser).map(Some);
        }
        if extract_str(teaser, jpath!["topMediaType"]) == Some("video") {
            return self.av_record(teaser).await.map(Some);
        }
        Ok(None)
    }

    /// Deferred teaser: fetch and parse the `app.avlink` XML feed through
    /// the same cache-first loader.
    async fn av_record(&self, teaser: &Value) -> Result<MediaRecord> {
        let avlink = extract_str(teaser, jpath!["app", "avlink"])
            .ok_or_else(|| Error::parse("teaser has no avlink"))?;
        let bytes = self.load(avlink).await?;
        let item = avfeed::parse_av_feed(&bytes)?;
        mapping::av_record_from(&item)
    }

    // --- loading ---

    async fn load(&self, url: &str) -> Result<Vec<u8>> {
        self.load_with_age(url, self.settings.cache_ttl_secs).await
    }

    /// Cache-first load. On a miss the fetched bytes are persisted before
    /// they are handed back, so a failed fetch never leaves an entry behind.
    async fn load_with_age(&self, url: &str, max_age_secs: i64) -> Result<Vec<u8>> {
        let now = current_epoch();
        if let Some(bytes) = self.store.get(url, max_age_secs, now).await {
            return Ok(bytes);
        }
        let bytes = self.fetcher.fetch(url).await?;
        self.store.put(url, &bytes, now).await?;
        Ok(bytes)
    }

    async fn load_json(&self, url: &str) -> Result<Value> {
        let bytes = self.load(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}

fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
