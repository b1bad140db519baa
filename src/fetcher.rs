use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Called per received chunk with (bytes so far, total if known).
pub type ProgressListener = Box<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Shared abort flag. Tripping it fails the in-flight transfer and the
/// whole page operation with [`Error::Abort`].
pub type AbortHandle = Arc<AtomicBool>;

/// Transport boundary consumed by the catalog core.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher. Streams the body so the abort flag is honored
/// mid-transfer and progress can be reported.
pub struct HttpFetcher {
    client: reqwest::Client,
    abort: AbortHandle,
    progress: Option<ProgressListener>,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("building http client: {e}")))?;
        Ok(Self { client, abort: Arc::new(AtomicBool::new(false)), progress: None })
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    pub fn with_progress(mut self, listener: ProgressListener) -> Self {
        self.progress = Some(listener);
        self
    }

    fn check_abort(&self) -> Result<()> {
        if self.abort.load(Ordering::Relaxed) {
            return Err(Error::Abort);
        }
        Ok(())
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = Url::parse(url).map_err(|e| Error::fetch(url, e))?;
        self.check_abort()?;
        debug!(url, "fetch");
        let resp = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::fetch(url, e))?;
        let total = resp.content_length();
        let mut stream = resp.bytes_stream();
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            self.check_abort()?;
            let chunk = chunk.map_err(|e| Error::fetch(url, e))?;
            out.extend_from_slice(&chunk);
            if let Some(listener) = &self.progress {
                listener(out.len() as u64, total);
            }
        }
        debug!(url, bytes = out.len(), "fetched");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_url_is_a_fetch_error() {
        let fetcher = HttpFetcher::new("tribune-test").unwrap();
        assert!(matches!(
            fetcher.fetch("not a url").await,
            Err(Error::Fetch { .. })
        ));
    }

    #[tokio::test]
    async fn tripped_abort_wins_over_transport() {
        let abort = Arc::new(AtomicBool::new(true));
        let fetcher = HttpFetcher::new("tribune-test").unwrap().with_abort(abort);
        assert!(matches!(
            fetcher.fetch("https://example.test/menu").await,
            Err(Error::Abort)
        ));
    }
}
