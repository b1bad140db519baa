use thiserror::Error;

/// Error taxonomy for catalog operations.
///
/// `Abort` is always fatal. `Fetch` is fatal when the page's own document
/// fails to load; a failed secondary feed fetch is handled per item.
/// `Parse` and `NoVariants` are per-item: the classifier logs them and skips
/// the offending teaser. `CacheRead` never leaves the store, where a broken
/// cache entry degrades to a miss.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("cache entry unreadable: {0}")]
    CacheRead(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no stream variants available")]
    NoVariants,

    #[error("operation aborted")]
    Abort,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    pub(crate) fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::Fetch { url: url.into(), reason: reason.to_string() }
    }

    /// Errors the per-item isolation in the classifier must not swallow.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Abort)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Error::Parse(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
