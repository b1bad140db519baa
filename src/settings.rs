use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Fixed root menu endpoint.
pub const DEFAULT_MENU_URL: &str = "https://exporte.wdr.de/SportschauNextServer/menu";

const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Runtime settings, constructed once and injected into [`crate::Catalog`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cache directory; defaults to the user data dir when unset.
    pub data_dir: Option<PathBuf>,
    pub menu_url: String,
    pub cache_ttl_secs: i64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            menu_url: DEFAULT_MENU_URL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            user_agent: concat!("tribune/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from a TOML file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading settings file {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("parsing settings file {}: {e}", path.display())))
    }

    /// Applies `TRIBUNE_*` environment overrides on top of the current
    /// values.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("TRIBUNE_MENU_URL") {
            self.menu_url = url;
        }
        if let Some(ttl) = std::env::var("TRIBUNE_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.cache_ttl_secs = ttl;
        }
        if let Ok(dir) = std::env::var("TRIBUNE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Resolved cache directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let proj = ProjectDirs::from("dev", "tribune", "tribune")
            .ok_or_else(|| Error::Config("unable to determine data directory".to_string()))?;
        Ok(proj.data_dir().join("cache"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_menu_endpoint() {
        let settings = Settings::default();
        assert_eq!(settings.menu_url, DEFAULT_MENU_URL);
        assert_eq!(settings.cache_ttl_secs, 3600);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tribune.toml");
        std::fs::write(&path, "cache_ttl_secs = 60\ndata_dir = \"/tmp/tribune-cache\"\n").unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.cache_ttl_secs, 60);
        assert_eq!(settings.data_dir.as_deref(), Some(Path::new("/tmp/tribune-cache")));
        assert_eq!(settings.menu_url, DEFAULT_MENU_URL);
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tribune.toml");
        std::fs::write(&path, "cache_ttl_secs = [nope").unwrap();
        assert!(matches!(Settings::from_file(&path), Err(Error::Config(_))));
    }
}
