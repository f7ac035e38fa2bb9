//! Explicit configuration passed into the mapper and the synchroniser.
//!
//! Nothing here is read from process-global state at construction time; the
//! CLI (or any other embedder) builds these values once and hands them in.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Language/country preference applied by the read-only catalog accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPrefs {
    pub language: String,
    pub country: String,
}

impl Default for CatalogPrefs {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "AT".to_string(),
        }
    }
}

/// Mapper behaviour switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapperOptions {
    /// Run the fixed structural schema check before parsing and fail hard on
    /// violations instead of recovering leniently.
    #[serde(default)]
    pub validate: bool,
}

/// Where the synchroniser fetches from and caches to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub index_url: String,
    pub cache_dir: PathBuf,
}

impl SyncConfig {
    pub fn new(index_url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_url: index_url.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Config with the cache root resolved from the environment:
    /// `$XDG_CACHE_HOME/matcat`, falling back to `$HOME/.matcat`.
    pub fn with_default_cache_dir(index_url: impl Into<String>) -> Self {
        Self::new(index_url, default_cache_dir())
    }

    /// The persisted index document.
    pub fn index_path(&self) -> PathBuf {
        self.cache_dir.join("ProducerIndex.xml")
    }

    /// Directory of cached payload files, one per producer.
    pub fn producers_dir(&self) -> PathBuf {
        self.cache_dir.join("Producers")
    }

    pub fn trace_loaded(&self) {
        info!(
            index_url = %self.index_url,
            cache_dir = %self.cache_dir.display(),
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}

/// Platform cache home, falling back to a dotted folder under `$HOME`.
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join("matcat");
    }
    let home = env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".matcat")
}
