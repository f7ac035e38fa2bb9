//! Loads and adapts a static YAML config into the core config types.
//!
//! This is the only place where untrusted YAML is parsed and mapped to the
//! strongly-typed structs the core crate expects; every failure surfaces as a
//! context-rich `anyhow` error at the CLI boundary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use matcat_core::config::{CatalogPrefs, MapperOptions, SyncConfig};
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub catalog: CatalogSection,
    pub sync: Option<SyncSection>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub validate: bool,
}

#[derive(Debug, Deserialize)]
pub struct SyncSection {
    pub index_url: String,
    pub cache_dir: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_country() -> String {
    "AT".to_string()
}

impl CliConfig {
    pub fn prefs(&self) -> CatalogPrefs {
        CatalogPrefs {
            language: self.catalog.language.clone(),
            country: self.catalog.country.clone(),
        }
    }

    pub fn mapper_options(&self) -> MapperOptions {
        MapperOptions {
            validate: self.catalog.validate,
        }
    }

    /// Sync settings, or an error if the config file has no `sync` section.
    pub fn sync_config(&self) -> Result<SyncConfig> {
        let section = self
            .sync
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("config file has no 'sync' section"))?;
        Ok(match &section.cache_dir {
            Some(dir) => SyncConfig::new(section.index_url.as_str(), dir),
            None => SyncConfig::with_default_cache_dir(section.index_url.as_str()),
        })
    }
}

/// Loads a static YAML config file and maps it to typed sections.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    match serde_yaml::from_str::<CliConfig>(&config_content) {
        Ok(config) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(config)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
