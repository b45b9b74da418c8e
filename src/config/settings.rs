//! Settings structures for the engine

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level settings loaded from `lumen.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub cache: CacheSettings,
    pub plugins: PluginsSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.as_ref().display())))
    }

    /// Merge with environment variables (LUMEN_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("LUMEN_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("LUMEN_MAX_RESULTS") {
            if let Ok(n) = val.parse() {
                self.search.max_results = n;
            }
        }
        if let Ok(val) = std::env::var("LUMEN_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search.debounce_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("LUMEN_CACHE_DIR") {
            self.cache.dir = Some(PathBuf::from(val));
        }
    }

    /// Effective cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(crate::cache::default_cache_dir)
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name for logs
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "lumen".to_string(),
        }
    }
}

/// Search tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Cap on the returned result list
    pub max_results: usize,
    /// Quiescence window for the debouncers, in milliseconds
    pub debounce_ms: u64,
    /// Relevance filter threshold; weak nonzero scores at or below it are
    /// dropped
    pub score_threshold: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: crate::DEFAULT_MAX_RESULTS,
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
            score_threshold: crate::SCORE_THRESHOLD,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache directory; platform cache root when unset
    pub dir: Option<PathBuf>,
    /// In-memory entry bound
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            max_entries: crate::cache::DEFAULT_MEMORY_CAPACITY,
        }
    }
}

/// Plugin wiring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsSettings {
    /// Static item manifests to register at startup
    pub static_manifests: Vec<PathBuf>,
}
