//! Configuration loading and representation.
//!
//! Settings come from a TOML file (`$STOCKROOM_CONFIG`, default
//! `config/stockroom.toml`), with `BIND_ADDR` and `DATABASE_URL` taking
//! precedence over the file when set.
//!
//! ```toml
//! bind_addr = "0.0.0.0:8080"
//! database_url = "postgres://localhost/stockroom"
//!
//! [allowed_items]
//! cat1 = ["subcat1", "subcat2"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use stockroom_inventory::{AllowList, normalize_segment};

pub const CONFIG_PATH_ENV: &str = "STOCKROOM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/stockroom.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on.
    pub bind_addr: String,
    /// Postgres connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// category -> permitted subcategories.
    pub allowed_items: BTreeMap<String, BTreeSet<String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            max_connections: 5,
            acquire_timeout_secs: 5,
            allowed_items: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from the configured file (if present) and apply env overrides.
    ///
    /// A missing file at the default path is not an error; a missing file at an
    /// explicitly configured path is.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok();
        let path = PathBuf::from(explicit.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));

        let mut config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::warn!(path = %path.display(), "config file not found; using defaults");
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Override file values from the environment (`BIND_ADDR`, `DATABASE_URL`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDR").filter(|v| !v.trim().is_empty()) {
            self.bind_addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_url = Some(url);
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Build the allow-list gate.
    ///
    /// Categories and subcategories are trimmed and lower-cased so they line up
    /// with normalized request segments; blank entries are dropped.
    pub fn allow_list(&self) -> AllowList {
        let mut categories: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (category, subs) in &self.allowed_items {
            let category = normalize_segment(category.trim());
            if category.is_empty() {
                continue;
            }
            let subs: BTreeSet<String> = subs
                .iter()
                .map(|s| normalize_segment(s.trim()))
                .filter(|s| !s.is_empty())
                .collect();
            if subs.is_empty() {
                continue;
            }
            categories.entry(category).or_default().extend(subs);
        }
        AllowList::new(categories)
    }
}
