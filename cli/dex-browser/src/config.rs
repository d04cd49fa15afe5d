//! Layered browser configuration.
//!
//! Values are read from built-in defaults, then an optional TOML file, then
//! `DEX_*` environment variables, later sources overriding earlier ones.

use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use config::{Config as HierarchicalConfig, Environment};
use dex_catalog::{CatalogClientConfig, DEFAULT_CATALOG_URL, DEFAULT_RESOURCE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const ENV_PREFIX: &str = "DEX";

const DEFAULT_LIST_LIMIT: u32 = 100;
const DEFAULT_SEARCH_RESULT_LIMIT: usize = 20;
const DEFAULT_DETAIL_MOVE_LIMIT: usize = 5;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration")]
    Read(#[source] config::ConfigError),
    #[error("invalid configuration")]
    Deserialize(#[source] config::ConfigError),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BrowserConfig {
    /// Base URL of the catalog API
    pub catalog_url: String,
    /// Resource collection that is listed and searched
    pub resource: String,
    /// How many entries are listed on load and scanned per search
    pub list_limit: NonZeroU32,
    /// How many matches of a remote search are fetched in full
    pub search_result_limit: usize,
    /// How many moves a detail view keeps
    pub detail_move_limit: usize,
    /// Quiet period after the last keystroke before a search is issued
    pub debounce_ms: u64,
    /// User agent sent to the catalog
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            list_limit: NonZeroU32::new(DEFAULT_LIST_LIMIT).unwrap_or(NonZeroU32::MIN),
            search_result_limit: DEFAULT_SEARCH_RESULT_LIMIT,
            detail_move_limit: DEFAULT_DETAIL_MOVE_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            user_agent: None,
        }
    }
}

/// Limits of a single remote search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub list_limit: NonZeroU32,
    pub result_limit: usize,
}

impl BrowserConfig {
    /// Read the configuration, optionally layering `file` over the defaults.
    ///
    /// A missing file is not an error.
    pub fn parse(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", DEFAULT_CATALOG_URL)
            .and_then(|b| b.set_default("resource", DEFAULT_RESOURCE))
            .and_then(|b| b.set_default("list_limit", DEFAULT_LIST_LIMIT as i64))
            .and_then(|b| b.set_default("search_result_limit", DEFAULT_SEARCH_RESULT_LIMIT as i64))
            .and_then(|b| b.set_default("detail_move_limit", DEFAULT_DETAIL_MOVE_LIMIT as i64))
            .and_then(|b| b.set_default("debounce_ms", DEFAULT_DEBOUNCE_MS as i64))
            .map_err(ConfigError::Read)?;

        if let Some(file) = file {
            debug!(path = %file.display(), "reading config file");
            builder = builder.add_source(
                config::File::from(file)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(ConfigError::Read)?
            .try_deserialize::<BrowserConfig>()
            .map_err(ConfigError::Deserialize)?;
        debug!(?config, "parsed config");
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            list_limit: self.list_limit,
            result_limit: self.search_result_limit,
        }
    }

    pub fn client_config(&self) -> CatalogClientConfig {
        CatalogClientConfig {
            catalog_url: self.catalog_url.clone(),
            resource: self.resource.clone(),
            user_agent: self.user_agent.clone(),
            ..Default::default()
        }
    }
}
