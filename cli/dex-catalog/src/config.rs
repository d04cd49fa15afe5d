//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::time::Duration;

/// Base URL of the public catalog API.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2";
/// Resource collection listed and searched by default.
pub const DEFAULT_RESOURCE: &str = "pokemon";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for catalog client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    pub catalog_url: String,
    /// Name of the resource collection below the base URL.
    pub resource: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// User agent sent with every request, reqwest's default if unset.
    pub user_agent: Option<String>,
    /// Timeout for establishing a connection.
    ///
    /// Requests themselves are only bounded by the transport.
    pub connect_timeout: Duration,
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            extra_headers: BTreeMap::new(),
            user_agent: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
