//! Catalog client on top of reqwest.

use std::fmt::Debug;
use std::num::NonZeroU32;
use std::str::FromStr;

use futures::future::try_join_all;
use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, MapResponseExt};
use crate::types::api::{CreatureRecord, NamedResourceList};
use crate::types::{Entry, EntryId, EntrySummary};

/// A client for the catalog service.
///
/// Handles:
/// - HTTP client configuration with a connect timeout
/// - Default and extra headers
/// - Url construction below the configured base url and resource
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogClientConfig,
    resource_url: Url,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .field("resource", &self.config.resource)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let resource_url = resource_url(&config)?;
        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            config,
            resource_url,
        })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    /// Update the client configuration and recreate the client.
    pub fn update_config(
        &mut self,
        update: impl FnOnce(&mut CatalogClientConfig),
    ) -> Result<(), CatalogClientError> {
        let mut modified_config = self.config.clone();
        update(&mut modified_config);
        *self = Self::new(modified_config)?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, CatalogClientError> {
        debug!(%url, "sending catalog request");
        let url_str = url.to_string();
        self.client.get(url).send().await.decode_json(&url_str).await
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog via [`CatalogClient`]
/// - **Mock** (tests): canned records without HTTP, see `MockClient`
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// List up to `limit` entry summaries.
    async fn list_entries(&self, limit: NonZeroU32)
    -> Result<Vec<EntrySummary>, CatalogClientError>;

    /// Fetch the full record a summary points to.
    async fn entry_record(&self, summary: &EntrySummary)
    -> Result<CreatureRecord, CatalogClientError>;

    /// Fetch the full record of an entry by id.
    async fn entry_record_by_id(&self, id: EntryId) -> Result<CreatureRecord, CatalogClientError>;

    /// Fetch the record of every summary and build the entries.
    ///
    /// All requests are in flight at once. If any of them fails the whole
    /// batch fails, there is no partial result.
    async fn entries_with_details(
        &self,
        summaries: &[EntrySummary],
    ) -> Result<Vec<Entry>, CatalogClientError> {
        debug!(n_entries = summaries.len(), "fetching entry details");
        try_join_all(summaries.iter().map(|summary| async move {
            let record = self.entry_record(summary).await?;
            Ok::<_, CatalogClientError>(Entry::from(record))
        }))
        .await
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip(self), fields(resource = %self.config.resource))]
    async fn list_entries(
        &self,
        limit: NonZeroU32,
    ) -> Result<Vec<EntrySummary>, CatalogClientError> {
        let mut url = self.resource_url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let list: NamedResourceList = self.get_json(url).await?;
        debug!(n_results = list.results.len(), "received entry listing");
        Ok(list.results)
    }

    async fn entry_record(
        &self,
        summary: &EntrySummary,
    ) -> Result<CreatureRecord, CatalogClientError> {
        let url = Url::from_str(&summary.url).map_err(|source| CatalogClientError::InvalidUrl {
            url: summary.url.clone(),
            source,
        })?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn entry_record_by_id(&self, id: EntryId) -> Result<CreatureRecord, CatalogClientError> {
        let url = entry_url(&self.resource_url, id)?;
        self.get_json(url).await
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// `{catalog_url}/{resource}`, tolerating a trailing slash on the base url.
fn resource_url(config: &CatalogClientConfig) -> Result<Url, CatalogClientError> {
    let raw = format!(
        "{}/{}",
        config.catalog_url.trim_end_matches('/'),
        config.resource.trim_matches('/')
    );
    Url::parse(&raw).map_err(|source| CatalogClientError::InvalidUrl { url: raw, source })
}

/// `{catalog_url}/{resource}/{id}`
fn entry_url(resource_url: &Url, id: EntryId) -> Result<Url, CatalogClientError> {
    let raw = format!("{resource_url}/{id}");
    Url::parse(&raw).map_err(|source| CatalogClientError::InvalidUrl { url: raw, source })
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client with default and extra headers.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout);

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}
