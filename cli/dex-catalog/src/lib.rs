//! HTTP client infrastructure for the public creature catalog API.
//!
//! This crate provides:
//! - HTTP client construction with default headers and a connect timeout
//! - Wire types for the catalog's JSON responses and the domain types built
//!   from them
//! - Common error handling for catalog requests
//! - An in-memory mock client for downstream tests (feature-gated)
//!
//! ## Usage
//!
//! ```ignore
//! use dex_catalog::{CatalogClient, CatalogClientConfig, ClientTrait};
//!
//! let client = CatalogClient::new(CatalogClientConfig::default())?;
//! let summaries = client.list_entries(NonZeroU32::new(100).unwrap()).await?;
//! let entries = client.entries_with_details(&summaries).await?;
//! ```

mod client;
mod config;
mod error;
pub mod types;

#[cfg(any(test, feature = "tests"))]
mod mock;

pub use client::{CatalogClient, ClientTrait};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL, DEFAULT_RESOURCE};
pub use error::{CatalogClientError, MapResponseExt};
#[cfg(any(test, feature = "tests"))]
pub use mock::MockClient;
pub use types::{DetailedEntry, Entry, EntryId, EntrySummary, Stat};
