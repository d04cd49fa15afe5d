//! Error handling for catalog requests.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Common error type for catalog requests.
///
/// Callers above the client treat every variant as a fetch failure,
/// undecodable bodies included.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("request to '{url}' failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{status}: unexpected response from '{url}'")]
    UnexpectedStatus { status: StatusCode, url: String },
    #[error("could not decode response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid catalog url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0}")]
    Other(String),
}

impl CatalogClientError {
    /// Whether the server answered with `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogClientError::UnexpectedStatus { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Extension trait for turning raw responses into decoded catalog values.
pub trait MapResponseExt {
    /// Consumes a `Result<reqwest::Response, reqwest::Error>`, rejects
    /// non-success statuses and decodes the body as JSON.
    fn decode_json<T: DeserializeOwned>(
        self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<T, CatalogClientError>> + Send;
}

impl MapResponseExt for Result<reqwest::Response, reqwest::Error> {
    async fn decode_json<T: DeserializeOwned>(self, url: &str) -> Result<T, CatalogClientError> {
        let response = self.map_err(|source| CatalogClientError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            // The body is not formatted, it may be an HTML error page.
            return Err(CatalogClientError::UnexpectedStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogClientError::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| CatalogClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
