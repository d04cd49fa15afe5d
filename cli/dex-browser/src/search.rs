//! Debounced remote search.
//!
//! [SearchController] is the state machine without any I/O: it hands out
//! [DebounceTicket]s for the caller to wait on and [QueryRequest]s for the
//! caller to execute, and only applies results that belong to the latest
//! input. [remote_search] performs a request against a catalog client.

use std::sync::Arc;
use std::time::Duration;

use dex_catalog::{CatalogClientError, ClientTrait, Entry};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::cache::SearchCache;
use crate::config::SearchLimits;
use crate::pipeline::SearchView;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Shown instead of results when a remote search fails.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to search the catalog. Please try again.";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to search the catalog for '{query}'")]
    Fetch {
        query: String,
        #[source]
        source: CatalogClientError,
    },
}

/// Fetch up to `limits.list_limit` summaries, keep those whose name contains
/// `query` (ignoring case), and fetch the records of the first
/// `limits.result_limit` matches.
///
/// If any record request fails the whole search fails.
#[instrument(skip(client, limits), fields(query = %query))]
pub async fn remote_search(
    client: &impl ClientTrait,
    query: &str,
    limits: SearchLimits,
) -> Result<Vec<Entry>, SearchError> {
    let to_search_error = |source| SearchError::Fetch {
        query: query.to_string(),
        source,
    };

    let needle = query.to_lowercase();
    let summaries = client
        .list_entries(limits.list_limit)
        .await
        .map_err(to_search_error)?;

    let matches = summaries
        .into_iter()
        .filter(|summary| summary.name.to_lowercase().contains(&needle))
        .take(limits.result_limit)
        .collect::<Vec<_>>();
    debug!(n_matches = matches.len(), "matched entry names");

    client
        .entries_with_details(&matches)
        .await
        .map_err(to_search_error)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No query, the catalog is shown unfiltered.
    Idle,
    /// Waiting for input to settle.
    Pending,
    /// A remote query is waiting for its response.
    InFlight,
    /// Results for the current query are applied.
    Settled,
    /// The remote query for the current input failed.
    Failed,
}

/// Identifies one input, newer inputs have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryToken(u64);

/// A cancellable debounce timer.
///
/// The timer is cancelled implicitly by the next input, firing a ticket that
/// is no longer the latest one has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    token: QueryToken,
    deadline: Instant,
}

impl DebounceTicket {
    pub fn token(&self) -> QueryToken {
        self.token
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

/// A remote query issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub token: QueryToken,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchController {
    debounce: Duration,
    cache: SearchCache,
    state: SearchState,
    latest: QueryToken,
    query: String,
    pending: Option<DebounceTicket>,
    results: Arc<[Entry]>,
    error: Option<String>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            cache: SearchCache::new(),
            state: SearchState::Idle,
            latest: QueryToken(0),
            query: String::new(),
            pending: None,
            results: Arc::from(Vec::new()),
            error: None,
        }
    }

    /// Record new input.
    ///
    /// Blank input resets to [SearchState::Idle] right away and returns no
    /// ticket. Otherwise the returned ticket should be passed to
    /// [Self::timer_fired] once its deadline has passed.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) -> Option<DebounceTicket> {
        self.latest = QueryToken(self.latest.0 + 1);
        self.query = text.into();

        if self.query.trim().is_empty() {
            debug!("query cleared");
            self.state = SearchState::Idle;
            self.pending = None;
            self.results = Arc::from(Vec::new());
            self.error = None;
            return None;
        }

        let ticket = DebounceTicket {
            token: self.latest,
            deadline: now + self.debounce,
        };
        self.state = SearchState::Pending;
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Handle an elapsed debounce timer.
    ///
    /// Returns the request to execute, or `None` if the ticket was superseded
    /// or the query was answered from the cache.
    pub fn timer_fired(&mut self, ticket: &DebounceTicket) -> Option<QueryRequest> {
        if self.pending.as_ref() != Some(ticket) {
            debug!(token = ticket.token.0, "ignoring superseded debounce timer");
            return None;
        }
        self.pending = None;

        if let Some(cached) = self.cache.lookup(&self.query) {
            debug!(query = %self.query, "using cached results");
            self.results = cached;
            self.error = None;
            self.state = SearchState::Settled;
            return None;
        }

        self.state = SearchState::InFlight;
        Some(QueryRequest {
            token: self.latest,
            query: self.query.clone(),
        })
    }

    /// Apply the outcome of a request.
    ///
    /// Successful results are cached even if the request was superseded, but
    /// only the response to the latest input is applied. Returns whether the
    /// outcome was applied.
    pub fn complete(
        &mut self,
        request: &QueryRequest,
        outcome: Result<Vec<Entry>, SearchError>,
    ) -> bool {
        let is_latest = request.token == self.latest && self.state == SearchState::InFlight;

        match outcome {
            Ok(results) => {
                let results: Arc<[Entry]> = results.into();
                self.cache.store(&request.query, results.clone());
                if !is_latest {
                    debug!(query = %request.query, "discarding stale search response");
                    return false;
                }
                self.results = results;
                self.error = None;
                self.state = SearchState::Settled;
            },
            Err(err) => {
                if !is_latest {
                    debug!(query = %request.query, "discarding stale search failure");
                    return false;
                }
                warn!(error = %err, "remote search failed");
                self.results = Arc::from(Vec::new());
                self.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                self.state = SearchState::Failed;
            },
        }
        true
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// The input as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &Arc<[Entry]> {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SearchState::InFlight
    }

    /// The armed debounce timer, if any.
    pub fn pending(&self) -> Option<DebounceTicket> {
        self.pending
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub fn view(&self) -> SearchView<'_> {
        SearchView {
            query: &self.query,
            in_flight: self.is_in_flight(),
            results: &self.results,
        }
    }
}
