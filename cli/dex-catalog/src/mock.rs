//! In-memory catalog for tests.
//!
//! Serves canned records without HTTP, counts the requests it answers, and
//! can be told to fail or stall specific requests.

use std::collections::{HashSet, VecDeque};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;

use crate::client::ClientTrait;
use crate::error::CatalogClientError;
use crate::types::api::CreatureRecord;
use crate::types::{EntryId, EntrySummary};

const MOCK_URL: &str = "mock://catalog/pokemon";

type MockField<T> = Arc<Mutex<T>>;

#[derive(Debug, Default)]
struct MockState {
    records: Vec<CreatureRecord>,
    fail_listing: bool,
    failing_ids: HashSet<u32>,
    listing_delays: VecDeque<Duration>,
    listing_calls: usize,
    record_calls: usize,
}

/// A [ClientTrait] implementation backed by a list of records.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    // A mutex so that the trait doesn't need `&mut self` just to count calls
    state: MockField<MockState>,
}

impl MockClient {
    pub fn new(records: impl IntoIterator<Item = CreatureRecord>) -> Self {
        let client = Self::default();
        client.lock().records = records.into_iter().collect();
        client
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("couldn't acquire mock lock")
    }

    /// Answer every listing request with `500`.
    pub fn fail_listing(&self) {
        self.lock().fail_listing = true;
    }

    /// Answer record requests for `id` with `500`.
    pub fn fail_record(&self, id: EntryId) {
        self.lock().failing_ids.insert(id.get());
    }

    /// Answer every request normally again.
    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.fail_listing = false;
        state.failing_ids.clear();
    }

    /// Delay the next listing request by `delay`.
    ///
    /// Delays are consumed in the order listing requests arrive.
    pub fn push_listing_delay(&self, delay: Duration) {
        self.lock().listing_delays.push_back(delay);
    }

    /// Number of listing requests answered so far.
    pub fn listing_calls(&self) -> usize {
        self.lock().listing_calls
    }

    /// Number of record requests answered so far.
    pub fn record_calls(&self) -> usize {
        self.lock().record_calls
    }

    fn record(&self, id: u32) -> Result<CreatureRecord, CatalogClientError> {
        let mut state = self.lock();
        state.record_calls += 1;
        let url = format!("{MOCK_URL}/{id}/");
        if state.failing_ids.contains(&id) {
            return Err(CatalogClientError::UnexpectedStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url,
            });
        }
        state
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(CatalogClientError::UnexpectedStatus {
                status: StatusCode::NOT_FOUND,
                url,
            })
    }
}

impl ClientTrait for MockClient {
    async fn list_entries(
        &self,
        limit: NonZeroU32,
    ) -> Result<Vec<EntrySummary>, CatalogClientError> {
        let delay = {
            let mut state = self.lock();
            state.listing_calls += 1;
            state.listing_delays.pop_front()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock();
        if state.fail_listing {
            return Err(CatalogClientError::UnexpectedStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: format!("{MOCK_URL}?limit={limit}"),
            });
        }
        Ok(state
            .records
            .iter()
            .take(limit.get() as usize)
            .map(|record| EntrySummary {
                name: record.name.clone(),
                url: format!("{MOCK_URL}/{}/", record.id),
            })
            .collect())
    }

    async fn entry_record(
        &self,
        summary: &EntrySummary,
    ) -> Result<CreatureRecord, CatalogClientError> {
        let id = summary
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
            .ok_or_else(|| CatalogClientError::Other(format!("not a mock url: {}", summary.url)))?;
        self.record(id)
    }

    async fn entry_record_by_id(&self, id: EntryId) -> Result<CreatureRecord, CatalogClientError> {
        self.record(id.get())
    }
}
