use dex_catalog::{CatalogClientError, ClientTrait, DetailedEntry, EntryId};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::store::CatalogStore;

/// Shown in place of the detail view when loading it fails.
pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load entry details. Please try again.";

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("entry {0} is not in the catalog")]
    NotFound(EntryId),
    #[error("failed to fetch details of entry {id}")]
    Fetch {
        id: EntryId,
        #[source]
        source: CatalogClientError,
    },
}

impl DetailError {
    /// The message to show instead of the detail view.
    pub fn user_message(&self) -> &'static str {
        DETAIL_FAILED_MESSAGE
    }
}

/// Fetch the detail record of a loaded entry.
///
/// Every call requests the record again, nothing is cached.
#[instrument(skip(store, client))]
pub async fn load_detail(
    store: &CatalogStore,
    client: &impl ClientTrait,
    id: EntryId,
    move_limit: usize,
) -> Result<DetailedEntry, DetailError> {
    let entry = store.entry(id).ok_or(DetailError::NotFound(id))?.clone();

    let record = client
        .entry_record_by_id(id)
        .await
        .map_err(|source| DetailError::Fetch { id, source })
        .inspect_err(|err| warn!(error = %err, "failed to load entry details"))?;

    Ok(DetailedEntry::from_record(entry, record, move_limit))
}
