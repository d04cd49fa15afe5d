//! The fetched catalog and the favorites set.

use std::collections::HashSet;
use std::num::NonZeroU32;

use dex_catalog::{CatalogClientError, ClientTrait, Entry, EntryId};
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Shown instead of the catalog when loading it fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch catalog data. Please try again later.";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to list catalog entries")]
    List(#[source] CatalogClientError),
    #[error("failed to fetch catalog entry details")]
    Details(#[source] CatalogClientError),
}

/// Ids of the entries marked as favorite.
///
/// Ids are not checked against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(HashSet<EntryId>);

impl FavoriteSet {
    /// Flip membership of `id`, returns whether it is a favorite now.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id)
        }
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.0.iter().copied()
    }
}

#[derive(Debug, Default)]
pub struct CatalogStore {
    entries: Vec<Entry>,
    loading: bool,
    error: Option<String>,
    favorites: FavoriteSet,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog, replacing whatever was loaded before.
    ///
    /// Lists up to `list_limit` entries and fetches the record of each of
    /// them concurrently. Entries are only replaced once every record has
    /// arrived. On failure the store is left empty with [LOAD_FAILED_MESSAGE]
    /// as its error.
    #[instrument(skip_all, fields(list_limit = %list_limit))]
    pub async fn load(
        &mut self,
        client: &impl ClientTrait,
        list_limit: NonZeroU32,
    ) -> Result<(), LoadError> {
        self.begin_load();
        let result = fetch_catalog(client, list_limit).await;
        self.finish_load(result)
    }

    fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish_load(&mut self, result: Result<Vec<Entry>, LoadError>) -> Result<(), LoadError> {
        self.loading = false;
        match result {
            Ok(entries) => {
                debug!(n_entries = entries.len(), "loaded catalog");
                self.entries = entries;
                Ok(())
            },
            Err(err) => {
                warn!(error = %err, "failed to load catalog");
                self.entries.clear();
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(err)
            },
        }
    }

    /// All loaded entries in catalog order, empty until a load succeeded.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Flip the favorite flag of `id`, returns whether it is a favorite now.
    pub fn toggle_favorite(&mut self, id: EntryId) -> bool {
        let is_favorite = self.favorites.toggle(id);
        debug!(%id, is_favorite, "toggled favorite");
        is_favorite
    }

    pub fn is_favorite(&self, id: EntryId) -> bool {
        self.favorites.contains(id)
    }

    /// Loaded entries marked as favorite, in catalog order.
    pub fn favorites(&self) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| self.favorites.contains(entry.id))
            .collect()
    }

    pub fn favorite_ids(&self) -> &FavoriteSet {
        &self.favorites
    }

    /// Every category used by a loaded entry, sorted and without duplicates.
    pub fn categories(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| entry.categories.iter())
            .sorted()
            .dedup()
            .cloned()
            .collect()
    }
}

async fn fetch_catalog(
    client: &impl ClientTrait,
    list_limit: NonZeroU32,
) -> Result<Vec<Entry>, LoadError> {
    let summaries = client
        .list_entries(list_limit)
        .await
        .map_err(LoadError::List)?;
    client
        .entries_with_details(&summaries)
        .await
        .map_err(LoadError::Details)
}
