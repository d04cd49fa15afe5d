//! A browsing session over one catalog.
//!
//! [Browser] owns the catalog store, the search controller and the current
//! filter and sort selection. It can be driven call by call, or handed a
//! channel of [BrowserEvent]s with [Browser::run], which publishes a
//! [BrowserView] after every change.


use dex_catalog::{ClientTrait, DetailedEntry, Entry, EntryId};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

use crate::config::{BrowserConfig, SearchLimits};
use crate::detail::{DetailError, load_detail};
use crate::pipeline::{SortKey, displayed_entries};
use crate::search::{DebounceTicket, QueryRequest, SearchController, SearchError, remote_search};
use crate::store::{CatalogStore, LoadError};

/// User input accepted by [Browser::run].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// The search field now contains this text.
    Query(String),
    /// Show only entries of this category, or all entries.
    TypeFilter(Option<String>),
    Sort(SortKey),
    ToggleFavorite(EntryId),
    /// Fetch the catalog again.
    Reload,
}

/// Everything a list view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserView {
    pub entries: Vec<Entry>,
    /// Number of entries in the loaded catalog.
    pub total: usize,
    pub query: String,
    pub searching: bool,
    pub search_error: Option<String>,
    pub load_error: Option<String>,
    pub is_loading: bool,
    /// Favorite ids in ascending order.
    pub favorites: Vec<EntryId>,
    pub categories: Vec<String>,
    pub type_filter: Option<String>,
    pub sort: SortKey,
}

#[derive(Debug)]
pub struct Browser<C> {
    client: C,
    config: BrowserConfig,
    store: CatalogStore,
    search: SearchController,
    type_filter: Option<String>,
    sort: SortKey,
}

impl<C: ClientTrait> Browser<C> {
    pub fn new(client: C, config: BrowserConfig) -> Self {
        Self {
            client,
            search: SearchController::new(config.debounce()),
            config,
            store: CatalogStore::new(),
            type_filter: None,
            sort: SortKey::default(),
        }
    }

    /// Fetch the catalog. See [CatalogStore::load].
    pub async fn load(&mut self) -> Result<(), LoadError> {
        self.store.load(&self.client, self.config.list_limit).await
    }

    /// Record new search input, returns the debounce timer it armed.
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<DebounceTicket> {
        self.search.input(text, Instant::now())
    }

    /// Wait for the armed debounce timer and run the search it triggers.
    ///
    /// Returns immediately if no timer is armed.
    pub async fn settle_search(&mut self) {
        let Some(ticket) = self.search.pending() else {
            return;
        };
        sleep_until(ticket.deadline()).await;
        if let Some(request) = self.search.timer_fired(&ticket) {
            let (request, outcome) =
                execute_search(&self.client, request, self.config.search_limits()).await;
            self.search.complete(&request, outcome);
        }
    }

    pub fn set_type_filter(&mut self, category: Option<String>) {
        self.type_filter = category;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Flip the favorite flag of `id`, returns whether it is a favorite now.
    pub fn toggle_favorite(&mut self, id: EntryId) -> bool {
        self.store.toggle_favorite(id)
    }

    pub fn is_favorite(&self, id: EntryId) -> bool {
        self.store.is_favorite(id)
    }

    pub fn type_filter(&self) -> Option<&str> {
        self.type_filter.as_deref()
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    /// The entries to display for the current state.
    pub fn displayed(&self) -> Vec<Entry> {
        displayed_entries(
            self.store.entries(),
            self.search.view(),
            self.type_filter.as_deref(),
            self.sort,
        )
    }

    /// Load the detail view of a loaded entry.
    pub async fn open_detail(&self, id: EntryId) -> Result<DetailedEntry, DetailError> {
        load_detail(&self.store, &self.client, id, self.config.detail_move_limit).await
    }

    pub fn view(&self) -> BrowserView {
        snapshot(&self.store, &self.search, self.type_filter.as_deref(), self.sort)
    }

    /// Process `events` until the sender is dropped, publishing the view
    /// after each change.
    ///
    /// Runs on the calling task. Debounce timers and remote searches are
    /// awaited alongside the events, searches still running when the
    /// channel closes are dropped.
    #[instrument(skip_all)]
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<BrowserEvent>,
        view: watch::Sender<BrowserView>,
    ) {
        let Browser {
            client,
            config,
            store,
            search,
            type_filter,
            sort,
        } = self;
        let client = &*client;
        let limits = config.search_limits();
        let mut in_flight = FuturesUnordered::new();

        view.send_replace(snapshot(store, search, type_filter.as_deref(), *sort));

        loop {
            let deadline = search.pending().map(|ticket| ticket.deadline());

            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("event channel closed");
                        break;
                    };
                    debug!(?event, "handling event");
                    match event {
                        BrowserEvent::Query(text) => {
                            search.input(text, Instant::now());
                        },
                        BrowserEvent::TypeFilter(category) => *type_filter = category,
                        BrowserEvent::Sort(key) => *sort = key,
                        BrowserEvent::ToggleFavorite(id) => {
                            store.toggle_favorite(id);
                        },
                        BrowserEvent::Reload => {
                            view.send_modify(|view| view.is_loading = true);
                            // the store keeps the error message
                            let _ = store.load(client, config.list_limit).await;
                        },
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    let request = search.pending().and_then(|ticket| search.timer_fired(&ticket));
                    if let Some(request) = request {
                        in_flight.push(execute_search(client, request, limits));
                    }
                },
                Some((request, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    search.complete(&request, outcome);
                },
            }

            view.send_replace(snapshot(store, search, type_filter.as_deref(), *sort));
        }
    }
}

fn snapshot(
    store: &CatalogStore,
    search: &SearchController,
    type_filter: Option<&str>,
    sort: SortKey,
) -> BrowserView {
    let mut favorites = store.favorite_ids().iter().collect::<Vec<_>>();
    favorites.sort();

    BrowserView {
        entries: displayed_entries(store.entries(), search.view(), type_filter, sort),
        total: store.entries().len(),
        query: search.query().to_string(),
        searching: search.is_in_flight(),
        search_error: search.error().map(str::to_string),
        load_error: store.error().map(str::to_string),
        is_loading: store.is_loading(),
        favorites,
        categories: store.categories(),
        type_filter: type_filter.map(str::to_string),
        sort,
    }
}

/// Run `request`, keeping it paired with its outcome.
fn execute_search<'a, C: ClientTrait>(
    client: &'a C,
    request: QueryRequest,
    limits: SearchLimits,
) -> impl Future<Output = (QueryRequest, Result<Vec<Entry>, SearchError>)> + 'a {
    async move {
        let outcome = remote_search(client, &request.query, limits).await;
        (request, outcome)
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
