//! Browsing state for the creature catalog.
//!
//! - [CatalogStore] holds the fetched catalog, its load state and the
//!   favorites set
//! - [SearchController] debounces search input and guards against stale
//!   responses, backed by a [SearchCache] of previous results
//! - [displayed_entries] derives the list to display
//! - [Browser] ties these together for one session
//!
//! Nothing here renders anything, the [BrowserView] snapshot is the boundary
//! to whatever does.

mod browser;
mod cache;
mod config;
mod detail;
mod pipeline;
mod search;
mod store;

pub use browser::{Browser, BrowserEvent, BrowserView};
pub use cache::SearchCache;
pub use crate::config::{BrowserConfig, ConfigError, SearchLimits};
pub use detail::{DETAIL_FAILED_MESSAGE, DetailError, load_detail};
pub use pipeline::{ParseSortKeyError, SearchView, SortKey, displayed_entries};
pub use search::{
    DEFAULT_DEBOUNCE,
    DebounceTicket,
    QueryRequest,
    QueryToken,
    SEARCH_FAILED_MESSAGE,
    SearchController,
    SearchError,
    SearchState,
    remote_search,
};
pub use store::{CatalogStore, FavoriteSet, LOAD_FAILED_MESSAGE, LoadError};
