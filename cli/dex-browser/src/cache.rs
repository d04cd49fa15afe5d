use std::collections::HashMap;
use std::sync::Arc;

use dex_catalog::Entry;

/// Results of previous remote searches, keyed by lowercased query.
///
/// Only the case is normalized, surrounding and inner whitespace are part of
/// the key. Entries are never evicted, the cache grows for as long as the
/// session lives.
#[derive(Debug, Default)]
pub struct SearchCache {
    cache: HashMap<String, Arc<[Entry]>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(query: &str) -> String {
        query.to_lowercase()
    }

    /// The list stored for `query`, the same allocation that was stored.
    pub fn lookup(&self, query: &str) -> Option<Arc<[Entry]>> {
        self.cache.get(&Self::key(query)).cloned()
    }

    /// Store `results` for `query`, replacing a previous list.
    pub fn store(&mut self, query: &str, results: Arc<[Entry]>) {
        self.cache.insert(Self::key(query), results);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
