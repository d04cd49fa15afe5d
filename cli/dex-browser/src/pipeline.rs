//! Derivation of the displayed list from catalog and search state.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use dex_catalog::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The total order the displayed list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    /// The first category of an entry.
    #[serde(rename = "type")]
    Category,
}

#[derive(Debug, Error)]
#[error("unknown sort key '{0}', expected one of 'id', 'name', 'type'")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "type" => Ok(SortKey::Category),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Id => write!(f, "id"),
            SortKey::Name => write!(f, "name"),
            SortKey::Category => write!(f, "type"),
        }
    }
}

/// The part of the search state the pipeline depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchView<'a> {
    /// The query as typed.
    pub query: &'a str,
    /// Whether a remote query is waiting for its response.
    pub in_flight: bool,
    /// Results of the last applied remote query.
    pub results: &'a [Entry],
}

impl SearchView<'_> {
    fn uses_results(&self) -> bool {
        !self.query.trim().is_empty() && (self.in_flight || !self.results.is_empty())
    }
}

/// Compare display strings case-insensitively, falling back to the raw
/// strings so that the order is total.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare(sort: SortKey, a: &Entry, b: &Entry) -> Ordering {
    match sort {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Category => compare_text(a.primary_category(), b.primary_category()),
    }
}

/// Derive the list to display.
///
/// 1. While a non-blank query has remote results, or is waiting for them,
///    those results are the source. Otherwise the catalog is filtered locally
///    by case-insensitive substring match on the name.
/// 2. With a `type_filter`, only entries carrying that exact category remain.
/// 3. The remaining entries are stably sorted by `sort`.
///
/// Entries with an id seen before are dropped.
pub fn displayed_entries(
    catalog: &[Entry],
    search: SearchView<'_>,
    type_filter: Option<&str>,
    sort: SortKey,
) -> Vec<Entry> {
    let source: Box<dyn Iterator<Item = &Entry> + '_> = if search.uses_results() {
        Box::new(search.results.iter())
    } else if search.query.trim().is_empty() {
        Box::new(catalog.iter())
    } else {
        let needle = search.query.to_lowercase();
        Box::new(
            catalog
                .iter()
                .filter(move |entry| entry.name.to_lowercase().contains(&needle)),
        )
    };

    let mut seen = HashSet::new();
    let mut displayed = source
        .filter(|entry| type_filter.is_none_or(|category| entry.has_category(category)))
        .filter(|entry| seen.insert(entry.id))
        .cloned()
        .collect::<Vec<_>>();

    // `sort_by` is stable, equal keys keep their source order
    displayed.sort_by(|a, b| compare(sort, a, b));
    displayed
}

#[cfg(test)]
mod tests {
    use dex_test_utils::proptest::{CATEGORIES, catalog_strategy};
    use dex_test_utils::{entry, sample_entries};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn ids(entries: &[Entry]) -> Vec<u32> {
        entries.iter().map(|e| e.id.get()).collect()
    }

    fn two_starters() -> Vec<Entry> {
        vec![
            entry(4, "charmander", &["fire"]),
            entry(1, "bulbasaur", &["grass", "poison"]),
        ]
    }

    #[test]
    fn filter_by_category() {
        let displayed =
            displayed_entries(&two_starters(), SearchView::default(), Some("fire"), SortKey::Id);
        assert_eq!(ids(&displayed), vec![4]);
    }

    #[test]
    fn filter_matches_any_category_exactly() {
        let catalog = two_starters();
        let poison = displayed_entries(&catalog, SearchView::default(), Some("poison"), SortKey::Id);
        let partial = displayed_entries(&catalog, SearchView::default(), Some("pois"), SortKey::Id);

        assert_eq!(ids(&poison), vec![1]);
        assert!(partial.is_empty());
    }

    #[test]
    fn sort_by_name() {
        let displayed =
            displayed_entries(&two_starters(), SearchView::default(), None, SortKey::Name);
        assert_eq!(ids(&displayed), vec![1, 4]);
    }

    #[test]
    fn sort_by_id_is_default() {
        let displayed =
            displayed_entries(&two_starters(), SearchView::default(), None, SortKey::default());
        assert_eq!(ids(&displayed), vec![1, 4]);
    }

    #[test]
    fn sort_by_first_category() {
        let catalog = vec![
            entry(7, "squirtle", &["water"]),
            entry(1, "bulbasaur", &["grass", "poison"]),
            entry(4, "charmander", &["fire"]),
            entry(0, "missingno", &[]),
        ];
        let displayed = displayed_entries(&catalog, SearchView::default(), None, SortKey::Category);
        assert_eq!(ids(&displayed), vec![0, 4, 1, 7]);
    }

    #[test]
    fn name_order_ignores_case() {
        let catalog = vec![entry(1, "beta", &[]), entry(2, "Alpha", &[]), entry(3, "alpha", &[])];
        let displayed = displayed_entries(&catalog, SearchView::default(), None, SortKey::Name);
        assert_eq!(ids(&displayed), vec![2, 3, 1]);
    }

    #[test]
    fn local_filter_when_no_remote_results() {
        let displayed = displayed_entries(
            &sample_entries(),
            SearchView {
                query: "CHAR",
                ..Default::default()
            },
            None,
            SortKey::Id,
        );
        assert_eq!(ids(&displayed), vec![4, 5]);
    }

    #[test]
    fn blank_query_shows_full_catalog() {
        let displayed = displayed_entries(
            &sample_entries(),
            SearchView {
                query: "   ",
                ..Default::default()
            },
            None,
            SortKey::Id,
        );
        assert_eq!(displayed.len(), sample_entries().len());
    }

    #[test]
    fn remote_results_replace_catalog() {
        let results = vec![entry(26, "raichu", &["electric"]), entry(172, "pichu", &["electric"])];
        let displayed = displayed_entries(
            &sample_entries(),
            SearchView {
                query: "chu",
                in_flight: false,
                results: &results,
            },
            None,
            SortKey::Id,
        );
        // 25 pikachu is in the catalog and matches, but is not a remote result
        assert_eq!(ids(&displayed), vec![26, 172]);
    }

    #[test]
    fn in_flight_query_shows_only_previous_results() {
        let displayed = displayed_entries(
            &sample_entries(),
            SearchView {
                query: "pika",
                in_flight: true,
                results: &[],
            },
            None,
            SortKey::Id,
        );
        assert!(displayed.is_empty());
    }

    #[test]
    fn duplicate_ids_are_dropped() {
        let results = vec![entry(25, "pikachu", &["electric"]), entry(25, "pikachu", &["electric"])];
        let displayed = displayed_entries(
            &[],
            SearchView {
                query: "pika",
                in_flight: false,
                results: &results,
            },
            None,
            SortKey::Id,
        );
        assert_eq!(ids(&displayed), vec![25]);
    }

    #[test]
    fn sort_key_round_trips_through_strings() {
        for key in [SortKey::Id, SortKey::Name, SortKey::Category] {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
        assert!("weight".parse::<SortKey>().is_err());
    }

    proptest! {
        #[test]
        fn type_filter_keeps_only_matching(
            catalog in catalog_strategy(30),
            category in prop::sample::select(CATEGORIES),
        ) {
            let displayed = displayed_entries(&catalog, SearchView::default(), Some(category), SortKey::Name);
            prop_assert!(displayed.iter().all(|entry| entry.has_category(category)));
            prop_assert_eq!(
                displayed.len(),
                catalog.iter().filter(|entry| entry.has_category(category)).count()
            );
        }

        #[test]
        fn sort_is_stable(
            catalog in catalog_strategy(30),
            sort in prop_oneof![Just(SortKey::Id), Just(SortKey::Name), Just(SortKey::Category)],
        ) {
            let displayed = displayed_entries(&catalog, SearchView::default(), None, sort);
            let position = |entry: &Entry| catalog.iter().position(|e| e.id == entry.id).unwrap();

            for pair in displayed.windows(2) {
                let ordering = compare(sort, &pair[0], &pair[1]);
                prop_assert_ne!(ordering, Ordering::Greater);
                if ordering == Ordering::Equal {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }
        }

        #[test]
        fn output_never_mixes_sources(
            catalog in catalog_strategy(20),
            results in catalog_strategy(5),
            in_flight in any::<bool>(),
        ) {
            let search = SearchView { query: "a", in_flight, results: &results };
            let displayed = displayed_entries(&catalog, search, None, SortKey::Id);

            let source: &[Entry] = if in_flight || !results.is_empty() { &results } else { &catalog };
            prop_assert!(displayed.iter().all(|entry| source.contains(entry)));
            let unique = displayed.iter().map(|e| e.id).collect::<HashSet<_>>();
            prop_assert_eq!(unique.len(), displayed.len());
        }
    }
}
