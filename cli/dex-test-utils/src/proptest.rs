use std::collections::BTreeSet;

use dex_catalog::{Entry, EntryId};
use proptest::collection::{btree_set, vec as prop_vec};
use proptest::prelude::*;

/// A deliberately small pool so that generated entries share categories.
pub const CATEGORIES: &[&str] = &["grass", "poison", "fire", "water", "Electric", "bug"];

/// Produces lowercase names from a narrow alphabet, so that sort keys
/// collide and substring queries match more than one entry.
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[abc]{1,4}"
}

pub fn categories_strategy() -> impl Strategy<Value = Vec<String>> {
    prop_vec(prop::sample::select(CATEGORIES), 0..3)
        .prop_map(|categories| categories.into_iter().map(str::to_string).collect())
}

/// Produces an entry with the given id.
pub fn entry_with_id(id: u32) -> impl Strategy<Value = Entry> {
    (name_strategy(), categories_strategy(), 0..20_u32, 0..1000_u32).prop_map(
        move |(name, categories, height_units, weight_units)| Entry {
            id: EntryId::new(id),
            image_url: format!("https://img.example/{id}.png"),
            name,
            categories,
            height_units,
            weight_units,
            ability_names: vec![],
        },
    )
}

/// Produces catalogs with unique ids in arbitrary order.
pub fn catalog_strategy(max_entries: usize) -> impl Strategy<Value = Vec<Entry>> {
    btree_set(1..500_u32, 0..max_entries)
        .prop_flat_map(|ids: BTreeSet<u32>| {
            ids.into_iter()
                .map(entry_with_id)
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}
