//! Fixtures and helpers shared by the test suites of the workspace.

use dex_catalog::types::api::{
    AbilitySlot,
    CreatureRecord,
    MoveSlot,
    NameRef,
    Sprites,
    StatSlot,
    TypeSlot,
};
use dex_catalog::{Entry, EntryId};
use tracing_subscriber::EnvFilter;

pub mod proptest;

/// Install a test writer subscriber once per test binary.
///
/// Filter with `RUST_LOG`, defaults to `debug` for the workspace crates.
pub fn init_test_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("off,dex_catalog=debug,dex_browser=debug"));
    // Fails if another test already installed it, which is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn name_ref(name: &str) -> NameRef {
    NameRef {
        name: name.to_string(),
    }
}

/// An entry with the given identity and categories and dummy measurements.
pub fn entry(id: u32, name: &str, categories: &[&str]) -> Entry {
    Entry {
        id: EntryId::new(id),
        name: name.to_string(),
        image_url: format!("https://img.example/{id}.png"),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        height_units: 7,
        weight_units: 69,
        ability_names: vec!["overgrow".to_string()],
    }
}

/// A full record as served by the catalog.
///
/// Carries six moves so detail views can be checked for truncation.
pub fn record(id: u32, name: &str, categories: &[&str]) -> CreatureRecord {
    CreatureRecord {
        id,
        name: name.to_string(),
        sprites: Sprites {
            front_default: Some(format!("https://img.example/{id}.png")),
        },
        types: categories
            .iter()
            .map(|c| TypeSlot {
                type_: name_ref(c),
            })
            .collect(),
        height: 7,
        weight: 69,
        abilities: vec![AbilitySlot {
            ability: name_ref("overgrow"),
        }],
        stats: vec![
            StatSlot {
                stat: name_ref("hp"),
                base_stat: 45,
            },
            StatSlot {
                stat: name_ref("speed"),
                base_stat: 45,
            },
        ],
        moves: ["tackle", "growl", "vine-whip", "cut", "bind", "headbutt"]
            .iter()
            .map(|m| MoveSlot {
                move_: name_ref(m),
            })
            .collect(),
        species: name_ref(name),
    }
}

/// `(id, name, categories)` of a small catalog with overlapping names.
pub const SAMPLE: &[(u32, &str, &[&str])] = &[
    (1, "bulbasaur", &["grass", "poison"]),
    (4, "charmander", &["fire"]),
    (5, "charmeleon", &["fire"]),
    (7, "squirtle", &["water"]),
    (25, "pikachu", &["electric"]),
    (26, "raichu", &["electric"]),
];

pub fn sample_entries() -> Vec<Entry> {
    SAMPLE
        .iter()
        .map(|(id, name, categories)| entry(*id, name, categories))
        .collect()
}

pub fn sample_records() -> Vec<CreatureRecord> {
    SAMPLE
        .iter()
        .map(|(id, name, categories)| record(*id, name, categories))
        .collect()
}
