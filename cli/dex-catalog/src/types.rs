//! Catalog entry types.
//!
//! [api] mirrors the JSON documents served by the catalog, the types at the
//! top level are the domain model built from them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

pub mod api {
    //! Response documents as served by the catalog.
    //!
    //! Only the fields the browser reads are modelled, everything else in a
    //! response is ignored.

    use serde::{Deserialize, Serialize};

    /// `GET {base}/{resource}?limit=n`
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NamedResourceList {
        pub results: Vec<NamedResource>,
    }

    /// A reference to a resource by name, with the url of its full record.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NamedResource {
        pub name: String,
        pub url: String,
    }

    /// A reference whose url is never followed.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NameRef {
        pub name: String,
    }

    /// `GET {base}/{resource}/{id}`
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CreatureRecord {
        pub id: u32,
        pub name: String,
        #[serde(default)]
        pub sprites: Sprites,
        #[serde(default)]
        pub types: Vec<TypeSlot>,
        pub height: u32,
        pub weight: u32,
        #[serde(default)]
        pub abilities: Vec<AbilitySlot>,
        #[serde(default)]
        pub stats: Vec<StatSlot>,
        #[serde(default)]
        pub moves: Vec<MoveSlot>,
        #[serde(default)]
        pub species: NameRef,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Sprites {
        pub front_default: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TypeSlot {
        #[serde(rename = "type")]
        pub type_: NameRef,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AbilitySlot {
        pub ability: NameRef,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StatSlot {
        pub stat: NameRef,
        pub base_stat: u32,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MoveSlot {
        #[serde(rename = "move")]
        pub move_: NameRef,
    }
}

/// Summary row of a listing, resolved to an [Entry] by fetching its url.
pub type EntrySummary = api::NamedResource;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// Stable identity of a catalog entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// One catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub image_url: String,
    /// Ordered as served, the first category is the primary one.
    pub categories: Vec<String>,
    pub height_units: u32,
    pub weight_units: u32,
    pub ability_names: Vec<String>,
}

impl Entry {
    /// The category an entry is sorted by, empty if it has none.
    pub fn primary_category(&self) -> &str {
        self.categories.first().map(String::as_str).unwrap_or_default()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

impl From<api::CreatureRecord> for Entry {
    fn from(record: api::CreatureRecord) -> Self {
        Self {
            id: EntryId(record.id),
            name: record.name,
            image_url: record.sprites.front_default.unwrap_or_default(),
            categories: record.types.into_iter().map(|slot| slot.type_.name).collect(),
            height_units: record.height,
            weight_units: record.weight,
            ability_names: record
                .abilities
                .into_iter()
                .map(|slot| slot.ability.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// An [Entry] with the fields only shown in a detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub stats: Vec<Stat>,
    pub move_names: Vec<String>,
    pub species_name: String,
}

impl DetailedEntry {
    /// Combine a known entry with the detail fields of a freshly fetched
    /// record, keeping at most `move_limit` moves.
    pub fn from_record(entry: Entry, record: api::CreatureRecord, move_limit: usize) -> Self {
        Self {
            entry,
            stats: record
                .stats
                .into_iter()
                .map(|slot| Stat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            move_names: record
                .moves
                .into_iter()
                .take(move_limit)
                .map(|slot| slot.move_.name)
                .collect(),
            species_name: record.species.name,
        }
    }
}
