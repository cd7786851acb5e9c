//! Loot entries as they appear in monster and area tables.

use serde::{Deserialize, Serialize};

use crate::rarity::RarityWeights;

/// Where a dropped entry gets its concrete item id from.
///
/// Built from the wire fields with the priority
/// non-empty `items` > non-empty `equipmentTypes` > `itemType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    /// Explicit concrete ids, picked uniformly
    Items(Vec<String>),
    /// Abstract tags whose pools are unioned before picking
    EquipmentTypes(Vec<String>),
    /// One abstract tag
    ItemType(String),
    /// Nothing to resolve
    None,
}

impl ItemSource {
    pub fn from_fields(
        items: Option<Vec<String>>,
        equipment_types: Option<Vec<String>>,
        item_type: Option<String>,
    ) -> Self {
        match (items, equipment_types, item_type) {
            (Some(items), _, _) if !items.is_empty() => ItemSource::Items(items),
            (_, Some(tags), _) if !tags.is_empty() => ItemSource::EquipmentTypes(tags),
            (_, _, Some(tag)) => ItemSource::ItemType(tag),
            _ => ItemSource::None,
        }
    }
}

/// Inclusive quantity range, serialized as `[min, max]`.
/// Normalized on construction: `min >= 1`, `max >= min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct QuantityRange {
    pub min: u32,
    pub max: u32,
}

impl QuantityRange {
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn single() -> Self {
        Self::new(1, 1)
    }
}

impl Default for QuantityRange {
    fn default() -> Self {
        Self::single()
    }
}

impl From<(u32, u32)> for QuantityRange {
    fn from((min, max): (u32, u32)) -> Self {
        Self::new(min, max)
    }
}

impl From<QuantityRange> for (u32, u32) {
    fn from(range: QuantityRange) -> Self {
        (range.min, range.max)
    }
}

/// One drop line of a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LootEntryWire", into = "LootEntryWire")]
pub struct LootEntry {
    pub source: ItemSource,
    /// Base drop chance in [0, 1]
    pub drop_chance: f64,
    pub rarity_weights: RarityWeights,
    pub quantity_range: QuantityRange,
}

impl LootEntry {
    pub fn new(source: ItemSource, drop_chance: f64) -> Self {
        Self {
            source,
            drop_chance: normalize_chance(drop_chance),
            rarity_weights: RarityWeights::default(),
            quantity_range: QuantityRange::default(),
        }
    }

    pub fn items<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ItemSource::Items(ids.into_iter().map(Into::into).collect()), 1.0)
    }

    pub fn equipment_types<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            ItemSource::EquipmentTypes(tags.into_iter().map(Into::into).collect()),
            1.0,
        )
    }

    pub fn item_type(tag: impl Into<String>) -> Self {
        Self::new(ItemSource::ItemType(tag.into()), 1.0)
    }

    pub fn with_drop_chance(mut self, drop_chance: f64) -> Self {
        self.drop_chance = normalize_chance(drop_chance);
        self
    }

    pub fn with_weights(mut self, weights: RarityWeights) -> Self {
        self.rarity_weights = weights;
        self
    }

    pub fn with_quantity(mut self, min: u32, max: u32) -> Self {
        self.quantity_range = QuantityRange::new(min, max);
        self
    }
}

fn normalize_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

fn default_drop_chance() -> f64 {
    1.0
}

/// Table-file shape of a loot entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LootEntryWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    equipment_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_type: Option<String>,
    #[serde(default = "default_drop_chance")]
    drop_chance: f64,
    #[serde(default)]
    rarity_weights: RarityWeights,
    #[serde(default)]
    quantity_range: QuantityRange,
}

impl From<LootEntryWire> for LootEntry {
    fn from(wire: LootEntryWire) -> Self {
        Self {
            source: ItemSource::from_fields(wire.items, wire.equipment_types, wire.item_type),
            drop_chance: normalize_chance(wire.drop_chance),
            rarity_weights: wire.rarity_weights,
            quantity_range: wire.quantity_range,
        }
    }
}

impl From<LootEntry> for LootEntryWire {
    fn from(entry: LootEntry) -> Self {
        let (items, equipment_types, item_type) = match entry.source {
            ItemSource::Items(ids) => (Some(ids), None, None),
            ItemSource::EquipmentTypes(tags) => (None, Some(tags), None),
            ItemSource::ItemType(tag) => (None, None, Some(tag)),
            ItemSource::None => (None, None, None),
        };
        Self {
            items,
            equipment_types,
            item_type,
            drop_chance: entry.drop_chance,
            rarity_weights: entry.rarity_weights,
            quantity_range: entry.quantity_range,
        }
    }
}
