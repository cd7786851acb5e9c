//! Static loot data: the equipment catalog and monster / area loot tables.
//!
//! Both are loaded once (built-in RON under `data/`, or caller-supplied RON /
//! JSON) and only read afterwards.

use ron::extensions::Extensions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{LootError, Result};
use crate::loot::{ItemSource, LootEntry};

const BUILTIN_CATALOG: &str = include_str!("../../data/equipment_categories.ron");
const BUILTIN_TABLES: &str = include_str!("../../data/loot_tables.ron");

// ============================================================================
// Equipment Catalog
// ============================================================================

/// Abstract equipment tag → ordered pool of concrete item ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentCatalog {
    categories: BTreeMap<String, Vec<String>>,
}

impl EquipmentCatalog {
    pub fn from_pairs<I, K, V, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = pairs
            .into_iter()
            .map(|(tag, ids)| (tag.into(), ids.into_iter().map(Into::into).collect()))
            .collect();
        Self { categories }
    }

    pub fn builtin() -> Result<Self> {
        Self::from_ron(BUILTIN_CATALOG)
    }

    pub fn from_ron(source: &str) -> Result<Self> {
        parse_ron(source)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_ron(&content)
        }
    }

    /// Concrete ids for `tag`; `None` when the tag is not mapped
    pub fn pool(&self, tag: &str) -> Option<&[String]> {
        self.categories.get(tag).map(Vec::as_slice)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// ============================================================================
// Loot Tables
// ============================================================================

/// Inclusive gold range, serialized as `[lo, hi]`. Swapped into order on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct GoldRange {
    pub lo: u32,
    pub hi: u32,
}

impl GoldRange {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }
}

impl From<(u32, u32)> for GoldRange {
    fn from((a, b): (u32, u32)) -> Self {
        Self::new(a, b)
    }
}

impl From<GoldRange> for (u32, u32) {
    fn from(range: GoldRange) -> Self {
        (range.lo, range.hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaBonus {
    pub gold_multiplier: f64,
}

/// Loot table of one monster or area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootTable {
    /// Monster level or area recommended level
    #[serde(alias = "recommendedLevel")]
    pub level: i32,
    #[serde(default)]
    pub gold_range: GoldRange,
    #[serde(default)]
    pub drops: Vec<LootEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_bonus: Option<AreaBonus>,
}

impl LootTable {
    pub fn new(level: i32, gold_range: GoldRange) -> Self {
        Self {
            level,
            gold_range,
            drops: Vec::new(),
            area_bonus: None,
        }
    }

    pub fn with_drop(mut self, entry: LootEntry) -> Self {
        self.drops.push(entry);
        self
    }

    pub fn with_area_bonus(mut self, gold_multiplier: f64) -> Self {
        self.area_bonus = Some(AreaBonus { gold_multiplier });
        self
    }

    /// Gold multiplier of the area bonus, 1.0 without one
    pub fn gold_multiplier(&self) -> f64 {
        self.area_bonus.map_or(1.0, |bonus| bonus.gold_multiplier)
    }
}

/// Monster shape used by content files: the loot table nested under `lootTable`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterRecord {
    pub loot_table: LootTable,
}

/// Every monster and area table known to an engine, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTables {
    #[serde(default)]
    pub monsters: BTreeMap<String, LootTable>,
    #[serde(default)]
    pub areas: BTreeMap<String, LootTable>,
}

impl LootTables {
    pub fn builtin() -> Result<Self> {
        Self::from_ron(BUILTIN_TABLES)
    }

    pub fn from_ron(source: &str) -> Result<Self> {
        parse_ron(source)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_ron(&content)
        }
    }

    pub fn monster(&self, id: &str) -> Option<&LootTable> {
        self.monsters.get(id)
    }

    pub fn area(&self, id: &str) -> Option<&LootTable> {
        self.areas.get(id)
    }

    /// Register a monster from its content record, replacing any previous table
    pub fn register_monster(&mut self, id: impl Into<String>, record: MonsterRecord) {
        self.monsters.insert(id.into(), record.loot_table);
    }

    pub fn register_area(&mut self, id: impl Into<String>, table: LootTable) {
        self.areas.insert(id.into(), table);
    }

    /// Check every table against the catalog.
    ///
    /// Unmapped tags are only logged (content may ship ahead of its
    /// category); negative or non-finite gold multipliers are rejected.
    pub fn validate(&self, catalog: &EquipmentCatalog) -> Result<()> {
        let all = self
            .monsters
            .iter()
            .map(|(id, t)| (format!("monster:{id}"), t))
            .chain(self.areas.iter().map(|(id, t)| (format!("area:{id}"), t)));

        for (source_id, table) in all {
            let multiplier = table.gold_multiplier();
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(LootError::InvalidEntry {
                    source_id,
                    reason: format!("gold multiplier {multiplier} must be finite and >= 0"),
                });
            }
            for entry in &table.drops {
                let tags: Vec<&str> = match &entry.source {
                    ItemSource::EquipmentTypes(tags) => tags.iter().map(String::as_str).collect(),
                    ItemSource::ItemType(tag) => vec![tag.as_str()],
                    ItemSource::Items(_) => Vec::new(),
                    ItemSource::None => {
                        tracing::warn!(source = source_id.as_str(), "loot entry has no item source");
                        Vec::new()
                    }
                };
                for tag in tags {
                    if catalog.pool(tag).map_or(true, <[String]>::is_empty) {
                        tracing::warn!(
                            source = source_id.as_str(),
                            tag,
                            "loot entry references an empty or unmapped category"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Parse RON with `implicit_some`, so optional fields need no `Some(..)` wrapper
pub(crate) fn parse_ron<T: DeserializeOwned>(source: &str) -> Result<T> {
    Ok(ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(source)?)
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}
