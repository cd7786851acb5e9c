//! Loot engine service.
//!
//! `LootEngine` owns the equipment catalog, the loot tables and the config,
//! and exposes every loot operation over them. It is immutable after
//! construction: share it behind an `Arc` and pass each call its own RNG.

pub mod config;

pub use config::{EngineConfig, ExplorationConfig, ExplorationModifiers, ExplorationType};

use rand::Rng;

use crate::error::{LootError, Result};
use crate::logging::TimingSpan;
use crate::loot::{self, LootEntry, LootPayload, LootRollResult};
use crate::rarity::{self, Rarity, RarityWeights, RARITY_TIERS};
use crate::tables::{EquipmentCatalog, LootTable, LootTables};

#[derive(Debug, Clone)]
pub struct LootEngine {
    config: EngineConfig,
    catalog: EquipmentCatalog,
    tables: LootTables,
}

impl LootEngine {
    /// Validate the config, the tier table and the loot tables, then build the engine
    pub fn new(config: EngineConfig, catalog: EquipmentCatalog, tables: LootTables) -> Result<Self> {
        config.validate()?;
        rarity::validate_tier_table(&RARITY_TIERS)?;
        tables.validate(&catalog)?;
        tracing::info!(
            categories = catalog.len(),
            monsters = tables.monsters.len(),
            areas = tables.areas.len(),
            "loot engine ready"
        );
        Ok(Self {
            config,
            catalog,
            tables,
        })
    }

    /// Engine over the built-in data files with default config
    pub fn builtin() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Engine over the built-in data files
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        Self::new(config, EquipmentCatalog::builtin()?, LootTables::builtin()?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EquipmentCatalog {
        &self.catalog
    }

    pub fn tables(&self) -> &LootTables {
        &self.tables
    }

    // ------------------------------------------------------------------
    // Single-step operations
    // ------------------------------------------------------------------

    pub fn resolve_concrete_item_id<'a, R: Rng + ?Sized>(
        &'a self,
        entry: &'a LootEntry,
        rng: &mut R,
    ) -> Option<&'a str> {
        loot::resolve_concrete_item_id(entry, &self.catalog, rng)
    }

    pub fn roll_for_rarity<R: Rng + ?Sized>(
        &self,
        weights: &RarityWeights,
        player_level: i32,
        content_level: i32,
        rng: &mut R,
    ) -> Rarity {
        rarity::roll_for_rarity(weights, player_level, content_level, rng)
    }

    pub fn roll_for_loot<R: Rng + ?Sized>(
        &self,
        entry: &LootEntry,
        player_level: i32,
        content_level: i32,
        rng: &mut R,
    ) -> LootRollResult {
        loot::roll_for_loot(entry, player_level, content_level, rng)
    }

    // ------------------------------------------------------------------
    // Assembly from explicit tables
    // ------------------------------------------------------------------

    pub fn generate_monster_loot<R: Rng + ?Sized>(
        &self,
        monster: &LootTable,
        player_level: i32,
        area: Option<&LootTable>,
        rng: &mut R,
    ) -> LootPayload {
        loot::generate_monster_loot(&self.catalog, monster, player_level, area, rng)
    }

    pub fn generate_area_loot<R: Rng + ?Sized>(
        &self,
        area: &LootTable,
        player_level: i32,
        exploration: ExplorationType,
        rng: &mut R,
    ) -> LootPayload {
        let modifiers = self.config.exploration.get(exploration);
        loot::generate_area_loot(&self.catalog, area, player_level, modifiers, rng)
    }

    // ------------------------------------------------------------------
    // Assembly by id (lenient: unknown ids yield an empty payload)
    // ------------------------------------------------------------------

    /// Monster loot by id. An unknown monster gives an empty payload; an
    /// unknown area only drops the area bonus.
    pub fn monster_loot<R: Rng + ?Sized>(
        &self,
        monster_id: &str,
        player_level: i32,
        area_id: Option<&str>,
        rng: &mut R,
    ) -> LootPayload {
        let _span = TimingSpan::new("monster_loot");
        let Some(monster) = self.tables.monster(monster_id) else {
            tracing::debug!(monster_id, "no loot table for monster");
            return LootPayload::empty();
        };
        let area = area_id.and_then(|id| {
            let area = self.tables.area(id);
            if area.is_none() {
                tracing::debug!(area_id = id, "no loot table for area, ignoring area bonus");
            }
            area
        });
        self.generate_monster_loot(monster, player_level, area, rng)
    }

    /// Area loot by id and exploration tag. Unknown area or tag gives an empty payload.
    pub fn area_loot<R: Rng + ?Sized>(
        &self,
        area_id: &str,
        player_level: i32,
        exploration: &str,
        rng: &mut R,
    ) -> LootPayload {
        let _span = TimingSpan::new("area_loot");
        match self.try_area_loot(area_id, player_level, exploration, rng) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::debug!(%err, "area loot degraded to empty payload");
                LootPayload::empty()
            }
        }
    }

    // ------------------------------------------------------------------
    // Assembly by id (strict)
    // ------------------------------------------------------------------

    pub fn try_monster_loot<R: Rng + ?Sized>(
        &self,
        monster_id: &str,
        player_level: i32,
        area_id: Option<&str>,
        rng: &mut R,
    ) -> Result<LootPayload> {
        let monster = self
            .tables
            .monster(monster_id)
            .ok_or_else(|| LootError::UnknownMonster(monster_id.to_string()))?;
        let area = match area_id {
            Some(id) => Some(
                self.tables
                    .area(id)
                    .ok_or_else(|| LootError::UnknownArea(id.to_string()))?,
            ),
            None => None,
        };
        Ok(self.generate_monster_loot(monster, player_level, area, rng))
    }

    pub fn try_area_loot<R: Rng + ?Sized>(
        &self,
        area_id: &str,
        player_level: i32,
        exploration: &str,
        rng: &mut R,
    ) -> Result<LootPayload> {
        let area = self
            .tables
            .area(area_id)
            .ok_or_else(|| LootError::UnknownArea(area_id.to_string()))?;
        let exploration: ExplorationType = exploration.parse()?;
        Ok(self.generate_area_loot(area, player_level, exploration, rng))
    }
}

// =====================================================
// Tests
// =====================================================
