//! Loot roll engine: one entry → drop decision, rarity, quantity.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entry::LootEntry;
use crate::rarity::{roll_scaled_rarity, Rarity};
use crate::scaling::calculate_level_scaling_with_levels;

/// Outcome of rolling one entry. Rarity and quantity exist only on a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LootRollResult {
    NoDrop,
    Dropped { rarity: Rarity, quantity: u32 },
}

impl LootRollResult {
    pub fn dropped(&self) -> bool {
        matches!(self, LootRollResult::Dropped { .. })
    }

    pub fn rarity(&self) -> Option<Rarity> {
        match self {
            LootRollResult::Dropped { rarity, .. } => Some(*rarity),
            LootRollResult::NoDrop => None,
        }
    }

    pub fn quantity(&self) -> Option<u32> {
        match self {
            LootRollResult::Dropped { quantity, .. } => Some(*quantity),
            LootRollResult::NoDrop => None,
        }
    }
}

/// Roll `entry` for a player against content of `content_level`
pub fn roll_for_loot<R: Rng + ?Sized>(
    entry: &LootEntry,
    player_level: i32,
    content_level: i32,
    rng: &mut R,
) -> LootRollResult {
    roll_for_loot_with_multiplier(entry, player_level, content_level, 1.0, rng)
}

/// Same as [`roll_for_loot`] with an extra drop-chance multiplier
/// (exploration type, events) applied before clamping.
pub fn roll_for_loot_with_multiplier<R: Rng + ?Sized>(
    entry: &LootEntry,
    player_level: i32,
    content_level: i32,
    drop_multiplier: f64,
    rng: &mut R,
) -> LootRollResult {
    let scaling = calculate_level_scaling_with_levels(
        player_level.saturating_sub(content_level),
        player_level,
        content_level,
    );

    let chance = adjusted_drop_chance(entry.drop_chance, scaling * drop_multiplier);
    if rng.gen::<f64>() >= chance {
        return LootRollResult::NoDrop;
    }

    let rarity = roll_scaled_rarity(&entry.rarity_weights, scaling, rng);
    let range = entry.quantity_range;
    let min = range.min.max(1);
    let quantity = rng.gen_range(min..=range.max.max(min));

    LootRollResult::Dropped { rarity, quantity }
}

/// Base chance times multiplier, clamped to [0, 1]. NaN collapses to 0.
pub fn adjusted_drop_chance(base: f64, multiplier: f64) -> f64 {
    let chance = base * multiplier;
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}
