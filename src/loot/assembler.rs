//! Loot assembler: gold roll + every entry of a table → one payload.

use rand::Rng;

use super::resolver::resolve_concrete_item_id;
use super::roll::{roll_for_loot_with_multiplier, LootRollResult};
use super::{LootItem, LootPayload};
use crate::engine::config::ExplorationModifiers;
use crate::tables::{EquipmentCatalog, GoldRange, LootTable};

/// Loot for defeating `monster`, optionally inside `area` (its gold bonus applies)
pub fn generate_monster_loot<R: Rng + ?Sized>(
    catalog: &EquipmentCatalog,
    monster: &LootTable,
    player_level: i32,
    area: Option<&LootTable>,
    rng: &mut R,
) -> LootPayload {
    let gold_multiplier = monster.gold_multiplier() * area.map_or(1.0, LootTable::gold_multiplier);
    assemble(catalog, monster, player_level, gold_multiplier, 1.0, rng)
}

/// Loot for exploring `area` with the given exploration modifiers
pub fn generate_area_loot<R: Rng + ?Sized>(
    catalog: &EquipmentCatalog,
    area: &LootTable,
    player_level: i32,
    exploration: ExplorationModifiers,
    rng: &mut R,
) -> LootPayload {
    let gold_multiplier = area.gold_multiplier() * exploration.gold_multiplier;
    assemble(
        catalog,
        area,
        player_level,
        gold_multiplier,
        exploration.drop_chance_multiplier,
        rng,
    )
}

fn assemble<R: Rng + ?Sized>(
    catalog: &EquipmentCatalog,
    table: &LootTable,
    player_level: i32,
    gold_multiplier: f64,
    drop_multiplier: f64,
    rng: &mut R,
) -> LootPayload {
    let gold = roll_gold(table.gold_range, gold_multiplier, rng);
    let mut items = Vec::with_capacity(table.drops.len());

    for entry in &table.drops {
        let LootRollResult::Dropped { rarity, quantity } =
            roll_for_loot_with_multiplier(entry, player_level, table.level, drop_multiplier, rng)
        else {
            continue;
        };
        match resolve_concrete_item_id(entry, catalog, rng) {
            Some(id) => items.push(LootItem {
                id: id.to_string(),
                rarity,
                quantity,
            }),
            None => tracing::debug!(source = ?entry.source, "dropped entry resolved to no item"),
        }
    }

    LootPayload { gold, items }
}

/// Uniform gold in the range, scaled and rounded. Bad multipliers yield 0.
pub fn roll_gold<R: Rng + ?Sized>(range: GoldRange, multiplier: f64, rng: &mut R) -> u32 {
    let base = rng.gen_range(range.lo..=range.hi.max(range.lo));
    let scaled = base as f64 * multiplier;
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }
    scaled.round().min(u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::LootEntry;
    use crate::rarity::{Rarity, RarityWeights};
    use crate::rng::seeded;

    fn catalog() -> EquipmentCatalog {
        EquipmentCatalog::from_pairs([
            ("beginner_weapon", vec!["iron_sword", "steel_dagger", "oak_staff", "hunting_bow"]),
            ("empty", vec![]),
        ])
    }

    fn beginner_monster() -> LootTable {
        LootTable::new(5, GoldRange::new(10, 20)).with_drop(
            LootEntry::item_type("beginner_weapon")
                .with_weights(RarityWeights::only(Rarity::Common))
                .with_quantity(1, 1),
        )
    }

    #[test]
    fn test_monster_end_to_end() {
        let catalog = catalog();
        let monster = beginner_monster();
        let mut rng = seeded(21);
        for _ in 0..100 {
            let payload = generate_monster_loot(&catalog, &monster, 5, None, &mut rng);
            assert!((10..=20).contains(&payload.gold));
            assert_eq!(payload.items.len(), 1);
            let item = &payload.items[0];
            assert_eq!(item.rarity, Rarity::Common);
            assert_eq!(item.quantity, 1);
            assert!(["iron_sword", "steel_dagger", "oak_staff", "hunting_bow"].contains(&item.id.as_str()));
        }
    }

    #[test]
    fn test_area_bonus_scales_monster_gold() {
        let catalog = catalog();
        let monster = LootTable::new(5, GoldRange::new(10, 10));
        let area = LootTable::new(5, GoldRange::new(0, 0)).with_area_bonus(1.5);
        let mut rng = seeded(22);
        let payload = generate_monster_loot(&catalog, &monster, 5, Some(&area), &mut rng);
        assert_eq!(payload.gold, 15);
        assert!(payload.items.is_empty());
    }

    #[test]
    fn test_unresolved_entries_are_dropped_silently() {
        let catalog = catalog();
        let monster = LootTable::new(5, GoldRange::new(1, 1))
            .with_drop(LootEntry::item_type("empty"))
            .with_drop(LootEntry::item_type("no_such_tag"))
            .with_drop(LootEntry::items(["iron_sword"]));
        let mut rng = seeded(23);
        let payload = generate_monster_loot(&catalog, &monster, 5, None, &mut rng);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].id, "iron_sword");
    }

    #[test]
    fn test_exploration_multipliers_apply() {
        let catalog = catalog();
        let area = LootTable::new(5, GoldRange::new(100, 100));
        let mut rng = seeded(24);
        let modifiers = ExplorationModifiers {
            gold_multiplier: 0.75,
            drop_chance_multiplier: 1.0,
        };
        assert_eq!(generate_area_loot(&catalog, &area, 5, modifiers, &mut rng).gold, 75);
    }

    #[test]
    fn test_neutral_modifiers_keep_base_gold() {
        let catalog = catalog();
        let area = LootTable::new(5, GoldRange::new(40, 40));
        let mut rng = seeded(26);
        let payload = generate_area_loot(&catalog, &area, 5, ExplorationModifiers::NEUTRAL, &mut rng);
        assert_eq!(payload.gold, 40);
    }

    #[test]
    fn test_roll_gold_guards() {
        let mut rng = seeded(25);
        assert_eq!(roll_gold(GoldRange::new(5, 5), f64::NAN, &mut rng), 0);
        assert_eq!(roll_gold(GoldRange::new(5, 5), -2.0, &mut rng), 0);
        assert_eq!(roll_gold(GoldRange::new(u32::MAX, u32::MAX), 10.0, &mut rng), u32::MAX);
        assert_eq!(roll_gold(GoldRange::new(0, 0), 1.0, &mut rng), 0);
    }
}
