//! Loot generation pipeline.
//!
//! ```text
//! LootTable (monster / area)
//!       ↓  per entry
//! roll_for_loot: level scaling → drop? → rarity → quantity
//!       ↓  on drop
//! resolve_concrete_item_id: items > equipmentTypes > itemType
//!       ↓
//! LootPayload { gold, items }
//! ```

use serde::{Deserialize, Serialize};

use crate::rarity::Rarity;

pub mod assembler;
pub mod entry;
pub mod resolver;
pub mod roll;

pub use assembler::{generate_area_loot, generate_monster_loot, roll_gold};
pub use entry::{ItemSource, LootEntry, QuantityRange};
pub use resolver::resolve_concrete_item_id;
pub use roll::{adjusted_drop_chance, roll_for_loot, roll_for_loot_with_multiplier, LootRollResult};

/// One concrete item in a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub id: String,
    pub rarity: Rarity,
    pub quantity: u32,
}

impl LootItem {
    pub fn value_multiplier(&self) -> f64 {
        self.rarity.tier().value_multiplier
    }
}

/// Result of one combat or exploration event, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootPayload {
    pub gold: u32,
    pub items: Vec<LootItem>,
}

impl LootPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    /// No gold and no items
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Item value when every item has `base_value`, weighted by rarity and quantity
    pub fn item_value(&self, base_value: f64) -> f64 {
        self.items
            .iter()
            .map(|item| base_value * item.value_multiplier() * item.quantity as f64)
            .sum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> LootPayload {
        LootPayload {
            gold: 12,
            items: vec![
                LootItem {
                    id: "iron_sword".into(),
                    rarity: Rarity::Common,
                    quantity: 1,
                },
                LootItem {
                    id: "health_potion".into(),
                    rarity: Rarity::Rare,
                    quantity: 2,
                },
            ],
        }
    }

    #[test]
    fn test_empty_payload() {
        assert!(LootPayload::empty().is_empty());
        assert!(!payload().is_empty());
        assert!(!LootPayload { gold: 1, items: vec![] }.is_empty());
    }

    #[test]
    fn test_item_value_uses_tier_multipliers() {
        let value = payload().item_value(10.0);
        let expected = 10.0 * Rarity::Common.tier().value_multiplier
            + 2.0 * 10.0 * Rarity::Rare.tier().value_multiplier;
        assert!((value - expected).abs() < 1e-9);
        assert_eq!(payload().item_count(), 3);
    }

    #[test]
    fn test_payload_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&payload().to_json()).unwrap();
        assert_eq!(json["gold"], 12);
        assert_eq!(json["items"][1]["id"], "health_potion");
        assert_eq!(json["items"][1]["rarity"], "rare");
        assert_eq!(json["items"][1]["quantity"], 2);
    }
}
