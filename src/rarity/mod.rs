//! Rarity tiers, per-entry rarity weights and the rarity roller.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::RARITY_SCALING_EXPONENT;
use crate::error::{LootError, Result};
use crate::scaling::calculate_level_scaling_with_levels;

// ============================================================================
// Rarity Tiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Canonical order, lowest value first
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Position in canonical order (Common = 0)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == key)
    }

    /// Static tier data for this rarity
    pub fn tier(&self) -> &'static RarityTier {
        &RARITY_TIERS[self.rank()]
    }
}

/// Static per-tier data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityTier {
    pub key: Rarity,
    /// Base drop rate in (0, 1]
    pub drop_rate: f64,
    /// Value multiplier, >= 1
    pub value_multiplier: f64,
    pub name: &'static str,
}

/// Process-wide tier table in canonical order
pub static RARITY_TIERS: [RarityTier; 5] = [
    RarityTier {
        key: Rarity::Common,
        drop_rate: 0.65,
        value_multiplier: 1.0,
        name: "Common",
    },
    RarityTier {
        key: Rarity::Uncommon,
        drop_rate: 0.25,
        value_multiplier: 1.5,
        name: "Uncommon",
    },
    RarityTier {
        key: Rarity::Rare,
        drop_rate: 0.08,
        value_multiplier: 2.5,
        name: "Rare",
    },
    RarityTier {
        key: Rarity::Epic,
        drop_rate: 0.018,
        value_multiplier: 4.0,
        name: "Epic",
    },
    RarityTier {
        key: Rarity::Legendary,
        drop_rate: 0.002,
        value_multiplier: 8.0,
        name: "Legendary",
    },
];

/// Check the ordering invariants of a tier table:
/// canonical key order, drop rate strictly falling, value multiplier strictly rising.
pub fn validate_tier_table(tiers: &[RarityTier]) -> Result<()> {
    if tiers.len() != Rarity::ALL.len() {
        return Err(LootError::InvalidTierTable(format!(
            "expected {} tiers, got {}",
            Rarity::ALL.len(),
            tiers.len()
        )));
    }
    for (tier, expected) in tiers.iter().zip(Rarity::ALL) {
        if tier.key != expected {
            return Err(LootError::InvalidTierTable(format!(
                "tier {:?} out of canonical order (expected {:?})",
                tier.key, expected
            )));
        }
        if !(tier.drop_rate > 0.0 && tier.drop_rate <= 1.0) {
            return Err(LootError::InvalidTierTable(format!(
                "{:?} drop rate {} outside (0, 1]",
                tier.key, tier.drop_rate
            )));
        }
        if tier.value_multiplier.is_nan() || tier.value_multiplier < 1.0 {
            return Err(LootError::InvalidTierTable(format!(
                "{:?} value multiplier {} below 1",
                tier.key, tier.value_multiplier
            )));
        }
    }
    for pair in tiers.windows(2) {
        if pair[1].drop_rate >= pair[0].drop_rate {
            return Err(LootError::InvalidTierTable(format!(
                "drop rate must fall from {:?} to {:?}",
                pair[0].key, pair[1].key
            )));
        }
        if pair[1].value_multiplier <= pair[0].value_multiplier {
            return Err(LootError::InvalidTierTable(format!(
                "value multiplier must rise from {:?} to {:?}",
                pair[0].key, pair[1].key
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Rarity Weights
// ============================================================================

/// Per-entry weight distribution over tiers.
///
/// Weights are finite and non-negative with at least one positive weight, so a
/// draw always has a tier to land on. Serialized as a `{tier: weight}` map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Rarity, f64>", into = "BTreeMap<Rarity, f64>")]
pub struct RarityWeights {
    weights: [f64; 5],
}

impl RarityWeights {
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Rarity, f64)>,
    {
        let mut weights = [0.0; 5];
        for (rarity, weight) in pairs {
            if !weight.is_finite() || weight < 0.0 {
                return Err(LootError::InvalidWeights(format!(
                    "{:?} weight {} must be finite and >= 0",
                    rarity, weight
                )));
            }
            weights[rarity.rank()] = weight;
        }
        if !weights.iter().any(|w| *w > 0.0) {
            return Err(LootError::InvalidWeights(
                "at least one tier needs a positive weight".into(),
            ));
        }
        Ok(Self { weights })
    }

    /// All weight on a single tier
    pub fn only(rarity: Rarity) -> Self {
        let mut weights = [0.0; 5];
        weights[rarity.rank()] = 1.0;
        Self { weights }
    }

    /// Weights equal to the tier table's base drop rates
    pub fn from_tier_table() -> Self {
        let mut weights = [0.0; 5];
        for tier in &RARITY_TIERS {
            weights[tier.key.rank()] = tier.drop_rate;
        }
        Self { weights }
    }

    pub fn get(&self, rarity: Rarity) -> f64 {
        self.weights[rarity.rank()]
    }

    /// Tiers carrying a positive weight, in canonical order
    pub fn present(&self) -> impl Iterator<Item = Rarity> + '_ {
        Rarity::ALL.into_iter().filter(|r| self.get(*r) > 0.0)
    }

    /// Weights after applying a scaling multiplier.
    /// Tier at rank r gets `scaling^(r * RARITY_SCALING_EXPONENT)`, so a larger
    /// scaling never lowers a higher tier relative to Common.
    pub fn scaled(&self, scaling: f64) -> [f64; 5] {
        let mut adjusted = [0.0; 5];
        for rarity in Rarity::ALL {
            let factor = scaling.powf(rarity.rank() as f64 * RARITY_SCALING_EXPONENT);
            adjusted[rarity.rank()] = self.get(rarity) * factor;
        }
        adjusted
    }
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self::from_tier_table()
    }
}

impl TryFrom<BTreeMap<Rarity, f64>> for RarityWeights {
    type Error = LootError;

    fn try_from(map: BTreeMap<Rarity, f64>) -> Result<Self> {
        Self::new(map)
    }
}

impl From<RarityWeights> for BTreeMap<Rarity, f64> {
    fn from(weights: RarityWeights) -> Self {
        weights.present().map(|r| (r, weights.get(r))).collect()
    }
}

// ============================================================================
// Rarity Roller
// ============================================================================

/// Roll a tier from `weights`, biased by the level scaling between player and content.
pub fn roll_for_rarity<R: Rng + ?Sized>(
    weights: &RarityWeights,
    player_level: i32,
    content_level: i32,
    rng: &mut R,
) -> Rarity {
    let scaling = calculate_level_scaling_with_levels(
        player_level.saturating_sub(content_level),
        player_level,
        content_level,
    );
    roll_scaled_rarity(weights, scaling, rng)
}

/// Single weighted draw over `weights` adjusted by an explicit scaling multiplier
pub fn roll_scaled_rarity<R: Rng + ?Sized>(
    weights: &RarityWeights,
    scaling: f64,
    rng: &mut R,
) -> Rarity {
    let adjusted = weights.scaled(scaling);
    let total: f64 = adjusted.iter().sum();

    // Highest present tier absorbs float rounding at the top of the range
    let fallback = weights.present().last().unwrap_or(Rarity::Common);
    if !(total > 0.0) || !total.is_finite() {
        return fallback;
    }

    let roll = rng.gen::<f64>() * total;
    let mut accumulated = 0.0;
    for rarity in Rarity::ALL {
        let weight = adjusted[rarity.rank()];
        if weight <= 0.0 {
            continue;
        }
        accumulated += weight;
        if roll < accumulated {
            return rarity;
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn reference_weights() -> RarityWeights {
        RarityWeights::new([
            (Rarity::Common, 0.65),
            (Rarity::Uncommon, 0.25),
            (Rarity::Rare, 0.08),
            (Rarity::Epic, 0.018),
            (Rarity::Legendary, 0.002),
        ])
        .unwrap()
    }

    #[test]
    fn test_tier_table_is_valid() {
        validate_tier_table(&RARITY_TIERS).unwrap();
    }

    #[test]
    fn test_tier_monotonicity() {
        for pair in RARITY_TIERS.windows(2) {
            assert!(pair[0].drop_rate > pair[1].drop_rate);
            assert!(pair[0].value_multiplier < pair[1].value_multiplier);
        }
    }

    #[test]
    fn test_validate_rejects_rising_drop_rate() {
        let mut tiers = RARITY_TIERS.clone();
        tiers[3].drop_rate = 0.5;
        assert!(matches!(
            validate_tier_table(&tiers),
            Err(LootError::InvalidTierTable(_))
        ));
    }

    #[test]
    fn test_validate_rejects_flat_value_multiplier() {
        let mut tiers = RARITY_TIERS.clone();
        tiers[2].value_multiplier = tiers[1].value_multiplier;
        assert!(validate_tier_table(&tiers).is_err());
    }

    #[test]
    fn test_rarity_keys() {
        for rarity in Rarity::ALL {
            assert_eq!(Rarity::from_key(rarity.as_str()), Some(rarity));
            assert_eq!(rarity.tier().key, rarity);
        }
        assert_eq!(Rarity::from_key("mythic"), None);
    }

    #[test]
    fn test_weights_reject_all_zero() {
        assert!(RarityWeights::new([(Rarity::Common, 0.0)]).is_err());
        assert!(RarityWeights::new(std::iter::empty()).is_err());
    }

    #[test]
    fn test_weights_reject_negative_and_nan() {
        assert!(RarityWeights::new([(Rarity::Common, -1.0)]).is_err());
        assert!(RarityWeights::new([(Rarity::Rare, f64::NAN)]).is_err());
    }

    #[test]
    fn test_weights_deserialize_from_map() {
        let weights: RarityWeights =
            serde_json::from_str(r#"{"common": 0.9, "rare": 0.1}"#).unwrap();
        assert_eq!(weights.get(Rarity::Common), 0.9);
        assert_eq!(weights.get(Rarity::Uncommon), 0.0);
        assert_eq!(weights.present().collect::<Vec<_>>(), vec![Rarity::Common, Rarity::Rare]);

        let bad: std::result::Result<RarityWeights, _> = serde_json::from_str(r#"{"common": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_scaling_favours_higher_tiers() {
        let weights = reference_weights();
        let low = weights.scaled(0.5);
        let high = weights.scaled(2.0);
        for rarity in &Rarity::ALL[1..] {
            let r = rarity.rank();
            assert!(high[r] / high[0] > low[r] / low[0]);
        }
        assert_eq!(weights.scaled(1.0), weights.weights);
    }

    #[test]
    fn test_roll_only_returns_present_tiers() {
        let weights = RarityWeights::new([(Rarity::Uncommon, 1.0), (Rarity::Epic, 1.0)]).unwrap();
        let mut rng = seeded(7);
        for _ in 0..1000 {
            let r = roll_for_rarity(&weights, 1, 50, &mut rng);
            assert!(r == Rarity::Uncommon || r == Rarity::Epic, "got {r:?}");
        }
    }

    #[test]
    fn test_single_tier_always_wins() {
        let mut rng = seeded(3);
        for _ in 0..200 {
            assert_eq!(
                roll_for_rarity(&RarityWeights::only(Rarity::Legendary), 99, 1, &mut rng),
                Rarity::Legendary
            );
        }
    }

    #[test]
    fn test_rarity_distribution_neutral_levels() {
        let weights = reference_weights();
        let mut rng = seeded(42);
        let mut counts = [0u32; 5];
        let trials = 5000;
        for _ in 0..trials {
            counts[roll_for_rarity(&weights, 5, 5, &mut rng).rank()] += 1;
        }
        let pct = |r: Rarity| counts[r.rank()] as f64 * 100.0 / trials as f64;
        assert!((55.0..=75.0).contains(&pct(Rarity::Common)), "common {}", pct(Rarity::Common));
        assert!((17.0..=33.0).contains(&pct(Rarity::Uncommon)), "uncommon {}", pct(Rarity::Uncommon));
        assert!((3.0..=13.0).contains(&pct(Rarity::Rare)), "rare {}", pct(Rarity::Rare));
        assert!(pct(Rarity::Epic) <= 3.8, "epic {}", pct(Rarity::Epic));
        assert!(pct(Rarity::Legendary) <= 1.2, "legendary {}", pct(Rarity::Legendary));
    }

    #[test]
    fn test_underleveled_player_sees_fewer_commons() {
        let weights = reference_weights();
        let mut rng = seeded(11);
        let trials = 5000;
        let commons = |player: i32, content: i32, rng: &mut crate::rng::LootRng| {
            (0..trials)
                .filter(|_| roll_for_rarity(&weights, player, content, rng) == Rarity::Common)
                .count()
        };
        let under = commons(1, 20, &mut rng);
        let over = commons(20, 1, &mut rng);
        assert!(under < over, "under={under}, over={over}");
    }
}
