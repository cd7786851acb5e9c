use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_SIMULATION_SAMPLES, QUICK_DROP_MULT, QUICK_GOLD_MULT, THOROUGH_DROP_MULT,
    THOROUGH_GOLD_MULT, TREASURE_HUNT_DROP_MULT, TREASURE_HUNT_GOLD_MULT,
};
use crate::error::{LootError, Result};
use crate::tables::{is_json, parse_ron};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for simulations and the C-ABI bridge
    pub base_seed: u64,
    /// Id lookups fail with an error instead of returning an empty payload
    pub strict_sources: bool,
    pub exploration: ExplorationConfig,
    pub simulation_samples: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_seed: 42,
            strict_sources: false,
            exploration: ExplorationConfig::default(),
            simulation_samples: DEFAULT_SIMULATION_SAMPLES,
        }
    }
}

impl EngineConfig {
    pub fn from_json(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = parse_ron(source)?;
        config.validate()?;
        Ok(config)
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

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Multipliers must be finite and positive, and expected value must not
    /// fall from quick to thorough to treasure hunt.
    pub fn validate(&self) -> Result<()> {
        let ordered = ExplorationType::ALL.map(|t| (t, self.exploration.get(t)));
        for (kind, modifiers) in &ordered {
            for (name, value) in [
                ("gold_multiplier", modifiers.gold_multiplier),
                ("drop_chance_multiplier", modifiers.drop_chance_multiplier),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(LootError::InvalidConfig(format!(
                        "{} {name} must be finite and > 0, got {value}",
                        kind.as_str()
                    )));
                }
            }
        }
        for pair in ordered.windows(2) {
            let (lower, a) = pair[0];
            let (higher, b) = pair[1];
            if b.gold_multiplier < a.gold_multiplier
                || b.drop_chance_multiplier < a.drop_chance_multiplier
            {
                return Err(LootError::InvalidConfig(format!(
                    "{} must not yield less than {}",
                    higher.as_str(),
                    lower.as_str()
                )));
            }
        }
        if self.simulation_samples == 0 {
            return Err(LootError::InvalidConfig(
                "simulation_samples must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Closed set of exploration modes, ordered by expected yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationType {
    Quick,
    Thorough,
    TreasureHunt,
}

impl ExplorationType {
    pub const ALL: [ExplorationType; 3] = [
        ExplorationType::Quick,
        ExplorationType::Thorough,
        ExplorationType::TreasureHunt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExplorationType::Quick => "quick",
            ExplorationType::Thorough => "thorough",
            ExplorationType::TreasureHunt => "treasure_hunt",
        }
    }
}

impl FromStr for ExplorationType {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LootError::UnknownExplorationType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationModifiers {
    pub gold_multiplier: f64,
    pub drop_chance_multiplier: f64,
}

impl ExplorationModifiers {
    pub const NEUTRAL: Self = Self {
        gold_multiplier: 1.0,
        drop_chance_multiplier: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    pub quick: ExplorationModifiers,
    pub thorough: ExplorationModifiers,
    pub treasure_hunt: ExplorationModifiers,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            quick: ExplorationModifiers {
                gold_multiplier: QUICK_GOLD_MULT,
                drop_chance_multiplier: QUICK_DROP_MULT,
            },
            thorough: ExplorationModifiers {
                gold_multiplier: THOROUGH_GOLD_MULT,
                drop_chance_multiplier: THOROUGH_DROP_MULT,
            },
            treasure_hunt: ExplorationModifiers {
                gold_multiplier: TREASURE_HUNT_GOLD_MULT,
                drop_chance_multiplier: TREASURE_HUNT_DROP_MULT,
            },
        }
    }
}

impl ExplorationConfig {
    pub fn get(&self, kind: ExplorationType) -> ExplorationModifiers {
        match kind {
            ExplorationType::Quick => self.quick,
            ExplorationType::Thorough => self.thorough,
            ExplorationType::TreasureHunt => self.treasure_hunt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_exploration_type_parse() {
        assert_eq!("quick".parse::<ExplorationType>().unwrap(), ExplorationType::Quick);
        assert_eq!(
            "treasure_hunt".parse::<ExplorationType>().unwrap(),
            ExplorationType::TreasureHunt
        );
        assert!(matches!(
            "speedrun".parse::<ExplorationType>(),
            Err(LootError::UnknownExplorationType(_))
        ));
    }

    #[test]
    fn test_config_json_partial() {
        let config = EngineConfig::from_json(r#"{"base_seed": 7, "strict_sources": true}"#).unwrap();
        assert_eq!(config.base_seed, 7);
        assert!(config.strict_sources);
        assert_eq!(config.exploration, ExplorationConfig::default());
    }

    #[test]
    fn test_config_ron() {
        let config = EngineConfig::from_ron(
            "(base_seed: 9, exploration: (treasure_hunt: (gold_multiplier: 2.0, drop_chance_multiplier: 1.5)))",
        )
        .unwrap();
        assert_eq!(config.base_seed, 9);
        assert_eq!(config.exploration.treasure_hunt.gold_multiplier, 2.0);
        assert_eq!(config.exploration.quick, ExplorationConfig::default().quick);
    }

    #[test]
    fn test_config_rejects_inverted_exploration() {
        let mut config = EngineConfig::default();
        config.exploration.quick.gold_multiplier = 3.0;
        assert!(matches!(config.validate(), Err(LootError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_non_positive_multiplier() {
        let mut config = EngineConfig::default();
        config.exploration.thorough.drop_chance_multiplier = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EngineConfig::default();
        let restored = EngineConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(restored, config);
    }
}
