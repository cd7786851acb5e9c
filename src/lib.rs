//! Tower Game - Loot Core Library
//!
//! Deterministic loot generation for the Tower RPG:
//! - Rarity tier table and weighted rarity rolls
//! - Level scaling between player and content
//! - Equipment resolution from concrete ids or abstract tags
//! - Monster and area loot assembly
//! - Monte-Carlo drop simulation
//! - FFI bridge for a host runtime

pub mod balance;
pub mod bridge;
pub mod constants;
pub mod engine;
pub mod error;
pub mod logging;
pub mod loot;
pub mod rarity;
pub mod rng;
pub mod scaling;
pub mod tables;

pub use engine::{EngineConfig, ExplorationType, LootEngine};
pub use error::{LootError, Result};
pub use loot::{LootEntry, LootItem, LootPayload, LootRollResult};
pub use rarity::{Rarity, RarityWeights, RARITY_TIERS};
