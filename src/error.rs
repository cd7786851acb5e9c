//! Error type for the fallible edges of the loot core.
//!
//! Rolling and assembling never fail; only table loading, config validation
//! and the strict `try_*` lookups return `LootError`.

#[derive(Debug, thiserror::Error)]
pub enum LootError {
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid rarity tier table: {0}")]
    InvalidTierTable(String),
    #[error("Invalid rarity weights: {0}")]
    InvalidWeights(String),
    #[error("Invalid loot entry in {source_id}: {reason}")]
    InvalidEntry { source_id: String, reason: String },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Unknown monster: {0}")]
    UnknownMonster(String),
    #[error("Unknown area: {0}")]
    UnknownArea(String),
    #[error("Unknown exploration type: {0}")]
    UnknownExplorationType(String),
}

pub type Result<T> = std::result::Result<T, LootError>;
