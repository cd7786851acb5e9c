//! Centralized tuning constants for the loot core.
//!
//! Level scaling, rarity adjustment and exploration defaults live here so the
//! scaling curve, the roller and the config defaults agree on one set of numbers.

// =====================================================
// Level Scaling
// =====================================================

/// Lower clamp for every scaling multiplier (never a full drought)
pub const MIN_LEVEL_SCALING: f64 = 0.1;

/// Upper clamp for every scaling multiplier (never more than double)
pub const MAX_LEVEL_SCALING: f64 = 2.0;

/// Multiplier lost per level the player is above the content
pub const OVERLEVEL_PENALTY_PER_LEVEL: f64 = 0.08;

/// Multiplier gained per level the player is below the content
pub const UNDERLEVEL_BONUS_PER_LEVEL: f64 = 0.05;

/// Peak content-tier bonus, granted when player and content levels match
pub const CONTENT_TIER_BONUS: f64 = 0.05;

/// Level gap at which the content-tier bonus has faded to zero
pub const CONTENT_TIER_BAND: f64 = 3.0;

// =====================================================
// Rarity Roll
// =====================================================

/// Exponent per tier rank applied to the scaling multiplier:
/// adjusted_weight = weight * scaling^(rank * RARITY_SCALING_EXPONENT)
pub const RARITY_SCALING_EXPONENT: f64 = 0.5;

// =====================================================
// Exploration
// =====================================================

/// Default gold multiplier for a quick exploration
pub const QUICK_GOLD_MULT: f64 = 0.75;

/// Default drop-chance multiplier for a quick exploration
pub const QUICK_DROP_MULT: f64 = 0.8;

/// Default gold multiplier for a thorough exploration
pub const THOROUGH_GOLD_MULT: f64 = 1.0;

/// Default drop-chance multiplier for a thorough exploration
pub const THOROUGH_DROP_MULT: f64 = 1.0;

/// Default gold multiplier for a treasure hunt
pub const TREASURE_HUNT_GOLD_MULT: f64 = 1.5;

/// Default drop-chance multiplier for a treasure hunt
pub const TREASURE_HUNT_DROP_MULT: f64 = 1.25;

// =====================================================
// Simulation
// =====================================================

/// Default Monte-Carlo sample count per simulated source
pub const DEFAULT_SIMULATION_SAMPLES: u64 = 1_000;

/// Minimum fraction of non-empty payloads a source must produce
pub const SCARCITY_FLOOR: f64 = 0.30;
