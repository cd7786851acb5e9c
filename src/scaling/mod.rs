//! Level-difference scaling.
//!
//! `level_difference = player_level - content_level`. Overleveled players
//! (positive difference) lose drop chance and rarity quickly; underleveled
//! players (negative difference) gain more slowly. Everything is clamped to
//! [`MIN_LEVEL_SCALING`, `MAX_LEVEL_SCALING`].

use crate::constants::{
    CONTENT_TIER_BAND, CONTENT_TIER_BONUS, MAX_LEVEL_SCALING, MIN_LEVEL_SCALING,
    OVERLEVEL_PENALTY_PER_LEVEL, UNDERLEVEL_BONUS_PER_LEVEL,
};

/// Scaling from the level difference alone. 1.0 at zero difference.
pub fn calculate_level_scaling(level_difference: i32) -> f64 {
    clamp_scaling(difference_curve(level_difference))
}

/// Scaling from the level difference plus a content-tier bonus that peaks at
/// [`CONTENT_TIER_BONUS`] when player and content levels match (1.05 baseline)
/// and fades linearly to zero at a gap of [`CONTENT_TIER_BAND`] levels.
pub fn calculate_level_scaling_with_levels(
    level_difference: i32,
    player_level: i32,
    content_level: i32,
) -> f64 {
    let raw = difference_curve(level_difference) + content_tier_bonus(player_level, content_level);
    clamp_scaling(raw)
}

/// Content-tier bonus for a player/content level pair, in [0, CONTENT_TIER_BONUS]
pub fn content_tier_bonus(player_level: i32, content_level: i32) -> f64 {
    let gap = (player_level as i64 - content_level as i64).unsigned_abs() as f64;
    CONTENT_TIER_BONUS * (1.0 - gap / CONTENT_TIER_BAND).max(0.0)
}

/// Unclamped asymmetric piecewise-linear curve
fn difference_curve(level_difference: i32) -> f64 {
    let diff = level_difference as f64;
    if diff >= 0.0 {
        1.0 - diff * OVERLEVEL_PENALTY_PER_LEVEL
    } else {
        1.0 - diff * UNDERLEVEL_BONUS_PER_LEVEL
    }
}

fn clamp_scaling(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_LEVEL_SCALING;
    }
    raw.clamp(MIN_LEVEL_SCALING, MAX_LEVEL_SCALING)
}
