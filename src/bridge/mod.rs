//! FFI bridge: loot core <-> host runtime
//!
//! C-ABI functions a host loads from the cdylib. Data crosses the boundary
//! as JSON. Every function returning `*mut c_char` hands over a heap string
//! the caller must release with `free_string`; null means invalid input.
//!
//! The engine is process-wide: `loot_init` installs one built from a JSON
//! config, otherwise the first call builds it from the built-in tables.

use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::sync::OnceLock;

use crate::balance::{self, SimConfig, SimTarget};
use crate::engine::{EngineConfig, LootEngine};
use crate::loot::{LootEntry, LootPayload};
use crate::rarity::RARITY_TIERS;
use crate::rng;
use crate::scaling;

static ENGINE: OnceLock<Option<LootEngine>> = OnceLock::new();

fn engine() -> Option<&'static LootEngine> {
    ENGINE
        .get_or_init(|| match LootEngine::builtin() {
            Ok(engine) => Some(engine),
            Err(err) => {
                tracing::error!(%err, "failed to build built-in loot engine");
                None
            }
        })
        .as_ref()
}

// ========================
// Helper: safe JSON return
// ========================

fn json_to_cstring<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn parse_cstr(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_owned()) }
}

fn payload_to_cstring(payload: crate::error::Result<LootPayload>) -> *mut c_char {
    match payload {
        Ok(payload) => json_to_cstring(&payload),
        Err(err) => {
            tracing::warn!(%err, "loot request rejected");
            std::ptr::null_mut()
        }
    }
}

// ========================
// C-ABI: Core
// ========================

/// Crate version string
#[no_mangle]
pub extern "C" fn get_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION")).unwrap_or_default().into_raw()
}

/// Free a string allocated by Rust.
/// ptr must come from a prior call into this library, or be null.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Install tracing at a numeric level (0 trace .. 4 error). Idempotent.
#[no_mangle]
pub extern "C" fn loot_init_logging(level_id: u32) {
    let level = crate::logging::LogLevel::from_id(level_id);
    crate::logging::init_tracing(&crate::logging::TracingConfig::with_level(level));
}

/// Build the process-wide engine from a JSON `EngineConfig` over the built-in
/// tables. Returns false on invalid config or when an engine already exists.
#[no_mangle]
pub extern "C" fn loot_init(config_json: *const c_char) -> bool {
    let Some(json) = parse_cstr(config_json) else {
        return false;
    };
    let built = EngineConfig::from_json(&json).and_then(LootEngine::with_config);
    match built {
        Ok(engine) => ENGINE.set(Some(engine)).is_ok(),
        Err(err) => {
            tracing::warn!(%err, "loot_init rejected config");
            false
        }
    }
}

// ========================
// C-ABI: Loot generation
// ========================

/// Loot for a defeated monster as `LootPayload` JSON.
/// `area_id` may be null. With `strict_sources` set, unknown ids return null;
/// otherwise they return an empty payload.
#[no_mangle]
pub extern "C" fn loot_generate_monster(
    monster_id: *const c_char,
    player_level: i32,
    area_id: *const c_char,
    seed: u64,
) -> *mut c_char {
    let Some(monster_id) = parse_cstr(monster_id) else {
        return std::ptr::null_mut();
    };
    let Some(engine) = engine() else {
        return std::ptr::null_mut();
    };
    let area_id = parse_cstr(area_id);
    let mut rng = rng::seeded(seed);

    if engine.config().strict_sources {
        payload_to_cstring(engine.try_monster_loot(&monster_id, player_level, area_id.as_deref(), &mut rng))
    } else {
        json_to_cstring(&engine.monster_loot(&monster_id, player_level, area_id.as_deref(), &mut rng))
    }
}

/// Loot for exploring an area as `LootPayload` JSON.
/// `exploration` is one of quick, thorough, treasure_hunt.
#[no_mangle]
pub extern "C" fn loot_generate_area(
    area_id: *const c_char,
    player_level: i32,
    exploration: *const c_char,
    seed: u64,
) -> *mut c_char {
    let (Some(area_id), Some(exploration)) = (parse_cstr(area_id), parse_cstr(exploration)) else {
        return std::ptr::null_mut();
    };
    let Some(engine) = engine() else {
        return std::ptr::null_mut();
    };
    let mut rng = rng::seeded(seed);

    if engine.config().strict_sources {
        payload_to_cstring(engine.try_area_loot(&area_id, player_level, &exploration, &mut rng))
    } else {
        json_to_cstring(&engine.area_loot(&area_id, player_level, &exploration, &mut rng))
    }
}

/// Resolve a `LootEntry` JSON to a concrete item id (JSON string), or null
#[no_mangle]
pub extern "C" fn loot_resolve_item(entry_json: *const c_char, seed: u64) -> *mut c_char {
    let Some(json) = parse_cstr(entry_json) else {
        return std::ptr::null_mut();
    };
    let Ok(entry) = serde_json::from_str::<LootEntry>(&json) else {
        return std::ptr::null_mut();
    };
    let Some(engine) = engine() else {
        return std::ptr::null_mut();
    };
    let mut rng = rng::seeded(seed);
    match engine.resolve_concrete_item_id(&entry, &mut rng) {
        Some(id) => json_to_cstring(&id),
        None => std::ptr::null_mut(),
    }
}

/// Roll one `LootEntry` JSON and return the `LootRollResult` JSON
#[no_mangle]
pub extern "C" fn loot_roll_entry(
    entry_json: *const c_char,
    player_level: i32,
    content_level: i32,
    seed: u64,
) -> *mut c_char {
    let Some(json) = parse_cstr(entry_json) else {
        return std::ptr::null_mut();
    };
    let Ok(entry) = serde_json::from_str::<LootEntry>(&json) else {
        return std::ptr::null_mut();
    };
    let mut rng = rng::seeded(seed);
    json_to_cstring(&crate::loot::roll_for_loot(&entry, player_level, content_level, &mut rng))
}

// ========================
// C-ABI: Scaling & tiers
// ========================

/// Scaling multiplier for `player - content` level difference
#[no_mangle]
pub extern "C" fn loot_level_scaling(level_difference: i32) -> f64 {
    scaling::calculate_level_scaling(level_difference)
}

/// Scaling multiplier including the content-tier bonus
#[no_mangle]
pub extern "C" fn loot_level_scaling_with_levels(
    level_difference: i32,
    player_level: i32,
    content_level: i32,
) -> f64 {
    scaling::calculate_level_scaling_with_levels(level_difference, player_level, content_level)
}

/// The rarity tier table as a JSON array
#[no_mangle]
pub extern "C" fn loot_rarity_tiers() -> *mut c_char {
    json_to_cstring(&RARITY_TIERS)
}

// ========================
// C-ABI: Simulation
// ========================

/// Monte-Carlo report for a `SimTarget` JSON, e.g.
/// `{"kind":"monster","id":"goblin","player_level":3,"area":null}`.
/// `samples == 0` uses the configured sample count.
#[no_mangle]
pub extern "C" fn loot_simulate(target_json: *const c_char, samples: u64) -> *mut c_char {
    let Some(json) = parse_cstr(target_json) else {
        return std::ptr::null_mut();
    };
    let Ok(target) = serde_json::from_str::<SimTarget>(&json) else {
        return std::ptr::null_mut();
    };
    let Some(engine) = engine() else {
        return std::ptr::null_mut();
    };
    let mut config = SimConfig::from_engine(engine.config());
    if samples > 0 {
        config.samples = samples;
    }
    match balance::simulate_source(engine, &target, &config) {
        Ok(report) => json_to_cstring(&report),
        Err(err) => {
            tracing::warn!(%err, "simulation rejected");
            std::ptr::null_mut()
        }
    }
}
