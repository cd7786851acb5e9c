//! Edge case & boundary tests
//!
//! Tests behavior at the FFI boundary:
//! - Null pointer inputs → null or neutral value, never a crash
//! - Empty / malformed JSON → null
//! - Extreme levels and seeds
//! - free_string on null

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use loot_core::bridge::*;
use loot_core::LootPayload;

// ============================================================
// Helpers
// ============================================================

fn cstr(s: &str) -> CString {
    CString::new(s).unwrap()
}

fn ptr_to_string(ptr: *mut c_char) -> String {
    assert!(!ptr.is_null(), "FFI returned null pointer");
    let s = unsafe { CStr::from_ptr(ptr).to_str().unwrap().to_owned() };
    free_string(ptr);
    s
}

fn ptr_to_payload(ptr: *mut c_char) -> LootPayload {
    let s = ptr_to_string(ptr);
    serde_json::from_str(&s).unwrap_or_else(|e| panic!("Invalid payload JSON: {e}\nRaw: {s}"))
}

// ============================================================
// 1. Null pointer safety
// ============================================================

#[test]
fn null_input_generate_monster() {
    let result = loot_generate_monster(std::ptr::null(), 5, std::ptr::null(), 0);
    assert!(result.is_null(), "loot_generate_monster(null, ...) should return null");
}

#[test]
fn null_area_for_monster_is_allowed() {
    let id = cstr("slime");
    let payload = ptr_to_payload(loot_generate_monster(id.as_ptr(), 1, std::ptr::null(), 0));
    assert!((2..=6).contains(&payload.gold));
}

#[test]
fn null_input_generate_area() {
    let kind = cstr("quick");
    assert!(loot_generate_area(std::ptr::null(), 5, kind.as_ptr(), 0).is_null());
    let id = cstr("whispering_woods");
    assert!(loot_generate_area(id.as_ptr(), 5, std::ptr::null(), 0).is_null());
}

#[test]
fn null_input_resolve_item() {
    assert!(loot_resolve_item(std::ptr::null(), 0).is_null());
}

#[test]
fn null_input_roll_entry() {
    assert!(loot_roll_entry(std::ptr::null(), 1, 1, 0).is_null());
}

#[test]
fn null_input_simulate() {
    assert!(loot_simulate(std::ptr::null(), 10).is_null());
}

#[test]
fn null_input_init() {
    assert!(!loot_init(std::ptr::null()));
}

#[test]
fn free_string_null_is_noop() {
    free_string(std::ptr::null_mut());
}

// ============================================================
// 2. Malformed JSON
// ============================================================

#[test]
fn malformed_entry_json() {
    for bad in ["", "{", "not json", "[1,2,3]", r#"{"rarityWeights":{"common":-1.0}}"#] {
        let s = cstr(bad);
        assert!(loot_resolve_item(s.as_ptr(), 0).is_null(), "resolve accepted {bad:?}");
        assert!(loot_roll_entry(s.as_ptr(), 1, 1, 0).is_null(), "roll accepted {bad:?}");
    }
}

#[test]
fn malformed_sim_target() {
    for bad in ["{}", r#"{"kind":"dungeon","id":"x","player_level":1}"#, "null"] {
        let s = cstr(bad);
        assert!(loot_simulate(s.as_ptr(), 10).is_null(), "simulate accepted {bad:?}");
    }
}

#[test]
fn unknown_sim_target_is_null() {
    let s = cstr(r#"{"kind":"area","id":"atlantis","player_level":1,"exploration":"quick"}"#);
    assert!(loot_simulate(s.as_ptr(), 10).is_null());
}

#[test]
fn empty_source_entry_resolves_to_null() {
    for entry in ["{}", r#"{"equipmentTypes":[]}"#, r#"{"itemType":"unknown_equipment_type"}"#] {
        let s = cstr(entry);
        assert!(loot_resolve_item(s.as_ptr(), 0).is_null(), "{entry} resolved");
    }
}

// ============================================================
// 3. Unknown ids → empty payload
// ============================================================

#[test]
fn unknown_monster_gives_empty_payload() {
    let id = cstr("");
    assert!(ptr_to_payload(loot_generate_monster(id.as_ptr(), 5, std::ptr::null(), 0)).is_empty());
}

#[test]
fn unknown_exploration_gives_empty_payload() {
    let id = cstr("whispering_woods");
    let kind = cstr("QUICK");
    assert!(ptr_to_payload(loot_generate_area(id.as_ptr(), 5, kind.as_ptr(), 0)).is_empty());
}

// ============================================================
// 4. Extreme values
// ============================================================

#[test]
fn extreme_levels_still_produce_payloads() {
    let id = cstr("fire_drake");
    for level in [i32::MIN, -1, 0, 1, 1000, i32::MAX] {
        let payload = ptr_to_payload(loot_generate_monster(id.as_ptr(), level, std::ptr::null(), 1));
        assert!((150..=300).contains(&payload.gold), "level {level}: gold {}", payload.gold);
    }
}

#[test]
fn extreme_seeds() {
    let id = cstr("goblin");
    for seed in [0, 1, u64::MAX] {
        let payload = ptr_to_payload(loot_generate_monster(id.as_ptr(), 3, std::ptr::null(), seed));
        assert!((5..=15).contains(&payload.gold));
    }
}

#[test]
fn level_scaling_extremes_stay_bounded() {
    for diff in [i32::MIN, -1_000_000, -100, 0, 100, 1_000_000, i32::MAX] {
        let s = loot_level_scaling(diff);
        assert!((0.1..=2.0).contains(&s), "diff {diff}: {s}");
        let s = loot_level_scaling_with_levels(diff, i32::MAX, i32::MIN);
        assert!((0.1..=2.0).contains(&s), "diff {diff} with levels: {s}");
    }
}

#[test]
fn simulate_zero_samples_uses_config() {
    let s = cstr(r#"{"kind":"monster","id":"slime","player_level":1}"#);
    let json = ptr_to_string(loot_simulate(s.as_ptr(), 0));
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["samples"], 1000);
}
